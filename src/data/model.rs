use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// WaterBodyType – derived from the source file name
// ---------------------------------------------------------------------------

/// Kind of water body a source file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WaterBodyType {
    Coastal,
    Lentic,
    Lotic,
    Groundwater,
    Unknown,
}

impl WaterBodyType {
    /// Known types in the order their file-name tokens are tested.
    pub const KNOWN: [WaterBodyType; 4] = [
        WaterBodyType::Coastal,
        WaterBodyType::Lentic,
        WaterBodyType::Lotic,
        WaterBodyType::Groundwater,
    ];

    /// Upper-case token that identifies this type inside a file name.
    pub fn file_token(self) -> Option<&'static str> {
        match self {
            WaterBodyType::Coastal => Some("COSTEROS"),
            WaterBodyType::Lentic => Some("LENTICOS"),
            WaterBodyType::Lotic => Some("LOTICOS"),
            WaterBodyType::Groundwater => Some("SUBTERRANEO"),
            WaterBodyType::Unknown => None,
        }
    }

    /// Display label used for layer names and the visibility dropdown.
    pub fn label(self) -> &'static str {
        match self {
            WaterBodyType::Coastal => "Costero",
            WaterBodyType::Lentic => "Léntico",
            WaterBodyType::Lotic => "Lótico",
            WaterBodyType::Groundwater => "Subterráneo",
            WaterBodyType::Unknown => "Desconocido",
        }
    }

    /// Case-insensitive substring match of the file name against the known
    /// tokens, first match wins. Falls back to [`WaterBodyType::Unknown`].
    ///
    /// `LOTICOS` is not a substring of `LENTICOS` (or vice versa), so the
    /// test order only matters for names carrying several tokens.
    pub fn from_file_name(name: &str) -> Self {
        let upper = name.to_uppercase();
        Self::KNOWN
            .into_iter()
            .find(|t| t.file_token().is_some_and(|tok| upper.contains(tok)))
            .unwrap_or(WaterBodyType::Unknown)
    }
}

impl fmt::Display for WaterBodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// QualityCategory – the CALIDAD column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityCategory {
    Good,
    Acceptable,
    Contaminated,
    InsufficientData,
    /// Any label outside the four published categories, kept verbatim.
    Other(String),
}

impl QualityCategory {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Buena Calidad" => QualityCategory::Good,
            "Aceptable" => QualityCategory::Acceptable,
            "Contaminada" => QualityCategory::Contaminated,
            "Datos insuficientes" => QualityCategory::InsufficientData,
            other => QualityCategory::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QualityCategory::Good => "Buena Calidad",
            QualityCategory::Acceptable => "Aceptable",
            QualityCategory::Contaminated => "Contaminada",
            QualityCategory::InsufficientData => "Datos insuficientes",
            QualityCategory::Other(s) => s,
        }
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Measurement – the COLI_FEC cell
// ---------------------------------------------------------------------------

/// A fecal-coliform cell. Numeric text becomes a number, anything else
/// (e.g. `"<3"`) is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    pub fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Measurement::Number(v),
            _ => Measurement::Text(cell.to_string()),
        }
    }

    /// JSON form used as hover data: numbers stay numbers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Measurement::Number(v) => serde_json::json!(v),
            Measurement::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Number(v) => write!(f, "{v}"),
            Measurement::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation / SourceTable – output of the loader
// ---------------------------------------------------------------------------

/// One cleaned row of a single source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub site: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub quality: QualityCategory,
    /// `None` when no measurement was taken.
    pub coliform: Option<Measurement>,
    pub body_type: WaterBodyType,
}

/// The cleaned content of one source file.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub file_name: String,
    pub body_type: WaterBodyType,
    /// Data rows present in the file before the null filter.
    pub rows_read: usize,
    pub observations: Vec<Observation>,
}

impl SourceTable {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.observations.len()
    }
}

// ---------------------------------------------------------------------------
// Record / Dataset – output of the merger
// ---------------------------------------------------------------------------

/// A merged observation. The coliform gap has been filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub site: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub quality: QualityCategory,
    pub coliform: Measurement,
    pub body_type: WaterBodyType,
}

/// Per-file bookkeeping kept alongside the merged records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub file_name: String,
    pub body_type: WaterBodyType,
    pub rows_read: usize,
    pub rows_kept: usize,
}

/// The concatenation of every loaded file, in file-list order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub sources: Vec<SourceSummary>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct years.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct water-body types in first-seen order.
    pub fn body_types(&self) -> Vec<WaterBodyType> {
        let mut seen = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.body_type) {
                seen.push(r.body_type);
            }
        }
        seen
    }

    /// Rows for one year and type, in dataset order.
    pub fn select(&self, year: i32, body_type: WaterBodyType) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(move |r| r.year == year && r.body_type == body_type)
    }

    /// Mean latitude/longitude, used to centre the map.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        let (lat, lon) = self
            .records
            .iter()
            .fold((0.0, 0.0), |(la, lo), r| (la + r.latitude, lo + r.longitude));
        Some((lat / n, lon / n))
    }
}
