use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::StringRecord;

use super::model::{Measurement, Observation, QualityCategory, SourceTable, WaterBodyType};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "YEAR";
pub const COL_LATITUDE: &str = "LATITUD";
pub const COL_LONGITUDE: &str = "LONGITUD";
pub const COL_SITE: &str = "SITIO";
pub const COL_COLIFORM: &str = "COLI_FEC";

/// Canonical name of the quality column after renaming.
pub const COL_QUALITY: &str = "CALIDAD";

/// Source files name their quality column `CALIDAD_<something>`.
pub const QUALITY_PREFIX: &str = "CALIDAD_";

/// Cell contents read as "no value".
const NULL_MARKERS: [&str; 6] = ["NA", "NaN", "nan", "null", "NULL", "N/A"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean one source CSV.
///
/// The water-body type comes from the file name, the `CALIDAD_*` column
/// is read as `CALIDAD`, and rows missing year, latitude, longitude or
/// quality are dropped.
pub fn load_file(path: &Path) -> Result<SourceTable, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            file: path.to_path_buf(),
            source: e,
        },
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_reader(file, &file_name).map_err(|e| match e {
        ReadFailure::Csv(source) => LoadError::Csv {
            file: path.to_path_buf(),
            source,
        },
        ReadFailure::MissingColumn(column) => LoadError::MissingColumn {
            file: path.to_path_buf(),
            column,
        },
    })
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum ReadFailure {
    Csv(csv::Error),
    MissingColumn(&'static str),
}

impl From<csv::Error> for ReadFailure {
    fn from(e: csv::Error) -> Self {
        ReadFailure::Csv(e)
    }
}

/// Resolved header positions for one file.
#[derive(Debug)]
struct Columns {
    year: usize,
    latitude: usize,
    longitude: usize,
    quality: Option<usize>,
    site: Option<usize>,
    coliform: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, ReadFailure> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(ReadFailure::MissingColumn(name));

        // An already-canonical column wins over a prefixed one.
        let quality = find(COL_QUALITY)
            .or_else(|| headers.iter().position(|h| h.starts_with(QUALITY_PREFIX)));

        Ok(Columns {
            year: require(COL_YEAR)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            quality,
            site: find(COL_SITE),
            coliform: find(COL_COLIFORM),
        })
    }
}

fn load_reader<R: Read>(rdr: R, file_name: &str) -> Result<SourceTable, ReadFailure> {
    let body_type = WaterBodyType::from_file_name(file_name);

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let raw_headers = reader.byte_headers()?.clone();
    let headers: Vec<String> = StringRecord::from_byte_record_lossy(raw_headers)
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let cols = Columns::resolve(&headers)?;
    match cols.quality {
        Some(idx) if headers[idx] != COL_QUALITY => {
            log::debug!("{file_name}: using '{}' as {COL_QUALITY}", headers[idx]);
        }
        None => log::warn!("{file_name}: no {QUALITY_PREFIX}* column, every row will be dropped"),
        _ => {}
    }

    let mut observations = Vec::new();
    let mut rows_read = 0;

    // Invalid UTF-8 (e.g. Latin-1 exports) is decoded lossily per row.
    for result in reader.byte_records() {
        let record = StringRecord::from_byte_record_lossy(result?);
        rows_read += 1;
        if let Some(obs) = parse_row(&record, &cols, body_type) {
            observations.push(obs);
        }
    }

    log::info!(
        "{file_name}: {} of {rows_read} rows kept as {body_type}",
        observations.len()
    );

    Ok(SourceTable {
        file_name: file_name.to_string(),
        body_type,
        rows_read,
        observations,
    })
}

/// Build an observation, or `None` if a required field is missing.
fn parse_row(
    record: &StringRecord,
    cols: &Columns,
    body_type: WaterBodyType,
) -> Option<Observation> {
    let year = cell(record, Some(cols.year)).and_then(parse_year)?;
    let latitude = cell(record, Some(cols.latitude)).and_then(parse_coordinate)?;
    let longitude = cell(record, Some(cols.longitude)).and_then(parse_coordinate)?;
    let quality = cell(record, cols.quality).map(QualityCategory::parse)?;

    Some(Observation {
        site: cell(record, cols.site).unwrap_or_default().to_string(),
        year,
        latitude,
        longitude,
        quality,
        coliform: cell(record, cols.coliform).map(Measurement::from_cell),
        body_type,
    })
}

/// Trimmed cell text, `None` when absent or a null marker.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() || NULL_MARKERS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

/// Accepts `2019` as well as the float rendering `2019.0`.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn parse_coordinate(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_str(name: &str, text: &str) -> SourceTable {
        load_reader(text.as_bytes(), name).unwrap()
    }

    #[test]
    fn quality_prefix_column_is_renamed() {
        let table = load_str(
            "CUERPO_LOTICOS.csv",
            "SITIO,YEAR,LATITUD,LONGITUD,COLI_FEC,CALIDAD_COLI_FEC\n\
             R-1,2019,19.5,-88.3,240,Aceptable\n",
        );
        assert_eq!(table.body_type, WaterBodyType::Lotic);
        assert_eq!(table.observations.len(), 1);
        let obs = &table.observations[0];
        assert_eq!(obs.quality, QualityCategory::Acceptable);
        assert_eq!(obs.coliform, Some(Measurement::Number(240.0)));
        assert_eq!(obs.site, "R-1");
        assert_eq!(obs.body_type, WaterBodyType::Lotic);
    }

    #[test]
    fn rows_missing_required_fields_are_dropped() {
        let table = load_str(
            "CUERPO_LENTICOS.csv",
            "SITIO,YEAR,LATITUD,LONGITUD,COLI_FEC,CALIDAD_X\n\
             A,2019,19.5,-88.3,,Contaminada\n\
             B,,19.5,-88.3,10,Aceptable\n\
             C,2019,,-88.3,10,Aceptable\n\
             D,2019,19.5,NaN,10,Aceptable\n\
             E,2019,19.5,-88.3,10,\n\
             F,2020.0,18.1,-87.9,10,Buena Calidad\n",
        );
        assert_eq!(table.rows_read, 6);
        assert_eq!(table.rows_dropped(), 4);
        let sites: Vec<_> = table.observations.iter().map(|o| o.site.as_str()).collect();
        assert_eq!(sites, vec!["A", "F"]);
        assert_eq!(table.observations[0].coliform, None);
        assert_eq!(table.observations[1].year, 2020);
    }

    #[test]
    fn missing_quality_column_drops_every_row() {
        let table = load_str(
            "CUERPO_COSTEROS.csv",
            "SITIO,YEAR,LATITUD,LONGITUD,COLI_FEC\nA,2019,21.1,-86.8,5\n",
        );
        assert_eq!(table.rows_read, 1);
        assert!(table.observations.is_empty());
    }

    #[test]
    fn canonical_quality_column_preferred() {
        let table = load_str(
            "x.csv",
            "YEAR,LATITUD,LONGITUD,CALIDAD_OLD,CALIDAD\n2019,1,2,Contaminada,Aceptable\n",
        );
        assert_eq!(table.body_type, WaterBodyType::Unknown);
        assert_eq!(table.observations[0].quality, QualityCategory::Acceptable);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = load_reader("YEAR,LATITUD\n2019,1\n".as_bytes(), "x.csv").unwrap_err();
        assert!(matches!(err, ReadFailure::MissingColumn(COL_LONGITUDE)));
    }

    #[test]
    fn bom_in_header_is_ignored() {
        let table = load_str(
            "CUERPO_SUBTERRANEO.csv",
            "\u{feff}YEAR,LATITUD,LONGITUD,CALIDAD_SST\n2021,20.2,-87.4,Buena Calidad\n",
        );
        assert_eq!(table.observations.len(), 1);
        assert_eq!(table.observations[0].site, "");
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("CUERPO_LOTICOS.csv")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!(
            "No se encontró el archivo '{}'.",
            dir.path().join("CUERPO_LOTICOS.csv").display()
        ));
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuerpo_costeros.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "SITIO,YEAR,LATITUD,LONGITUD,COLI_FEC,CALIDAD_ENTEROC").unwrap();
        writeln!(f, "P-1,2018,21.16,-86.82,<3,Buena Calidad").unwrap();
        drop(f);

        let table = load_file(&path).unwrap();
        assert_eq!(table.file_name, "cuerpo_costeros.csv");
        assert_eq!(table.body_type, WaterBodyType::Coastal);
        assert_eq!(table.observations[0].coliform, Some(Measurement::Text("<3".into())));
    }

    #[test]
    fn invalid_utf8_row_keeps_the_rest_of_the_file() {
        let mut bytes = b"SITIO,YEAR,LATITUD,LONGITUD,CALIDAD_X\n".to_vec();
        bytes.extend_from_slice(b"A,2019,19.5,-88.3,Aceptable\n");
        bytes.extend_from_slice(b"Bah\xeda,2019,19.6,-88.1,Aceptable\n");
        bytes.extend_from_slice(b"C,2020,19.7,-88.0,Contaminada\n");

        let table = load_reader(bytes.as_slice(), "CUERPO_LENTICOS.csv").unwrap();

        assert_eq!(table.rows_read, 3);
        let sites: Vec<_> = table.observations.iter().map(|o| o.site.as_str()).collect();
        assert_eq!(sites, vec!["A", "Bah\u{fffd}a", "C"]);
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year("2019.5"), None);
        assert_eq!(parse_year("abc"), None);
    }
}
