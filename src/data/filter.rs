use super::model::WaterBodyType;

// ---------------------------------------------------------------------------
// Visibility selection: which water-body layers the dropdown shows
// ---------------------------------------------------------------------------

/// One entry of the water-type dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSelection {
    Only(WaterBodyType),
    All,
}

impl TypeSelection {
    /// Label shown on the dropdown button.
    pub fn label(&self) -> &'static str {
        match self {
            TypeSelection::Only(t) => t.label(),
            TypeSelection::All => "Todos",
        }
    }

    /// Whether a layer with this name stays visible.
    ///
    /// Layers are matched by exact name, so frame layers (named
    /// `"<label> - <year>"`) never match a single-type selection.
    pub fn matches(&self, layer_name: &str) -> bool {
        match self {
            TypeSelection::Only(t) => layer_name == t.label(),
            TypeSelection::All => true,
        }
    }
}

/// Dropdown entries: one per type in the given order, then "all".
pub fn selections(types: &[WaterBodyType]) -> Vec<TypeSelection> {
    types
        .iter()
        .copied()
        .map(TypeSelection::Only)
        .chain(std::iter::once(TypeSelection::All))
        .collect()
}

/// Per-layer visibility flags for a selection.
pub fn visibility_mask<S: AsRef<str>>(layer_names: &[S], selection: TypeSelection) -> Vec<bool> {
    layer_names
        .iter()
        .map(|name| selection.matches(name.as_ref()))
        .collect()
}
