use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-file load failures (recoverable: the file is skipped)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No se encontró el archivo '{}'.", .0.display())]
    NotFound(PathBuf),

    #[error("{}: missing required column '{column}'", file.display())]
    MissingColumn { file: PathBuf, column: &'static str },

    #[error("{}: {source}", file.display())]
    Csv {
        file: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Whether this failure means the file simply is not there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

// ---------------------------------------------------------------------------
// Configuration failures
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown colour name '{name}' for quality '{label}'")]
    UnknownColor { label: String, name: String },
}

// ---------------------------------------------------------------------------
// Pipeline-level failures (terminal)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No se procesaron archivos CSV válidos. Verifica los nombres de archivo y las columnas.")]
    NoValidFiles,

    #[error("Los archivos cargados no contienen registros completos; no hay años que mostrar.")]
    EmptyDataset,

    #[error("serializing figure: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("writing diagnostics: {0}")]
    Diagnostics(#[source] std::io::Error),
}
