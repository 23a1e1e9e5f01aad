use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Config directory not found at {0}. Run 'expense-report init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Storage access failed for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No expense row at position {0}. Use 'expense-report row list' to see rows.")]
    RowNotFound(usize),

    #[error("Invalid color '{0}'. Expected a 6-digit hex value like '#112233'.")]
    InvalidColor(String),

    #[error("'{0}' does not look like a PNG or JPEG image")]
    InvalidLogo(PathBuf),

    #[error("No company logo is set")]
    NoLogo,

    #[error("Failed to parse settings file {0}. Export a valid settings file first.")]
    SettingsParse(PathBuf),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
