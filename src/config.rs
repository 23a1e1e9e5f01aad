use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExpenseError, Result};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
    /// Optional branding line printed above the footer timestamp.
    #[serde(default)]
    pub branding: Option<String>,
}

/// Get the config directory path (~/.expense-report/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "expense-report") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.expense-report/
    let home = dirs_home().ok_or_else(|| {
        ExpenseError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".expense-report"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Where the JSON storage keys live.
pub fn data_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("data")
}

/// Where user-provided AFM font metric files live.
pub fn metrics_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("metrics")
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(ExpenseError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ExpenseError::ConfigParse { path, source: e })
}

/// Resolve the PDF output directory, creating it if needed.
pub fn resolve_output_dir(config: &Config) -> Result<PathBuf> {
    let dir = expand_path(&config.pdf.output_dir);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Company Name"
# address = "123 Business Street"   # optional
# email = "ap@yourcompany.com"      # optional
# phone = "+1-555-123-4567"         # optional

[pdf]
output_dir = "~/.expense-report/output"
# branding = "Made with Expense Report"   # optional footer line
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_parses_as_valid_config() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.company.name, "Your Company Name");
        assert_eq!(config.pdf.output_dir, "~/.expense-report/output");
        assert_eq!(config.pdf.branding, None);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ExpenseError::ConfigFileNotFound(_)));
    }

    #[test]
    fn expand_path_handles_home_prefix() {
        let home = std::env::var("HOME").unwrap();
        assert_eq!(
            expand_path("~/reports"),
            PathBuf::from(home).join("reports")
        );
        assert_eq!(expand_path("/tmp/reports"), PathBuf::from("/tmp/reports"));
    }
}
