use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration, deserialized from `.client-pulse/config.toml`.
///
/// Every section and key is optional; missing values fall back to [`Config::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which backend to read when `--source` is not given.
    pub source: SourceConfig,
    pub nocodb: NocoDbConfig,
    pub sheets: SheetsConfig,
    pub chat: ChatConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub default: SourceChoice,
}

/// Backend selection. `Auto` tries NocoDB and falls back to Google Sheets.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SourceChoice {
    #[default]
    Auto,
    NocoDb,
    Sheets,
    Demo,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NocoDbConfig {
    /// Base URL of the NocoDB instance, e.g. `https://nocodb.example.com`.
    pub url: Option<String>,
    /// API token sent as a bearer token.
    pub api_key: Option<String>,
    pub table_id: Option<String>,
    /// Records requested per page.
    pub page_size: usize,
    pub columns: ColumnMap,
}

impl Default for NocoDbConfig {
    fn default() -> Self {
        NocoDbConfig {
            url: None,
            api_key: None,
            table_id: None,
            page_size: 100,
            columns: ColumnMap::default(),
        }
    }
}

/// Table column names holding each client field.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub id: String,
    pub name: String,
    pub group: String,
    pub fee: String,
    pub lifetime: String,
    pub status: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            id: "Id".to_string(),
            name: "Cliente".to_string(),
            group: "Squad".to_string(),
            fee: "Fee".to_string(),
            lifetime: "LT".to_string(),
            status: "StatusAtual".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Id of a spreadsheet shared as "anyone with the link can view".
    pub spreadsheet_id: Option<String>,
    pub sheet: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        SheetsConfig {
            spreadsheet_id: None,
            sheet: "Sheet1".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between refreshes in `dashboard --watch`.
    pub interval_secs: u64,
    /// HTTP timeout for every request.
    pub timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            interval_secs: 60,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Overlay values from environment variables (`NOCODB_URL`, `NOCODB_API_KEY`,
    /// `NOCODB_TABLE_ID`, `SHEETS_SPREADSHEET_ID`, `SHEETS_SHEET`, `CHAT_WEBHOOK_URL`).
    ///
    /// `lookup` is `std::env::var` in production; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("NOCODB_URL") {
            self.nocodb.url = Some(v);
        }
        if let Some(v) = get("NOCODB_API_KEY") {
            self.nocodb.api_key = Some(v);
        }
        if let Some(v) = get("NOCODB_TABLE_ID") {
            self.nocodb.table_id = Some(v);
        }
        if let Some(v) = get("SHEETS_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = Some(v);
        }
        if let Some(v) = get("SHEETS_SHEET") {
            self.sheets.sheet = v;
        }
        if let Some(v) = get("CHAT_WEBHOOK_URL") {
            self.chat.webhook_url = Some(v);
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<working_dir>/.client-pulse/config.toml`
/// 3. `~/.config/client-pulse/config.toml`
/// 4. Built-in [`Config::default`]
///
/// Environment overrides are applied on top of whichever file was found.
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    let mut config = read_config_file(working_dir, config_override)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return parse_file(path);
    }

    let local_config = working_dir.join(".client-pulse").join("config.toml");
    if local_config.exists() {
        return parse_file(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("client-pulse").join("config.toml");
        if home_config.exists() {
            return parse_file(&home_config);
        }
    }

    Ok(Config::default())
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.source.default, SourceChoice::Auto);
        assert_eq!(cfg.nocodb.page_size, 100);
        assert_eq!(cfg.nocodb.columns.status, "StatusAtual");
        assert_eq!(cfg.sheets.sheet, "Sheet1");
        assert_eq!(cfg.refresh.interval_secs, 60);
        assert!(cfg.chat.webhook_url.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
default = "sheets"

[nocodb]
url = "https://noco.example.com"
page_size = 25

[nocodb.columns]
status = "Status"
"#
        )
        .unwrap();

        let cfg = read_config_file(Path::new("."), Some(file.path())).unwrap();
        assert_eq!(cfg.source.default, SourceChoice::Sheets);
        assert_eq!(cfg.nocodb.url.as_deref(), Some("https://noco.example.com"));
        assert_eq!(cfg.nocodb.page_size, 25);
        assert_eq!(cfg.nocodb.columns.status, "Status");
        assert_eq!(cfg.nocodb.columns.fee, "Fee");
        assert_eq!(cfg.refresh.timeout_secs, 10);
    }

    #[test]
    fn test_local_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".client-pulse");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[sheets]\nspreadsheet_id = \"abc123\"\n",
        )
        .unwrap();

        let cfg = read_config_file(dir.path(), None).unwrap();
        assert_eq!(cfg.sheets.spreadsheet_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ndefault = \"ftp\"").unwrap();
        assert!(read_config_file(Path::new("."), Some(file.path())).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NOCODB_URL", "https://env.example.com"),
            ("NOCODB_API_KEY", "secret"),
            ("NOCODB_TABLE_ID", ""),
            ("CHAT_WEBHOOK_URL", "https://hooks.example.com/chat"),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.nocodb.table_id = Some("from-file".to_string());
        cfg.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.nocodb.url.as_deref(), Some("https://env.example.com"));
        assert_eq!(cfg.nocodb.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.nocodb.table_id.as_deref(), Some("from-file"));
        assert_eq!(
            cfg.chat.webhook_url.as_deref(),
            Some("https://hooks.example.com/chat")
        );
    }
}
