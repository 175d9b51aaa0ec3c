//! Connection configuration (command line + `config.ini`)
//!
//! Explicit values always win field by field. The `[mysql]` section of the
//! config file only fills what was left unset, and built-in defaults fill
//! host and port last.

use ini::{Ini, ParseOption};
use std::fmt;
use std::path::Path;

/// Config file read when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Section of the config file holding connection settings
pub const CONFIG_SECTION: &str = "mysql";

pub const DEFAULT_HOST: &str = "localhost";

pub const DEFAULT_PORT: u16 = 3306;

/// Connection parameters given explicitly (usually command-line flags)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub port: Option<u16>,
}

impl ConnectionOverrides {
    /// Treat empty strings as unset
    fn normalized(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            host: non_empty(self.host),
            user: non_empty(self.user),
            password: non_empty(self.password),
            database: non_empty(self.database),
            port: self.port,
        }
    }

    /// Whether host, user, password and database are all given
    ///
    /// Port is not part of the check: it always has a default.
    pub fn is_complete(&self) -> bool {
        self.host.is_some() && self.user.is_some() && self.password.is_some() && self.database.is_some()
    }
}

/// Values found in the `[mysql]` section of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MysqlSection {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub port: Option<u16>,
}

impl MysqlSection {
    /// Load the section from an INI file
    ///
    /// Returns `Ok(None)` when the file does not exist or has no `[mysql]`
    /// section. A file that exists but is malformed is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_ini_str(&contents)
    }

    /// Parse the section from INI text
    ///
    /// Values are taken verbatim: backslashes and quotes are part of the
    /// value, so passwords reach the driver exactly as written.
    pub fn from_ini_str(contents: &str) -> Result<Option<Self>, ConfigError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(contents, options)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let Some(properties) = ini.section(Some(CONFIG_SECTION)) else {
            tracing::debug!("config file has no [{}] section", CONFIG_SECTION);
            return Ok(None);
        };

        let mut section = Self::default();

        // Keys are matched case-insensitively, like most INI readers do
        for (key, value) in properties.iter() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.to_lowercase().as_str() {
                "host" => section.host = Some(value.to_string()),
                "user" => section.user = Some(value.to_string()),
                "password" => section.password = Some(value.to_string()),
                "database" => section.database = Some(value.to_string()),
                "port" => {
                    let port = value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                        key: "port".to_string(),
                        value: value.to_string(),
                    })?;
                    section.port = Some(port);
                }
                _ => {}
            }
        }

        Ok(Some(section))
    }
}

/// Fully resolved connection descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectionConfig {
    /// Resolve explicit values against the config file at `config_path`
    ///
    /// The file is not read at all when every required field is explicit.
    pub fn resolve(overrides: ConnectionOverrides, config_path: &Path) -> Result<Self, ConfigError> {
        let overrides = overrides.normalized();

        let section = if overrides.is_complete() {
            None
        } else {
            MysqlSection::load(config_path)?
        };

        Ok(Self::merge(overrides, section.unwrap_or_default()))
    }

    /// Merge explicit values over file values, then apply defaults
    pub fn merge(overrides: ConnectionOverrides, section: MysqlSection) -> Self {
        Self {
            host: overrides
                .host
                .or(section.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(section.port).unwrap_or(DEFAULT_PORT),
            user: overrides.user.or(section.user),
            password: overrides.password.or(section.password),
            database: overrides.database.or(section.database),
        }
    }

    /// User name, or an error if it was never configured
    pub fn require_user(&self) -> Result<&str, ConfigError> {
        self.user.as_deref().ok_or(ConfigError::MissingField("user"))
    }

    /// Database name, or an error if it was never configured
    pub fn require_database(&self) -> Result<&str, ConfigError> {
        self.database.as_deref().ok_or(ConfigError::MissingField("database"))
    }

    /// Password, empty when unset
    pub fn password_or_empty(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ConnectionConfig {
    // Never prints the password
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user.as_deref().unwrap_or("?"),
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("?")
        )
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required connection field '{0}' (pass --{0} or set it under [mysql] in the config file)")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_value_beats_file_value() {
        let file = write_config("[mysql]\ndatabase = bar\nuser = admin\n");
        let overrides = ConnectionOverrides {
            database: Some("foo".to_string()),
            ..Default::default()
        };

        let config = ConnectionConfig::resolve(overrides, file.path()).unwrap();
        assert_eq!(config.database.as_deref(), Some("foo"));
        assert_eq!(config.user.as_deref(), Some("admin"));
    }

    #[test]
    fn port_comes_from_file_when_not_given() {
        let file = write_config("[mysql]\nport = 3307\n");
        let config = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap();
        assert_eq!(config.port, 3307);
    }

    #[test]
    fn port_defaults_when_unset_everywhere() {
        let file = write_config("[mysql]\nhost = db.internal\n");
        let config = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, "db.internal");
    }

    #[test]
    fn explicit_port_beats_file_port() {
        let file = write_config("[mysql]\nport = 3307\n");
        let overrides = ConnectionOverrides {
            port: Some(3306),
            ..Default::default()
        };
        let config = ConnectionConfig::resolve(overrides, file.path()).unwrap();
        assert_eq!(config.port, 3306);
    }

    #[test]
    fn missing_file_falls_through_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectionConfig::resolve(
            ConnectionOverrides::default(),
            &dir.path().join("does-not-exist.ini"),
        )
        .unwrap();

        assert_eq!(
            config,
            ConnectionConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                user: None,
                password: None,
                database: None,
            }
        );
    }

    #[test]
    fn file_without_section_is_ignored() {
        let file = write_config("[postgres]\nhost = elsewhere\n");
        let config = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn complete_overrides_skip_the_file() {
        // Malformed port would fail if the file were read
        let file = write_config("[mysql]\nport = not-a-number\n");
        let overrides = ConnectionOverrides {
            host: Some("h".to_string()),
            user: Some("u".to_string()),
            password: Some("p".to_string()),
            database: Some("d".to_string()),
            port: None,
        };

        let config = ConnectionConfig::resolve(overrides, file.path()).unwrap();
        assert_eq!(config.host, "h");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let file = write_config("[mysql]\nport = not-a-number\n");
        let err = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "port"));
    }

    #[test]
    fn empty_explicit_values_count_as_unset() {
        let file = write_config("[mysql]\nuser = from_file\n");
        let overrides = ConnectionOverrides {
            user: Some(String::new()),
            ..Default::default()
        };
        let config = ConnectionConfig::resolve(overrides, file.path()).unwrap();
        assert_eq!(config.user.as_deref(), Some("from_file"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let section = MysqlSection::from_ini_str("[mysql]\nHost = a\nDATABASE = b\n")
            .unwrap()
            .unwrap();
        assert_eq!(section.host.as_deref(), Some("a"));
        assert_eq!(section.database.as_deref(), Some("b"));
    }

    #[test]
    fn values_are_kept_verbatim() {
        let section = MysqlSection::from_ini_str(
            "[mysql]\npassword = p\\ass\\word\nuser = \"quoted\"\ndatabase = shop;prod#1\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(section.password.as_deref(), Some("p\\ass\\word"));
        assert_eq!(section.user.as_deref(), Some("\"quoted\""));
        assert_eq!(section.database.as_deref(), Some("shop;prod#1"));
    }

    #[test]
    fn file_password_reaches_config_unchanged() {
        let file = write_config("[mysql]\nuser = app\npassword = a\\b'c\n");
        let config = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap();
        assert_eq!(config.password_or_empty(), "a\\b'c");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = write_config("[mysql\nuser = root\n");
        let err = ConnectionConfig::resolve(ConnectionOverrides::default(), file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn required_fields() {
        let config = ConnectionConfig::merge(ConnectionOverrides::default(), MysqlSection::default());
        assert!(matches!(config.require_user(), Err(ConfigError::MissingField("user"))));
        assert!(matches!(config.require_database(), Err(ConfigError::MissingField("database"))));
        assert_eq!(config.password_or_empty(), "");
    }

    #[test]
    fn display_hides_password() {
        let config = ConnectionConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: Some("root".to_string()),
            password: Some("hunter2".to_string()),
            database: Some("shop".to_string()),
        };
        assert_eq!(config.to_string(), "root@localhost:3306/shop");
    }
}
