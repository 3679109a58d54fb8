//! Fallback values for placeholders that survive substitution
//!
//! The table declares the fixed set of keys the default resolution pass
//! checks (`scan`), plus an entry per key: either a constant or a derivation
//! over another record field. The built-in table covers the secondary
//! account, locale and time settings, DNS/NTP servers, and the greeting; a
//! caller can swap in its own table from a TOML file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::record::DataRecord;

/// Errors that can occur when loading or parsing default tables
#[derive(Error, Debug)]
pub enum DefaultTableError {
    #[error("Failed to read default table file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse default table TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A fallback value: a constant, or a derivation over another record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Literal(String),
    /// Mirrors another record field; `fallback` applies only when the source
    /// key is absent (a present-but-empty source derives from the empty
    /// string), and `pattern` interpolates the result via `{value}`
    Derived {
        from: String,
        fallback: String,
        pattern: Option<String>,
    },
}

/// Fallback table checked for placeholders left unresolved by substitution
#[derive(Debug, Clone)]
pub struct DefaultTable {
    scan: Vec<String>,
    entries: HashMap<String, DefaultValue>,
}

/// TOML structure for deserializing default tables
#[derive(Deserialize)]
struct TomlTable {
    #[serde(default)]
    scan: Vec<String>,
    #[serde(default)]
    literal: HashMap<String, String>,
    #[serde(default)]
    derived: HashMap<String, TomlDerived>,
}

#[derive(Deserialize)]
struct TomlDerived {
    from: String,
    fallback: String,
    pattern: Option<String>,
}

/// Built-in table covering the keys a stock Fanvil template may leave
/// unresolved
const DEFAULT_TABLE: &str = r#"
scan = [
    "account.2.sip_port",
    "account.2.register_expires",
    "account.2.outbound_proxy_primary",
    "account.2.outbound_proxy_secondary",
    "fanvil_time_display",
    "fanvil_date_display",
    "http_auth_username",
    "http_auth_password",
    "domain_name",
    "fanvil_server_name",
    "dns_server_primary",
    "dns_server_secondary",
    "ntp_server_primary",
    "ntp_server_secondary",
    "fanvil_time_zone",
    "fanvil_location",
    "fanvil_time_zone_name",
    "fanvil_enable_dst",
    "fanvil_greeting",
]

[literal]
"account.2.sip_port" = "5060"
"account.2.register_expires" = "3600"
"account.2.outbound_proxy_primary" = ""
"account.2.outbound_proxy_secondary" = ""
"fanvil_time_display" = "0"
"fanvil_date_display" = "0"
"http_auth_username" = ""
"http_auth_password" = ""
"domain_name" = "example.com"
"dns_server_primary" = "8.8.8.8"
"dns_server_secondary" = "8.8.4.4"
"ntp_server_primary" = "pool.ntp.org"
"ntp_server_secondary" = "time.nist.gov"
"fanvil_time_zone" = "GMT+0:00"
"fanvil_location" = "Default"
"fanvil_time_zone_name" = "GMT"
"fanvil_enable_dst" = "0"

[derived."fanvil_server_name"]
from = "account.1.server_address"
fallback = "sip.example.com"

[derived."fanvil_greeting"]
from = "account.1.user_id"
fallback = "Usuario"
pattern = "Bienvenido {value}"
"#;

impl DefaultTable {
    /// Load a default table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DefaultTableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a default table from a TOML string
    pub fn from_str(content: &str) -> Result<Self, DefaultTableError> {
        let parsed: TomlTable = toml::from_str(content)?;

        let mut entries = HashMap::new();
        for (key, value) in parsed.literal {
            entries.insert(key, DefaultValue::Literal(value));
        }
        for (key, d) in parsed.derived {
            entries.insert(
                key,
                DefaultValue::Derived {
                    from: d.from,
                    fallback: d.fallback,
                    pattern: d.pattern,
                },
            );
        }

        Ok(DefaultTable {
            scan: parsed.scan,
            entries,
        })
    }

    /// Keys the default resolution pass checks
    pub fn scan_keys(&self) -> &[String] {
        &self.scan
    }

    /// Whether the key is in the scan list
    pub fn is_scanned(&self, key: &str) -> bool {
        self.scan.iter().any(|k| k == key)
    }

    /// Fallback value for a key
    ///
    /// Returns `None` when the table has no entry for the key.
    pub fn lookup(&self, key: &str, record: &DataRecord) -> Option<String> {
        match self.entries.get(key)? {
            DefaultValue::Literal(value) => Some(value.clone()),
            DefaultValue::Derived {
                from,
                fallback,
                pattern,
            } => {
                let base = record.get(from).unwrap_or(fallback.as_str());
                Some(match pattern {
                    Some(p) => p.replace("{value}", base),
                    None => base.to_string(),
                })
            }
        }
    }
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::from_str(DEFAULT_TABLE).expect("Built-in default table should be valid TOML")
    }
}
