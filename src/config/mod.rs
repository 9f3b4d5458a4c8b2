use crate::error::Result;
use dashmap::DashMap;
use std::env;
use std::path::Path;
use std::sync::Arc;

/// Property key naming the namespace the scanner walks at startup.
pub const SCAN_PACKAGE: &str = "scanPackage";
/// Property key for the filesystem root dotted namespaces resolve under.
pub const SCAN_ROOT: &str = "scanRoot";
/// Property key for the deployment context prefix stripped during dispatch.
pub const CONTEXT_PATH: &str = "contextPath";

/// Configuration service
///
/// A flat key-value property source, loaded once before the startup pipeline
/// runs. Sources can be merged in any order; later values win.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source seeded from the process environment.
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    /// Merge a `key=value` properties file. Lines starting with `#` or `!`
    /// and blank lines are ignored; the first `=` splits key from value.
    pub fn load_properties(&self, path: impl AsRef<Path>) -> Result<&Self> {
        let raw = std::fs::read_to_string(path)?;
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                self.set(key.trim(), value.trim());
            }
        }
        Ok(self)
    }

    /// Merge a flat JSON object file. Non-object documents are rejected;
    /// string, number and boolean values are stringified, the rest skipped.
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<&Self> {
        let raw = std::fs::read_to_string(path)?;
        let doc: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| crate::error::WirefrontError::Internal(format!("bad config JSON: {e}")))?;
        let Some(object) = doc.as_object() else {
            return Err(crate::error::WirefrontError::Internal(
                "config JSON root must be an object".into(),
            ));
        };
        for (key, value) in object {
            match value {
                serde_json::Value::String(s) => self.set(key, s),
                serde_json::Value::Number(n) => self.set(key, &n.to_string()),
                serde_json::Value::Bool(b) => self.set(key, &b.to_string()),
                _ => {}
            }
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn set_and_get() {
        let config = ConfigService::new();
        config.set(SCAN_PACKAGE, "demo.action");
        assert_eq!(config.get(SCAN_PACKAGE).as_deref(), Some("demo.action"));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn properties_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "scanPackage=demo.action").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "contextPath = /app").unwrap();

        let config = ConfigService::new();
        config.load_properties(file.path()).unwrap();
        assert_eq!(config.get(SCAN_PACKAGE).as_deref(), Some("demo.action"));
        assert_eq!(config.get(CONTEXT_PATH).as_deref(), Some("/app"));
    }

    #[test]
    fn json_file_stringifies_scalars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scanPackage": "demo", "port": 3000, "debug": true}}"#).unwrap();

        let config = ConfigService::new();
        config.load_json(file.path()).unwrap();
        assert_eq!(config.get(SCAN_PACKAGE).as_deref(), Some("demo"));
        assert_eq!(config.get("port").as_deref(), Some("3000"));
        assert_eq!(config.get("debug").as_deref(), Some("true"));
    }

    #[test]
    fn json_root_must_be_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(ConfigService::new().load_json(file.path()).is_err());
    }
}
