//! Persistent key-value settings addressed by dotted key paths

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::debug;

use super::models::ProviderKind;
use crate::error::{Result, SirError};

/// JSON-backed configuration store (stored in `<config_dir>/sircli/config.json`)
///
/// Keys are dotted paths into nested objects, so `apiKeys.openai` addresses
/// `{"apiKeys": {"openai": ...}}`. The handle is opened once per process,
/// mutated in memory and written back with [`ConfigStore::save`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl ConfigStore {
    /// Open the store at its default location
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open() -> Result<Self> {
        Self::open_at(&super::Config::config_path())
    }

    /// Open the store backed by a specific file
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file absent, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                data: Map::new(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| SirError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let data = if contents.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(SirError::ConfigParse {
                        path: path.to_path_buf(),
                        message: "top-level value is not an object".to_string(),
                    })
                }
                Err(e) => {
                    return Err(SirError::ConfigParse {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })
                }
            }
        };

        debug!(path = %path.display(), keys = data.len(), "loaded config");
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// File backing this store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save configuration to disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }

    /// Look up the value at a dotted key path
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a string value at a dotted key path
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Store a value at a dotted key path, creating intermediate objects
    ///
    /// An intermediate that holds a non-object value is replaced by an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is empty or has empty segments
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let segments = parse_key(key)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| SirError::InvalidInput("empty config key".to_string()))?;

        let mut current = &mut self.data;
        for segment in parents {
            let slot = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot
                .as_object_mut()
                .ok_or_else(|| SirError::Config(format!("cannot descend into '{segment}'")))?;
        }

        current.insert((*last).to_string(), value.into());
        Ok(())
    }

    /// Remove the value at a dotted key path, returning it if it existed
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let segments = parse_key(key).ok()?;
        let (last, parents) = segments.split_last()?;

        let mut current = &mut self.data;
        for segment in parents {
            current = current.get_mut(*segment)?.as_object_mut()?;
        }
        current.remove(*last)
    }

    /// Every leaf value with its full dotted key path, in insertion order
    #[must_use]
    pub fn entries(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        flatten_into(&self.data, "", &mut out);
        out
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// API key stored for a provider under `apiKeys.<provider>`
    #[must_use]
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.get_str(&format!("apiKeys.{provider}"))
            .filter(|key| !key.is_empty())
    }

    /// Store an API key for a provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider name makes an invalid key path
    pub fn set_api_key(&mut self, provider: &str, api_key: &str) -> Result<()> {
        self.set(&format!("apiKeys.{provider}"), api_key)
    }

    /// Provider used when the command line does not name one
    #[must_use]
    pub fn default_provider(&self) -> String {
        self.get_str("defaultProvider")
            .filter(|p| !p.is_empty())
            .map_or_else(|| ProviderKind::OpenAI.id().to_string(), str::to_string)
    }

    /// Model configured for a provider under `defaultModels.<provider>`
    #[must_use]
    pub fn default_model(&self, provider: &str) -> Option<&str> {
        self.get_str(&format!("defaultModels.{provider}"))
            .filter(|m| !m.is_empty())
    }
}

fn parse_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(SirError::InvalidInput(format!("invalid config key: '{key}'")));
    }
    Ok(segments)
}

fn flatten_into<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &full_key, out),
            _ => out.push((full_key, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn empty_store() -> (TempDir, ConfigStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::open_at(&temp_dir.path().join("config.json")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_set_get_delete_nested_key() {
        let (_dir, mut store) = empty_store();

        store.set("a.b.c", "v").unwrap();
        assert_eq!(store.get_str("a.b.c"), Some("v"));
        assert_eq!(store.get("a.b"), Some(&json!({"c": "v"})));

        assert_eq!(store.delete("a.b.c"), Some(json!("v")));
        assert!(store.get("a.b.c").is_none());
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let (_dir, mut store) = empty_store();
        store.set("x", "1").unwrap();

        assert!(store.delete("nope.deeper").is_none());
        assert!(store.delete("x.y").is_none());
        assert_eq!(store.get_str("x"), Some("1"));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let (_dir, mut store) = empty_store();
        store.set("a", "scalar").unwrap();
        store.set("a.b", "nested").unwrap();
        assert_eq!(store.get_str("a.b"), Some("nested"));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let (_dir, mut store) = empty_store();
        assert!(store.set("", "v").is_err());
        assert!(store.set("a..b", "v").is_err());
        assert!(store.set(".a", "v").is_err());
    }

    #[test]
    fn test_entries_are_dotted_leaves_in_order() {
        let (_dir, mut store) = empty_store();
        store.set("defaultProvider", "anthropic").unwrap();
        store.set("apiKeys.openai", "sk-1").unwrap();
        store.set("apiKeys.anthropic", "sk-2").unwrap();

        let keys: Vec<String> = store.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["defaultProvider", "apiKeys.openai", "apiKeys.anthropic"]
        );
    }

    #[test]
    fn test_save_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut store = ConfigStore::open_at(&path).unwrap();
        store.set_api_key("groq", "gsk-abc").unwrap();
        store.set("defaultModels.groq", "llama3-8b").unwrap();
        store.save().unwrap();

        let reopened = ConfigStore::open_at(&path).unwrap();
        assert_eq!(reopened.api_key("groq"), Some("gsk-abc"));
        assert_eq!(reopened.default_model("groq"), Some("llama3-8b"));
    }

    #[test]
    fn test_defaults() {
        let (_dir, mut store) = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.default_provider(), "openai");
        assert!(store.api_key("openai").is_none());
        assert!(store.default_model("openai").is_none());

        store.set("defaultProvider", "google").unwrap();
        assert_eq!(store.default_provider(), "google");
    }

    #[test]
    fn test_non_object_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = ConfigStore::open_at(&path).unwrap_err();
        assert!(matches!(err, SirError::ConfigParse { .. }));
    }
}
