//! `config` - inspect and edit the persisted settings

use serde_json::Value;

use super::{ui, ExitCode};
use crate::{
    config::{display_value, ConfigStore},
    error::Result,
};

const ACTIONS: &str = "set, get, delete, list";

/// Run the config command
///
/// # Errors
///
/// Returns an error if a mutation cannot be persisted
pub fn run(
    store: &mut ConfigStore,
    action: &str,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<ExitCode> {
    match action.to_lowercase().as_str() {
        "set" => {
            let (Some(key), Some(value)) = (key, value) else {
                return Ok(usage("sircli config set <key> <value>"));
            };
            store.set(key, value)?;
            store.save()?;
            ui::success(format!("Set {key} = {}", display_value(key, &Value::from(value))));
        }
        "get" => {
            let Some(key) = key else {
                return Ok(usage("sircli config get <key>"));
            };
            match store.get(key) {
                Some(value) => println!("{key} = {}", display_value(key, value)),
                None => ui::warn(format!("Key not found: {key}")),
            }
        }
        "delete" | "remove" => {
            let Some(key) = key else {
                return Ok(usage("sircli config delete <key>"));
            };
            store.delete(key);
            store.save()?;
            ui::success(format!("Deleted: {key}"));
        }
        "list" | "show" => list(store),
        _ => {
            ui::error(format!("Unknown action: {action}"));
            ui::hint(format!("Available actions: {ACTIONS}"));
            return Ok(1);
        }
    }
    Ok(0)
}

fn usage(text: &str) -> ExitCode {
    ui::error(format!("Usage: {text}"));
    1
}

fn list(store: &ConfigStore) {
    if store.is_empty() {
        ui::warn("No configuration set");
        ui::hint("Example: sircli config set apiKeys.openai YOUR_API_KEY");
        return;
    }

    ui::heading("\n⚙️  Configuration:\n");
    for (key, value) in store.entries() {
        println!("  {key} = {}", display_value(&key, value));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::open_at(&dir.path().join("config.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_persists() {
        let (dir, mut store) = store();
        assert_eq!(run(&mut store, "set", Some("apiKeys.openai"), Some("sk-1")).unwrap(), 0);

        let reopened = ConfigStore::open_at(&dir.path().join("config.json")).unwrap();
        assert_eq!(reopened.api_key("openai"), Some("sk-1"));
    }

    #[test]
    fn test_remove_alias() {
        let (_dir, mut store) = store();
        store.set("defaultProvider", "groq").unwrap();
        assert_eq!(run(&mut store, "REMOVE", Some("defaultProvider"), None).unwrap(), 0);
        assert!(store.get("defaultProvider").is_none());
    }

    #[test]
    fn test_usage_errors() {
        let (_dir, mut store) = store();
        assert_eq!(run(&mut store, "set", Some("only.key"), None).unwrap(), 1);
        assert_eq!(run(&mut store, "get", None, None).unwrap(), 1);
        assert_eq!(run(&mut store, "delete", None, None).unwrap(), 1);
        assert_eq!(run(&mut store, "frobnicate", None, None).unwrap(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let (_dir, mut store) = store();
        assert_eq!(run(&mut store, "get", Some("nope"), None).unwrap(), 0);
        assert_eq!(run(&mut store, "show", None, None).unwrap(), 0);
    }
}
