//! Local UI preferences, kept in `<data_dir>/prefs.json`.

use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::debug;

use crate::theme::Theme;

pub const PREFS_FILE: &str = "prefs.json";
pub const THEME_KEY: &str = "podwave-theme";

/// Stored theme, or the default when the file or key is missing or unreadable.
pub fn load_theme(path: &Path) -> Theme {
    let stored = read_prefs(path)
        .get(THEME_KEY)
        .cloned()
        .map(serde_json::from_value::<Theme>);
    match stored {
        Some(Ok(theme)) => theme,
        Some(Err(e)) => {
            debug!("ignoring stored theme: {}", e);
            Theme::default()
        }
        None => Theme::default(),
    }
}

/// Store `theme` under its key, keeping any other keys in the file.
pub fn save_theme(path: &Path, theme: Theme) -> anyhow::Result<()> {
    let mut prefs = read_prefs(path);
    prefs.insert(THEME_KEY.to_string(), serde_json::to_value(theme)?);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&Value::Object(prefs))?;
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn read_prefs(path: &Path) -> Map<String, Value> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<Value>(&s).ok())
        .and_then(|v| match v {
            Value::Object(m) => Some(m),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE);
        assert_eq!(load_theme(&path), Theme::Dark);

        save_theme(&path, Theme::Light).unwrap();
        assert_eq!(load_theme(&path), Theme::Light);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"podwave-theme\": \"light\""));
    }

    #[test]
    fn test_other_keys_survive_and_garbage_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE);
        std::fs::write(&path, r#"{"other": 1, "podwave-theme": "sepia"}"#).unwrap();
        assert_eq!(load_theme(&path), Theme::Dark);

        save_theme(&path, Theme::Light).unwrap();
        let v: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["other"], 1);
        assert_eq!(v[THEME_KEY], "light");
    }
}
