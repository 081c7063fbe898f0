//! Export and import of the `{ leaders, stats, episodes }` document.

use std::io;
use std::path::{Path, PathBuf};

use podwave_proto::client::ApiClient;
use podwave_proto::protocol::{Leader, Snapshot};
use serde_json::Value;
use tracing::info;

use crate::error::PodwaveError;
use crate::render::{self, StatTile};

pub const EXPORT_FILE_NAME: &str = "podwave_export.json";

/// Fetch the three lists concurrently and write them as pretty JSON.
pub async fn export(client: &ApiClient, dir: &Path) -> Result<PathBuf, PodwaveError> {
    let (leaders, stats, episodes) =
        tokio::try_join!(client.leaderboard(), client.stats(), client.episodes(None))?;
    let snapshot = Snapshot {
        leaders,
        stats,
        episodes,
    };
    let body = serde_json::to_vec_pretty(&snapshot).map_err(io::Error::from)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(EXPORT_FILE_NAME);
    tokio::fs::write(&path, body).await?;
    info!("exported {} episodes to {}", snapshot.episodes.len(), path.display());
    Ok(path)
}

/// Panels an imported document replaces. `None` leaves a panel as it is.
#[derive(Debug, Default, PartialEq)]
pub struct ImportedSnapshot {
    pub leaders: Option<Vec<Leader>>,
    pub stat_tiles: Option<Vec<StatTile>>,
}

pub async fn import(path: &Path) -> Result<ImportedSnapshot, PodwaveError> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_import(&text)
}

/// Parse an import document. `leaders` replaces the leaderboard when it is an
/// array of leader rows; `stats` replaces the tiles when it is an object,
/// whatever its keys. Nothing is checked against the server.
pub fn parse_import(text: &str) -> Result<ImportedSnapshot, PodwaveError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| PodwaveError::ImportParse(e.to_string()))?;
    let mut imported = ImportedSnapshot::default();

    if let Some(leaders) = doc.get("leaders").filter(|v| !v.is_null()) {
        let rows: Vec<Leader> = serde_json::from_value(leaders.clone())
            .map_err(|e| PodwaveError::ImportParse(format!("leaders: {}", e)))?;
        imported.leaders = Some(rows);
    }
    if let Some(Value::Object(stats)) = doc.get("stats") {
        imported.stat_tiles = Some(render::stat_tiles_from_map(stats));
    }
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_import("{ not json").unwrap_err();
        assert!(matches!(err, PodwaveError::ImportParse(_)));
        assert_eq!(err.user_message(), "Invalid JSON file");
    }

    #[test]
    fn test_import_replaces_only_present_panels() {
        let only_stats = parse_import(r#"{"stats": {"users": 3, "custom": "x"}}"#).unwrap();
        assert!(only_stats.leaders.is_none());
        let tiles = only_stats.stat_tiles.unwrap();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().any(|t| t.label == "custom" && t.value == "x"));

        let only_leaders =
            parse_import(r#"{"leaders": [{"name": "Ana", "sessions": 2, "plays": 5, "favorites": 1}]}"#)
                .unwrap();
        assert_eq!(only_leaders.leaders.unwrap()[0].name, "Ana");
        assert!(only_leaders.stat_tiles.is_none());
    }

    #[test]
    fn test_valid_json_without_panels_changes_nothing() {
        assert_eq!(parse_import("[1, 2]").unwrap(), ImportedSnapshot::default());
        assert_eq!(parse_import(r#"{"leaders": null}"#).unwrap(), ImportedSnapshot::default());
    }

    #[test]
    fn test_bad_leader_rows_are_rejected() {
        assert!(matches!(
            parse_import(r#"{"leaders": [{"sessions": 1}]}"#),
            Err(PodwaveError::ImportParse(_))
        ));
    }

    #[tokio::test]
    async fn test_import_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, r#"{"leaders": []}"#).unwrap();
        let imported = import(&path).await.unwrap();
        assert_eq!(imported.leaders, Some(Vec::new()));

        let missing = import(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(PodwaveError::Io(_))));
    }
}
