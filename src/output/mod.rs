//! Output module for persisting the aggregated collection
//!
//! The final collection serializes to a single JSON document. Property
//! scores serialize as their integer value, including the `-1` sentinel
//! for unrated attributes.

use crate::model::Player;
use crate::Result;
use std::fs;
use std::path::Path;

/// Serializes the complete player collection to `path`.
pub fn write_players(path: &Path, players: &[Player]) -> Result<()> {
    let json = serde_json::to_vec_pretty(players)?;
    fs::write(path, json)?;
    tracing::info!("Wrote {} records to {}", players.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Property, PropertyGroup};

    #[test]
    fn test_write_players_round_trips_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let players = vec![Player {
            url: "https://h/player/1".to_string(),
            name: "Player One".to_string(),
            overall: Some(80),
            properties: vec![PropertyGroup {
                name: "Traits".to_string(),
                properties: vec![Property {
                    name: "Flair".to_string(),
                    score: -1,
                }],
            }],
            ..Player::default()
        }];

        write_players(&path, &players).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["name"], "Player One");
        assert_eq!(parsed[0]["overall"], 80);
        assert_eq!(parsed[0]["properties"][0]["properties"][0]["score"], -1);
    }
}
