use std::path::Path;

use anyhow::{Context, Result};

use crate::beatmap::BeatMap;

/// Reads and writes beatmaps in their JSON form.
pub struct BeatMapCodec;

impl BeatMapCodec {
    pub fn decode_str(data: &str) -> Result<BeatMap> {
        let map: BeatMap = serde_json::from_str(data).context("Malformed beatmap JSON")?;
        Ok(map)
    }

    pub fn encode_string(map: &BeatMap) -> Result<String> {
        Ok(serde_json::to_string_pretty(map)?)
    }

    /// Load a beatmap from disk. Structural invariants are not checked here;
    /// callers that need a playable map run `BeatMap::validate`.
    pub fn read(path: &Path) -> Result<BeatMap> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read beatmap: {}", path.display()))?;
        let map = Self::decode_str(&data)
            .with_context(|| format!("Failed to parse beatmap: {}", path.display()))?;
        log::debug!(
            "loaded beatmap '{}' ({} notes) from {}",
            map.song_name,
            map.notes.len(),
            path.display()
        );
        Ok(map)
    }

    pub fn write(map: &BeatMap, path: &Path) -> Result<()> {
        let json = Self::encode_string(map)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write beatmap: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteEvent;

    #[test]
    fn decode_documented_layout() {
        let json = r#"{
            "bpm": 128.0,
            "songName": "Opening",
            "difficulty": 2,
            "notes": [
                { "time": 1.25, "drum": 0, "type": "hit" },
                { "time": 1.75, "drum": 3, "type": "obstacle" }
            ]
        }"#;
        let map = BeatMapCodec::decode_str(json).unwrap();
        assert_eq!(map.song_name, "Opening");
        assert_eq!(map.difficulty, 2);
        assert_eq!(
            map.notes,
            vec![NoteEvent::hit(1.25, 0), NoteEvent::obstacle(1.75, 3)]
        );
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let json = r#"{"bpm":120,"songName":"x","difficulty":0,
            "notes":[{"time":1.0,"drum":0,"type":"slide"}]}"#;
        assert!(BeatMapCodec::decode_str(json).is_err());
    }

    #[test]
    fn write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        let map = BeatMap::new("File Song", 97.5, 3).with_notes(vec![
            NoteEvent::hit(0.1, 1),
            NoteEvent::hit(0.1 + 60.0 / 97.5, 2),
        ]);

        BeatMapCodec::write(&map, &path).unwrap();
        let loaded = BeatMapCodec::read(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BeatMapCodec::read(&dir.path().join("missing.json")).is_err());
    }
}
