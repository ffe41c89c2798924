// Generated beatmap file naming and writing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use beat_model::{BeatMap, BeatMapCodec};

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// `{song}_{difficulty}_{pattern}.json` with unsafe characters replaced.
pub fn beatmap_file_name(song_name: &str, difficulty: i32, pattern: &str) -> String {
    format!(
        "{}_{}_{}.json",
        sanitize(song_name),
        difficulty,
        sanitize(pattern)
    )
}

/// `dir/file_name`, or `dir/stem_N.ext` with the first free `N` if taken.
pub fn unique_output_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Write `map` into `dir` under its deterministic name, creating `dir` if needed.
pub fn write_beatmap(dir: &Path, map: &BeatMap, pattern: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let name = beatmap_file_name(&map.song_name, map.difficulty, pattern);
    let path = unique_output_path(dir, &name);
    BeatMapCodec::write(map, &path)?;
    log::info!("wrote {} notes to {}", map.notes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beat_model::NoteEvent;

    #[test]
    fn file_name_is_deterministic_and_safe() {
        assert_eq!(
            beatmap_file_name("Night Drive", 3, "spiral"),
            "Night_Drive_3_spiral.json"
        );
        assert_eq!(beatmap_file_name("a/b:c", 0, "mirror"), "a_b_c_0_mirror.json");
        assert_eq!(beatmap_file_name("  ", 1, "x"), "untitled_1_x.json");
    }

    #[test]
    fn second_write_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let map = BeatMap::new("Song", 120.0, 2).with_notes(vec![NoteEvent::hit(1.0, 0)]);

        let first = write_beatmap(dir.path(), &map, "sequential").unwrap();
        let second = write_beatmap(dir.path(), &map, "sequential").unwrap();

        assert_eq!(first.file_name().unwrap(), "Song_2_sequential.json");
        assert_eq!(second.file_name().unwrap(), "Song_2_sequential_1.json");
        assert_eq!(BeatMapCodec::read(&second).unwrap(), map);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("maps");
        let map = BeatMap::new("S", 120.0, 0).with_notes(vec![NoteEvent::hit(0.0, 1)]);
        let path = write_beatmap(&nested, &map, "random").unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
