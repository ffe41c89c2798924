// Pattern modifier foundation: the trait every in-place beatmap
// transformation implements, plus shared helpers.

use beat_model::{BeatMap, NoteKind};

/// An in-place transformation of an existing beatmap.
pub trait PatternModifier {
    /// Apply this modification to the map.
    fn modify(&mut self, map: &mut BeatMap);

    /// Short token used in generated file names (e.g. `"spiral"`).
    fn pattern_name(&self) -> &'static str;
}

/// Indices of `Hit` notes in map order.
pub fn hit_note_indices(map: &BeatMap) -> Vec<usize> {
    map.notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.kind == NoteKind::Hit)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beat_model::NoteEvent;

    #[test]
    fn hit_indices_skip_obstacles() {
        let map = BeatMap::new("t", 120.0, 0).with_notes(vec![
            NoteEvent::unassigned(0.0),
            NoteEvent::obstacle(0.5, -1),
            NoteEvent::unassigned(1.0),
        ]);
        assert_eq!(hit_note_indices(&map), vec![0, 2]);
    }
}
