use beat_model::{BeatMap, BeatMapCodec, NoteEvent, NoteKind};
use proptest::prelude::*;

fn note_strategy() -> impl Strategy<Value = NoteEvent> {
    (0.0f64..600.0, -1i32..4, prop::bool::ANY).prop_map(|(time, lane, obstacle)| NoteEvent {
        time,
        lane,
        kind: if obstacle {
            NoteKind::Obstacle
        } else {
            NoteKind::Hit
        },
    })
}

proptest! {
    #[test]
    fn json_round_trip_preserves_every_field(
        bpm in 40.0f64..300.0,
        difficulty in 0i32..10,
        name in "[a-zA-Z0-9 _-]{0,24}",
        notes in prop::collection::vec(note_strategy(), 0..64),
    ) {
        let mut map = BeatMap::new(name, bpm, difficulty).with_notes(notes);
        map.sort_notes();

        let json = BeatMapCodec::encode_string(&map).unwrap();
        let decoded = BeatMapCodec::decode_str(&json).unwrap();
        prop_assert_eq!(decoded, map);
    }
}

#[test]
fn round_trip_keeps_order_of_simultaneous_notes() {
    let map = BeatMap::new("chord", 150.0, 4).with_notes(vec![
        NoteEvent::hit(2.0, 3),
        NoteEvent::hit(2.0, 0),
        NoteEvent::obstacle(2.0, 1),
    ]);
    let decoded = BeatMapCodec::decode_str(&BeatMapCodec::encode_string(&map).unwrap()).unwrap();
    let lanes: Vec<i32> = decoded.notes.iter().map(|n| n.lane).collect();
    assert_eq!(lanes, vec![3, 0, 1]);
}
