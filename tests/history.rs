use sketchpad::draw::{Color, HistoryConfig, HistoryManager, PixelBuffer};

fn frame(tag: u8) -> PixelBuffer {
    PixelBuffer::new(4, 4, Color::rgb(tag, 0, 0))
}

fn tag(buffer: &PixelBuffer) -> u8 {
    buffer.as_bytes()[0]
}

fn history() -> HistoryManager {
    HistoryManager::new(HistoryConfig {
        max_states: 20,
        min_states: 5,
        max_memory_bytes: 64 * 20,
    })
}

#[test]
fn blank_stroke_undo_new_stroke_prunes_branch() {
    let mut history = history();
    assert!(history.is_empty());

    history.save_state(frame(0));
    assert!(!history.is_empty());
    assert_eq!(history.current_index(), Some(0));
    assert!(!history.can_undo());

    history.save_state(frame(1));
    assert_eq!(history.current_index(), Some(1));
    assert!(history.can_undo());

    assert_eq!(history.undo().map(tag), Some(0));
    assert_eq!(history.current_index(), Some(0));

    history.save_state(frame(2));
    let tags: Vec<u8> = history.states().iter().map(|s| tag(s.buffer())).collect();
    assert_eq!(tags, vec![0, 2]);
    assert_eq!(history.current_index(), Some(1));
    assert!(!history.can_redo());
}

#[test]
fn eviction_keeps_current_snapshot_in_place() {
    let mut history = HistoryManager::new(HistoryConfig {
        max_states: 4,
        min_states: 2,
        max_memory_bytes: 64 * 3,
    });

    for t in 0..10 {
        history.save_state(frame(t));
        let index = history.current_index().expect("non-empty history");
        assert_eq!(tag(history.states()[index].buffer()), t);
        assert!(history.memory_usage() <= 64 * 3);
        let total: usize = history.states().iter().map(|s| s.byte_size()).sum();
        assert_eq!(total, history.memory_usage());
    }
    assert_eq!(history.len(), 3);
}

#[test]
fn snapshots_are_independent_of_the_live_buffer() {
    let mut history = history();
    let mut live = frame(7);
    history.save_state(live.clone());

    live.fill(Color::WHITE);

    assert_eq!(history.current().map(tag), Some(7));
}

#[test]
fn forced_cleanup_then_undo_still_walks_remaining_states() {
    let mut history = history();
    for t in 0..8 {
        history.save_state(frame(t));
    }
    assert_eq!(history.force_cleanup(3), 5);
    assert_eq!(history.current_index(), Some(2));
    assert_eq!(history.undo().map(tag), Some(6));
    assert_eq!(history.undo().map(tag), Some(5));
    assert!(history.undo().is_none());
}
