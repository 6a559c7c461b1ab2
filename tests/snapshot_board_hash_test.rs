use match3::core::{BoardSnapshot, Controller, EngineConfig};

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

fn fnv1a64_board(snap: &BoardSnapshot) -> u64 {
    fnv1a64_bytes([snap.rows, snap.cols].into_iter().chain(snap.cells.iter().copied()))
}

#[test]
fn snapshot_sets_board_hash() {
    let mut game = Controller::new(EngineConfig::default(), 1).unwrap();
    let snap = game.snapshot();
    assert_eq!(snap.board_hash, fnv1a64_board(&snap));

    let (a, b) = game.hint().unwrap();
    game.submit_swap(a, b).unwrap();
    let swapped = game.snapshot();
    assert_eq!(swapped.board_hash, fnv1a64_board(&swapped));
    assert_ne!(swapped.board_hash, snap.board_hash);

    game.resolve();
    let settled = game.snapshot();
    assert_eq!(settled.board_hash, fnv1a64_board(&settled));
}

#[test]
fn score_and_phase_do_not_change_board_hash() {
    let mut game = Controller::new(EngineConfig::default(), 3).unwrap();
    let (a, b) = game.hint().unwrap();
    game.submit_swap(a, b).unwrap();
    game.resolve();

    let snap = game.snapshot();
    let same_board = BoardSnapshot::capture(game.grid(), 0, 0, snap.phase, 3);
    assert_eq!(same_board.board_hash, snap.board_hash);
    assert_ne!(same_board.score, snap.score);
}

#[test]
fn snapshot_round_trips_to_grid() {
    let game = Controller::new(EngineConfig::default(), 17).unwrap();
    let snap = game.snapshot();
    assert_eq!(snap.to_grid().as_ref(), Some(game.grid()));
    assert_eq!(snap.rows_iter().count(), 8);
}
