//! Line protocol flows through a `Session`

use serde_json::{json, Value};

use match3::adapter::{Session, SessionConfig};
use match3::core::{Controller, EngineConfig, Grid};
use match3::types::{Color, Pos, Tile};

const DEAD_BOARD: &str = "
    O Y G P O Y G P
    G P O Y G P O Y
    O Y G P O Y G P
    G P O Y G P O Y
    O Y G P O Y G P
    G P O Y G P O Y
    O Y G P O Y G P
    G P O Y G P O Y
";

/// Dead board where swapping (2,4) down into (3,4) makes a red run of four
fn four_run_board() -> Grid {
    let mut grid = Grid::parse(DEAD_BOARD).unwrap();
    let red = Some(Tile::Regular(Color::Red));
    for col in [2, 3, 5] {
        grid.set(Pos::new(3, col), red);
    }
    grid.set(Pos::new(3, 4), Some(Tile::Regular(Color::Blue)));
    grid.set(Pos::new(2, 4), red);
    grid
}

fn session(grid: Grid, auto_ack: bool) -> Session {
    let controller = Controller::from_grid(EngineConfig::default(), grid, 1).unwrap();
    Session::from_controller(controller, auto_ack)
}

fn send(session: &mut Session, line: &str) -> Vec<Value> {
    session
        .handle_line(line)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn swap_and_acks_walk_through_phases() {
    let mut s = session(four_run_board(), false);

    let out = send(&mut s, r#"{"type":"swap","seq":1,"from":[2,4],"to":[3,4]}"#);
    assert_eq!(
        out,
        vec![json!({"type":"event","seq":1,"event":{"kind":"tilesSwapped","a":[2,4],"b":[3,4]}})]
    );

    let out = send(&mut s, r#"{"type":"ack","seq":2}"#);
    assert_eq!(
        out,
        vec![
            json!({"type":"event","seq":2,"event":{"kind":"tilesMatched","positions":[[3,2],[3,3],[3,5]],"scoreDelta":40}}),
            json!({"type":"event","seq":2,"event":{"kind":"bonusSpawned","pos":[3,4],"tile":{"kind":"lineBomb","orientation":"row","color":"red"}}}),
            json!({"type":"event","seq":2,"event":{"kind":"scoreChanged","score":40,"combo":1}}),
        ]
    );

    let out = send(&mut s, r#"{"type":"ack","seq":3}"#);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["event"]["kind"], "tilesFell");
    let moves = out[0]["event"]["moves"].as_array().unwrap();
    assert_eq!(moves.len(), 9);
    assert!(moves.iter().all(|m| m["col"] == m["to"][1]));

    let out = send(&mut s, r#"{"type":"ack","seq":4}"#);
    assert_eq!(out[0]["seq"], 4);
    assert_eq!(out[0]["event"]["kind"], "tilesSpawned");
    let tiles = out[0]["event"]["tiles"].as_array().unwrap();
    assert_eq!(tiles.len(), 3);
    for tile in tiles {
        assert_eq!(tile["pos"][0], 0);
        assert_eq!(tile["fall"], 1);
        assert_eq!(tile["tile"]["kind"], "regular");
    }

    for seq in 5..100 {
        if !s.controller().is_busy() {
            break;
        }
        send(&mut s, &format!(r#"{{"type":"ack","seq":{seq}}}"#));
    }
    assert!(!s.controller().is_busy());
    assert!(send(&mut s, r#"{"type":"ack","seq":100}"#).is_empty());
}

#[test]
fn auto_ack_resolves_in_one_reply() {
    let mut s = session(four_run_board(), true);
    let out = send(&mut s, r#"{"type":"swap","seq":1,"from":[2,4],"to":[3,4]}"#);

    assert!(out.len() >= 5);
    assert!(out.iter().all(|m| m["type"] == "event" && m["seq"] == 1));
    assert_eq!(out[0]["event"]["kind"], "tilesSwapped");
    assert_eq!(out[1]["event"]["kind"], "tilesMatched");
    assert!(!s.controller().is_busy());

    let snap = send(&mut s, r#"{"type":"snapshot","seq":2}"#);
    assert_eq!(snap[0]["phase"], "idle");
    assert!(snap[0]["score"].as_u64().unwrap() >= 40);
}

#[test]
fn no_match_swap_is_reverted_on_ack() {
    let mut s = session(Grid::parse(DEAD_BOARD).unwrap(), false);
    send(&mut s, r#"{"type":"swap","seq":1,"from":[0,0],"to":[0,1]}"#);
    let out = send(&mut s, r#"{"type":"ack","seq":2}"#);
    assert_eq!(
        out,
        vec![json!({"type":"event","seq":2,"event":{"kind":"swapRejected","a":[0,0],"b":[0,1],"reason":"noMatch"}})]
    );
    assert_eq!(s.controller().grid(), &Grid::parse(DEAD_BOARD).unwrap());
}

#[test]
fn invalid_swap_reports_event_and_error() {
    let mut s = session(four_run_board(), false);
    let out = send(&mut s, r#"{"type":"swap","seq":3,"from":[0,0],"to":[2,2]}"#);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["event"]["kind"], "swapRejected");
    assert_eq!(out[0]["event"]["reason"], "invalid");
    assert_eq!(out[1]["type"], "error");
    assert_eq!(out[1]["seq"], 3);
    assert_eq!(out[1]["code"], "invalid_swap");

    let out = send(&mut s, r#"{"type":"swap","seq":4,"from":[7,7],"to":[7,8]}"#);
    assert_eq!(out[1]["code"], "invalid_swap");
}

#[test]
fn swap_while_resolving_is_busy() {
    let mut s = session(four_run_board(), false);
    send(&mut s, r#"{"type":"swap","seq":1,"from":[2,4],"to":[3,4]}"#);
    let out = send(&mut s, r#"{"type":"swap","seq":2,"from":[0,0],"to":[0,1]}"#);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["event"]["reason"], "busy");
    assert_eq!(out[1]["code"], "busy");
}

#[test]
fn malformed_and_unknown_lines_get_errors() {
    let mut s = session(four_run_board(), false);

    let out = send(&mut s, "{not json");
    assert_eq!(out[0]["type"], "error");
    assert_eq!(out[0]["seq"], 0);
    assert_eq!(out[0]["code"], "invalid_command");

    let out = send(&mut s, r#"{"type":"swap","seq":7}"#);
    assert_eq!(out[0]["seq"], 7);
    assert_eq!(out[0]["code"], "invalid_command");

    let out = send(&mut s, r#"{"type":"teleport","seq":8}"#);
    assert_eq!(out[0]["seq"], 8);
    assert_eq!(out[0]["code"], "invalid_command");
    assert!(out[0]["message"].as_str().unwrap().contains("teleport"));
}

#[test]
fn hint_replies_with_best_swap_or_null() {
    let mut s = session(four_run_board(), false);
    let out = send(&mut s, r#"{"type":"hint","seq":5}"#);
    assert_eq!(out, vec![json!({"type":"hint","seq":5,"move":[[2,4],[3,4]]})]);

    let mut dead = session(Grid::parse(DEAD_BOARD).unwrap(), false);
    let out = send(&mut dead, r#"{"type":"hint","seq":6}"#);
    assert_eq!(out, vec![json!({"type":"hint","seq":6,"move":null})]);
}

#[test]
fn snapshot_reports_codes_and_hash() {
    let mut s = session(four_run_board(), false);
    let out = send(&mut s, r#"{"type":"snapshot","seq":9}"#);
    assert_eq!(out.len(), 1);
    let snap = &out[0];
    assert_eq!(snap["type"], "snapshot");
    assert_eq!(snap["seq"], 9);
    assert_eq!(snap["rows"], 8);
    assert_eq!(snap["cols"], 8);
    assert_eq!(snap["board"][3], json!([4, 6, 1, 1, 5, 1, 2, 3]));
    assert_eq!(snap["score"], 0);
    assert_eq!(snap["combo"], 0);
    assert_eq!(snap["phase"], "idle");
    assert_eq!(snap["active_colors"], 5);

    let hash = snap["board_hash"].as_str().unwrap();
    assert_eq!(hash.len(), 16);
    assert_eq!(
        u64::from_str_radix(hash, 16).unwrap(),
        s.controller().snapshot().board_hash
    );
}

#[test]
fn greeting_snapshot_uses_given_seq() {
    let s = Session::new(SessionConfig {
        seed: 99,
        ..SessionConfig::default()
    })
    .unwrap();
    let lines = s.snapshot_line(0);
    assert_eq!(lines.len(), 1);
    let v: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(v["seq"], 0);
    assert_eq!(v["phase"], "idle");
}
