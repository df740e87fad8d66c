//! End-to-end command sessions

use schillinger::config::EngineConfig;
use schillinger::session::{Reply, Session};
use schillinger::PatternError;
use std::io::Write;

fn rotated(reply: Reply) -> Vec<i64> {
    match reply {
        Reply::Rotated { pattern, .. } => pattern,
        other => panic!("expected a rotation, got {:?}", other),
    }
}

#[test]
fn test_rotation_follows_mode() {
    let mut session = Session::default();
    session.run_line("permute pat 1 2 3 4").unwrap();
    assert_eq!(rotated(session.run_line("permute circular 1").unwrap()), vec![2, 3, 4, 1]);

    session.run_line("permute mode acw").unwrap();
    assert_eq!(rotated(session.run_line("permute circular 1").unwrap()), vec![4, 1, 2, 3]);
    assert_eq!(
        rotated(session.run_line("permute anticircular 1").unwrap()),
        vec![2, 1, 4, 3]
    );
}

#[test]
fn test_rejected_submission_keeps_table() {
    let mut session = Session::default();
    session.run_line("permute pat 1 2 3").unwrap();

    let err = session
        .run_line("permute pat 1 2 3 4 5 6 7 8 9 10 11 12 13")
        .unwrap_err();
    assert!(matches!(err, PatternError::InvalidInput(_)));
    assert!(session.run_line("permute patbin 0 1 1").is_err());
    assert_eq!(session.permuter().count().unwrap(), 6);
}

#[test]
fn test_slots_are_independent() {
    let mut session = Session::default();
    session.run_line("permute pat 1 2").unwrap();
    assert!(session.run_line("group recall 1").unwrap_err().is_unbuilt());
    assert!(session.run_line("autogroup groupby 2").unwrap_err().is_unbuilt());
    assert!(session.run_line("synth bang").unwrap_err().is_unbuilt());
}

#[test]
fn test_text_replies() {
    let mut session = Session::default();

    let reply = session.run_line("permute pat 2 1").unwrap();
    assert_eq!(
        reply.to_string(),
        "count: 2\npermutation 1 of 2: 2 1\npatbin: 1 0 1\n"
    );

    let reply = session.run_line("permute recall 2").unwrap();
    assert_eq!(reply.to_string(), "permutation 2 of 2: 1 2 (last)\npatbin: 1 1 0\n");

    let reply = session.run_line("autogroup pat 3 4").unwrap();
    assert_eq!(reply.to_string(), "groupings: none\n");

    let reply = session.run_line("square pat 1 2").unwrap();
    assert_eq!(reply.to_string(), "square: 1 2 2 4\nsync: 3 6 6 12\nsync_linear: 3 6\n");
}

#[test]
fn test_json_replies() {
    let mut session = Session::default();

    let reply = session.run_line("synth grouped 3 2").unwrap();
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["reply"], "resultants");
    assert_eq!(json["generators"]["family"], "grouped");
    assert_eq!(json["vectors"]["b"].as_array().map(|b| b.len()), Some(2));

    let reply = session.run_line("group g 1 2 g 3").unwrap();
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["selected"]["groups"], serde_json::json!([[1, 2], [3]]));
    assert_eq!(json["selected"]["pattern"], serde_json::json!([1, 2, 3]));
}

#[test]
fn test_session_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[permutation]\nmax_symbols = 3\ndirection = \"anticlockwise\"\n\n[synth]\nmax_generator = 4"
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let mut session = Session::new(config);

    assert!(session.run_line("permute pat 1 2 3 4").is_err());
    session.run_line("permute pat 1 2 3").unwrap();
    assert_eq!(rotated(session.run_line("permute circular 1").unwrap()), vec![3, 1, 2]);

    match session.run_line("synth compound 7 2").unwrap() {
        Reply::Resultants { vectors, .. } => assert_eq!(vectors.steps(), 24),
        other => panic!("expected resultants, got {:?}", other),
    }
}

#[test]
fn test_oversized_patterns_are_rejected() {
    let mut session = Session::default();
    session.run_line("conv pat 2 1").unwrap();

    let err = session.run_line("conv pat 4611686018427387903").unwrap_err();
    assert!(matches!(err, PatternError::InvalidInput(_)));
    assert_eq!(
        session.run_line("conv bang").unwrap().to_string(),
        "patbin: 1 0 1\n"
    );

    // the table builds, but the selection is too long for an onset vector
    match session.run_line("permute pat 4611686018427387903").unwrap() {
        Reply::Permutations { count, selected } => {
            assert_eq!(count, 1);
            assert_eq!(selected.onsets, None);
        }
        other => panic!("unexpected reply {:?}", other),
    }

    let start = std::time::Instant::now();
    assert!(session.run_line("autogroup pat 3000000000").is_err());
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}
