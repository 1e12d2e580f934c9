use std::fs;
use std::path::{Path, PathBuf};

use shiwake_core::{ConflictPolicy, RecordingReporter, SkipReason, Transfer};
use shiwake_ops::{Blake3Hasher, ConflictDecision, apply, resolve_conflict};
use tempfile::TempDir;

fn place(planned: &Path, source: &Path, policy: ConflictPolicy) -> (ConflictDecision, Option<PathBuf>) {
    let reporter = RecordingReporter::new();
    let decision = resolve_conflict(planned, source, policy, &Blake3Hasher, &reporter).unwrap();
    let placed = apply(&decision, source, Transfer::Move, &reporter).unwrap();
    (decision, placed.map(|p| p.path))
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_dup_policy_suffixes_in_order() {
    let inbox = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let planned = out.path().join("SFW").join("x").join("20240102_a_b_c_d_00001.png");

    let mut placed = Vec::new();
    for (i, content) in [b"one".as_slice(), b"two".as_slice(), b"three".as_slice()].into_iter().enumerate() {
        let source = inbox.path().join(format!("{i}.png"));
        fs::write(&source, content).unwrap();
        placed.push(place(&planned, &source, ConflictPolicy::Dup).1.unwrap());
    }

    let dir = planned.parent().unwrap();
    assert_eq!(
        placed,
        [
            dir.join("20240102_a_b_c_d_00001.png"),
            dir.join("20240102_a_b_c_d_00001_2.png"),
            dir.join("20240102_a_b_c_d_00001_3.png"),
        ]
    );
    assert_eq!(fs::read(&placed[2]).unwrap(), b"three");
}

#[test]
fn test_hash_policy_keeps_single_copy() {
    let inbox = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let dir = out.path().join("SFW").join("20240102");

    let first = inbox.path().join("first.png");
    let second = inbox.path().join("second.png");
    fs::write(&first, b"identical").unwrap();
    fs::write(&second, b"identical").unwrap();

    let (decision, placed) = place(&dir.join("first.png"), &first, ConflictPolicy::Hash);
    assert!(matches!(decision, ConflictDecision::Place(_)));
    assert!(placed.is_some());

    let (decision, placed) = place(&dir.join("second.png"), &second, ConflictPolicy::Hash);
    assert_eq!(
        decision,
        ConflictDecision::Skip(SkipReason::DuplicateContent {
            existing: dir.join("first.png")
        })
    );
    assert!(placed.is_none());
    assert!(second.exists());
    assert_eq!(files_in(&dir), ["first.png"]);
}

#[test]
fn test_hash_policy_distinct_content_falls_back_to_dup() {
    let inbox = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let planned = out.path().join("a.png");
    fs::write(&planned, b"existing").unwrap();

    let source = inbox.path().join("a.png");
    fs::write(&source, b"different").unwrap();
    let (decision, _) = place(&planned, &source, ConflictPolicy::Hash);
    assert_eq!(decision, ConflictDecision::PlaceAlternate(out.path().join("a_2.png")));
    assert_eq!(files_in(out.path()), ["a.png", "a_2.png"]);
}

#[test]
fn test_skip_policy_leaves_both() {
    let inbox = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let planned = out.path().join("a.png");
    fs::write(&planned, b"existing").unwrap();
    let source = inbox.path().join("a.png");
    fs::write(&source, b"incoming").unwrap();

    let (decision, placed) = place(&planned, &source, ConflictPolicy::Skip);
    assert_eq!(decision, ConflictDecision::Skip(SkipReason::ExistingFile));
    assert!(placed.is_none());
    assert_eq!(fs::read(&planned).unwrap(), b"existing");
    assert!(source.exists());
}

#[test]
fn test_overwrite_policy_replaces() {
    let inbox = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let planned = out.path().join("a.png");
    fs::write(&planned, b"existing").unwrap();
    let source = inbox.path().join("a.png");
    fs::write(&source, b"incoming").unwrap();

    let (_, placed) = place(&planned, &source, ConflictPolicy::Overwrite);
    assert_eq!(placed, Some(planned.clone()));
    assert_eq!(fs::read(&planned).unwrap(), b"incoming");
    assert!(!source.exists());
    assert_eq!(files_in(out.path()), ["a.png"]);
}
