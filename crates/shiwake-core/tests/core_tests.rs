use std::path::Path;

use shiwake_core::{
    CategorySet, CategorySource, MetadataRow, Mode, RowIndex, Slot, alternate_path, next_free_path,
    parse_name, plan_destination, resolve_categories,
};

fn canonical(name: &str) -> String {
    parse_name(name).expect("name should parse").render()
}

#[test]
fn test_canonicalization_idempotent_over_samples() {
    let samples = [
        "20240102_illustA_charX_faceY_poseZ_00017.png",
        "20240102_illustA_charX_faceY_poseZ_00017_00017_.png",
        "20240102 _ illustA_charX _faceY_pose_Z_00017 .JPG",
        "20240102＿a＿b＿c＿d＿00001＿00002＿.webp",
        "20240102_a_b_c_q_11111_22222_33333_44444.bmp",
    ];
    for name in samples {
        let once = canonical(name);
        assert_eq!(canonical(&once), once, "{name}");
    }
}

#[test]
fn test_second_sequence_collapse() {
    assert_eq!(
        canonical("20240102_illustA_charX_faceY_poseZ_00017_00017_.png"),
        "20240102_illustA_charX_faceY_poseZ_00017.png"
    );
    assert_eq!(
        canonical("20240102_illustA_charX_faceY_poseZ_00017_00099.png"),
        "20240102_illustA_charX_faceY_poseZ_00017.png"
    );
}

#[test]
fn test_fallback_example_path() {
    let name = "20240102_illustA_charX_faceY_poseZ_00017.png";
    let record = parse_name(name).unwrap();
    let resolution = resolve_categories(&record, &record.stem(), None);
    assert_eq!(resolution.source, CategorySource::Filename);

    let plan = plan_destination(Mode::Sfw, &resolution.categories, &record.date, None, &record.render());
    assert_eq!(
        plan.relative_dir(),
        "SFW/illustA/charX/faceY/poseZ/20240102"
    );
    assert_eq!(plan.file_name, name);
}

#[test]
fn test_absent_background_and_photo_style() {
    let categories = CategorySet::new()
        .with(Slot::Content, "c")
        .with(Slot::Character, "ch")
        .with(Slot::Face, "f")
        .with(Slot::Body, "b")
        .with(Slot::Background, "")
        .with(Slot::PhotoStyle, "None")
        .with(Slot::Lighting, "warm");
    let plan = plan_destination(Mode::Sfw, &categories, "20240102", None, "x.png");

    let segments: Vec<&str> = plan.segments.iter().map(|s| s.as_str()).collect();
    assert_eq!(segments, ["SFW", "c", "ch", "f", "b", "warm", "20240102"]);
}

#[test]
fn test_pose_never_reaches_path() {
    let record = parse_name("20240102_illustA_charX_faceY_poseZ_00017.png").unwrap();
    let make_row = |pose: &str| {
        MetadataRow::from_columns(|column| match column {
            "filename_prefix" => Some("20240102_illustA"),
            "content" => Some("illust"),
            "factor_ポーズ" => Some(pose),
            _ => None,
        })
    };

    let plans: Vec<_> = ["standing", "sitting", ""]
        .into_iter()
        .map(|pose| {
            let index = RowIndex::new(vec![make_row(pose)]);
            let resolution = resolve_categories(&record, &record.stem(), Some(&index));
            plan_destination(Mode::Sfw, &resolution.categories, &record.date, None, &record.render())
        })
        .collect();

    assert_eq!(plans[0].relative_dir(), "SFW/illust/20240102");
    assert!(plans.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_alternate_path_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.png");
    assert_eq!(alternate_path(&first), first);

    std::fs::write(&first, b"1").unwrap();
    let second = alternate_path(&first);
    assert_eq!(second, dir.path().join("a_2.png"));

    std::fs::write(&second, b"2").unwrap();
    assert_eq!(alternate_path(&first), dir.path().join("a_3.png"));
}

#[test]
fn test_next_free_path_skips_free_original() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    assert_eq!(next_free_path(&path), dir.path().join("sheet_2.csv"));
    assert_eq!(next_free_path(Path::new("noext")), Path::new("noext_2"));
}
