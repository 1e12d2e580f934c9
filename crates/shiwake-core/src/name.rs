//! Image filename parsing and canonical rendering.
//!
//! Names follow the positional grammar
//! `date_content_character_face_middle_sequence.ext`. Sloppy variants
//! (full-width underscores, stray spaces, a repeated trailing sequence or a
//! trailing underscore) are accepted and collapse to one canonical form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Extensions accepted as images, lowercase and without the dot.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^
        (?P<date>[0-9]{8})_
        (?P<content>[^_]+)_
        (?P<character>[^_]+)_
        (?P<face>[^_]+)_
        (?P<middle>.+?)_
        (?P<sequence>[0-9]{5})
        (?:_[0-9]{5})?
        _?
        \.(?P<extension>png|jpg|jpeg|webp|bmp|gif)
        $",
    )
    .expect("filename grammar is a valid regex")
});

static SPACED_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*_\s*").expect("valid regex"));

static SPACE_BEFORE_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\.").expect("valid regex"));

/// Structured fields of a conforming image filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileNameRecord {
    /// Eight digit date, not calendar-checked.
    pub date: String,
    pub content: String,
    pub character: String,
    pub face: String,
    /// Everything between `face` and the sequence; may contain underscores.
    pub middle: String,
    /// Five digit sequence number.
    pub sequence: String,
    /// Lowercased extension without the dot.
    pub extension: String,
}

impl FileNameRecord {
    /// Render the canonical filename.
    pub fn render(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}.{}",
            self.date,
            self.content,
            self.character,
            self.face,
            self.middle,
            self.sequence,
            self.extension.to_lowercase()
        )
    }

    /// Canonical filename without the extension.
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            self.date, self.content, self.character, self.face, self.middle, self.sequence
        )
    }

    fn match_normalized(name: &str) -> Option<Self> {
        let caps = NAME_RE.captures(name)?;
        Some(Self {
            date: caps["date"].to_string(),
            content: caps["content"].to_string(),
            character: caps["character"].to_string(),
            face: caps["face"].to_string(),
            middle: caps["middle"].to_string(),
            sequence: caps["sequence"].to_string(),
            extension: caps["extension"].to_lowercase(),
        })
    }
}

impl fmt::Display for FileNameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Clean up the separator noise that creeps into hand-edited names.
pub fn normalize_name(name: &str) -> String {
    let name = name.replace('＿', "_").replace(['·', '・'], "");
    let name = SPACED_UNDERSCORE.replace_all(&name, "_");
    let name = SPACE_BEFORE_DOT.replace_all(&name, ".");
    name.trim().to_string()
}

/// Parse a raw filename, returning `None` when it does not fit the grammar.
///
/// The middle segment is matched lazily, so among the possible splits the
/// one with the shortest middle wins. A middle that itself ends in what
/// looks like a sequence pair is reduced until rendering is a fixed point,
/// which keeps canonicalization idempotent.
pub fn parse_name(raw: &str) -> Option<FileNameRecord> {
    let mut record = FileNameRecord::match_normalized(&normalize_name(raw))?;
    loop {
        match FileNameRecord::match_normalized(&record.render()) {
            Some(next) if next != record => record = next,
            _ => return Some(record),
        }
    }
}

/// Whether `ext` (with or without the leading dot) is an accepted image type.
pub fn is_image_extension(ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_basic() {
        let record = parse_name("20240102_illustA_charX_faceY_poseZ_00017.png").unwrap();
        assert_eq!(record.date, "20240102");
        assert_eq!(record.content, "illustA");
        assert_eq!(record.character, "charX");
        assert_eq!(record.face, "faceY");
        assert_eq!(record.middle, "poseZ");
        assert_eq!(record.sequence, "00017");
        assert_eq!(record.extension, "png");
    }

    #[rstest]
    #[case::second_sequence(
        "20240102_illustA_charX_faceY_poseZ_00017_00017_.png",
        "20240102_illustA_charX_faceY_poseZ_00017.png"
    )]
    #[case::trailing_underscore(
        "20240102_a_b_c_d_00001_.PNG",
        "20240102_a_b_c_d_00001.png"
    )]
    #[case::fullwidth_underscore(
        "20240102＿a＿b＿c＿d＿00001.jpg",
        "20240102_a_b_c_d_00001.jpg"
    )]
    #[case::spaces_around_separators(
        "20240102 _ a _b_ c_d e_00001 .webp",
        "20240102_a_b_c_d e_00001.webp"
    )]
    #[case::middle_dots_removed("20240102_a・b_c_d_e·f_00001.gif", "20240102_ab_c_d_ef_00001.gif")]
    #[case::middle_with_underscores(
        "20240102_a_b_c_long_pose_name_00042.jpeg",
        "20240102_a_b_c_long_pose_name_00042.jpeg"
    )]
    fn test_canonical_forms(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_name(raw).unwrap().render(), expected);
    }

    #[rstest]
    #[case::no_sequence("20240102_a_b_c_d.png")]
    #[case::short_date("2024012_a_b_c_d_00001.png")]
    #[case::bad_extension("20240102_a_b_c_d_00001.tiff")]
    #[case::missing_middle("20240102_a_b_c_00001.png")]
    #[case::four_digit_sequence("20240102_a_b_c_d_0001.png")]
    #[case::empty("")]
    fn test_rejects(#[case] raw: &str) {
        assert!(parse_name(raw).is_none());
    }

    #[test]
    fn test_shortest_middle_wins() {
        let record = parse_name("20240102_a_b_c_m_11111_22222.png").unwrap();
        assert_eq!(record.middle, "m");
        assert_eq!(record.sequence, "11111");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let names = [
            "20240102_illustA_charX_faceY_poseZ_00017_00017_.png",
            "20240102_a_b_c_x_11111_22222_33333.png",
            "20240102_a_b_c_x_y_z_00001_.JPG",
        ];
        for name in names {
            let once = parse_name(name).unwrap().render();
            let twice = parse_name(&once).unwrap().render();
            assert_eq!(once, twice, "not idempotent for {name}");
        }
    }

    #[test]
    fn test_render_lowercases_extension() {
        let mut record = parse_name("20240102_a_b_c_d_00001.png").unwrap();
        record.extension = "PNG".into();
        assert!(record.render().ends_with(".png"));
    }

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("PNG"));
        assert!(is_image_extension(".jpeg"));
        assert!(!is_image_extension("txt"));
    }
}
