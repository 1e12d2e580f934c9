//! Choosing the source folder without asking.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Deepest directory containing every path, if it exists on disk.
pub fn common_parent(paths: &[PathBuf]) -> Option<PathBuf> {
    let (first, rest) = paths.split_first()?;
    let mut common: Vec<Component<'_>> = first.components().collect();
    for path in rest {
        let shared = common
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }

    if common.is_empty() {
        return None;
    }
    let parent: PathBuf = common.into_iter().collect();
    parent.is_dir().then_some(parent)
}

/// Pick the folder to sort.
///
/// In order: `explicit` when it is a directory; the single existing
/// `img_dir` from the sheet, or the common parent of several; the sheet's
/// own folder; `cwd`.
pub fn discover_source_root(
    explicit: Option<&Path>,
    table_path: Option<&Path>,
    image_dirs: &[PathBuf],
    cwd: &Path,
) -> PathBuf {
    if let Some(dir) = explicit.filter(|p| p.is_dir()) {
        return absolute(dir);
    }

    let existing: Vec<PathBuf> = image_dirs.iter().filter(|d| d.is_dir()).map(|d| absolute(d)).collect();
    let from_sheet = match existing.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        many => common_parent(many),
    };
    if let Some(dir) = from_sheet {
        return dir;
    }

    table_path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty() && p.is_dir())
        .map(absolute)
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("shoot").join("a")).unwrap();
        fs::create_dir_all(root.join("shoot").join("b")).unwrap();
        (dir, root)
    }

    #[test]
    fn test_common_parent() {
        let (_dir, root) = tree();
        let shoot = root.join("shoot");
        assert_eq!(common_parent(&[shoot.join("a"), shoot.join("b")]), Some(shoot.clone()));
        assert_eq!(common_parent(&[shoot.join("a")]), Some(shoot.join("a")));
        assert_eq!(common_parent(&[shoot.join("missing1"), shoot.join("missing2")]), Some(shoot));
        assert_eq!(common_parent(&[]), None);
    }

    #[test]
    fn test_explicit_wins() {
        let (_dir, root) = tree();
        let found = discover_source_root(Some(&root.join("shoot/a")), None, &[root.join("shoot/b")], &root);
        assert_eq!(found, root.join("shoot").join("a"));
    }

    #[test]
    fn test_missing_explicit_falls_through_to_sheet_dirs() {
        let (_dir, root) = tree();
        let dirs = [root.join("shoot/a"), root.join("shoot/b"), root.join("gone")];
        let found = discover_source_root(Some(&root.join("nope")), None, &dirs, &root);
        assert_eq!(found, root.join("shoot"));

        let found = discover_source_root(None, None, &dirs[..1], &root);
        assert_eq!(found, root.join("shoot").join("a"));
    }

    #[test]
    fn test_table_parent_then_cwd() {
        let (_dir, root) = tree();
        let sheet = root.join("shoot").join("b").join("meta.csv");
        assert_eq!(discover_source_root(None, Some(&sheet), &[], &root), root.join("shoot").join("b"));

        let cwd = PathBuf::from("/somewhere");
        assert_eq!(discover_source_root(None, Some(Path::new("meta.csv")), &[], &cwd), cwd);
        assert_eq!(discover_source_root(None, None, &[], &cwd), cwd);
    }
}
