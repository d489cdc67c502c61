//! Non-recursive discovery of gallery image files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions accepted into the gallery, compared without case.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Return `true` if `path` carries a recognized image extension.
#[must_use]
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
        })
}

/// Scan the top level of `dir` for image files, ordered by file name so the
/// id to path mapping stays stable across platforms. Subdirectories are not
/// entered. A missing directory is tolerated; the gallery then consists of
/// placeholder tiles only.
#[must_use]
pub fn discover_images(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(
            dir = %dir.display(),
            "image directory missing; gallery will hold placeholders only"
        );
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .flatten()
    {
        let path = entry.path();
        if entry.file_type().is_file() && is_image(path) {
            found.push(path.to_path_buf());
        }
    }
    debug!(dir = %dir.display(), count = found.len(), "image scan complete");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn accepts_known_extensions_without_case() {
        assert!(is_image(Path::new("a.png")));
        assert!(is_image(Path::new("b.JPG")));
        assert!(is_image(Path::new("c.JpEg")));
        assert!(is_image(Path::new("d.webp")));
        assert!(!is_image(Path::new("e.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }

    #[test]
    fn scans_only_the_top_level() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.jpg"), b"x").expect("write");
        fs::write(dir.path().join("c.gif"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(nested.join("b.png"), b"x").expect("write");

        let found = discover_images(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.gif"]);
    }

    #[test]
    fn orders_results_by_file_name() {
        let dir = tempdir().expect("tempdir");
        for name in ["c.png", "a.png", "b.png"] {
            fs::write(dir.path().join(name), b"x").expect("write");
        }
        let found = discover_images(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn missing_directory_yields_an_empty_table() {
        let dir = tempdir().expect("tempdir");
        let found = discover_images(&dir.path().join("does-not-exist"));
        assert!(found.is_empty());
    }
}
