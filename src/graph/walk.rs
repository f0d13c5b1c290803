//! Input tree listing.

use std::path::Path;

use jwalk::WalkDir;

use crate::debug;
use crate::error::{BuildError, Result};
use crate::utils::url::id_from_rel_path;

/// Snapshot of the input tree.
#[derive(Debug, Default)]
pub struct Listing {
    /// Every regular file, as sorted asset ids.
    pub files: Vec<String>,
    /// Entries the walk could not stat (broken symlinks, unreadable directories).
    pub unreadable: Vec<String>,
}

/// List every file under `root` as sorted asset ids.
///
/// Only a missing root is fatal. Entries that fail to stat are recorded in
/// [`Listing::unreadable`] and left to whoever reads them.
pub fn list_files(root: &Path) -> Result<Listing> {
    if !root.is_dir() {
        return Err(BuildError::io(
            "listing",
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input root is not a directory"),
        ));
    }

    let mut listing = Listing::default();
    for entry in WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(true)
        .sort(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("walk"; "skipping entry: {}", err);
                if let Some(id) = err
                    .path()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .and_then(id_from_rel_path)
                {
                    listing.unreadable.push(id);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(id) = path.strip_prefix(root).ok().and_then(id_from_rel_path) {
            listing.files.push(id);
        }
    }

    listing.files.sort();
    listing.unreadable.sort();
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_sorted_with_dotfiles() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/c")).unwrap();
        fs::write(dir.path().join("b/c/z.css"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::write(dir.path().join(".htaccess"), "").unwrap();

        let listing = list_files(dir.path()).unwrap();
        assert_eq!(listing.files, [".htaccess", "a.js", "b/c/z.css"]);
        assert!(listing.unreadable.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = list_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.css"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("junk.bin"))
            .unwrap();

        let listing = list_files(dir.path()).unwrap();
        assert_eq!(listing.files, ["style.css"]);
        assert!(!listing.files.iter().any(|f| f == "junk.bin"));
    }
}
