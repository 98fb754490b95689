//! Archive-like assets exposing independently readable entries.
//!
//! A [`Container`] lists the leaf paths of an archive or exploded package
//! and opens any of them as a [`Blob`]. Nested archives are never expanded:
//! a ZIP entry holding another ZIP is just an entry.

pub mod directory;
pub mod memory;
#[cfg(feature = "zip")]
pub mod zip;

use std::collections::BTreeSet;

use crate::blob::Blob;
use crate::format::Specification;

pub use directory::DirectoryContainer;
pub use memory::MemoryContainer;
#[cfg(feature = "zip")]
pub use self::zip::ZipContainer;

/// A read-only set of entries.
pub trait Container: Send + Sync {
    /// Name of the container, used in logs and entry names.
    fn name(&self) -> &str;

    /// Relative paths of every leaf entry, `/`-separated and without
    /// directory pseudo-entries.
    fn entries(&self) -> &BTreeSet<String>;

    /// Archive specification of the container itself, if any.
    ///
    /// A ZIP-backed container reports [`Specification::Zip`]; an exploded
    /// directory reports nothing.
    fn archive(&self) -> Option<Specification> {
        None
    }

    /// Open an entry, or `None` if it does not exist.
    fn open(&self, path: &str) -> Option<Blob>;

    /// Returns `true` if the container has an entry at `path`.
    fn contains(&self, path: &str) -> bool {
        self.entries().contains(path)
    }
}

/// Returns `true` for entries that never count towards content heuristics:
/// hidden files, macOS resource forks and Windows thumbnail caches.
pub fn is_ignored_entry(path: &str) -> bool {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let Some(file_name) = segments.next_back() else {
        return true;
    };
    file_name.starts_with('.')
        || file_name.eq_ignore_ascii_case("thumbs.db")
        || path.split('/').any(|segment| segment == "__MACOSX")
}

/// Lower-cased extension of an entry path, `""` when it has none.
pub fn entry_extension(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Entries of a container that count towards content heuristics.
pub fn visible_entries(container: &dyn Container) -> impl Iterator<Item = &str> {
    container
        .entries()
        .iter()
        .map(String::as_str)
        .filter(|path| !is_ignored_entry(path))
}

/// Returns `true` if the extension of every visible entry is `required` or
/// `allowed`, and at least one is `required`.
///
/// This is the shape test of the informal packages (comics, audiobooks).
pub fn matches_extension_profile(
    container: &dyn Container,
    required: impl Fn(&str) -> bool,
    allowed: impl Fn(&str) -> bool,
) -> bool {
    let mut has_required = false;
    for path in visible_entries(container) {
        let ext = entry_extension(path);
        if required(ext.as_str()) {
            has_required = true;
        } else if !allowed(ext.as_str()) {
            return false;
        }
    }
    has_required
}

#[cfg(test)]
mod tests {
    use super::*;
    use phf::phf_set;

    static IMAGES: phf::Set<&'static str> = phf_set! { "jpg", "png" };
    static METADATA: phf::Set<&'static str> = phf_set! { "acbf" };

    fn is_image(ext: &str) -> bool {
        IMAGES.contains(ext)
    }

    fn is_metadata(ext: &str) -> bool {
        METADATA.contains(ext)
    }

    #[test]
    fn test_ignored_entries() {
        assert!(is_ignored_entry(".DS_Store"));
        assert!(is_ignored_entry("pages/.hidden.jpg"));
        assert!(is_ignored_entry("Thumbs.db"));
        assert!(is_ignored_entry("__MACOSX/pages/._001.jpg"));
        assert!(!is_ignored_entry("pages/001.jpg"));
        assert!(!is_ignored_entry("mimetype"));
    }

    #[test]
    fn test_entry_extension() {
        assert_eq!(entry_extension("pages/001.JPG"), "jpg");
        assert_eq!(entry_extension("a.dir/mimetype"), "");
        assert_eq!(entry_extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_extension_profile() {
        let comic = MemoryContainer::new("comic")
            .with_entry("001.jpg", "")
            .with_entry("002.png", "")
            .with_entry("comic.acbf", "")
            .with_entry(".DS_Store", "");
        assert!(matches_extension_profile(&comic, is_image, is_metadata));

        let only_metadata = MemoryContainer::new("meta").with_entry("comic.acbf", "");
        assert!(!matches_extension_profile(&only_metadata, is_image, is_metadata));

        let mixed = MemoryContainer::new("mixed")
            .with_entry("001.jpg", "")
            .with_entry("mimetype", "");
        assert!(!matches_extension_profile(&mixed, is_image, is_metadata));
    }
}
