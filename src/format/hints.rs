//! Cheap, pre-computed evidence about an asset.

use std::collections::BTreeSet;
use std::path::Path;

use crate::common::MediaType;

/// Candidate file extensions and declared media types of an asset.
///
/// Hints are built once by the caller, typically from a file name and an
/// HTTP `Content-Type`, and are never modified during resolution.
///
/// # Examples
///
/// ```rust
/// use longan::FormatHints;
///
/// let hints = FormatHints::new()
///     .with_file_extension(".EPUB")
///     .with_media_type("application/epub+zip; charset=utf-8");
///
/// assert!(hints.has_file_extension(&["epub"]));
/// assert!(hints.has_media_type(&["application/epub+zip"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatHints {
    file_extensions: BTreeSet<String>,
    media_types: Vec<MediaType>,
}

impl FormatHints {
    /// Create empty hints.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints carrying the extension of the given file name, if it has one.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        let mut hints = Self::new();
        if let Some(extension) = extension {
            hints.add_file_extension(&extension);
        }
        hints
    }

    /// Add a candidate file extension. Case and a leading dot are ignored.
    pub fn with_file_extension(mut self, extension: &str) -> Self {
        self.add_file_extension(extension);
        self
    }

    /// Add a declared media type. Strings that do not parse are ignored.
    pub fn with_media_type(mut self, media_type: &str) -> Self {
        if let Some(media_type) = MediaType::parse(media_type)
            && !self.media_types.contains(&media_type)
        {
            self.media_types.push(media_type);
        }
        self
    }

    fn add_file_extension(&mut self, extension: &str) {
        let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        if !extension.is_empty() {
            self.file_extensions.insert(extension);
        }
    }

    /// Candidate extensions, lower-cased.
    pub fn file_extensions(&self) -> impl Iterator<Item = &str> {
        self.file_extensions.iter().map(String::as_str)
    }

    /// Declared media types.
    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    /// Returns `true` when the hints carry no evidence at all.
    pub fn is_empty(&self) -> bool {
        self.file_extensions.is_empty() && self.media_types.is_empty()
    }

    /// Returns `true` if any of `candidates` is one of the hinted extensions.
    pub fn has_file_extension(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|candidate| {
            let candidate = candidate.trim_start_matches('.');
            self.file_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(candidate))
        })
    }

    /// Returns `true` if a hinted media type is an instance of any of
    /// `candidates`.
    ///
    /// Parameters carried by the hint are ignored; parameters named by a
    /// candidate other than `charset` must be present in the hint.
    pub fn has_media_type(&self, candidates: &[&str]) -> bool {
        candidates
            .iter()
            .filter_map(|candidate| MediaType::parse(candidate))
            .any(|candidate| self.media_types.iter().any(|hint| candidate.contains(hint)))
    }

    /// Returns `true` if a hinted media type of the given top-level type uses
    /// the structured `suffix` (e.g. `zip` for any `application/*+zip`).
    ///
    /// Detectors opt into this looser rule explicitly.
    pub fn has_media_type_suffix(&self, type_: &str, suffix: &str) -> bool {
        self.media_types.iter().any(|hint| {
            hint.type_().eq_ignore_ascii_case(type_)
                && hint
                    .structured_suffix()
                    .is_some_and(|s| s.eq_ignore_ascii_case(suffix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let hints = FormatHints::new().with_file_extension("CBZ");
        assert!(hints.has_file_extension(&["cbz"]));
        assert!(hints.has_file_extension(&["zip", ".CbZ"]));
        assert!(!hints.has_file_extension(&["zip"]));
    }

    #[test]
    fn test_from_path() {
        let hints = FormatHints::from_path("/books/Moby Dick.EPUB");
        assert!(hints.has_file_extension(&["epub"]));
        assert!(FormatHints::from_path("README").is_empty());
    }

    #[test]
    fn test_media_type_parameters() {
        let hints = FormatHints::new().with_media_type("application/epub+zip;charset=utf-8");
        assert!(hints.has_media_type(&["application/epub+zip"]));
        assert!(!hints.has_media_type(&["application/zip"]));

        let opds = FormatHints::new().with_media_type("application/atom+xml;profile=opds-catalog;kind=navigation");
        assert!(opds.has_media_type(&["application/atom+xml;profile=opds-catalog"]));
        assert!(!opds.has_media_type(&["application/atom+xml;type=entry;profile=opds-catalog"]));
    }

    #[test]
    fn test_suffix_rule() {
        let hints = FormatHints::new().with_media_type("application/x-foo+zip");
        assert!(hints.has_media_type_suffix("application", "zip"));
        assert!(!hints.has_media_type_suffix("application", "json"));
        assert!(!hints.has_media_type(&["application/zip"]));
    }

    #[test]
    fn test_invalid_media_type_ignored() {
        let hints = FormatHints::new().with_media_type("garbage");
        assert!(hints.is_empty());
    }
}
