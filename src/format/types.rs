//! The resolved format value.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use super::media_types;
use super::specification::Specification;
use crate::common::MediaType;

/// Specification lists are short; four inline slots cover nearly every
/// format without allocating.
type Specifications = SmallVec<[Specification; 4]>;

/// An immutable classification of an asset.
///
/// A format is the set of [`Specification`]s an asset conforms to, together
/// with the canonical media type and file extension of the most specific
/// one. The specifications keep the order in which they were established
/// (outer container first), but equality only considers membership.
///
/// # Examples
///
/// ```rust
/// use longan::{Format, Specification};
///
/// let zip = Format::new(&[Specification::Zip], "application/zip", "zip");
/// let epub = zip.refined(&[Specification::Epub], "application/epub+zip", "epub");
///
/// assert!(epub.conforms_to(Specification::Zip));
/// assert!(epub.refines(&zip));
/// assert_eq!(epub.file_extension(), "epub");
/// ```
#[derive(Debug, Clone)]
pub struct Format {
    specifications: Specifications,
    media_type: Cow<'static, str>,
    file_extension: Cow<'static, str>,
}

impl Format {
    /// Create a format from its specifications and canonical media type and
    /// extension.
    ///
    /// Duplicate specifications are dropped. The extension is lower-cased and
    /// stripped of any leading dot.
    pub fn new(
        specifications: &[Specification],
        media_type: impl Into<Cow<'static, str>>,
        file_extension: impl Into<Cow<'static, str>>,
    ) -> Self {
        let mut specs = Specifications::new();
        push_unique(&mut specs, specifications);
        Self {
            specifications: specs,
            media_type: media_type.into(),
            file_extension: normalize_extension(file_extension.into()),
        }
    }

    /// The format of an asset nothing is known about.
    ///
    /// It has no specifications, so any format with at least one
    /// specification refines it.
    pub fn empty() -> Self {
        Self {
            specifications: Specifications::new(),
            media_type: Cow::Borrowed(media_types::OCTET_STREAM),
            file_extension: Cow::Borrowed(""),
        }
    }

    /// Returns `true` when no specification has been established.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// Specifications in the order they were established.
    #[inline]
    pub fn specifications(&self) -> &[Specification] {
        &self.specifications
    }

    /// Canonical media type of the most specific specification.
    #[inline]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The canonical media type, parsed.
    pub fn parsed_media_type(&self) -> Option<MediaType> {
        MediaType::parse(&self.media_type)
    }

    /// Canonical file extension, lower-case and without a leading dot.
    #[inline]
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Returns `true` if the format conforms to the given specification.
    #[inline]
    pub fn conforms_to(&self, specification: Specification) -> bool {
        self.specifications.contains(&specification)
    }

    /// Returns `true` if the format conforms to at least one of the given
    /// specifications.
    pub fn conforms_to_any(&self, specifications: &[Specification]) -> bool {
        specifications.iter().any(|s| self.conforms_to(*s))
    }

    /// Returns `true` if the format conforms to all the given specifications.
    pub fn conforms_to_all(&self, specifications: &[Specification]) -> bool {
        specifications.iter().all(|s| self.conforms_to(*s))
    }

    /// Returns `true` if this format's specifications are a strict superset
    /// of `other`'s.
    pub fn refines(&self, other: &Format) -> bool {
        self.specifications.len() > other.specifications.len()
            && self.conforms_to_all(&other.specifications)
    }

    /// Returns a new format adding `specifications` to this one, with a new
    /// canonical media type and extension.
    pub fn refined(
        &self,
        specifications: &[Specification],
        media_type: impl Into<Cow<'static, str>>,
        file_extension: impl Into<Cow<'static, str>>,
    ) -> Self {
        let mut specs = self.specifications.clone();
        push_unique(&mut specs, specifications);
        Self {
            specifications: specs,
            media_type: media_type.into(),
            file_extension: normalize_extension(file_extension.into()),
        }
    }

    /// Returns a new format adding `specifications` while keeping the current
    /// media type and extension.
    ///
    /// Used for layers that do not change how an asset is opened, such as a
    /// protection scheme applied to an EPUB.
    pub fn with_specifications(&self, specifications: &[Specification]) -> Self {
        let mut specs = self.specifications.clone();
        push_unique(&mut specs, specifications);
        Self {
            specifications: specs,
            media_type: self.media_type.clone(),
            file_extension: self.file_extension.clone(),
        }
    }
}

fn push_unique(specs: &mut Specifications, additions: &[Specification]) {
    for spec in additions {
        if !specs.contains(spec) {
            specs.push(*spec);
        }
    }
}

fn normalize_extension(extension: Cow<'static, str>) -> Cow<'static, str> {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.len() == extension.len() && !trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        return extension;
    }
    Cow::Owned(trimmed.to_ascii_lowercase())
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.specifications.len() == other.specifications.len()
            && self.conforms_to_all(&other.specifications)
            && self.media_type == other.media_type
            && self.file_extension == other.file_extension
    }
}

impl Eq for Format {}

impl Hash for Format {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted = self.specifications.clone();
        sorted.sort_unstable();
        sorted.hash(state);
        self.media_type.hash(state);
        self.file_extension.hash(state);
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.media_type)?;
        for (i, spec) in self.specifications.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", spec)?;
        }
        f.write_str("]")
    }
}
