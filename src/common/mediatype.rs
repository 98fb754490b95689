//! Media type parsing and matching.
//!
//! A media type is normalized on parse: type, subtype and parameter names are
//! lower-cased, whitespace around tokens is dropped and quoted parameter
//! values are unquoted. The structured suffix (`+zip`, `+json`, ...) is kept
//! as part of the subtype and exposed separately by
//! [`MediaType::structured_suffix`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A parsed `type/subtype` media type with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// Parse a media type string such as `application/epub+zip; charset=UTF-8`.
    ///
    /// Returns `None` when the string has no `type/subtype` part.
    pub fn parse(value: &str) -> Option<Self> {
        let mut components = value.split(';');
        let essence = components.next()?.trim();
        let (type_, subtype) = essence.split_once('/')?;
        let type_ = type_.trim().to_ascii_lowercase();
        let subtype = subtype.trim().to_ascii_lowercase();
        if type_.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }

        let mut parameters = BTreeMap::new();
        for component in components {
            let Some((name, value)) = component.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            // Charset values are case-insensitive, others are kept verbatim.
            let value = if name == "charset" {
                value.to_ascii_uppercase()
            } else {
                value.to_string()
            };
            parameters.insert(name, value);
        }

        Some(Self {
            type_,
            subtype,
            parameters,
        })
    }

    /// The top-level type, e.g. `application`.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype including any structured suffix, e.g. `epub+zip`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The structured syntax suffix, e.g. `zip` for `application/epub+zip`.
    pub fn structured_suffix(&self) -> Option<&str> {
        self.subtype
            .rsplit_once('+')
            .map(|(_, suffix)| suffix)
            .filter(|suffix| !suffix.is_empty())
    }

    /// The media type parameters, keyed by lower-cased name.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Value of the given parameter, if present.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// Returns `true` if `other` is an instance of this media type.
    ///
    /// Type and subtype must be equal. Every parameter named by `self`, other
    /// than `charset`, must be present in `other` with the same value;
    /// parameters carried only by `other` are ignored.
    pub fn contains(&self, other: &MediaType) -> bool {
        if self.type_ != other.type_ || self.subtype != other.subtype {
            return false;
        }
        self.parameters
            .iter()
            .filter(|(name, _)| name.as_str() != "charset")
            .all(|(name, value)| other.parameters.get(name) == Some(value))
    }

    /// Convenience wrapper around [`MediaType::contains`] taking a string.
    pub fn matches(&self, other: &str) -> bool {
        MediaType::parse(other).is_some_and(|other| self.contains(&other))
    }
}

impl FromStr for MediaType {
    type Err = InvalidMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s).ok_or_else(|| InvalidMediaType(s.to_string()))
    }
}

/// Error returned when parsing a string that is not a media type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid media type: {0}")]
pub struct InvalidMediaType(pub String);

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{}={}", name, value)?;
        }
        Ok(())
    }
}
