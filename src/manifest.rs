//! Readium Web Publication Manifest subset.
//!
//! Only the parts consulted during format resolution are modelled: declared
//! conformance profiles, links with their relations and types, and the
//! encryption scheme carried by link properties. Unknown keys are ignored,
//! but `metadata.title` is required so that arbitrary JSON objects with a
//! `links` array are not taken for manifests.

use serde::{Deserialize, Deserializer};

/// Profile URI of Readium audiobooks.
pub const PROFILE_AUDIOBOOK: &str = "https://readium.org/webpub-manifest/profiles/audiobook";
/// Profile URI of Readium visual narratives (comics, manga).
pub const PROFILE_DIVINA: &str = "https://readium.org/webpub-manifest/profiles/divina";
/// Profile URI of Readium PDF packages.
pub const PROFILE_PDF: &str = "https://readium.org/webpub-manifest/profiles/pdf";

/// Encryption scheme URI of Readium LCP.
pub const LCP_SCHEME: &str = "http://readium.org/2014/01/lcp";

/// A string or an array of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}

/// A publication manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    pub metadata: Metadata,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(rename = "readingOrder", alias = "spine", default)]
    pub reading_order: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Metadata {
    /// Plain string or a language map, only its presence matters here.
    pub title: serde_json::Value,
    #[serde(rename = "conformsTo", default, deserialize_with = "one_or_many")]
    pub conforms_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub rel: Vec<String>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub encrypted: Option<EncryptedProperty>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EncryptedProperty {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
}

impl Link {
    /// Returns `true` if the link has the given relation.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.iter().any(|r| r == rel)
    }

    /// Returns `true` if the declared type is an instance of `media_type`.
    pub fn has_media_type(&self, media_type: &str) -> bool {
        let Some(declared) = self.media_type.as_deref() else {
            return false;
        };
        crate::common::MediaType::parse(media_type).is_some_and(|query| query.matches(declared))
    }

    /// Encryption scheme declared in the link properties.
    pub fn encryption_scheme(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .encrypted
            .as_ref()?
            .scheme
            .as_deref()
    }
}

impl Manifest {
    /// Parse a manifest from a decoded JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Manifest::deserialize(value)
    }

    /// Returns `true` if the metadata declares the given profile.
    pub fn conforms_to(&self, profile: &str) -> bool {
        self.metadata.conforms_to.iter().any(|p| p == profile)
    }

    /// The first link with relation `self`.
    pub fn self_link(&self) -> Option<&Link> {
        self.links.iter().find(|link| link.has_rel("self"))
    }

    /// Returns `true` if a reading order item is protected with LCP.
    pub fn has_lcp_reading_order(&self) -> bool {
        self.reading_order
            .iter()
            .any(|link| link.encryption_scheme() == Some(LCP_SCHEME))
    }
}
