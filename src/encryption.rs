//! Per-entry encryption descriptors of EPUB-family packages.
//!
//! `META-INF/encryption.xml` lists every encrypted entry of an OCF package
//! with the algorithm used, the compression applied before encryption and,
//! for DRM schemes, where the content key is retrieved from. This module
//! reads it into an [`EncryptionMap`] and tells which DRM scheme the
//! package is protected with.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use tracing::trace;

use crate::blob::{XmlDocument, XmlElement};
use crate::common::Result;
use crate::container::Container;
use crate::format::Specification;
use crate::manifest::LCP_SCHEME;

/// Path of the encryption descriptor inside an OCF package.
pub const ENCRYPTION_PATH: &str = "META-INF/encryption.xml";

/// Scheme URI of Adobe Adept.
pub const ADEPT_SCHEME: &str = "http://ns.adobe.com/adept";

pub(crate) mod ns {
    pub const XMLENC: &str = "http://www.w3.org/2001/04/xmlenc#";
    pub const XMLDSIG: &str = "http://www.w3.org/2000/09/xmldsig#";
    pub const COMPRESSION: &str = "http://www.idpf.org/2016/encryption#compression";
    pub const ADEPT: &str = super::ADEPT_SCHEME;
}

/// Key retrieval references of LCP point into the license document.
const LCP_KEY_REFERENCE: &str = "license.lcpl#";

/// How one entry of a package is encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encryption {
    /// Encryption algorithm URI.
    pub algorithm: String,
    /// Compression applied before encryption, `"deflate"` or `"none"`.
    pub compression: Option<String>,
    /// Length of the entry before compression and encryption.
    pub original_length: Option<u64>,
    /// DRM scheme URI, `None` for font obfuscation and unknown schemes.
    pub scheme: Option<String>,
}

/// Encryption descriptors keyed by entry path.
pub type EncryptionMap = BTreeMap<String, Encryption>;

/// Parse an `encryption.xml` document.
///
/// `EncryptedData` elements without an algorithm or a cipher reference are
/// skipped.
pub fn parse_encryption(document: &XmlDocument) -> EncryptionMap {
    let mut map = EncryptionMap::new();

    for data in document
        .root()
        .children_named(Some(ns::XMLENC), "EncryptedData")
    {
        let Some(algorithm) = data
            .first_child(Some(ns::XMLENC), "EncryptionMethod")
            .and_then(|method| method.attribute("Algorithm"))
        else {
            trace!("EncryptedData without algorithm");
            continue;
        };
        let Some(uri) = data
            .find_path(&[
                (Some(ns::XMLENC), "CipherData"),
                (Some(ns::XMLENC), "CipherReference"),
            ])
            .and_then(|reference| reference.attribute("URI"))
        else {
            trace!("EncryptedData without cipher reference");
            continue;
        };

        let path = percent_decode_str(uri).decode_utf8_lossy();
        let path = path.trim_start_matches('/').to_string();

        let compression = data
            .descendants()
            .find(|e| e.is(Some(ns::COMPRESSION), "Compression"));
        let method = compression.and_then(|c| c.attribute("Method")).map(|method| {
            match method.trim() {
                "8" => "deflate".to_string(),
                "0" => "none".to_string(),
                other => other.to_string(),
            }
        });
        let original_length = compression
            .and_then(|c| c.attribute("OriginalLength"))
            .and_then(|len| len.trim().parse().ok());

        map.insert(
            path,
            Encryption {
                algorithm: algorithm.to_string(),
                compression: method,
                original_length,
                scheme: scheme_of(data).map(str::to_string),
            },
        );
    }

    map
}

/// DRM scheme of one `EncryptedData` element.
fn scheme_of(data: &XmlElement) -> Option<&'static str> {
    let key_info = data.first_child(Some(ns::XMLDSIG), "KeyInfo")?;
    if is_lcp_key_info(key_info) {
        Some(LCP_SCHEME)
    } else if key_info.first_child(Some(ns::ADEPT), "resource").is_some() {
        Some(ADEPT_SCHEME)
    } else {
        None
    }
}

fn is_lcp_key_info(key_info: &XmlElement) -> bool {
    key_info
        .children_named(Some(ns::XMLDSIG), "RetrievalMethod")
        .filter_map(|method| method.attribute("URI"))
        .any(|uri| uri.starts_with(LCP_KEY_REFERENCE))
}

/// The DRM scheme an `encryption.xml` document refers to, if any.
///
/// LCP wins when both schemes appear.
pub fn protection_of(document: &XmlDocument) -> Option<Specification> {
    let mut adept = false;
    for element in document.root().descendants() {
        if element.is(Some(ns::XMLDSIG), "KeyInfo") && is_lcp_key_info(element) {
            return Some(Specification::Lcp);
        }
        if element.is(Some(ns::ADEPT), "resource") {
            adept = true;
        }
    }
    adept.then_some(Specification::Adept)
}

/// Read the encryption map of a package.
///
/// A package without `META-INF/encryption.xml`, or with one that does not
/// parse, has an empty map.
pub async fn read_encryption(container: &dyn Container) -> Result<EncryptionMap> {
    let Some(blob) = container.open(ENCRYPTION_PATH) else {
        return Ok(EncryptionMap::new());
    };
    Ok(blob
        .read_as_xml()
        .await?
        .map(parse_encryption)
        .unwrap_or_default())
}
