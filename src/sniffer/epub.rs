//! EPUB packages and their DRM schemes.

use async_trait::async_trait;
use tracing::trace;

use super::{FormatSniffer, hints_match};
use crate::common::Result;
use crate::container::Container;
use crate::encryption::{self, ENCRYPTION_PATH};
use crate::format::{Format, FormatHints, Specification, media_types};

const MIMETYPE_PATH: &str = "mimetype";
const LICENSE_PATH: &str = "META-INF/license.lcpl";
const RIGHTS_PATH: &str = "META-INF/rights.xml";

/// Detects EPUB packages (OCF containers) and tags LCP or Adept protection.
///
/// A container is an EPUB when its `mimetype` entry holds the EPUB media
/// type. Protection is probed once the package is known to be an EPUB,
/// including when that was established from the hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubFormatSniffer;

impl EpubFormatSniffer {
    async fn is_epub(&self, container: &dyn Container) -> Result<bool> {
        let Some(blob) = container.open(MIMETYPE_PATH) else {
            return Ok(false);
        };
        Ok(blob
            .read_as_text()
            .await?
            .is_some_and(|text| text.trim() == media_types::EPUB))
    }

    /// The DRM scheme protecting the package, if any.
    async fn protection(&self, container: &dyn Container) -> Result<Option<Specification>> {
        if container.contains(LICENSE_PATH) {
            return Ok(Some(Specification::Lcp));
        }

        if let Some(blob) = container.open(ENCRYPTION_PATH)
            && let Some(document) = blob.read_as_xml().await?
            && let Some(scheme) = encryption::protection_of(document)
        {
            return Ok(Some(scheme));
        }

        if let Some(blob) = container.open(RIGHTS_PATH)
            && let Some(document) = blob.read_as_xml().await?
            && document.root().namespace() == Some(encryption::ADEPT_SCHEME)
        {
            return Ok(Some(Specification::Adept));
        }

        Ok(None)
    }
}

#[async_trait]
impl FormatSniffer for EpubFormatSniffer {
    fn name(&self) -> &'static str {
        "epub"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(hints, &["epub"], &[media_types::EPUB]).then(|| {
            Format::new(
                &[Specification::Zip, Specification::Epub],
                media_types::EPUB,
                "epub",
            )
        })
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        if format.conforms_to_any(&[Specification::Lcp, Specification::Adept]) {
            return Ok(None);
        }

        let mut refined = if format.conforms_to(Specification::Epub) {
            None
        } else if self.is_epub(container).await? {
            Some(format.refined(&[Specification::Epub], media_types::EPUB, "epub"))
        } else {
            return Ok(None);
        };

        if let Some(scheme) = self.protection(container).await? {
            trace!(container = container.name(), %scheme, "EPUB is protected");
            let base = refined.as_ref().unwrap_or(format);
            refined = Some(base.with_specifications(&[scheme]));
        }

        Ok(refined)
    }
}
