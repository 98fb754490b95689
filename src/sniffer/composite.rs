//! The fixed-point refinement loop.
//!
//! Hints are consulted once, up front. Content and container checks then
//! run in order against the current format; every accepted refinement
//! restarts the scan from the first detector, since a new specification
//! (typically `zip`) may unlock a detector that abstained earlier. The loop
//! ends after a full pass without refinement.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::FormatSniffer;
use crate::blob::Blob;
use crate::common::{Error, Result};
use crate::container::Container;
use crate::encryption::{EncryptionMap, read_encryption};
use crate::format::{Format, FormatHints, Specification};

/// A resolved container format, with the encryption map of DRM-protected
/// EPUB packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub format: Format,
    /// Present when the format is an EPUB protected by LCP or Adept.
    pub encryption: Option<EncryptionMap>,
}

/// Runs an ordered list of sniffers until none refines the format further.
///
/// # Examples
///
/// ```rust
/// use longan::{CompositeFormatSniffer, FormatHints, Specification};
/// use longan::sniffer::{EpubFormatSniffer, ZipFormatSniffer};
///
/// let resolver = CompositeFormatSniffer::new(vec![
///     Box::new(ZipFormatSniffer),
///     Box::new(EpubFormatSniffer),
/// ]);
///
/// let format = resolver
///     .resolve(&FormatHints::new().with_file_extension("epub"))
///     .unwrap();
/// assert!(format.conforms_to(Specification::Epub));
/// ```
pub struct CompositeFormatSniffer {
    sniffers: Vec<Box<dyn FormatSniffer>>,
}

impl CompositeFormatSniffer {
    pub fn new(sniffers: Vec<Box<dyn FormatSniffer>>) -> Self {
        Self { sniffers }
    }

    /// The sniffers, in priority order.
    pub fn sniffers(&self) -> &[Box<dyn FormatSniffer>] {
        &self.sniffers
    }

    /// Resolve a format from the hints alone.
    ///
    /// When several sniffers recognize the hints, the most specific result
    /// wins. Ties go to the earlier sniffer.
    pub fn resolve(&self, hints: &FormatHints) -> Option<Format> {
        let mut best: Option<Format> = None;
        for sniffer in &self.sniffers {
            let Some(candidate) = sniffer.sniff_hints(hints) else {
                continue;
            };
            trace!(sniffer = sniffer.name(), format = %candidate, "hints matched");
            if best
                .as_ref()
                .is_none_or(|b| candidate.specifications().len() > b.specifications().len())
            {
                best = Some(candidate);
            }
        }
        best.filter(|format| !format.is_empty())
    }

    /// Resolve a format from the hints, then refine it from the content of
    /// `blob`.
    pub async fn resolve_blob(&self, hints: &FormatHints, blob: &Blob) -> Result<Option<Format>> {
        self.resolve_asset(hints, Some(blob), None).await
    }

    /// Resolve a format from the hints, then refine it from the entries of
    /// `container`.
    pub async fn resolve_container(
        &self,
        hints: &FormatHints,
        container: &dyn Container,
    ) -> Result<Option<Format>> {
        self.resolve_asset(hints, None, Some(container)).await
    }

    /// Like [`resolve_container`](Self::resolve_container), also reading
    /// `META-INF/encryption.xml` when the package is a protected EPUB.
    pub async fn resolve_container_with_encryption(
        &self,
        hints: &FormatHints,
        container: &dyn Container,
    ) -> Result<Option<Resolution>> {
        let Some(format) = self.resolve_container(hints, container).await? else {
            return Ok(None);
        };
        let protected = format.conforms_to(Specification::Epub)
            && format.conforms_to_any(&[Specification::Lcp, Specification::Adept]);
        let encryption = if protected {
            Some(read_encryption(container).await?)
        } else {
            None
        };
        Ok(Some(Resolution { format, encryption }))
    }

    /// Resolve a format from the hints and whichever accessors are given.
    ///
    /// Returns `Ok(None)` when nothing could be established.
    pub async fn resolve_asset(
        &self,
        hints: &FormatHints,
        blob: Option<&Blob>,
        container: Option<&dyn Container>,
    ) -> Result<Option<Format>> {
        let initial = self.resolve(hints).unwrap_or_else(Format::empty);
        let format = self.refine(initial, blob, container).await?;
        debug!(
            blob = blob.map(Blob::name),
            container = container.map(|c| c.name()),
            format = %format,
            "resolved"
        );
        Ok((!format.is_empty()).then_some(format))
    }

    /// Refine `format` until no sniffer adds a specification.
    ///
    /// The result always conforms to every specification of `format`.
    pub async fn refine(
        &self,
        format: Format,
        blob: Option<&Blob>,
        container: Option<&dyn Container>,
    ) -> Result<Format> {
        // Each accepted refinement adds a specification, so a well-behaved
        // set of sniffers cannot need more passes than this.
        let max_passes = Specification::ALL.len() + 1;
        let mut current = format;

        for _ in 0..max_passes {
            match self.refine_once(&current, blob, container).await? {
                Some(refined) => current = refined,
                None => return Ok(current),
            }
        }
        Err(Error::RefinementLimit { passes: max_passes })
    }

    /// One scan over the sniffers, stopping at the first refinement.
    async fn refine_once(
        &self,
        current: &Format,
        blob: Option<&Blob>,
        container: Option<&dyn Container>,
    ) -> Result<Option<Format>> {
        for sniffer in &self.sniffers {
            if let Some(blob) = blob {
                trace!(sniffer = sniffer.name(), blob = blob.name(), format = %current, "sniff blob");
                let candidate = sniffer.sniff_blob(blob, current).await?;
                if let Some(refined) = accept(sniffer.as_ref(), current, candidate) {
                    return Ok(Some(refined));
                }
            }
            if let Some(container) = container {
                trace!(
                    sniffer = sniffer.name(),
                    container = container.name(),
                    format = %current,
                    "sniff container"
                );
                let candidate = sniffer.sniff_container(container, current).await?;
                if let Some(refined) = accept(sniffer.as_ref(), current, candidate) {
                    return Ok(Some(refined));
                }
            }
        }
        Ok(None)
    }
}

/// Keep `candidate` only if it strictly refines `current`.
fn accept(sniffer: &dyn FormatSniffer, current: &Format, candidate: Option<Format>) -> Option<Format> {
    let candidate = candidate?;
    if candidate.refines(current) {
        debug!(sniffer = sniffer.name(), from = %current, to = %candidate, "refined");
        Some(candidate)
    } else {
        warn!(
            sniffer = sniffer.name(),
            current = %current,
            candidate = %candidate,
            "sniffer returned a format that does not refine its input, ignoring it"
        );
        None
    }
}

impl fmt::Debug for CompositeFormatSniffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sniffers.iter().map(|s| s.name()))
            .finish()
    }
}

#[async_trait]
impl FormatSniffer for CompositeFormatSniffer {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        self.resolve(hints)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        let refined = self.refine(format.clone(), Some(blob), None).await?;
        Ok(refined.refines(format).then_some(refined))
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        let refined = self.refine(format.clone(), None, Some(container)).await?;
        Ok(refined.refines(format).then_some(refined))
    }
}
