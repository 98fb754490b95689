//! HTML and XHTML documents.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const DOCTYPE_HTML: &str = "<!doctype html";

/// Detects HTML documents.
///
/// Well-formed documents rooted at `html` are XHTML when their `body` is in
/// the XHTML namespace and plain HTML otherwise. Documents that are not
/// XML at all fall back to a `<!doctype html>` prefix check.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatSniffer;

#[async_trait]
impl FormatSniffer for HtmlFormatSniffer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        if hints_match(hints, &["htm", "html"], &[media_types::HTML]) {
            return Some(Format::new(&[Specification::Html], media_types::HTML, "html"));
        }
        if hints_match(hints, &["xht", "xhtml"], &[media_types::XHTML]) {
            return Some(Format::new(
                &[Specification::Xml, Specification::Html],
                media_types::XHTML,
                "xhtml",
            ));
        }
        None
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if format.conforms_to(Specification::Html) {
            return Ok(None);
        }

        if let Some(document) = blob.read_as_xml().await? {
            let root = document.root();
            if !root.local_name().eq_ignore_ascii_case("html") {
                return Ok(None);
            }
            let refined = if root.first_child(Some(XHTML_NAMESPACE), "body").is_some() {
                format.refined(
                    &[Specification::Xml, Specification::Html],
                    media_types::XHTML,
                    "xhtml",
                )
            } else {
                format.refined(&[Specification::Html], media_types::HTML, "html")
            };
            return Ok(Some(refined));
        }

        if !format.is_empty() {
            return Ok(None);
        }
        let Some(prefix) = blob.read_text_prefix().await? else {
            return Ok(None);
        };
        let prefix = prefix.trim_start_matches('\u{feff}').trim_start();
        let is_html = prefix
            .get(..DOCTYPE_HTML.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(DOCTYPE_HTML));
        Ok(is_html.then(|| Format::new(&[Specification::Html], media_types::HTML, "html")))
    }
}
