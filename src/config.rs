/// Configuration options for content sniffing.
///
/// These options bound how much of an asset the decoded views of a
/// [`Blob`](crate::blob::Blob) are allowed to read.
///
/// # Examples
///
/// ```rust
/// use longan::SniffOptions;
///
/// // Create with defaults
/// let options = SniffOptions::default();
///
/// // Or customize
/// let options = SniffOptions::new()
///     .with_max_parse_length(1024 * 1024)
///     .with_text_sniff_length(512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SniffOptions {
    /// Content longer than this is never parsed as text, XML or JSON
    pub max_parse_length: u64,
    /// Number of leading bytes inspected by textual sniffs
    pub text_sniff_length: usize,
}

/// Default upper bound for full-content parsing (16 MiB).
pub const DEFAULT_MAX_PARSE_LENGTH: u64 = 16 * 1024 * 1024;

/// Default prefix length for textual sniffs.
pub const DEFAULT_TEXT_SNIFF_LENGTH: usize = 1024;

impl Default for SniffOptions {
    fn default() -> Self {
        Self {
            max_parse_length: DEFAULT_MAX_PARSE_LENGTH,
            text_sniff_length: DEFAULT_TEXT_SNIFF_LENGTH,
        }
    }
}

impl SniffOptions {
    /// Create a new `SniffOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest content length eligible for structured parsing.
    ///
    /// Larger content yields an absent decoded view, which detectors treat as
    /// "does not match".
    #[inline]
    pub fn with_max_parse_length(mut self, length: u64) -> Self {
        self.max_parse_length = length;
        self
    }

    /// Set the prefix length read by the `<!doctype html>` and plain-text
    /// sniffs.
    #[inline]
    pub fn with_text_sniff_length(mut self, length: usize) -> Self {
        self.text_sniff_length = length.max(16);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = SniffOptions::new()
            .with_max_parse_length(10)
            .with_text_sniff_length(4);
        assert_eq!(options.max_parse_length, 10);
        // A doctype needs 15 bytes, shorter prefixes are widened.
        assert_eq!(options.text_sniff_length, 16);
        assert_eq!(SniffOptions::default().max_parse_length, DEFAULT_MAX_PARSE_LENGTH);
    }
}
