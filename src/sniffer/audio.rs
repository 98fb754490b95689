//! Audio files, by extension, media type or magic number.

use async_trait::async_trait;
use phf::phf_map;

use super::{FormatSniffer, starts_with_any};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

static EXTENSIONS: phf::Map<&'static str, Specification> = phf_map! {
    "aac" => Specification::Aac,
    "aif" => Specification::Aiff,
    "aifc" => Specification::Aiff,
    "aiff" => Specification::Aiff,
    "flac" => Specification::Flac,
    "m4a" => Specification::Mp4,
    "m4b" => Specification::Mp4,
    "mp3" => Specification::Mp3,
    "oga" => Specification::Ogg,
    "ogg" => Specification::Ogg,
    "opus" => Specification::Opus,
    "wav" => Specification::Wav,
    "webm" => Specification::Webm,
};

const MEDIA_TYPES: &[(&str, Specification)] = &[
    (media_types::AAC, Specification::Aac),
    ("audio/x-aac", Specification::Aac),
    (media_types::AIFF, Specification::Aiff),
    ("audio/x-aiff", Specification::Aiff),
    (media_types::FLAC, Specification::Flac),
    ("audio/x-flac", Specification::Flac),
    (media_types::MP3, Specification::Mp3),
    ("audio/mp3", Specification::Mp3),
    (media_types::MP4, Specification::Mp4),
    ("audio/x-m4a", Specification::Mp4),
    (media_types::OGG, Specification::Ogg),
    (media_types::OPUS, Specification::Opus),
    (media_types::WAV, Specification::Wav),
    ("audio/x-wav", Specification::Wav),
    ("audio/vnd.wave", Specification::Wav),
    (media_types::WEBM, Specification::Webm),
];

/// ISO base media brands used by M4A and M4B files.
const MP4_BRANDS: &[&[u8]] = &[b"M4A ", b"M4B ", b"M4P ", b"mp42", b"isom"];

/// Bytes needed for the longest signature (`OpusHead` in the first Ogg page).
const SIGNATURE_LENGTH: u64 = 36;

fn audio_format(specification: Specification) -> Option<Format> {
    let (media_type, extension) = match specification {
        Specification::Aac => (media_types::AAC, "aac"),
        Specification::Aiff => (media_types::AIFF, "aiff"),
        Specification::Flac => (media_types::FLAC, "flac"),
        Specification::Mp3 => (media_types::MP3, "mp3"),
        Specification::Mp4 => (media_types::MP4, "m4a"),
        Specification::Ogg => (media_types::OGG, "oga"),
        Specification::Opus => (media_types::OPUS, "opus"),
        Specification::Wav => (media_types::WAV, "wav"),
        Specification::Webm => (media_types::WEBM, "webm"),
        _ => return None,
    };
    Some(Format::new(&[specification], media_type, extension))
}

/// Identify an audio container from its leading bytes.
fn detect(bytes: &[u8]) -> Option<Specification> {
    if bytes.starts_with(b"ID3") {
        return Some(Specification::Mp3);
    }
    if let [0xFF, second, ..] = *bytes {
        // ADTS frames have layer bits 00, MPEG audio frames do not.
        if second & 0xF6 == 0xF0 {
            return Some(Specification::Aac);
        }
        if second & 0xE0 == 0xE0 && second & 0x06 != 0 {
            return Some(Specification::Mp3);
        }
    }
    if bytes.starts_with(b"fLaC") {
        return Some(Specification::Flac);
    }
    if bytes.starts_with(b"OggS") {
        return if bytes.get(28..36) == Some(b"OpusHead".as_slice()) {
            Some(Specification::Opus)
        } else {
            Some(Specification::Ogg)
        };
    }
    if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WAVE".as_slice()) {
        return Some(Specification::Wav);
    }
    if bytes.starts_with(b"FORM")
        && bytes
            .get(8..12)
            .is_some_and(|kind| kind == b"AIFF" || kind == b"AIFC")
    {
        return Some(Specification::Aiff);
    }
    if bytes.get(4..8) == Some(b"ftyp".as_slice())
        && bytes
            .get(8..12)
            .is_some_and(|brand| starts_with_any(brand, MP4_BRANDS))
    {
        return Some(Specification::Mp4);
    }
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(Specification::Webm);
    }
    None
}

/// Detects common audio formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioFormatSniffer;

#[async_trait]
impl FormatSniffer for AudioFormatSniffer {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        let by_extension = hints
            .file_extensions()
            .find_map(|ext| EXTENSIONS.get(ext).copied());
        let specification = by_extension.or_else(|| {
            MEDIA_TYPES
                .iter()
                .find(|(media_type, _)| hints.has_media_type(&[*media_type]))
                .map(|(_, specification)| *specification)
        })?;
        audio_format(specification)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let prefix = blob.read_prefix(SIGNATURE_LENGTH).await?;
        Ok(detect(&prefix).and_then(audio_format))
    }
}
