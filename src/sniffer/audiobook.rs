//! Informal audiobook packages (ZAB): ZIP archives of audio files.

use async_trait::async_trait;
use phf::phf_set;

use super::{FormatSniffer, hints_match};
use crate::common::Result;
use crate::container::{Container, matches_extension_profile};
use crate::format::{Format, FormatHints, Specification, media_types};

static AUDIO_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "aac", "aiff", "alac", "flac", "m4a", "m4b", "mp3", "ogg", "oga", "mogg", "opus", "wav", "webm"
};

static PLAYLIST_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "asx", "bio", "m3u", "m3u8", "pla", "pls", "smil", "vlc", "wpl", "xspf", "zpl"
};

const PACKAGE_SPECIFICATIONS: [Specification; 5] = [
    Specification::Epub,
    Specification::Rpf,
    Specification::Lpf,
    Specification::InformalAudiobook,
    Specification::InformalComic,
];

/// Detects ZIP archives holding only audio files and playlists, with at
/// least one audio file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudiobookFormatSniffer;

#[async_trait]
impl FormatSniffer for AudiobookFormatSniffer {
    fn name(&self) -> &'static str {
        "audiobook"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(hints, &["zab"], &[media_types::ZAB]).then(|| {
            Format::new(
                &[Specification::Zip, Specification::InformalAudiobook],
                media_types::ZAB,
                "zab",
            )
        })
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        if !format.conforms_to(Specification::Zip) || format.conforms_to_any(&PACKAGE_SPECIFICATIONS) {
            return Ok(None);
        }
        let matches = matches_extension_profile(
            container,
            |ext| AUDIO_EXTENSIONS.contains(ext),
            |ext| PLAYLIST_EXTENSIONS.contains(ext),
        );
        Ok(matches.then(|| {
            format.refined(&[Specification::InformalAudiobook], media_types::ZAB, "zab")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryContainer;

    fn zip() -> Format {
        Format::new(&[Specification::Zip], media_types::ZIP, "zip")
    }

    #[tokio::test]
    async fn test_audio_archive() {
        let container = MemoryContainer::new("book.zab")
            .with_entry("01 - Intro.mp3", "")
            .with_entry("02 - Chapter.MP3", "")
            .with_entry("playlist.m3u", "")
            .with_entry("__MACOSX/._01 - Intro.mp3", "");
        let format = AudiobookFormatSniffer
            .sniff_container(&container, &zip())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(format.media_type(), media_types::ZAB);
        assert!(format.conforms_to(Specification::InformalAudiobook));
    }

    #[tokio::test]
    async fn test_foreign_entry() {
        let container = MemoryContainer::new("x.zip")
            .with_entry("01.mp3", "")
            .with_entry("cover.jpg", "");
        assert!(AudiobookFormatSniffer.sniff_container(&container, &zip()).await.unwrap().is_none());

        let playlists_only = MemoryContainer::new("y.zip").with_entry("list.m3u", "");
        assert!(
            AudiobookFormatSniffer
                .sniff_container(&playlists_only, &zip())
                .await
                .unwrap()
                .is_none()
        );
    }
}
