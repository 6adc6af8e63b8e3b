/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{AudioFile, TaggedFileExt};
use quaver_core::{TagReadError, TagReader, TrackTags};
use std::path::Path;

/// Tag reader using the lofty library.
///
/// Missing string tags come back as empty strings and missing numeric tags
/// as zero, matching the store's NOT NULL schema. The album artist falls
/// back from `ALBUMARTIST` to `ALBUM ARTIST`, the disc number from
/// `DISCNUMBER` to `DISC NUMBER`: lofty folds the primary spellings onto
/// its item keys, while the spaced spellings surface as unknown keys and
/// are picked up here when the primary is absent.
pub struct LoftyTagReader;

impl LoftyTagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self
    }

    fn extract_from_tag(tag: &lofty::Tag, tags: &mut TrackTags) {
        let mut albumartist_alt: Option<String> = None;
        let mut disc_primary: Option<i64> = None;
        let mut disc_alt: Option<i64> = None;

        for item in tag.items() {
            match item.key() {
                lofty::ItemKey::TrackTitle => {
                    if let Some(text) = item.value().text() {
                        tags.title = text.to_string();
                    }
                }
                lofty::ItemKey::TrackArtist => {
                    if let Some(text) = item.value().text() {
                        tags.artist = text.to_string();
                    }
                }
                lofty::ItemKey::AlbumTitle => {
                    if let Some(text) = item.value().text() {
                        tags.album = text.to_string();
                    }
                }
                lofty::ItemKey::AlbumArtist => {
                    if let Some(text) = item.value().text() {
                        tags.albumartist = text.to_string();
                    }
                }
                lofty::ItemKey::Genre => {
                    if let Some(text) = item.value().text() {
                        tags.genre = text.to_string();
                    }
                }
                lofty::ItemKey::Year => {
                    if let Some(text) = item.value().text() {
                        tags.year = text.parse().unwrap_or(0);
                    }
                }
                lofty::ItemKey::TrackNumber => {
                    if let Some(text) = item.value().text() {
                        tags.track_number = text.parse().unwrap_or(0);
                    }
                }
                lofty::ItemKey::DiscNumber => {
                    if let Some(text) = item.value().text() {
                        // Non-numeric disc tags degrade to 0
                        disc_primary = Some(text.parse().unwrap_or(0));
                    }
                }
                lofty::ItemKey::Unknown(key) if key.eq_ignore_ascii_case("ALBUM ARTIST") => {
                    if let Some(text) = item.value().text() {
                        albumartist_alt = Some(text.to_string());
                    }
                }
                lofty::ItemKey::Unknown(key) if key.eq_ignore_ascii_case("DISC NUMBER") => {
                    if let Some(text) = item.value().text() {
                        disc_alt = Some(text.parse().unwrap_or(0));
                    }
                }
                _ => {}
            }
        }

        if tags.albumartist.is_empty() {
            if let Some(alt) = albumartist_alt {
                tags.albumartist = alt;
            }
        }
        tags.disc_number = disc_primary.or(disc_alt).unwrap_or(0);
    }

    fn read(&self, path: &Path) -> Result<TrackTags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = lofty::read_from_path(path)
            .map_err(|e| MetadataError::CannotReadTags(e.to_string()))?;

        let mut tags = TrackTags::new();

        let properties = tagged_file.properties();
        tags.length = properties.duration().as_secs() as i64;
        tags.bitrate = properties.audio_bitrate().unwrap_or(0) as i64;

        if let Some(primary) = tagged_file.primary_tag() {
            Self::extract_from_tag(primary, &mut tags);
        } else if let Some(first) = tagged_file.tags().first() {
            Self::extract_from_tag(first, &mut tags);
        }

        Ok(tags)
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> std::result::Result<TrackTags, TagReadError> {
        self.read(path).map_err(TagReadError::from)
    }
}
