/// Library entities: registered directories and indexed audio files
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Audio container type, classified by file extension.
///
/// The integer values are the persisted encoding and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Mp3 = 1,
    Flac = 2,
    Ogg = 3,
    Unknown = 4,
}

impl FileType {
    /// Classify a path by its lowercased extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("mp3") => FileType::Mp3,
            Some("flac") => FileType::Flac,
            Some("ogg") => FileType::Ogg,
            _ => FileType::Unknown,
        }
    }

    /// Persisted integer encoding.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Decode the persisted integer encoding. Unrecognized values map to
    /// `Unknown` rather than failing the whole row.
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => FileType::Mp3,
            2 => FileType::Flac,
            3 => FileType::Ogg,
            _ => FileType::Unknown,
        }
    }
}

/// A user-registered root directory under which audio files are discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub id: i64,
    pub path: PathBuf,
}

/// An indexed audio file with its extracted metadata.
///
/// A file is uniquely identified by `(dir_id, fulldir_path, filename)`.
/// `fulldir_path` is the absolute directory containing the file; it is
/// redundant with the root path plus relative subpath but stored explicitly
/// to keep path lookups a single indexed query.
///
/// Missing tag values are stored as empty strings, never NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub dir_id: i64,
    pub filename: PathBuf,
    pub fulldir_path: PathBuf,
    /// Epoch seconds of the first sighting during a scan
    pub created_time: i64,
    /// Epoch seconds of the filesystem mtime at last index
    pub modified_time: i64,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub albumartist: String,
    pub track_number: i64,
    pub disc_number: i64,
    pub year: i64,
    pub genre: String,
    /// Duration in whole seconds
    pub length: i64,
    /// Bitrate in kbps
    pub bitrate: i64,
    /// Size in bytes
    pub filesize: i64,
    pub filetype: FileType,
}

impl File {
    /// Absolute path of the file on disk.
    pub fn fullpath(&self) -> PathBuf {
        self.fulldir_path.join(&self.filename)
    }
}

/// The minimal projection of a `File` sufficient to detect
/// filesystem-vs-store divergence during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMainProps {
    pub id: i64,
    pub dir_id: i64,
    pub filename: PathBuf,
    pub fulldir_path: PathBuf,
    pub created_time: i64,
    pub modified_time: i64,
    pub filesize: i64,
    pub filetype: FileType,
}

impl FileMainProps {
    pub fn fullpath(&self) -> PathBuf {
        self.fulldir_path.join(&self.filename)
    }
}

/// A file discovered on disk whose tags have not been parsed yet.
/// Transient scan state, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadFile {
    pub fullpath: PathBuf,
    pub fulldir_path: PathBuf,
    pub filename: PathBuf,
    pub dir_id: i64,
    pub created_time: i64,
    pub modified_time: i64,
    pub filesize: i64,
    pub filetype: FileType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_extensions() {
        assert_eq!(FileType::from_path(Path::new("/m/a.mp3")), FileType::Mp3);
        assert_eq!(FileType::from_path(Path::new("/m/a.flac")), FileType::Flac);
        assert_eq!(FileType::from_path(Path::new("/m/a.ogg")), FileType::Ogg);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(FileType::from_path(Path::new("/m/A.MP3")), FileType::Mp3);
        assert_eq!(FileType::from_path(Path::new("/m/A.FlAc")), FileType::Flac);
    }

    #[test]
    fn unknown_extensions() {
        assert_eq!(FileType::from_path(Path::new("/m/a.wav")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("/m/a.txt")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("/m/noext")), FileType::Unknown);
    }

    #[test]
    fn integer_encoding_roundtrip() {
        for ft in [FileType::Mp3, FileType::Flac, FileType::Ogg, FileType::Unknown] {
            assert_eq!(FileType::from_i64(ft.as_i64()), ft);
        }
        assert_eq!(FileType::Mp3.as_i64(), 1);
        assert_eq!(FileType::Unknown.as_i64(), 4);
        assert_eq!(FileType::from_i64(99), FileType::Unknown);
    }

    #[test]
    fn fullpath_joins_dir_and_name() {
        let f = FileMainProps {
            id: 1,
            dir_id: 1,
            filename: PathBuf::from("b.mp3"),
            fulldir_path: PathBuf::from("/music/a"),
            created_time: 0,
            modified_time: 0,
            filesize: 0,
            filetype: FileType::Mp3,
        };
        assert_eq!(f.fullpath(), PathBuf::from("/music/a/b.mp3"));
    }
}
