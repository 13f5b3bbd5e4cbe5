// src/metadata.rs

//! Metadata records as delivered on the pipe, and the song fields pulled out of
//! them.

use log::*;

use crate::config::IngestConfig;

/// Positional indices used when a producer sends none of the configured key
/// names. These follow the order shairport's metadata hook writes its lines in.
pub const ARTIST_POSITION: usize = 0;
pub const TITLE_POSITION: usize = 1;
pub const ALBUM_POSITION: usize = 2;
pub const VOLUME_POSITION: usize = 6;

/// One blank-line-delimited block of `key=value` lines, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    fields: Vec<(String, String)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one line and appends it. The line is split at the first `=`, so
    /// values may contain `=` themselves.
    ///
    /// # Returns
    /// `false` if the line has no `=` and was ignored
    pub fn push_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        match line.split_once('=') {
            Some((key, value)) => {
                self.fields.push((key.trim().to_string(), value.to_string()));
                true
            }
            None => {
                warn!("Ignoring metadata line without '=': {:?}", line);
                false
            }
        }
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value at `index` in arrival order, whatever its key.
    pub fn at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|(_, v)| v.as_str())
    }
}

/// The song fields the display cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    /// Raw attenuation key, e.g. `"-15.000000"`.
    pub volume: Option<String>,
}

impl NowPlaying {
    /// Extracts song fields from `record`.
    ///
    /// A record that carries any of the configured key names is read by name.
    /// Otherwise fields are taken by position.
    ///
    /// # Returns
    /// `None` (after logging a warning) if artist or title is missing
    pub fn from_record(record: &MetadataRecord, keys: &IngestConfig) -> Option<Self> {
        let names = [
            keys.artist_key.as_str(),
            keys.title_key.as_str(),
            keys.album_key.as_str(),
            keys.volume_key.as_str(),
        ];
        let by_name = names.iter().any(|name| record.get(name).is_some());

        let field = |name: &str, position: usize| -> Option<String> {
            let value = if by_name {
                record.get(name)
            } else {
                record.at(position)
            };
            value.map(str::to_string)
        };

        let artist = field(&keys.artist_key, ARTIST_POSITION);
        let title = field(&keys.title_key, TITLE_POSITION);
        let (Some(artist), Some(title)) = (artist, title) else {
            warn!(
                "Skipping record without artist and title ({} fields, {})",
                record.len(),
                if by_name { "named" } else { "positional" }
            );
            return None;
        };

        Some(NowPlaying {
            artist,
            title,
            album: field(&keys.album_key, ALBUM_POSITION),
            volume: field(&keys.volume_key, VOLUME_POSITION),
        })
    }

    /// Two-line text for the tall layout.
    pub fn artist_and_title(&self) -> String {
        format!("{}\n{}", self.artist, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lines: &[&str]) -> MetadataRecord {
        let mut record = MetadataRecord::new();
        for line in lines {
            record.push_line(line);
        }
        record
    }

    #[test]
    fn splits_at_first_equals() {
        let record = record(&["title=a=b", "  artist = Someone \n"]);
        assert_eq!(record.get("title"), Some("a=b"));
        assert_eq!(record.get("artist"), Some(" Someone"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn lines_without_equals_are_ignored() {
        let mut record = MetadataRecord::new();
        assert!(!record.push_line("garbage"));
        assert!(record.push_line("k=v"));
        assert_eq!(record.len(), 1);
        assert_eq!(record.at(0), Some("v"));
    }

    #[test]
    fn named_fields_in_any_order() {
        let record = record(&[
            "volume=-15.000000",
            "title=晴天",
            "album=叶惠美",
            "artist=周杰伦",
        ]);
        let song = NowPlaying::from_record(&record, &IngestConfig::default()).unwrap();
        assert_eq!(song.artist, "周杰伦");
        assert_eq!(song.title, "晴天");
        assert_eq!(song.album.as_deref(), Some("叶惠美"));
        assert_eq!(song.volume.as_deref(), Some("-15.000000"));
        assert_eq!(song.artist_and_title(), "周杰伦\n晴天");
    }

    #[test]
    fn positional_fallback_for_unknown_keys() {
        let record = record(&[
            "a=Artist",
            "b=Title",
            "c=Album",
            "d=genre",
            "e=x",
            "f=y",
            "g=-30.000000",
        ]);
        let song = NowPlaying::from_record(&record, &IngestConfig::default()).unwrap();
        assert_eq!(song.artist, "Artist");
        assert_eq!(song.title, "Title");
        assert_eq!(song.album.as_deref(), Some("Album"));
        assert_eq!(song.volume.as_deref(), Some("-30.000000"));
    }

    #[test]
    fn configured_key_names_are_honored() {
        let keys = IngestConfig {
            artist_key: "Artist".to_string(),
            title_key: "Name".to_string(),
            ..IngestConfig::default()
        };
        let record = record(&["Name=Song", "Artist=Band"]);
        let song = NowPlaying::from_record(&record, &keys).unwrap();
        assert_eq!((song.artist.as_str(), song.title.as_str()), ("Band", "Song"));
        assert_eq!(song.volume, None);
    }

    #[test]
    fn missing_title_skips_record() {
        let named = record(&["artist=Only"]);
        assert!(NowPlaying::from_record(&named, &IngestConfig::default()).is_none());

        let positional = record(&["x=Only"]);
        assert!(NowPlaying::from_record(&positional, &IngestConfig::default()).is_none());
    }
}
