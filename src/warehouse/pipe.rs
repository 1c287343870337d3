use regex::Regex;

use crate::error::Result;
use crate::records::RecordKind;
use crate::storage::layout;

/// Routes files whose key matches `pattern` under `stage_prefix` into the
/// table of `kind`.
#[derive(Debug, Clone)]
pub struct CopyPipe {
    pub name: String,
    pub kind: RecordKind,
    pub stage_prefix: String,
    pattern: Regex,
}

impl CopyPipe {
    pub fn new(name: impl Into<String>, kind: RecordKind, pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            kind,
            stage_prefix: layout::transformed_prefix(kind),
            pattern: Regex::new(pattern)?,
        })
    }

    /// The declaration used for `kind`: any `.csv` directly in its
    /// transformed directory.
    pub fn for_kind(kind: RecordKind) -> Result<Self> {
        let pattern = format!(r"^{}/[^/]+\.csv$", regex::escape(&layout::transformed_prefix(kind)));
        Self::new(format!("{}_pipe", kind.table()), kind, &pattern)
    }

    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    pub fn table(&self) -> &'static str {
        self.kind.table()
    }
}

/// `album_pipe`, `artist_pipe` and `songs_pipe`
pub fn default_pipes() -> Result<Vec<CopyPipe>> {
    [RecordKind::Album, RecordKind::Artist, RecordKind::Song]
        .into_iter()
        .map(CopyPipe::for_kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipe_names() {
        let names: Vec<_> = default_pipes()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["album_pipe", "artist_pipe", "songs_pipe"]);
    }

    #[test]
    fn test_songs_pipe_pattern() {
        let pipe = CopyPipe::for_kind(RecordKind::Song).unwrap();

        assert!(pipe.matches("transformed_data/songs_data/songs_transformed_x.csv"));
        assert!(!pipe.matches("transformed_data/songs_data/songs_transformed_x.json"));
        assert!(!pipe.matches("transformed_data/album_data/album_transformed_x.csv"));
        assert!(!pipe.matches("transformed_data/songs_data/nested/x.csv"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(CopyPipe::new("bad", RecordKind::Album, "(").is_err());
    }
}
