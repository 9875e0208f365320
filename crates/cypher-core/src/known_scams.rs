//! Local database of known scam URLs / phrases, loaded from a CSV file.

use std::path::Path;

use tracing::{info, warn};

#[derive(Clone, Debug, Default)]
pub struct KnownScams {
    entries: Vec<String>,
}

impl KnownScams {
    pub fn new(entries: impl IntoIterator<Item = String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Load from a CSV file whose first row is a header.
    ///
    /// A missing or unreadable file yields an empty database.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let db = Self::from_csv(&contents);
                info!(path = %path.display(), entries = db.len(), "loaded known scams database");
                db
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "known scams database unavailable");
                Self::default()
            }
        }
    }

    /// Parse CSV rows (first row is the header).
    ///
    /// When a `url` column exists only that column is indexed; otherwise every
    /// field of every row is an entry. Malformed rows are skipped.
    pub fn from_csv(contents: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let url_column = reader.headers().ok().and_then(|h| {
            h.iter()
                .position(|name| name.trim_start_matches('\u{feff}').eq_ignore_ascii_case("url"))
        });

        let mut entries = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(row = row + 1, error = %e, "skipping malformed known scams row");
                    continue;
                }
            };
            match url_column {
                Some(col) => entries.extend(record.get(col).map(str::to_string)),
                None => entries.extend(record.iter().map(str::to_string)),
            }
        }
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the text is, or contains, a known scam entry.
    pub fn matches(&self, text: &str) -> bool {
        let clean = text.trim().to_lowercase();
        if clean.is_empty() {
            return false;
        }
        self.entries.iter().any(|e| clean.contains(e.as_str()))
    }
}
