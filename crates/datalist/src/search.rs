//! Free-text search scoring and ranking.
//!
//! Each record is scored against the search text on every searchable text
//! column; the record's score is the best column score. Records scoring
//! above [`RETENTION_THRESHOLD`] are kept, best first.
//!
//! Per-column scores, first matching rule wins:
//!
//! | Rule | Score |
//! |------|-------|
//! | value absent | `0` |
//! | exact match | `len(value)` |
//! | case-insensitive match | `len(value) - 0.1` |
//! | value starts with search | `len(search) - 0.2` |
//! | case-insensitive prefix | `len(search) - 0.3` |
//! | otherwise | [`similarity`] |
//!
//! Lengths count characters, not bytes.

use crate::catalog::Catalog;
use crate::record::Record;

/// A record must score strictly above this to be retained.
pub const RETENTION_THRESHOLD: f64 = 0.5;

/// A record paired with its search score.
///
/// Records that did not go through text search carry a score of `0`.
#[derive(Debug)]
pub struct ScoredRecord<'a, T> {
    pub record: &'a T,
    pub score: f64,
}

impl<'a, T> ScoredRecord<'a, T> {
    pub fn new(record: &'a T, score: f64) -> Self {
        ScoredRecord { record, score }
    }

    pub fn unscored(record: &'a T) -> Self {
        ScoredRecord::new(record, 0.0)
    }
}

impl<T> Clone for ScoredRecord<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScoredRecord<'_, T> {}

/// Character-overlap similarity between the search text and a value.
///
/// Counts the characters of `search` (with repetition) that occur anywhere
/// in `value`, doubled and divided by the combined length. This is an
/// order-insensitive approximation of Ratcliff/Obershelp similarity and
/// can exceed `1` when `search` repeats characters found in `value`.
pub fn similarity(search: &str, value: &str) -> f64 {
    let shared = search.chars().filter(|&ch| value.contains(ch)).count();
    let total = search.chars().count() + value.chars().count();
    if total == 0 {
        return 0.0;
    }
    (2 * shared) as f64 / total as f64
}

/// Scores one field value against the search text.
pub fn score_field(search: &str, value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    let search_len = search.chars().count() as f64;
    let value_len = value.chars().count() as f64;
    let lower_search = search.to_lowercase();
    let lower_value = value.to_lowercase();

    if value == search {
        value_len
    } else if lower_value == lower_search {
        value_len - 0.1
    } else if value.starts_with(search) {
        search_len - 0.2
    } else if lower_value.starts_with(&lower_search) {
        search_len - 0.3
    } else {
        similarity(search, value)
    }
}

/// Text search over the searchable text columns of a catalog.
#[derive(Debug, Clone)]
pub struct TextSearch<'s> {
    query: &'s str,
    fields: Vec<&'static str>,
}

impl<'s> TextSearch<'s> {
    /// Prepares a search, or returns `None` when it would be a no-op.
    ///
    /// The search is a no-op when the text is empty or absent, or when no
    /// catalog column is filterable, visible and of text type.
    pub fn new<T: Record>(catalog: &Catalog, query: Option<&'s str>) -> Option<Self> {
        let query = query.filter(|q| !q.is_empty())?;
        let fields: Vec<&'static str> = catalog
            .searchable()
            .filter_map(|column| T::field_def(&column.key))
            .filter(|def| def.kind.is_textual())
            .map(|def| def.name)
            .collect();

        if fields.is_empty() {
            return None;
        }
        Some(TextSearch { query, fields })
    }

    /// Search text.
    pub fn query(&self) -> &str {
        self.query
    }

    /// Fields the search looks at.
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Best column score for a record.
    pub fn score<T: Record>(&self, record: &T) -> f64 {
        self.fields
            .iter()
            .map(|field| score_field(self.query, record.field_value(field).as_str()))
            .fold(0.0, f64::max)
    }

    /// Keeps the records scoring above the threshold, best first.
    ///
    /// Records with equal scores keep their input order.
    pub fn rank<'a, T, I>(&self, records: I) -> Vec<ScoredRecord<'a, T>>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut ranked: Vec<ScoredRecord<'a, T>> = records
            .into_iter()
            .map(|record| ScoredRecord::new(record, self.score(record)))
            .filter(|scored| scored.score > RETENTION_THRESHOLD)
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
