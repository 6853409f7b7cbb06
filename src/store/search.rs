use crate::models::Record;

/// A record as it appears in the table after the search filter ran.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRow<'a> {
    pub record: &'a Record,
    /// Set on every row whenever a non-empty query is active.
    pub highlighted: bool,
}

/// Apply the free-text search box to the collection. An empty or
/// whitespace-only query returns everything unflagged; otherwise only rows
/// whose combined field text contains the lower-cased query are returned,
/// all flagged as highlighted.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<FilteredRow<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records
            .iter()
            .map(|record| FilteredRow {
                record,
                highlighted: false,
            })
            .collect();
    }

    records
        .iter()
        .filter(|record| record.search_text().to_lowercase().contains(&query))
        .map(|record| FilteredRow {
            record,
            highlighted: true,
        })
        .collect()
}
