//! Free-text filtering over resolved records
//!
//! A pure predicate over an already-resolved sequence: no state, no I/O.

use crate::record::NotificationRecord;

/// Filter records by a whitespace-separated query.
///
/// A record matches iff every term is a case-insensitive substring of at
/// least one of app, title, text, or the textual rendering of the
/// timestamp. An empty query returns the input unchanged, preserving order.
pub fn filter(records: &[NotificationRecord], query: &str) -> Vec<NotificationRecord> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            let haystacks = [
                record.app.to_lowercase(),
                record.title.to_lowercase(),
                record.text.to_lowercase(),
                record.datetime.to_string().to_lowercase(),
            ];
            terms
                .iter()
                .all(|term| haystacks.iter().any(|h| h.contains(term.as_str())))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Timestamp;
    use chrono::{TimeZone, Utc};

    fn record(app: &str, title: &str, text: &str) -> NotificationRecord {
        NotificationRecord {
            id: String::new(),
            app: app.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            datetime: Timestamp::Valid(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_empty_query_is_identity() {
        let records = vec![record("Mail", "a", "b"), record("Chat", "c", "d")];
        assert_eq!(filter(&records, ""), records);
        assert_eq!(filter(&records, "   "), records);
    }

    #[test]
    fn test_every_term_must_match() {
        let records = vec![
            record("Banking", "Alice sent money", "Budget update"),
            record("Banking", "Bob sent money", "Budget update"),
            record("Chat", "Alice", "hello"),
        ];

        let matched = filter(&records, "Alice Budget");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Alice sent money");
    }

    #[test]
    fn test_terms_may_match_different_fields() {
        let records = vec![record("Mail", "Invoice", "due tomorrow")];
        assert_eq!(filter(&records, "mail tomorrow").len(), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let records = vec![record("Mail", "Hello World", "")];
        assert_eq!(filter(&records, "HELLO").len(), 1);
        assert_eq!(filter(&records, "wOrLd").len(), 1);
    }

    #[test]
    fn test_matches_datetime_rendering() {
        let records = vec![record("Mail", "a", "b")];
        assert_eq!(filter(&records, "2024-01-01").len(), 1);
        assert_eq!(filter(&records, "2025").len(), 0);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            record("Mail", "one", ""),
            record("Mail", "two", ""),
            record("Mail", "three", ""),
        ];
        let matched = filter(&records, "mail");
        let titles: Vec<&str> = matched.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }
}
