//! Calendar date parsing and extraction.
//!
//! Recognized spellings:
//!
//! | Form | Example | Anchor |
//! |------|---------|--------|
//! | ISO | `2025-06-01` | as written |
//! | Long | `June 1, 2025` | as written |
//! | Abbreviated | `Jun 1, 2025` | as written |
//! | US numeric | `6/1/2025` | as written |
//! | Month-year | `June 2025` | first of the month |

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// A date found in free text, with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    /// Byte offset of the match start within the scanned text.
    pub offset: usize,
    /// The literal text that produced the date.
    pub literal: String,
}

const MONTHS: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(m, _)| *m == lower || m.starts_with(&lower) && lower.len() >= 3)
        .map(|(_, n)| *n)
}

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap())
}

fn long_form_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
        )
        .unwrap()
    })
}

fn month_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{4})\b",
        )
        .unwrap()
    })
}

/// Parse a single date string in any recognized spelling.
///
/// Returns `None` for text that does not denote a calendar date. Month-year
/// spellings anchor to the first of the month.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    if let Some(caps) = long_form_re().captures(trimmed) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = month_year_re().captures(trimmed) {
        let month = month_number(&caps[1])?;
        let year: i32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    None
}

/// Extract every calendar date mentioned in free text.
///
/// Long-form matches shadow month-year matches at the same position, so
/// "June 1, 2025" yields one date, not two.
pub fn extract_dates(text: &str) -> Vec<ExtractedDate> {
    let mut found: Vec<ExtractedDate> = Vec::new();

    for caps in iso_re().captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let (y, m, d) = (
            caps[1].parse::<i32>().ok(),
            caps[2].parse::<u32>().ok(),
            caps[3].parse::<u32>().ok(),
        );
        if let (Some(y), Some(m), Some(d)) = (y, m, d)
            && let Some(date) = NaiveDate::from_ymd_opt(y, m, d)
        {
            found.push(ExtractedDate {
                date,
                offset: whole.start(),
                literal: whole.as_str().to_string(),
            });
        }
    }

    for caps in long_form_re().captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if let Some(month) = month_number(&caps[1])
            && let (Ok(day), Ok(year)) = (caps[2].parse::<u32>(), caps[3].parse::<i32>())
            && let Some(date) = NaiveDate::from_ymd_opt(year, month, day)
        {
            found.push(ExtractedDate {
                date,
                offset: whole.start(),
                literal: whole.as_str().to_string(),
            });
        }
    }

    for caps in month_year_re().captures_iter(text) {
        let whole = caps.get(0).unwrap();
        // Skip month-year hits that sit inside an already-found long form.
        let overlaps = found
            .iter()
            .any(|d| whole.start() >= d.offset && whole.start() < d.offset + d.literal.len());
        if overlaps {
            continue;
        }
        if let Some(month) = month_number(&caps[1])
            && let Ok(year) = caps[2].parse::<i32>()
            && let Some(date) = NaiveDate::from_ymd_opt(year, month, 1)
        {
            found.push(ExtractedDate {
                date,
                offset: whole.start(),
                literal: whole.as_str().to_string(),
            });
        }
    }

    found.sort_by_key(|d| d.offset);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_flexible_date("2025-06-01"), Some(d(2025, 6, 1)));
    }

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse_flexible_date("June 1, 2025"), Some(d(2025, 6, 1)));
        assert_eq!(parse_flexible_date("February 5, 2024"), Some(d(2024, 2, 5)));
    }

    #[test]
    fn test_parse_abbreviated() {
        assert_eq!(parse_flexible_date("Jun 1, 2025"), Some(d(2025, 6, 1)));
    }

    #[test]
    fn test_parse_us_numeric() {
        assert_eq!(parse_flexible_date("6/1/2025"), Some(d(2025, 6, 1)));
    }

    #[test]
    fn test_parse_month_year_anchors_to_first() {
        assert_eq!(parse_flexible_date("February 2025"), Some(d(2025, 2, 1)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_flexible_date("next Tuesday"), None);
        assert_eq!(parse_flexible_date(""), None);
    }

    #[test]
    fn test_parse_invalid_calendar_day() {
        assert_eq!(parse_flexible_date("February 30, 2025"), None);
    }

    #[test]
    fn test_extract_mixed_forms() {
        let text = "Filed 2024-03-15, hearing on June 1, 2025, decided February 2025.";
        let dates: Vec<_> = extract_dates(text).into_iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(2024, 3, 15), d(2025, 6, 1), d(2025, 2, 1)]);
    }

    #[test]
    fn test_extract_long_form_shadows_month_year() {
        let dates = extract_dates("The hearing is on June 1, 2025.");
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].date, d(2025, 6, 1));
    }

    #[test]
    fn test_extract_offsets_point_into_text() {
        let text = "Deadline: 2025-01-02.";
        let dates = extract_dates(text);
        assert_eq!(&text[dates[0].offset..dates[0].offset + 10], "2025-01-02");
    }
}
