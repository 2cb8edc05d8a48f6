use chrono::NaiveDate;

/// Parses the free-text `created_at` field of a record.
///
/// Returning `None` means "unknown date": the record still clusters normally,
/// it just never wins the earliest-date selection and sorts last.
pub trait DateParser: Send + Sync {
    fn parse(&self, raw: &str) -> Option<NaiveDate>;
}

/// Month stems keyed by their first three letters.
const MONTH_STEMS: &[(&str, u32)] = &[
    ("янв", 1),
    ("фев", 2),
    ("мар", 3),
    ("апр", 4),
    ("май", 5),
    ("мая", 5),
    ("июн", 6),
    ("июл", 7),
    ("авг", 8),
    ("сен", 9),
    ("окт", 10),
    ("ноя", 11),
    ("дек", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Default parser for tracker exports.
///
/// Understands `"3 дек. 2025 15:24"` style dates (abbreviated Russian or
/// English month, optional time), ISO `2025-12-03` and `03.12.2025`.
/// Time of day is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleDateParser;

impl DateParser for LocaleDateParser {
    fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let mut parts = raw.split_whitespace();
        let first = parts.next()?;

        if let Ok(date) = NaiveDate::parse_from_str(first, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(first, "%d.%m.%Y") {
            return Some(date);
        }

        let day: u32 = first.parse().ok()?;
        let month = month_from_name(parts.next()?)?;
        let year: i32 = parts.next()?.trim_end_matches(',').parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn month_from_name(token: &str) -> Option<u32> {
    let stem: String = token
        .trim_end_matches(['.', ','])
        .to_lowercase()
        .chars()
        .take(3)
        .collect();
    MONTH_STEMS
        .iter()
        .find(|(prefix, _)| *prefix == stem)
        .map(|(_, month)| *month)
}
