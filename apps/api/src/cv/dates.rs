//! Best-effort date formatting for experience and education ranges.
//!
//! Formatting never fails: a value that does not look like `YYYY-MM` is
//! emitted exactly as stored.

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown in place of an end date for ongoing positions.
pub const PRESENT: &str = "Present";

/// Separator between the two ends of a range (en dash).
pub const RANGE_SEPARATOR: &str = " \u{2013} ";

/// Formats `YYYY-MM` as `Mon YYYY`. Blank input gives an empty string;
/// anything unparseable passes through unchanged.
pub fn format_month_year(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_year_month(trimmed) {
        Some((year, month)) => format!("{} {}", MONTH_NAMES[month - 1], year),
        None => raw.to_string(),
    }
}

/// End of an experience range. `current` wins over any stored end date.
pub fn format_end_date(raw: &str, current: bool) -> String {
    if current {
        PRESENT.to_string()
    } else {
        format_month_year(raw)
    }
}

/// `"<start> – <end>"` for an experience entry.
///
/// When one side is empty only the other is shown, so a missing end date on a
/// finished position never renders as a dangling separator.
pub fn format_date_range(start: &str, end: &str, current: bool) -> String {
    join_range(format_month_year(start), format_end_date(end, current))
}

/// Education ranges are plain years. A program that is ongoing, or that has a
/// start year but no end year, ends in "Present".
pub fn format_year_range(start_year: &str, end_year: &str, current: bool) -> String {
    let start = start_year.trim().to_string();
    let end = end_year.trim();
    let end = if current || (end.is_empty() && !start.is_empty()) {
        PRESENT.to_string()
    } else {
        end.to_string()
    };
    join_range(start, end)
}

fn join_range(start: String, end: String) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start}{RANGE_SEPARATOR}{end}"),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

fn parse_year_month(value: &str) -> Option<(u32, usize)> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: usize = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year.parse().ok()?, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_year_month() {
        assert_eq!(format_month_year("2023-01"), "Jan 2023");
        assert_eq!(format_month_year("1999-12"), "Dec 1999");
        assert_eq!(format_month_year(" 2020-6 "), "Jun 2020");
    }

    #[test]
    fn test_unparseable_dates_pass_through() {
        assert_eq!(format_month_year("not-a-date"), "not-a-date");
        assert_eq!(format_month_year("2023-13"), "2023-13");
        assert_eq!(format_month_year("23-01"), "23-01");
        assert_eq!(format_month_year("2023"), "2023");
    }

    #[test]
    fn test_blank_date_is_empty() {
        assert_eq!(format_month_year(""), "");
        assert_eq!(format_month_year("   "), "");
    }

    #[test]
    fn test_current_overrides_end_date() {
        assert_eq!(format_end_date("2019-01", true), PRESENT);
        assert_eq!(format_end_date("", true), PRESENT);
    }

    #[test]
    fn test_blank_end_date_without_current_stays_blank() {
        assert_eq!(format_end_date("", false), "");
    }

    #[test]
    fn test_date_range_for_current_job() {
        assert_eq!(
            format_date_range("2022-01", "2019-01", true),
            "Jan 2022 \u{2013} Present"
        );
    }

    #[test]
    fn test_date_range_with_missing_sides() {
        assert_eq!(format_date_range("2022-01", "", false), "Jan 2022");
        assert_eq!(format_date_range("", "2021-03", false), "Mar 2021");
        assert_eq!(format_date_range("", "", false), "");
    }

    #[test]
    fn test_year_range() {
        assert_eq!(format_year_range("2015", "2019", false), "2015 \u{2013} 2019");
        assert_eq!(format_year_range("2021", "", true), "2021 \u{2013} Present");
        assert_eq!(format_year_range("2021", "", false), "2021 \u{2013} Present");
        assert_eq!(format_year_range("", "", false), "");
    }
}
