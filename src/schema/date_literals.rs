//! SOQL date literal recognition
//!
//! Covers the fixed literals (`TODAY`, `LAST_MONTH`, ...), the `:n` forms
//! (`LAST_N_DAYS:30`, `N_WEEKS_AGO:2`) and plain ISO dates and date-times.

const SIMPLE_LITERALS: &[&str] = &[
    "yesterday",
    "today",
    "tomorrow",
    "last_week",
    "this_week",
    "next_week",
    "last_month",
    "this_month",
    "next_month",
    "last_90_days",
    "next_90_days",
    "last_quarter",
    "this_quarter",
    "next_quarter",
    "last_year",
    "this_year",
    "next_year",
    "last_fiscal_quarter",
    "this_fiscal_quarter",
    "next_fiscal_quarter",
    "last_fiscal_year",
    "this_fiscal_year",
    "next_fiscal_year",
];

const N_LITERAL_PREFIXES: &[&str] = &[
    "last_n_days:",
    "next_n_days:",
    "last_n_weeks:",
    "next_n_weeks:",
    "last_n_months:",
    "next_n_months:",
    "last_n_quarters:",
    "next_n_quarters:",
    "last_n_years:",
    "next_n_years:",
    "last_n_fiscal_quarters:",
    "next_n_fiscal_quarters:",
    "last_n_fiscal_years:",
    "next_n_fiscal_years:",
    "n_days_ago:",
    "n_weeks_ago:",
    "n_months_ago:",
    "n_quarters_ago:",
    "n_years_ago:",
    "n_fiscal_quarters_ago:",
    "n_fiscal_years_ago:",
];

/// Check if a string is a SOQL date literal such as `TODAY` or
/// `LAST_N_DAYS:30`
pub fn is_date_literal(s: &str) -> bool {
    let lower = s.trim().to_lowercase();

    if SIMPLE_LITERALS.contains(&lower.as_str()) {
        return true;
    }

    N_LITERAL_PREFIXES.iter().any(|prefix| {
        lower.strip_prefix(prefix).is_some_and(|n| {
            let n = n.trim();
            !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())
        })
    })
}

/// `YYYY-MM-DD`
pub fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0..4, 5..7, 8..10]
            .into_iter()
            .all(|r| b[r].iter().all(u8::is_ascii_digit))
}

/// `YYYY-MM-DDThh:mm:ss` with optional fraction, then `Z` or `±hh:mm`
pub fn is_iso_datetime(s: &str) -> bool {
    let Some((date, time)) = s.split_once(['T', 't']) else {
        return false;
    };
    if !is_iso_date(date) || time.len() < 8 || !time.is_char_boundary(8) {
        return false;
    }
    let (clock, rest) = time.split_at(8);
    let cb = clock.as_bytes();
    let clock_ok = cb[2] == b':'
        && cb[5] == b':'
        && [0..2, 3..5, 6..8]
            .into_iter()
            .all(|r| cb[r].iter().all(u8::is_ascii_digit));
    if !clock_ok {
        return false;
    }

    let rest = match rest.strip_prefix('.') {
        Some(fraction) => {
            let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return false;
            }
            &fraction[digits..]
        }
        None => rest,
    };

    match rest {
        "Z" | "z" => true,
        _ => {
            let rb = rest.as_bytes();
            rb.len() == 6
                && (rb[0] == b'+' || rb[0] == b'-')
                && rb[3] == b':'
                && rb[1..3].iter().all(u8::is_ascii_digit)
                && rb[4..6].iter().all(u8::is_ascii_digit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_literal() {
        assert!(is_date_literal("TODAY"));
        assert!(is_date_literal("today"));
        assert!(is_date_literal("LAST_N_DAYS:30"));
        assert!(is_date_literal("last_n_days:30"));
        assert!(is_date_literal("NEXT_N_MONTHS:6"));
        assert!(is_date_literal("THIS_QUARTER"));
        assert!(is_date_literal("LAST_90_DAYS"));
        assert!(is_date_literal("N_WEEKS_AGO:2"));
        assert!(!is_date_literal("LAST_N_DAYS:"));
        assert!(!is_date_literal("LAST_N_DAYS:x"));
        assert!(!is_date_literal("2024-01-01"));
        assert!(!is_date_literal("some_field"));
    }

    #[test]
    fn test_iso_date() {
        assert!(is_iso_date("2024-01-31"));
        assert!(!is_iso_date("2024-1-31"));
        assert!(!is_iso_date("'2024-01-31'"));
    }

    #[test]
    fn test_iso_datetime() {
        assert!(is_iso_datetime("2024-01-31T10:00:00Z"));
        assert!(is_iso_datetime("2024-01-31T10:00:00.000Z"));
        assert!(is_iso_datetime("2024-01-31T10:00:00+05:30"));
        assert!(is_iso_datetime("2024-01-31T10:00:00-08:00"));
        assert!(!is_iso_datetime("2024-01-31T10:00:00"));
        assert!(!is_iso_datetime("2024-01-31"));
        assert!(!is_iso_datetime("2024-01-31T10:00Z"));
    }
}
