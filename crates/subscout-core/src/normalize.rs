//! Transaction normalizer
//!
//! Turns loosely-typed [`RawRow`]s into [`Transaction`]s. Rows that fail to
//! parse are collected as [`SkippedRow`]s; one bad row never aborts the batch.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RawAmount, RawRow, SkipReason, SkippedRow, Transaction};

/// Built-in date formats, tried in order
///
/// `%y` comes before `%Y` so that "01/15/24" is read as 2024, not year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",          // 2024-01-15
    "%Y-%m-%dT%H:%M:%S", // 2024-01-15T08:30:00
    "%Y-%m-%d %H:%M:%S", // 2024-01-15 08:30:00
    "%m/%d/%y",          // 01/15/24
    "%m/%d/%Y",          // 01/15/2024
];

/// Output of normalizing a batch
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    /// Accepted transactions, in input order
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

/// Normalize every row, collecting failures instead of stopping
pub fn normalize_rows(rows: &[RawRow], extra_date_formats: &[String]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, raw) in rows.iter().enumerate() {
        match normalize_row(index, raw, extra_date_formats) {
            Ok(tx) => batch.transactions.push(tx),
            Err(e) => {
                let reason = match e {
                    Error::Validation(msg) => SkipReason::Validation(msg),
                    Error::Parse(msg) => SkipReason::Parse(msg),
                    other => SkipReason::Parse(other.to_string()),
                };
                debug!("Skipping row {}: {}", index, reason);
                batch.skipped.push(SkippedRow {
                    row: index,
                    raw: raw.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        "Normalized {} rows ({} skipped)",
        batch.transactions.len(),
        batch.skipped.len()
    );
    batch
}

/// Normalize a single row
pub fn normalize_row(
    index: usize,
    raw: &RawRow,
    extra_date_formats: &[String],
) -> Result<Transaction> {
    let date = parse_date(&raw.date, extra_date_formats)?;
    let amount = parse_amount(&raw.amount)?;

    let merchant_key = raw.description.trim();
    if merchant_key.is_empty() {
        return Err(Error::Validation("Empty merchant description".into()));
    }

    Ok(Transaction {
        row: index,
        date,
        merchant_key: merchant_key.to_string(),
        amount,
        category: raw.category.trim().to_string(),
    })
}

/// Parse a date string using the built-in formats, then any extra ones
pub fn parse_date(s: &str, extra_formats: &[String]) -> Result<NaiveDate> {
    let s = s.trim();

    let extra = extra_formats.iter().map(String::as_str);
    for fmt in DATE_FORMATS.iter().copied().chain(extra) {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Parse(format!("Unable to parse date: {}", s)))
}

/// Parse an amount, handling a currency prefix, thousands separators and
/// parenthesized negatives
///
/// Accepted text shapes: `15.99`, `-15.99`, `+15.99`, `$1,234.56`, `-$5`,
/// `$-5`, `(100.00)`. Anything else is a parse error; nothing is stripped
/// from the middle of a value.
pub fn parse_amount(amount: &RawAmount) -> Result<f64> {
    let value = match amount {
        RawAmount::Number(n) => *n,
        RawAmount::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(Error::Parse("Missing amount".into()));
            }

            parse_amount_text(trimmed)
                .ok_or_else(|| Error::Parse(format!("Unable to parse amount: {}", s)))?
        }
    };

    if !value.is_finite() {
        return Err(Error::Parse(format!("Unable to parse amount: {}", amount)));
    }

    Ok(value)
}

fn parse_amount_text(s: &str) -> Option<f64> {
    // One balanced pair around the whole value
    let (parenthesized, body) = match s.strip_prefix('(') {
        Some(inner) => (true, inner.strip_suffix(')')?),
        None => (false, s),
    };

    let (mut sign, body) = split_sign(body);
    let body = body.strip_prefix('$').unwrap_or(body);
    let body = if sign.is_none() {
        let (after_dollar, rest) = split_sign(body);
        sign = after_dollar;
        rest
    } else {
        body
    };

    if parenthesized && sign.is_some() {
        return None;
    }

    let magnitude = parse_unsigned_decimal(body)?;
    let negative = parenthesized || sign == Some('-');
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(s: &str) -> (Option<char>, &str) {
    match s.chars().next() {
        Some(c @ ('-' | '+')) => (Some(c), &s[1..]),
        _ => (None, s),
    }
}

/// `\d+` or `\d{1,3}(,\d{3})*`, optionally followed by `.\d+`
fn parse_unsigned_decimal(s: &str) -> Option<f64> {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (s, None),
    };

    if let Some(frac) = frac_part {
        if frac.is_empty() || !all_digits(frac) {
            return None;
        }
    }

    let digits = if int_part.contains(',') {
        let mut groups = int_part.split(',');
        let lead = groups.next()?;
        if lead.is_empty() || lead.len() > 3 || !all_digits(lead) {
            return None;
        }
        if !groups.all(|g| g.len() == 3 && all_digits(g)) {
            return None;
        }
        int_part.replace(',', "")
    } else {
        if !all_digits(int_part) {
            return None;
        }
        int_part.to_string()
    };

    if digits.is_empty() && frac_part.is_none() {
        return None;
    }

    let text = match frac_part {
        Some(frac) => format!("{}.{}", digits, frac),
        None => digits,
    };
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15", &[]).unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date(" 2024-01-15 ", &[]).unwrap(), ymd(2024, 1, 15));
        assert_eq!(
            parse_date("2024-01-15T08:30:00", &[]).unwrap(),
            ymd(2024, 1, 15)
        );
        assert_eq!(parse_date("01/15/2024", &[]).unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date("01/15/24", &[]).unwrap(), ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("next tuesday", &[]), Err(Error::Parse(_))));
        assert!(matches!(parse_date("2024-02-30", &[]), Err(Error::Parse(_))));
        assert!(matches!(parse_date("", &[]), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_date_extra_formats() {
        assert!(parse_date("15.01.2024", &[]).is_err());
        let extra = vec!["%d.%m.%Y".to_string()];
        assert_eq!(parse_date("15.01.2024", &extra).unwrap(), ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&RawAmount::Number(15.99)).unwrap(), 15.99);
        assert_eq!(parse_amount(&"15.99".into()).unwrap(), 15.99);
        assert_eq!(parse_amount(&"$1,234.56".into()).unwrap(), 1234.56);
        assert_eq!(parse_amount(&"-123.45".into()).unwrap(), -123.45);
        assert_eq!(parse_amount(&"(100.00)".into()).unwrap(), -100.00);
        assert_eq!(parse_amount(&"0".into()).unwrap(), 0.0);
        assert_eq!(parse_amount(&" 15.99 ".into()).unwrap(), 15.99);
        assert_eq!(parse_amount(&"+15.99".into()).unwrap(), 15.99);
        assert_eq!(parse_amount(&"-$5".into()).unwrap(), -5.0);
        assert_eq!(parse_amount(&"$-5".into()).unwrap(), -5.0);
        assert_eq!(parse_amount(&"($1,200.50)".into()).unwrap(), -1200.50);
        assert_eq!(parse_amount(&"1234567.8".into()).unwrap(), 1234567.8);
        assert_eq!(parse_amount(&"12,345,678".into()).unwrap(), 12345678.0);
        assert_eq!(parse_amount(&".5".into()).unwrap(), 0.5);
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        assert!(matches!(parse_amount(&"abc".into()), Err(Error::Parse(_))));
        assert!(matches!(parse_amount(&"".into()), Err(Error::Parse(_))));
        assert!(matches!(parse_amount(&"   ".into()), Err(Error::Parse(_))));
        assert!(matches!(parse_amount(&"NaN".into()), Err(Error::Parse(_))));
        assert!(matches!(parse_amount(&"inf".into()), Err(Error::Parse(_))));

        // Malformed text is rejected rather than cleaned into a number
        for bad in [
            "12 34", "(5", "5)", "1,2,3", "1,23", "12,3456", ",123", "1,234,", "1.2,3",
            "5$", "$$5", "--5", "-+5", "(-5)", "( 5 )", "$", "-", "5.", "1.2.3", "1e5",
            "USD 5",
        ] {
            assert!(
                matches!(parse_amount(&bad.into()), Err(Error::Parse(_))),
                "{:?} should not parse",
                bad
            );
        }
        assert!(matches!(
            parse_amount(&RawAmount::Number(f64::NAN)),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_normalize_row_trims_fields() {
        let raw = RawRow::new("2024-09-01", "  Netflix ", "15.99", " Ent ");
        let tx = normalize_row(4, &raw, &[]).unwrap();

        assert_eq!(tx.row, 4);
        assert_eq!(tx.merchant_key, "Netflix");
        assert_eq!(tx.category, "Ent");
        assert_eq!(tx.amount, 15.99);
        assert_eq!(tx.date, ymd(2024, 9, 1));
    }

    #[test]
    fn test_normalize_row_keeps_case_and_inner_spacing() {
        let raw = RawRow::new("2024-09-01", "NETFLIX.COM  US", 15.99, "");
        let tx = normalize_row(0, &raw, &[]).unwrap();
        assert_eq!(tx.merchant_key, "NETFLIX.COM  US");
    }

    #[test]
    fn test_normalize_row_blank_description_is_validation_error() {
        let raw = RawRow::new("2024-09-01", "   ", 15.99, "Ent");
        assert!(matches!(
            normalize_row(0, &raw, &[]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_normalize_rows_collects_skips() {
        let rows = vec![
            RawRow::new("2024-09-01", "Netflix", 15.99, "Ent"),
            RawRow::new("not a date", "Netflix", 15.99, "Ent"),
            RawRow::new("2024-10-01", "Netflix", "fifteen", "Ent"),
            RawRow::new("2024-10-01", "", 15.99, "Ent"),
            RawRow::new("2024-10-01", "Spotify", "9.99", "Music"),
        ];

        let batch = normalize_rows(&rows, &[]);

        assert_eq!(batch.transactions.len(), 2);
        assert_eq!(batch.transactions[0].row, 0);
        assert_eq!(batch.transactions[1].row, 4);

        assert_eq!(batch.skipped.len(), 3);
        assert_eq!(batch.skipped[0].row, 1);
        assert!(matches!(batch.skipped[0].reason, SkipReason::Parse(_)));
        assert_eq!(batch.skipped[1].row, 2);
        assert!(matches!(batch.skipped[1].reason, SkipReason::Parse(_)));
        assert_eq!(batch.skipped[2].row, 3);
        assert!(matches!(batch.skipped[2].reason, SkipReason::Validation(_)));
        assert_eq!(batch.skipped[2].raw, rows[3]);
    }
}
