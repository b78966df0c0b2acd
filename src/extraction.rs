use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

static DOCUMENT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:OC|FAC)-\d{6}-\d{3}\b").expect("document number pattern"));

static TOTAL_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)total[^0-9$]*\$?\s*([0-9][0-9.,]*)").expect("total pattern"));

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("iso date pattern"));

static LATIN_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").expect("latin date pattern"));

/// Best-effort guesses scraped from a scanned document's text. Every field
/// may be absent; none of them is trusted without user confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub document_number: Option<String>,
    pub total_amount: Option<Decimal>,
    pub issue_date: Option<NaiveDate>,
}

/// Narrow seam for the field-guessing collaborator: heuristic by nature,
/// swappable for a real OCR backend.
pub trait DocumentExtractor {
    fn extract(&self, text: &str) -> ExtractedFields;
}

/// Regex-based extractor over already-OCRed text.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl DocumentExtractor for RegexExtractor {
    fn extract(&self, text: &str) -> ExtractedFields {
        ExtractedFields {
            document_number: DOCUMENT_NUMBER_RE
                .find(text)
                .map(|m| m.as_str().to_string()),
            total_amount: TOTAL_AMOUNT_RE
                .captures(text)
                .and_then(|c| parse_amount(&c[1])),
            issue_date: find_date(text),
        }
    }
}

/// Parses an amount with either Latin (`1.234.567,89`) or Anglo
/// (`1,234,567.89`) separators, or no grouping at all.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim_matches(|c: char| c == '.' || c == ',');
    let dot = raw.rfind('.');
    let comma = raw.rfind(',');

    let normalized = match (dot, comma) {
        (Some(d), Some(c)) if d > c => raw.replace(',', ""),
        (Some(_), Some(_)) => raw.replace('.', "").replace(',', "."),
        (None, Some(c)) if reads_as_decimal(raw, ',', c) => raw.replace(',', "."),
        (None, Some(_)) => raw.replace(',', ""),
        (Some(d), None) if reads_as_decimal(raw, '.', d) => raw.to_string(),
        (Some(_), None) => raw.replace('.', ""),
        (None, None) => raw.to_string(),
    };

    Decimal::from_str(&normalized).ok()
}

/// A lone separator followed by one or two digits reads as a decimal mark;
/// three digits read as grouping.
fn reads_as_decimal(raw: &str, separator: char, position: usize) -> bool {
    let digits_after = raw.len() - position - 1;
    raw.matches(separator).count() == 1 && (1..=2).contains(&digits_after)
}

fn find_date(text: &str) -> Option<NaiveDate> {
    if let Some(c) = ISO_DATE_RE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            c[1].parse().ok()?,
            c[2].parse().ok()?,
            c[3].parse().ok()?,
        );
        if date.is_some() {
            return date;
        }
    }

    // dd/mm/yyyy, the convention on local paper documents
    let c = LATIN_DATE_RE.captures(text)?;
    NaiveDate::from_ymd_opt(c[3].parse().ok()?, c[2].parse().ok()?, c[1].parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
        FACTURA ELECTRONICA\n\
        Numero: FAC-202505-001\n\
        Fecha de emision: 2025-05-10\n\
        TOTAL: $ 1.190.000\n";

    #[test]
    fn extracts_all_fields_from_an_invoice() {
        let fields = RegexExtractor.extract(SAMPLE);
        assert_eq!(fields.document_number.as_deref(), Some("FAC-202505-001"));
        assert_eq!(fields.total_amount, Some(dec!(1190000)));
        assert_eq!(
            fields.issue_date,
            NaiveDate::from_ymd_opt(2025, 5, 10)
        );
    }

    #[test]
    fn finds_order_numbers_too() {
        let fields = RegexExtractor.extract("Orden de compra OC-202504-017 del 15/04/2025");
        assert_eq!(fields.document_number.as_deref(), Some("OC-202504-017"));
        assert_eq!(
            fields.issue_date,
            NaiveDate::from_ymd_opt(2025, 4, 15)
        );
    }

    #[test]
    fn empty_text_yields_no_guesses() {
        assert_eq!(RegexExtractor.extract(""), ExtractedFields::default());
    }

    #[test]
    fn amount_separators_are_normalized() {
        assert_eq!(parse_amount("1.234.567,89"), Some(dec!(1234567.89)));
        assert_eq!(parse_amount("1,234,567.89"), Some(dec!(1234567.89)));
        assert_eq!(parse_amount("123456.78"), Some(dec!(123456.78)));
        assert_eq!(parse_amount("1.500"), Some(dec!(1500)));
        assert_eq!(parse_amount("99,5"), Some(dec!(99.5)));
    }
}
