use chrono::{Datelike, Local, NaiveDate};
use daachorse::DoubleArrayAhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{NotaError, Result};
use crate::lexicon::{EXPENSE_KEYWORDS, INCOME_KEYWORDS, MONTHS, WEEKDAYS};

/// Direction of the money in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Transaction attributes found in a note, and the note without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMeta {
    pub clean_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

/// Pattern matching any prefix of a month name of at least three letters.
///
/// `maret` gives `mar(?:e(?:t)?)?`, which matches `mar`, `mare` and `maret` but leaves
/// `martabak` alone.
fn month_pattern(month: &str) -> String {
    let (head, tail) = month.split_at(3.min(month.len()));
    let mut pattern = String::new();
    for c in tail.chars().rev() {
        pattern = format!("(?:{c}{pattern})?");
    }
    format!("{head}{pattern}")
}

struct KeywordSet {
    pma: DoubleArrayAhoCorasick,
    words: Regex,
}

impl KeywordSet {
    fn new(keywords: &[&str]) -> Result<Self> {
        if keywords.is_empty() || keywords.iter().any(|k| k.is_empty()) {
            return Err(NotaError::invalid_argument(
                "keywords",
                "must be non-empty words",
            ));
        }
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let pma = DoubleArrayAhoCorasick::new(&keywords)
            .map_err(|e| NotaError::invalid_argument("keywords", e.to_string()))?;
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let words = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .map_err(|e| NotaError::invalid_argument("keywords", e.to_string()))?;
        Ok(Self { pma, words })
    }

    /// Whether any keyword occurs in the text, even inside a longer word.
    fn occurs_in(&self, lower_text: &str) -> bool {
        self.pma.find_iter(lower_text).next().is_some()
    }

    /// Removes whole-word occurrences of every keyword.
    fn remove_from(&self, text: &str) -> String {
        self.words.replace_all(text, "").into_owned()
    }
}

/// Pre-pass separating the transaction type and date from the note.
///
/// Income keywords are looked up first. A keyword is detected even inside a longer word
/// (`terjual` contains `jual`), but only whole words are removed from the text.
///
/// Dates are written as a day, the first three or more letters of a month name, and an
/// optional year, e.g. `18 nov`, `tgl 5 agustus 2023` or `3 jan 25`.
pub struct MetaExtractor {
    income: KeywordSet,
    expense: KeywordSet,
    date_re: Regex,
    weekday_re: Regex,
}

impl MetaExtractor {
    /// Creates an extractor with the built-in keyword lists.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in lists. See [`Self::with_keywords()`].
    pub fn new() -> Result<Self> {
        Self::with_keywords(INCOME_KEYWORDS, EXPENSE_KEYWORDS)
    }

    /// Creates an extractor with custom keyword lists.
    ///
    /// # Errors
    ///
    /// If a list is empty or contains an empty keyword, an error variant will be returned.
    pub fn with_keywords(income: &[&str], expense: &[&str]) -> Result<Self> {
        let months = MONTHS
            .iter()
            .map(|m| month_pattern(m))
            .collect::<Vec<_>>()
            .join("|");
        let date_re = Regex::new(&format!(
            r"(?i)\b(?:tgl\.?\s*)?(\d{{1,2}})\s*({months})\.?(?:\s+(\d{{4}}|\d{{2}}))?\b"
        ))
        .map_err(|e| NotaError::invalid_argument("months", e.to_string()))?;
        let weekday_re = Regex::new(&format!(r"(?i)\b(?:{})\b", WEEKDAYS.join("|")))
            .map_err(|e| NotaError::invalid_argument("weekdays", e.to_string()))?;
        Ok(Self {
            income: KeywordSet::new(income)?,
            expense: KeywordSet::new(expense)?,
            date_re,
            weekday_re,
        })
    }

    /// Extracts the meta data of a note, completing missing years with the local date.
    pub fn extract(&self, text: &str) -> ParsedMeta {
        self.extract_at(text, Local::now().date_naive())
    }

    /// Extracts the meta data of a note.
    ///
    /// # Arguments
    ///
    /// * `text` - A raw note.
    /// * `today` - Date whose year completes dates written without a year.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use nota::{MetaExtractor, TransactionType};
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// let meta = MetaExtractor::new()
    ///     .unwrap()
    ///     .extract_at("beli semen 18 nov 50rb", today);
    ///
    /// assert_eq!("semen 50rb", meta.clean_text);
    /// assert_eq!(NaiveDate::from_ymd_opt(2024, 11, 18), meta.date);
    /// assert_eq!(Some(TransactionType::Expense), meta.transaction_type);
    /// ```
    pub fn extract_at(&self, text: &str, today: NaiveDate) -> ParsedMeta {
        let lower = text.to_lowercase();
        let (mut text, transaction_type) = if self.income.occurs_in(&lower) {
            (self.income.remove_from(text), Some(TransactionType::Income))
        } else if self.expense.occurs_in(&lower) {
            (self.expense.remove_from(text), Some(TransactionType::Expense))
        } else {
            (text.to_string(), None)
        };

        let mut date = None;
        if let Some(caps) = self.date_re.captures(&text) {
            date = Self::parse_date(&caps, today);
            let span = caps.get(0).map_or(0..0, |m| m.range());
            text.replace_range(span, " ");
            text = self.weekday_re.replace_all(&text, "").into_owned();
        }

        ParsedMeta {
            clean_text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            date,
            transaction_type,
        }
    }

    fn parse_date(caps: &regex::Captures, today: NaiveDate) -> Option<NaiveDate> {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let name = caps.get(2)?.as_str().to_lowercase();
        let month = MONTHS.iter().position(|m| m.starts_with(&name))? + 1;
        let year = match caps.get(3) {
            Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        let date = NaiveDate::from_ymd_opt(year, month as u32, day);
        if date.is_none() {
            log::warn!(
                "invalid date: {:?}",
                caps.get(0).map_or("", |m| m.as_str())
            );
        }
        date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn extract(text: &str) -> ParsedMeta {
        MetaExtractor::new().unwrap().extract_at(text, today())
    }

    #[test]
    fn test_income_keyword() {
        let meta = extract("jual pulsa 10k");

        assert_eq!("pulsa 10k", meta.clean_text);
        assert_eq!(Some(TransactionType::Income), meta.transaction_type);
        assert_eq!(None, meta.date);
    }

    #[test]
    fn test_income_checked_first() {
        let meta = extract("Beli rokok laku 3 bungkus");

        assert_eq!(Some(TransactionType::Income), meta.transaction_type);
        assert_eq!("Beli rokok 3 bungkus", meta.clean_text);
    }

    #[test]
    fn test_expense_keyword_case_insensitive() {
        let meta = extract("BELI semen 2 sak");

        assert_eq!(Some(TransactionType::Expense), meta.transaction_type);
        assert_eq!("semen 2 sak", meta.clean_text);
    }

    #[test]
    fn test_keyword_inside_word_is_detected_not_removed() {
        let meta = extract("penjualan kue 20");

        assert_eq!(Some(TransactionType::Income), meta.transaction_type);
        assert_eq!("penjualan kue 20", meta.clean_text);

        let meta = extract("pembelian kabel");

        assert_eq!(Some(TransactionType::Expense), meta.transaction_type);
        assert_eq!("pembelian kabel", meta.clean_text);
    }

    #[test]
    fn test_longer_keyword_removed() {
        let meta = extract("kue terjual 20");

        assert_eq!(Some(TransactionType::Income), meta.transaction_type);
        assert_eq!("kue 20", meta.clean_text);
    }

    #[test]
    fn test_no_keyword() {
        let meta = extract("  kopi   susu  5rb ");

        assert_eq!("kopi susu 5rb", meta.clean_text);
        assert_eq!(None, meta.transaction_type);
    }

    #[test]
    fn test_month_pattern() {
        assert_eq!("mar(?:e(?:t)?)?", month_pattern("maret"));
        assert_eq!("mei", month_pattern("mei"));
    }

    #[test]
    fn test_item_starting_with_month_abbreviation() {
        let meta = extract("beli 2 martabak 30rb");

        assert_eq!("2 martabak 30rb", meta.clean_text);
        assert_eq!(None, meta.date);

        let meta = extract("beli 1 sepatu 200rb");

        assert_eq!("1 sepatu 200rb", meta.clean_text);
        assert_eq!(None, meta.date);

        let meta = extract("jual 3 jantung pisang 15rb");

        assert_eq!("3 jantung pisang 15rb", meta.clean_text);
        assert_eq!(None, meta.date);
    }

    #[test]
    fn test_full_and_partial_month_names() {
        let meta = extract("kopi 2 maret");

        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 2), meta.date);
        assert_eq!("kopi", meta.clean_text);

        let meta = extract("kopi 5 septem 2023");

        assert_eq!(NaiveDate::from_ymd_opt(2023, 9, 5), meta.date);
        assert_eq!("kopi", meta.clean_text);
    }

    #[test]
    fn test_date_without_year() {
        let meta = extract("semen 18 nov 50rb");

        assert_eq!(NaiveDate::from_ymd_opt(2024, 11, 18), meta.date);
        assert_eq!("semen 50rb", meta.clean_text);
    }

    #[test]
    fn test_date_full() {
        let meta = extract("tgl 5 Agustus 2023 jual kopi");

        assert_eq!(NaiveDate::from_ymd_opt(2023, 8, 5), meta.date);
        assert_eq!("kopi", meta.clean_text);
    }

    #[test]
    fn test_date_two_digit_year_and_weekday() {
        let meta = extract("senin 3 jan 25 masuk 100rb");

        assert_eq!(NaiveDate::from_ymd_opt(2025, 1, 3), meta.date);
        assert_eq!("100rb", meta.clean_text);
    }

    #[test]
    fn test_date_price_is_not_a_year() {
        let meta = extract("kopi 18 nov 25rb");

        assert_eq!(NaiveDate::from_ymd_opt(2024, 11, 18), meta.date);
        assert_eq!("kopi 25rb", meta.clean_text);
    }

    #[test]
    fn test_invalid_date_is_removed() {
        let meta = extract("gaji 31 feb");

        assert_eq!(None, meta.date);
        assert_eq!("gaji", meta.clean_text);
    }

    #[test]
    fn test_weekday_kept_without_date() {
        let meta = extract("kopi sabtu");

        assert_eq!("kopi sabtu", meta.clean_text);
    }

    #[test]
    fn test_empty() {
        let meta = extract("");

        assert_eq!("", meta.clean_text);
        assert_eq!(None, meta.date);
        assert_eq!(None, meta.transaction_type);
    }

    #[test]
    fn test_empty_keyword_list() {
        assert!(MetaExtractor::with_keywords(&[], &["beli"]).is_err());
    }

    #[test]
    fn test_meta_json() {
        let meta = extract("jual kopi 18 nov");

        assert_eq!(
            r#"{"cleanText":"kopi","date":"2024-11-18","type":"INCOME"}"#,
            serde_json::to_string(&meta).unwrap()
        );
    }
}
