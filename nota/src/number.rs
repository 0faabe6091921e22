//! Parsing of colloquial rupiah amounts and quantities.

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::{self, DENOMINATIONS, MILLION_SUFFIXES, NUMERAL_PREFIXES, THOUSAND_SUFFIXES};

static GROUPED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+(,\d+)?$").unwrap());
static NUMERIC_BODY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.,]+$").unwrap());
static SCALED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.,]+(rb|k|ribu|rebu|ribee|jt|juta|juti)$").unwrap());
static REDUNDANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d{3}\s*(rb|k|ribu|rebu)").unwrap());

static DEFAULT_NORMALIZER: Lazy<NumberNormalizer> = Lazy::new(NumberNormalizer::default);

/// Scale suffix found at the end of a word.
struct Scale<'a> {
    body: &'a str,
    multiplier: f64,
    spelled_out: bool,
}

fn split_scale(word: &str) -> Option<Scale<'_>> {
    let suffixes = MILLION_SUFFIXES
        .iter()
        .map(|s| (s, 1_000_000.))
        .chain(THOUSAND_SUFFIXES.iter().map(|s| (s, 1_000.)));
    for (suffix, multiplier) in suffixes {
        if let Some(body) = word.strip_suffix(suffix) {
            return Some(Scale {
                body: body.trim_end_matches(|c: char| c == '-' || c == ' '),
                multiplier,
                spelled_out: suffix.len() > 2,
            });
        }
    }
    None
}

/// Parses a digit string that may contain `.` and `,`.
///
/// Dots followed by groups of three digits are thousands separators (`15.000`). Otherwise a
/// single dot is a decimal point (`1.5`). A comma is always a decimal point (`1,5`).
fn parse_digits(s: &str) -> Option<f64> {
    let cleaned = if GROUPED_RE.is_match(s) || s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else if s.matches('.').count() == 1 {
        s.to_string()
    } else {
        s.replace('.', "")
    };
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.)
}

/// Returns true if the word is a number with a glued scale suffix, e.g. `15rb` or `1,5jt`.
pub fn has_scale_suffix(word: &str) -> bool {
    SCALED_RE.is_match(word)
}

/// Parses a price with the default denomination table.
///
/// # Examples
///
/// ```
/// use nota::parse_price;
///
/// assert_eq!(65_000., parse_price("65rb"));
/// assert_eq!(1_000_000., parse_price("1jt"));
/// assert_eq!(21_000., parse_price("21.000rb"));
/// assert_eq!(100., parse_price("cepek"));
/// assert_eq!(0., parse_price("semen"));
/// ```
pub fn parse_price(token: &str) -> f64 {
    DEFAULT_NORMALIZER.parse_price(token)
}

/// Corrects a value parsed from a word that carries both grouped thousands and a scale suffix.
///
/// In `21.000rb` the dot already groups thousands, so the suffix must not be applied again.
/// The value is recomputed from the digits of `token`; other words return `value` unchanged.
///
/// # Examples
///
/// ```
/// use nota::fix_number;
///
/// assert_eq!(21_000., fix_number(21_000_000., "21.000rb"));
/// assert_eq!(15_000., fix_number(15_000., "15rb"));
/// ```
pub fn fix_number(value: f64, token: &str) -> f64 {
    let lower = token.to_lowercase();
    if !REDUNDANT_RE.is_match(&lower) {
        return value;
    }
    let digits: String = lower
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    digits.parse::<f64>().unwrap_or(value)
}

/// Parses a quantity: the digits of the word, or a spelled-out number.
///
/// # Examples
///
/// ```
/// use nota::parse_quantity;
///
/// assert_eq!(Some(3), parse_quantity("3x"));
/// assert_eq!(Some(1), parse_quantity("satu"));
/// assert_eq!(None, parse_quantity("0"));
/// ```
pub fn parse_quantity(token: &str) -> Option<u32> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        lexicon::quantity_word(token.trim().to_lowercase().as_str())
    } else {
        digits.parse().ok().filter(|&n| n > 0)
    }
}

/// Price parser holding a slang denomination table.
pub struct NumberNormalizer {
    denominations: HashMap<String, f64>,
}

impl Default for NumberNormalizer {
    fn default() -> Self {
        Self::with_denominations(DENOMINATIONS.iter().map(|&(w, v)| (w, v)))
    }
}

impl NumberNormalizer {
    /// Creates a normalizer with a custom slang denomination table.
    ///
    /// # Arguments
    ///
    /// * `denominations` - Pairs of a lowercase slang word and its value.
    pub fn with_denominations<I, S>(denominations: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            denominations: denominations
                .into_iter()
                .map(|(w, v)| (w.into(), v))
                .collect(),
        }
    }

    /// Parses a price. Never negative; words that are not amounts give `0`.
    pub fn parse_price(&self, token: &str) -> f64 {
        let value = self.parse_raw(token);
        fix_number(value, token)
    }

    fn parse_raw(&self, token: &str) -> f64 {
        let lower = token.trim().to_lowercase();
        let word = lower.trim_matches(|c: char| matches!(c, '.' | ',' | '-'));
        let word = word
            .strip_prefix("rp")
            .map_or(word, |w| w.trim_start_matches(|c: char| matches!(c, '.' | ' ')));
        if word.is_empty() {
            return 0.;
        }

        if !word.chars().any(|c| c.is_ascii_digit()) {
            return self.parse_slang(word);
        }

        if let Some(scale) = split_scale(word) {
            if NUMERIC_BODY_RE.is_match(scale.body) {
                return parse_digits(scale.body).map_or(0., |v| v * scale.multiplier);
            }
        }
        // Letters mixed into the number carry no scale: keep the digits only.
        let digits: String = word
            .chars()
            .filter(|&c| c.is_ascii_digit() || c == '.' || c == ',')
            .collect();
        parse_digits(&digits).unwrap_or(0.)
    }

    fn parse_slang(&self, word: &str) -> f64 {
        if let Some(&value) = self.denominations.get(word) {
            return value;
        }
        let scale = if let Some(scale) = split_scale(word) {
            scale
        } else {
            return 0.;
        };
        if let Some(&value) = self.denominations.get(scale.body) {
            return value * scale.multiplier;
        }
        // Only spelled-out scales take a numeral prefix, so that "sak" is not "sa" + "k".
        if scale.spelled_out {
            if let Some(&(_, value)) = NUMERAL_PREFIXES.iter().find(|(p, _)| *p == scale.body) {
                return value * scale.multiplier;
            }
        }
        0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_suffixes() {
        assert_eq!(65_000., parse_price("65rb"));
        assert_eq!(15_000., parse_price("15k"));
        assert_eq!(20_000., parse_price("20ribu"));
        assert_eq!(5_000., parse_price("5rebu"));
        assert_eq!(3_000., parse_price("3ribee"));
        assert_eq!(1_000_000., parse_price("1jt"));
        assert_eq!(2_000_000., parse_price("2juta"));
        assert_eq!(4_000_000., parse_price("4juti"));
    }

    #[test]
    fn test_parse_price_currency_marker() {
        assert_eq!(50_000., parse_price("rp50.000"));
        assert_eq!(15_000., parse_price("Rp.15000"));
        assert_eq!(25_000., parse_price("rp25rb"));
    }

    #[test]
    fn test_parse_price_decimals() {
        assert_eq!(1_500_000., parse_price("1.5jt"));
        assert_eq!(1_500_000., parse_price("1,5jt"));
        assert_eq!(2_500., parse_price("2,5rb"));
        assert_eq!(150_000., parse_price("150.000"));
        assert_eq!(1_250_000., parse_price("1.250.000"));
    }

    #[test]
    fn test_parse_price_redundant_format() {
        assert_eq!(21_000., parse_price("21.000rb"));
        assert_eq!(150_000., parse_price("150.000k"));
    }

    #[test]
    fn test_parse_price_slang() {
        assert_eq!(100., parse_price("cepek"));
        assert_eq!(500., parse_price("gopek"));
        assert_eq!(1_000., parse_price("seceng"));
        assert_eq!(2_000., parse_price("goceng"));
        assert_eq!(50_000., parse_price("goban"));
    }

    #[test]
    fn test_parse_price_numeral_prefix() {
        assert_eq!(1_000., parse_price("sarebu"));
        assert_eq!(1_000., parse_price("seribu"));
        assert_eq!(2_000., parse_price("duaribu"));
        assert_eq!(1_000_000., parse_price("sejuta"));
    }

    #[test]
    fn test_parse_price_not_a_number() {
        assert_eq!(0., parse_price("semen"));
        assert_eq!(0., parse_price("sak"));
        assert_eq!(0., parse_price("pack"));
        assert_eq!(0., parse_price("rb"));
        assert_eq!(0., parse_price("k"));
        assert_eq!(0., parse_price("rp"));
        assert_eq!(0., parse_price(""));
        assert_eq!(0., parse_price("1.2.3,4,5"));
    }

    #[test]
    fn test_parse_price_trailing_punctuation() {
        assert_eq!(50_000., parse_price("50rb,"));
        assert_eq!(7., parse_price("7."));
    }

    #[test]
    fn test_parse_price_letters_without_scale() {
        assert_eq!(50_000., parse_price("50000an"));
        assert_eq!(2., parse_price("2pak"));
    }

    #[test]
    fn test_parse_price_never_negative() {
        for token in [
            "-5", "--", "-", "rp-", "5-", "1e9", "nan", "inf", "-1jt", "99999999999999999999",
        ] {
            let v = parse_price(token);
            assert!(v.is_finite() && v >= 0., "{token}: {v}");
        }
    }

    #[test]
    fn test_fix_number_idempotent() {
        for (value, token) in [
            (21_000_000., "21.000rb"),
            (15_000., "15rb"),
            (0., "semen"),
            (1_500., "1.500"),
        ] {
            let once = fix_number(value, token);
            assert_eq!(once, fix_number(once, token), "{token}");
        }
    }

    #[test]
    fn test_custom_denominations() {
        let normalizer = NumberNormalizer::with_denominations([("goceng", 5_000.)]);

        assert_eq!(5_000., normalizer.parse_price("goceng"));
        assert_eq!(0., normalizer.parse_price("cepek"));
    }

    #[test]
    fn test_has_scale_suffix() {
        assert!(has_scale_suffix("15rb"));
        assert!(has_scale_suffix("1,5jt"));
        assert!(!has_scale_suffix("rb"));
        assert!(!has_scale_suffix("15000"));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(Some(2), parse_quantity("2"));
        assert_eq!(Some(12), parse_quantity("selusin"));
        assert_eq!(None, parse_quantity("kg"));
        assert_eq!(None, parse_quantity("99999999999"));
    }
}
