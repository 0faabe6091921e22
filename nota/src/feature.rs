use core::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon;
use crate::sentence::Sentence;

/// Identifier of the feature schema produced by [`FeatureExtractor`].
///
/// Bump it whenever a feature name or its triggering condition changes.
pub const FEATURE_SCHEMA: &str = "nota-nb-v1";

pub const BOS: &str = "__BOS__";
pub const EOS: &str = "__EOS__";

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+([,.]\d+)?$").unwrap());
static PRICE_LIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:rp|\d+(?:rb|k|ribu|rebu|ribee|jt|juta)|\d{1,3}(?:\.\d{3})+$)").unwrap()
});

/// Closed set of feature kinds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FeatureKind {
    Word,
    IsNumeric,
    IsPriceLike,
    IsUnit,
    IsCapitalized,
    HasDigit,
    Suffix1,
    Suffix2,
    Suffix3,
    Prefix1,
    Prefix2,
    Prefix3,
    PrevWord,
    NextWord,
    PrevIsVerb,
    PrevIsUnit,
    NextIsUnit,
    NextIsPriceSuffix,
}

impl FeatureKind {
    pub const ALL: [Self; 18] = [
        Self::Word,
        Self::IsNumeric,
        Self::IsPriceLike,
        Self::IsUnit,
        Self::IsCapitalized,
        Self::HasDigit,
        Self::Suffix1,
        Self::Suffix2,
        Self::Suffix3,
        Self::Prefix1,
        Self::Prefix2,
        Self::Prefix3,
        Self::PrevWord,
        Self::NextWord,
        Self::PrevIsVerb,
        Self::PrevIsUnit,
        Self::NextIsUnit,
        Self::NextIsPriceSuffix,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::IsNumeric => "is_numeric",
            Self::IsPriceLike => "is_price_like",
            Self::IsUnit => "is_unit",
            Self::IsCapitalized => "is_capitalized",
            Self::HasDigit => "has_digit",
            Self::Suffix1 => "suffix_1",
            Self::Suffix2 => "suffix_2",
            Self::Suffix3 => "suffix_3",
            Self::Prefix1 => "prefix_1",
            Self::Prefix2 => "prefix_2",
            Self::Prefix3 => "prefix_3",
            Self::PrevWord => "prev_word",
            Self::NextWord => "next_word",
            Self::PrevIsVerb => "prev_is_verb",
            Self::PrevIsUnit => "prev_is_unit",
            Self::NextIsUnit => "next_is_unit",
            Self::NextIsPriceSuffix => "next_is_price_suffix",
        }
    }

    /// Whether the kind carries a string value (`word=nasi`) or is a bare indicator.
    pub const fn is_valued(self) -> bool {
        matches!(
            self,
            Self::Word
                | Self::Suffix1
                | Self::Suffix2
                | Self::Suffix3
                | Self::Prefix1
                | Self::Prefix2
                | Self::Prefix3
                | Self::PrevWord
                | Self::NextWord
        )
    }

    /// Finds the kind of a vocabulary key, or `None` if the key cannot be produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use nota::FeatureKind;
    ///
    /// assert_eq!(Some(FeatureKind::Word), FeatureKind::from_key("word=semen"));
    /// assert_eq!(Some(FeatureKind::IsUnit), FeatureKind::from_key("is_unit"));
    /// assert_eq!(None, FeatureKind::from_key("length"));
    /// assert_eq!(None, FeatureKind::from_key("is_unit=1"));
    /// ```
    pub fn from_key(key: &str) -> Option<Self> {
        let (name, valued) = match key.split_once('=') {
            Some((name, _)) => (name, true),
            None => (key, false),
        };
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name && kind.is_valued() == valued)
    }
}

/// Active feature of a token.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Feature<'a> {
    pub kind: FeatureKind,
    pub value: Option<&'a str>,
}

impl<'a> Feature<'a> {
    const fn flag(kind: FeatureKind) -> Self {
        Self { kind, value: None }
    }

    const fn valued(kind: FeatureKind, value: &'a str) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }
}

/// Renders the vocabulary key of the feature.
impl fmt::Display for Feature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}={}", self.kind.name(), value),
            None => f.write_str(self.kind.name()),
        }
    }
}

fn prefix(s: &str, n: usize) -> Option<&str> {
    match s.char_indices().nth(n) {
        Some((end, _)) => Some(&s[..end]),
        None => (s.chars().count() == n).then_some(s),
    }
}

fn suffix(s: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return None;
    }
    s.char_indices()
        .rev()
        .nth(n - 1)
        .map(|(start, _)| &s[start..])
}

/// Extracts lexical features of a token and its neighbors.
#[derive(Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the features of the `i`-th token of a sentence.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn extract<'a>(&self, sentence: &'a Sentence, i: usize) -> Vec<Feature<'a>> {
        let mut features = vec![];
        self.extract_into(sentence, i, &mut features);
        features
    }

    /// Same as [`Self::extract()`], but reuses a buffer.
    pub fn extract_into<'a>(&self, sentence: &'a Sentence, i: usize, buf: &mut Vec<Feature<'a>>) {
        buf.clear();
        let token = &sentence.tokens[i];
        let word = token.lower.as_str();

        buf.push(Feature::valued(FeatureKind::Word, word));
        if NUMERIC_RE.is_match(word) {
            buf.push(Feature::flag(FeatureKind::IsNumeric));
        }
        if PRICE_LIKE_RE.is_match(word) {
            buf.push(Feature::flag(FeatureKind::IsPriceLike));
        }
        if lexicon::is_unit(word) {
            buf.push(Feature::flag(FeatureKind::IsUnit));
        }
        if token.surface.chars().next().map_or(false, char::is_uppercase) {
            buf.push(Feature::flag(FeatureKind::IsCapitalized));
        }
        if token.surface.chars().any(|c| c.is_ascii_digit()) {
            buf.push(Feature::flag(FeatureKind::HasDigit));
        }

        let ngrams = [
            (FeatureKind::Suffix1, suffix(word, 1)),
            (FeatureKind::Suffix2, suffix(word, 2)),
            (FeatureKind::Suffix3, suffix(word, 3)),
            (FeatureKind::Prefix1, prefix(word, 1)),
            (FeatureKind::Prefix2, prefix(word, 2)),
            (FeatureKind::Prefix3, prefix(word, 3)),
        ];
        for (kind, ngram) in ngrams {
            if let Some(ngram) = ngram {
                buf.push(Feature::valued(kind, ngram));
            }
        }

        let prev = i.checked_sub(1).and_then(|j| sentence.word(j)).unwrap_or(BOS);
        let next = sentence.word(i + 1).unwrap_or(EOS);
        buf.push(Feature::valued(FeatureKind::PrevWord, prev));
        buf.push(Feature::valued(FeatureKind::NextWord, next));
        if lexicon::is_verb(prev) {
            buf.push(Feature::flag(FeatureKind::PrevIsVerb));
        }
        if lexicon::is_unit(prev) {
            buf.push(Feature::flag(FeatureKind::PrevIsUnit));
        }
        if lexicon::is_unit(next) {
            buf.push(Feature::flag(FeatureKind::NextIsUnit));
        }
        if lexicon::is_money_suffix(next) {
            buf.push(Feature::flag(FeatureKind::NextIsPriceSuffix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(text: &str, i: usize) -> Vec<String> {
        let s = Sentence::from_raw(text);
        FeatureExtractor::new()
            .extract(&s, i)
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    #[test]
    fn test_extract_word_with_context() {
        assert_eq!(
            vec![
                "word=nasi",
                "suffix_1=i",
                "suffix_2=si",
                "suffix_3=asi",
                "prefix_1=n",
                "prefix_2=na",
                "prefix_3=nas",
                "prev_word=2",
                "next_word=goreng",
            ],
            keys("beli 2 nasi goreng 15rb", 2)
        );
    }

    #[test]
    fn test_extract_price() {
        assert_eq!(
            vec![
                "word=15rb",
                "is_price_like",
                "has_digit",
                "suffix_1=b",
                "suffix_2=rb",
                "suffix_3=5rb",
                "prefix_1=1",
                "prefix_2=15",
                "prefix_3=15r",
                "prev_word=goreng",
                "next_word=__EOS__",
            ],
            keys("beli 2 nasi goreng 15rb", 4)
        );
    }

    #[test]
    fn test_extract_number_before_unit() {
        assert_eq!(
            vec![
                "word=2",
                "is_numeric",
                "has_digit",
                "suffix_1=2",
                "prefix_1=2",
                "prev_word=beli",
                "next_word=kg",
                "prev_is_verb",
                "next_is_unit",
            ],
            keys("beli 2 kg", 1)
        );
    }

    #[test]
    fn test_extract_first_token() {
        let k = keys("Semen 50rb", 0);

        assert!(k.contains(&"prev_word=__BOS__".to_string()));
        assert!(k.contains(&"is_capitalized".to_string()));
        assert!(!k.contains(&"next_is_price_suffix".to_string()));
    }

    #[test]
    fn test_extract_next_price_suffix() {
        let k = keys("semen 50 rb", 1);

        assert!(k.contains(&"next_is_price_suffix".to_string()));
        assert!(k.contains(&"is_numeric".to_string()));
        assert!(!k.contains(&"is_price_like".to_string()));
    }

    #[test]
    fn test_extract_grouped_thousands() {
        let k = keys("pasir 150.000", 1);

        assert!(k.contains(&"is_numeric".to_string()));
        assert!(k.contains(&"is_price_like".to_string()));
    }

    #[test]
    fn test_from_key_roundtrip() {
        let s = Sentence::from_raw("beli 2 sak semen 50rb");
        let extractor = FeatureExtractor::new();
        for i in 0..s.len() {
            for f in extractor.extract(&s, i) {
                assert_eq!(Some(f.kind), FeatureKind::from_key(&f.to_string()));
            }
        }
    }

    #[test]
    fn test_ngram_helpers() {
        assert_eq!(Some("ab"), prefix("abc", 2));
        assert_eq!(Some("abc"), prefix("abc", 3));
        assert_eq!(None, prefix("abc", 4));
        assert_eq!(Some("bc"), suffix("abc", 2));
        assert_eq!(Some("abc"), suffix("abc", 3));
        assert_eq!(None, suffix("abc", 4));
    }
}
