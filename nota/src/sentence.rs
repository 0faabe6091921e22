use core::fmt::Write;

use crate::errors::{NotaError, Result};
use crate::tag::Tag;

/// Word token.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub(crate) position: usize,
    pub(crate) surface: String,
    pub(crate) lower: String,
}

impl Token {
    /// Index of the token in its sentence.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Token as written, casing included.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Lowercase form. Contains only `a-z`, `0-9`, `.`, `,` and `-`.
    pub fn lower(&self) -> &str {
        &self.lower
    }
}

/// Folds a character into the tokenizer alphabet, or returns `None` for a delimiter.
fn fold_char(c: char) -> Option<char> {
    let mut lower = c.to_lowercase();
    let l = lower.next()?;
    if lower.next().is_some() {
        return None;
    }
    matches!(l, 'a'..='z' | '0'..='9' | '.' | ',' | '-').then_some(l)
}

/// Splits a text into word tokens.
///
/// Every character outside `a-z`, `0-9`, `.`, `,` and `-` (after lowercasing) acts as a
/// whitespace, so digits stay glued to their suffixes (`15rb`) and grouping dots survive
/// (`20.000`).
///
/// # Examples
///
/// ```
/// use nota::tokenize;
///
/// let toks: Vec<_> = tokenize("Beli 2 Nasi Goreng 15rb")
///     .into_iter()
///     .map(|t| t.lower().to_string())
///     .collect();
/// assert_eq!(vec!["beli", "2", "nasi", "goreng", "15rb"], toks);
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut surface = String::new();
    let mut lower = String::new();
    for c in text.chars() {
        if let Some(l) = fold_char(c) {
            surface.push(c);
            lower.push(l);
        } else if !lower.is_empty() {
            tokens.push(Token {
                position: tokens.len(),
                surface: core::mem::take(&mut surface),
                lower: core::mem::take(&mut lower),
            });
        }
    }
    if !lower.is_empty() {
        tokens.push(Token {
            position: tokens.len(),
            surface,
            lower,
        });
    }
    tokens
}

/// Sentence with per-token tags.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Sentence {
    pub(crate) tokens: Vec<Token>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) tag_scores: Option<Vec<f64>>,
}

impl Sentence {
    /// Creates a new [`Sentence`] from a raw string. All tags are [`Tag::Outside`].
    ///
    /// # Examples
    ///
    /// ```
    /// use nota::Sentence;
    ///
    /// let s = Sentence::from_raw("jual pulsa 10k");
    /// assert_eq!(3, s.tokens().len());
    ///
    /// let s = Sentence::from_raw("");
    /// assert!(s.is_empty());
    /// ```
    pub fn from_raw(text: &str) -> Self {
        let tokens = tokenize(text);
        let tags = vec![Tag::Outside; tokens.len()];
        Self {
            tokens,
            tags,
            tag_scores: None,
        }
    }

    /// Creates a new [`Sentence`] from a tagged string.
    ///
    /// # Arguments
    ///
    /// * `tagged_text` - Whitespace separated `word/TAG` pairs, e.g. `"beli/O 2/B-QTY"`.
    ///
    /// # Errors
    ///
    /// This function will return an error variant when:
    ///
    /// * `tagged_text` is empty.
    /// * A word has no tag.
    /// * A tag is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use nota::Sentence;
    ///
    /// let s = Sentence::from_tagged("beli/O 2/QTY nasi/ITEM");
    /// assert!(s.is_ok());
    ///
    /// let s = Sentence::from_tagged("beli 2");
    /// assert!(s.is_err());
    /// ```
    pub fn from_tagged(tagged_text: &str) -> Result<Self> {
        let mut tokens = vec![];
        let mut tags = vec![];
        for pair in tagged_text.split_whitespace() {
            let (word, tag) = pair.rsplit_once('/').ok_or_else(|| {
                NotaError::invalid_argument("tagged_text", format!("missing tag: {pair:?}"))
            })?;
            if word.is_empty() {
                return Err(NotaError::invalid_argument(
                    "tagged_text",
                    format!("missing word: {pair:?}"),
                ));
            }
            tags.push(tag.parse()?);
            tokens.push(Token {
                position: tokens.len(),
                surface: word.to_string(),
                lower: word.to_lowercase(),
            });
        }
        if tokens.is_empty() {
            return Err(NotaError::invalid_argument("tagged_text", "is empty"));
        }
        Ok(Self {
            tokens,
            tags,
            tag_scores: None,
        })
    }

    /// Writes the sentence as `word/TAG` pairs.
    pub fn write_tagged_text(&self, buf: &mut String) {
        for (i, (token, tag)) in self.tokens.iter().zip(&self.tags).enumerate() {
            if i != 0 {
                buf.push(' ');
            }
            // Writing into a String never fails.
            let _ = write!(buf, "{}/{}", token.surface, tag);
        }
    }

    pub fn to_tagged_string(&self) -> String {
        let mut buf = String::new();
        self.write_tagged_text(&mut buf);
        buf
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut [Tag] {
        &mut self.tags
    }

    /// Scores of the winning classes, if the sentence was predicted with scores.
    pub fn tag_scores(&self) -> Option<&[f64]> {
        self.tag_scores.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over tokens paired with their tags.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, Tag)> {
        self.tokens.iter().zip(self.tags.iter().copied())
    }

    /// Returns the lowercase form of the `i`-th token.
    pub(crate) fn word(&self, i: usize) -> Option<&str> {
        self.tokens.get(i).map(|t| t.lower.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tag::EntityKind;

    fn lowers(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.lower).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            vec!["beli", "2", "nasi", "goreng", "15rb"],
            lowers("Beli 2 Nasi Goreng 15rb")
        );
    }

    #[test]
    fn test_tokenize_keeps_number_punctuation() {
        assert_eq!(
            vec!["semen", "rp50.000", "pasir", "1,5jt", "gado-gado"],
            lowers("semen (Rp50.000)  pasir 1,5jt; gado-gado!")
        );
    }

    #[test]
    fn test_tokenize_keeps_surface() {
        let toks = tokenize("Kopi  SUSU");

        assert_eq!(2, toks.len());
        assert_eq!("Kopi", toks[0].surface());
        assert_eq!("kopi", toks[0].lower());
        assert_eq!("SUSU", toks[1].surface());
        assert_eq!(1, toks[1].position());
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  !? ").is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii_is_delimiter() {
        assert_eq!(vec!["kopi", "susu"], lowers("kopi☕susu"));
    }

    #[test]
    fn test_sentence_from_tagged() {
        let s = Sentence::from_tagged("beli/O 2/B-QTY Nasi/B-ITEM goreng/I-ITEM").unwrap();

        assert_eq!(4, s.len());
        assert_eq!("nasi", s.tokens()[2].lower());
        assert_eq!(
            &[
                Tag::Outside,
                Tag::Begin(EntityKind::Quantity),
                Tag::Begin(EntityKind::Item),
                Tag::Inside(EntityKind::Item),
            ],
            s.tags()
        );
    }

    #[test]
    fn test_sentence_from_tagged_empty() {
        let s = Sentence::from_tagged("");

        assert!(s.is_err());
        assert_eq!(
            "InvalidArgumentError: tagged_text: is empty",
            &s.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_sentence_from_tagged_missing_tag() {
        let s = Sentence::from_tagged("beli/O nasi");

        assert!(s.is_err());
        assert_eq!(
            "InvalidArgumentError: tagged_text: missing tag: \"nasi\"",
            &s.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_sentence_to_tagged_string() {
        let s = Sentence::from_tagged("beli/O 2/QTY Nasi/B-ITEM").unwrap();

        assert_eq!("beli/O 2/I-QTY Nasi/B-ITEM", s.to_tagged_string());
    }
}
