//! Deterministic corrections applied to classifier tags.

mod numeric;
mod scale_word;
mod span_head;

pub use numeric::NumericTagFilter;
pub use scale_word::ScaleWordFilter;
pub use span_head::SpanHeadFilter;

use crate::sentence::Sentence;

/// Trait of a filter rewriting the tags of a [`Sentence`].
pub trait TagFilter: Send + Sync {
    /// Rewrites tags in place.
    ///
    /// # Arguments
    ///
    /// * `sentence` - Sentence with predicted tags.
    fn filter(&self, sentence: &mut Sentence);
}

/// Ordered chain of [`TagFilter`]s.
///
/// The default chain runs [`ScaleWordFilter`], [`NumericTagFilter`] and [`SpanHeadFilter`], in
/// this order.
pub struct RuleCorrector {
    filters: Vec<Box<dyn TagFilter>>,
}

impl Default for RuleCorrector {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ScaleWordFilter),
            Box::new(NumericTagFilter::default()),
            Box::new(SpanHeadFilter),
        ])
    }
}

impl RuleCorrector {
    pub fn new(filters: Vec<Box<dyn TagFilter>>) -> Self {
        Self { filters }
    }

    /// Filters that do nothing. Useful to inspect raw classifier output.
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Applies every filter in order.
    pub fn correct(&self, sentence: &mut Sentence) {
        for filter in &self.filters {
            filter.filter(sentence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct(tagged: &str) -> String {
        let mut s = Sentence::from_tagged(tagged).unwrap();
        RuleCorrector::default().correct(&mut s);
        s.to_tagged_string()
    }

    #[test]
    fn test_default_chain() {
        assert_eq!(
            "beli/O 2/B-QTY sak/O semen/B-ITEM 50/B-PRICE rb/O",
            correct("beli/B-ITEM 2/B-PRICE sak/B-ITEM semen/B-ITEM 50/B-QTY rb/B-PRICE")
        );
    }

    #[test]
    fn test_correct_gold_tags_unchanged() {
        assert_eq!(
            "beli/O 2/B-QTY nasi/B-ITEM goreng/I-ITEM 15rb/B-PRICE",
            correct("beli/O 2/B-QTY nasi/B-ITEM goreng/I-ITEM 15rb/B-PRICE")
        );
    }

    #[test]
    fn test_empty_chain() {
        let mut s = Sentence::from_tagged("rb/B-PRICE").unwrap();
        RuleCorrector::empty().correct(&mut s);

        assert_eq!("rb/B-PRICE", s.to_tagged_string());
    }
}
