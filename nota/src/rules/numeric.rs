use crate::lexicon;
use crate::number::{self, NumberNormalizer};
use crate::rules::TagFilter;
use crate::sentence::Sentence;
use crate::tag::{EntityKind, Tag};

/// Numbers below this value without a leading zero are read as quantities.
const QUANTITY_LIMIT: f64 = 50.;

/// Decides between quantity and price for every token that parses as a positive amount.
///
/// In order of precedence, a number is a price if it carries a scale suffix, if it is a
/// grouped number longer than four characters, or if a scale word follows it. It is a quantity
/// if a measure unit follows it. Otherwise small numbers are quantities and the rest are
/// prices.
#[derive(Default)]
pub struct NumericTagFilter {
    normalizer: NumberNormalizer,
}

impl NumericTagFilter {
    pub const fn new(normalizer: NumberNormalizer) -> Self {
        Self { normalizer }
    }

    fn classify(&self, word: &str, next: Option<&str>) -> Option<EntityKind> {
        let value = self.normalizer.parse_price(word);
        if value <= 0. {
            return None;
        }
        let grouped = word.contains('.') && word.len() > 4;
        let next_is_money = next.map_or(false, |w| lexicon::scale_of(w).is_some());
        if number::has_scale_suffix(word) || grouped || next_is_money {
            return Some(EntityKind::Price);
        }
        if next.map_or(false, lexicon::is_measure_unit) {
            return Some(EntityKind::Quantity);
        }
        if value < QUANTITY_LIMIT && !word.starts_with('0') {
            Some(EntityKind::Quantity)
        } else {
            Some(EntityKind::Price)
        }
    }
}

impl TagFilter for NumericTagFilter {
    fn filter(&self, sentence: &mut Sentence) {
        for i in 0..sentence.len() {
            let word = sentence.tokens[i].lower.trim_end_matches(',');
            let next = sentence.word(i + 1).map(|w| w.trim_end_matches(','));
            if let Some(kind) = self.classify(word, next) {
                sentence.tags[i] = Tag::Begin(kind);
            }
        }
    }
}
