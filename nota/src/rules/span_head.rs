use crate::lexicon;
use crate::rules::TagFilter;
use crate::sentence::Sentence;
use crate::tag::{EntityKind, Tag};

/// Prevents units and verbs from starting an item name.
///
/// A unit or verb tagged as an item is cleared when it would open a new span. Inside an
/// already open name it is kept.
pub struct SpanHeadFilter;

impl TagFilter for SpanHeadFilter {
    fn filter(&self, sentence: &mut Sentence) {
        for i in 0..sentence.len() {
            let opens_span = match sentence.tags[i] {
                Tag::Begin(EntityKind::Item) => true,
                Tag::Inside(EntityKind::Item) => {
                    i == 0 || !sentence.tags[i - 1].is_kind(EntityKind::Item)
                }
                _ => false,
            };
            let word = sentence.tokens[i].lower.as_str();
            if opens_span && (lexicon::is_unit(word) || lexicon::is_verb(word)) {
                sentence.tags[i] = Tag::Outside;
            }
        }
    }
}
