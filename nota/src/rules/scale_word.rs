use crate::lexicon;
use crate::rules::TagFilter;
use crate::sentence::Sentence;
use crate::tag::Tag;

/// Clears the tag of bare scale words such as `rb`, `k` or `juta`.
///
/// A detached scale word only multiplies the number before it, so it never starts or extends
/// a span on its own.
pub struct ScaleWordFilter;

impl TagFilter for ScaleWordFilter {
    fn filter(&self, sentence: &mut Sentence) {
        for (token, tag) in sentence.tokens.iter().zip(sentence.tags.iter_mut()) {
            if lexicon::scale_of(token.lower.trim_end_matches(',')).is_some() {
                *tag = Tag::Outside;
            }
        }
    }
}
