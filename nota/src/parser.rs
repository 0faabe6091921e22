use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decoder::{LineItem, SpanDecoder};
use crate::errors::Result;
use crate::meta::{MetaExtractor, ParsedMeta};
use crate::model::Model;
use crate::predictor::Predictor;
use crate::rules::RuleCorrector;
use crate::sentence::Sentence;

/// Parsed note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: ParsedMeta,
    pub items: Vec<LineItem>,
}

/// Full pipeline from a raw note to line items.
pub struct Parser {
    meta: MetaExtractor,
    predictor: Predictor,
    rules: RuleCorrector,
    decoder: SpanDecoder,
}

impl Parser {
    /// Creates a parser with the default rules and number tables.
    ///
    /// # Errors
    ///
    /// When the model holds an unknown class, an error variant will be returned.
    pub fn new(model: Model) -> Result<Self> {
        Self::with_components(
            Predictor::new(model)?,
            RuleCorrector::default(),
            SpanDecoder::default(),
        )
    }

    /// Creates a parser from its stages.
    pub fn with_components(
        predictor: Predictor,
        rules: RuleCorrector,
        decoder: SpanDecoder,
    ) -> Result<Self> {
        Ok(Self {
            meta: MetaExtractor::new()?,
            predictor,
            rules,
            decoder,
        })
    }

    /// Runs the meta data pre-pass alone.
    pub fn extract_meta(&self, text: &str) -> ParsedMeta {
        self.meta.extract(text)
    }

    /// Tags a note that no longer holds meta data.
    pub fn tag(&self, text: &str) -> Sentence {
        let mut sentence = self.predictor.predict(Sentence::from_raw(text));
        self.rules.correct(&mut sentence);
        sentence
    }

    /// Same as [`Self::tag()`], but also records the classifier score of each token.
    pub fn tag_with_score(&self, text: &str) -> Sentence {
        let mut sentence = self.predictor.predict_with_score(Sentence::from_raw(text));
        self.rules.correct(&mut sentence);
        sentence
    }

    fn decode(&self, clean_text: &str) -> Vec<LineItem> {
        let sentence = self.tag(clean_text);
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("tags: {}", sentence.to_tagged_string());
        }
        self.decoder.decode(&sentence)
    }

    /// Parses a note into line items. Empty or unrecognized notes give an empty list.
    pub fn predict(&self, text: &str) -> Vec<LineItem> {
        self.process(text).items
    }

    /// Parses a note into its meta data and line items.
    pub fn process(&self, text: &str) -> Transaction {
        let meta = self.extract_meta(text);
        let items = self.decode(&meta.clean_text);
        Transaction { meta, items }
    }

    /// Same as [`Self::process()`] with a fixed date for notes whose dates have no year.
    pub fn process_at(&self, text: &str, today: NaiveDate) -> Transaction {
        let meta = self.meta.extract_at(text, today);
        let items = self.decode(&meta.clean_text);
        Transaction { meta, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::meta::TransactionType;
    use crate::model::tests::toy_model;

    fn parser() -> Parser {
        Parser::new(toy_model()).unwrap()
    }

    #[test]
    fn test_predict() {
        let items = parser().predict("beli 2 nasi goreng 15rb");

        assert_eq!(1, items.len());
        assert_eq!("nasi goreng", items[0].item_name);
        assert_eq!(2, items[0].quantity);
        assert_eq!(7_500., items[0].price);
        assert_eq!(15_000., items[0].total_price);
        assert_eq!("general", items[0].category);
    }

    #[test]
    fn test_predict_empty() {
        assert!(parser().predict("").is_empty());
        assert!(parser().predict(" ?! ").is_empty());
    }

    #[test]
    fn test_tag_applies_rules() {
        let s = parser().tag("nasi 5 rb");

        assert_eq!("nasi/B-ITEM 5/B-PRICE rb/O", s.to_tagged_string());
    }

    #[test]
    fn test_tag_with_score() {
        let s = parser().tag_with_score("nasi goreng");

        assert_eq!(Some(2), s.tag_scores().map(<[f64]>::len));
    }

    #[test]
    fn test_process() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let tx = parser().process_at("beli 2 nasi goreng 15rb 18 nov", today);

        assert_eq!(Some(TransactionType::Expense), tx.meta.transaction_type);
        assert_eq!(NaiveDate::from_ymd_opt(2024, 11, 18), tx.meta.date);
        assert_eq!("2 nasi goreng 15rb", tx.meta.clean_text);
        assert_eq!(1, tx.items.len());
        assert_eq!(15_000., tx.items[0].total_price);
    }
}
