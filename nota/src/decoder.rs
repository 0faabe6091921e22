use serde::{Deserialize, Serialize};

use crate::lexicon;
use crate::number::{self, NumberNormalizer};
use crate::sentence::Sentence;
use crate::tag::{EntityKind, Tag};

/// Category assigned to every decoded line item.
pub const DEFAULT_CATEGORY: &str = "general";

/// Name given to a priced line item whose name was never tagged.
pub const UNNAMED_ITEM: &str = "Item Tanpa Nama";

/// One line of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_name: String,
    pub quantity: u32,
    /// Unit price.
    pub price: f64,
    pub category: String,
    pub total_price: f64,
}

impl LineItem {
    /// Creates a line item whose total is not computed yet.
    pub fn new<S>(item_name: S, quantity: u32, price: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            item_name: item_name.into(),
            quantity: quantity.max(1),
            price,
            category: DEFAULT_CATEGORY.to_string(),
            total_price: 0.,
        }
    }

    /// Computes the total and the unit price.
    ///
    /// When more than one unit is bought, the amount written in the note is the total of the
    /// line and the unit price is derived from it. Otherwise the amount is the unit price.
    ///
    /// # Examples
    ///
    /// ```
    /// use nota::LineItem;
    ///
    /// let item = LineItem::new("semen", 2, 100_000.).finalize();
    /// assert_eq!(50_000., item.price);
    /// assert_eq!(100_000., item.total_price);
    ///
    /// let item = LineItem::new("pasir", 1, 5_000.).finalize();
    /// assert_eq!(5_000., item.total_price);
    /// ```
    pub fn finalize(mut self) -> Self {
        if self.quantity > 1 && self.price > 0. {
            self.total_price = self.price;
            self.price /= f64::from(self.quantity);
        } else {
            self.total_price = self.price * f64::from(self.quantity);
        }
        self
    }
}

/// Line item being collected.
struct Draft {
    name: Vec<String>,
    quantity: u32,
    price: f64,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: vec![],
            quantity: 1,
            price: 0.,
        }
    }
}

#[derive(Default)]
struct DecodeState {
    draft: Draft,
    has_item: bool,
    closed: Vec<Draft>,
    orphans: Vec<String>,
    global_quantity: Option<u32>,
    global_price: Option<f64>,
}

impl DecodeState {
    fn flush(&mut self) {
        let draft = core::mem::take(&mut self.draft);
        self.has_item = false;
        if !draft.name.is_empty() || draft.price > 0. {
            self.closed.push(draft);
        }
    }

    fn finish(mut self) -> Vec<LineItem> {
        self.flush();
        let has_named = self.closed.iter().any(|d| !d.name.is_empty());
        if !has_named && !self.orphans.is_empty() {
            let item = LineItem::new(
                self.orphans.join(" "),
                self.global_quantity.unwrap_or(1),
                self.global_price.unwrap_or(0.),
            );
            return vec![item.finalize()];
        }
        self.closed
            .into_iter()
            .map(|d| {
                let name = if d.name.is_empty() {
                    UNNAMED_ITEM.to_string()
                } else {
                    d.name.join(" ")
                };
                LineItem::new(name, d.quantity, d.price).finalize()
            })
            .collect()
    }
}

/// Rebuilds line items from a tagged sentence.
#[derive(Default)]
pub struct SpanDecoder {
    normalizer: NumberNormalizer,
}

impl SpanDecoder {
    pub const fn new(normalizer: NumberNormalizer) -> Self {
        Self { normalizer }
    }

    fn is_orphan(&self, word: &str) -> bool {
        self.normalizer.parse_price(word) <= 0.
            && lexicon::scale_of(word).is_none()
            && !lexicon::is_unit(word)
            && !lexicon::is_verb(word)
            && !lexicon::is_noise(word)
    }

    /// Decodes the tags of a sentence into line items.
    ///
    /// Separator words and a comma glued to a word close the open item. A `Begin` item tag
    /// closes it too. Quantities and prices go to the item being collected, the last one
    /// winning. If no item gets a name, the untagged leftover words become the name of a
    /// single item.
    ///
    /// # Examples
    ///
    /// ```
    /// use nota::{Sentence, SpanDecoder};
    ///
    /// let s = Sentence::from_tagged("beli/O 2/QTY nasi/ITEM goreng/ITEM 15rb/PRICE").unwrap();
    /// let items = SpanDecoder::default().decode(&s);
    ///
    /// assert_eq!(1, items.len());
    /// assert_eq!("nasi goreng", items[0].item_name);
    /// assert_eq!(2, items[0].quantity);
    /// assert_eq!(7_500., items[0].price);
    /// assert_eq!(15_000., items[0].total_price);
    /// ```
    pub fn decode(&self, sentence: &Sentence) -> Vec<LineItem> {
        let mut state = DecodeState::default();
        for i in 0..sentence.len() {
            let lower = sentence.tokens[i].lower.as_str();
            let (word, glued_comma) = match lower.strip_suffix(',') {
                Some(stripped) if !stripped.is_empty() => (stripped, true),
                _ => (lower, false),
            };

            if lexicon::is_separator(word) {
                if state.has_item {
                    state.flush();
                }
                continue;
            }

            match sentence.tags[i] {
                tag @ (Tag::Begin(EntityKind::Item) | Tag::Inside(EntityKind::Item)) => {
                    if matches!(tag, Tag::Begin(_)) && state.has_item {
                        state.flush();
                    }
                    state.draft.name.push(word.to_string());
                    state.has_item = true;
                }
                Tag::Begin(EntityKind::Quantity) | Tag::Inside(EntityKind::Quantity) => {
                    if let Some(quantity) = number::parse_quantity(word) {
                        state.draft.quantity = quantity;
                        state.global_quantity = Some(quantity);
                    }
                }
                Tag::Begin(EntityKind::Price) | Tag::Inside(EntityKind::Price) => {
                    let mut price = self.normalizer.parse_price(word);
                    if price > 0. && !number::has_scale_suffix(word) {
                        let next = sentence.word(i + 1).map(|w| w.trim_end_matches(','));
                        if let Some(scale) = next.and_then(lexicon::scale_of) {
                            price *= scale;
                        }
                    }
                    if price > 0. {
                        state.draft.price = price;
                        state.global_price = Some(price);
                    }
                }
                Tag::Outside => {
                    if self.is_orphan(word) {
                        state.orphans.push(word.to_string());
                    }
                }
            }

            if glued_comma && state.has_item {
                state.flush();
            }
        }
        state.finish()
    }
}
