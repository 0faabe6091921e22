//! # Nota
//!
//! Nota turns colloquial Indonesian sales notes such as `beli 2 nasi goreng 15rb` into
//! transaction line items, offline.
//!
//! A note goes through a meta data pre-pass (transaction type and date), a tokenizer, a
//! per-token Naive Bayes classifier, deterministic tag corrections, and a span decoder that
//! rebuilds items and normalizes amounts.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{prelude::*, stdin, BufReader};
//!
//! use nota::{Model, Parser};
//!
//! let mut f = BufReader::new(File::open("nb_model.json").unwrap());
//! let model = Model::from_json(&mut f).unwrap();
//! let parser = Parser::new(model).unwrap();
//!
//! for line in stdin().lock().lines() {
//!     let items = parser.predict(&line.unwrap());
//!     println!("{}", serde_json::to_string(&items).unwrap());
//! }
//! ```

mod decoder;
mod feature;
mod meta;
mod model;
mod number;
mod parser;
mod predictor;
mod sentence;
mod store;
mod tag;

pub mod errors;
pub mod lexicon;
pub mod rules;
pub mod worker;

pub use decoder::{LineItem, SpanDecoder, DEFAULT_CATEGORY, UNNAMED_ITEM};
pub use feature::{Feature, FeatureExtractor, FeatureKind, BOS, EOS, FEATURE_SCHEMA};
pub use meta::{MetaExtractor, ParsedMeta, TransactionType};
pub use model::Model;
pub use number::{fix_number, has_scale_suffix, parse_price, parse_quantity, NumberNormalizer};
pub use parser::{Parser, Transaction};
pub use predictor::Predictor;
pub use rules::RuleCorrector;
pub use sentence::{tokenize, Sentence, Token};
pub use store::ModelStore;
pub use tag::{EntityKind, Tag};
