use std::io::Read;

use once_cell::sync::OnceCell;

use crate::decoder::LineItem;
use crate::errors::Result;
use crate::model::Model;
use crate::parser::{Parser, Transaction};

/// Holder of a [`Parser`] that is loaded once and shared by every caller.
///
/// Initialization is memoized: after a successful load, further calls return the loaded parser
/// without running the loader again. Concurrent calls wait for the one in progress. A failed
/// load leaves the store empty.
///
/// Predictions made before the store is loaded return no items.
///
/// # Examples
///
/// ```
/// use nota::ModelStore;
///
/// static STORE: ModelStore = ModelStore::new();
///
/// assert!(!STORE.is_ready());
/// assert!(STORE.predict("kopi 5rb").is_empty());
/// ```
#[derive(Default)]
pub struct ModelStore {
    parser: OnceCell<Parser>,
}

impl ModelStore {
    pub const fn new() -> Self {
        Self {
            parser: OnceCell::new(),
        }
    }

    /// Loads the model unless it is already loaded.
    ///
    /// # Arguments
    ///
    /// * `load` - Function producing the model. It is called at most once per successful load.
    ///
    /// # Errors
    ///
    /// Errors of `load` and of the parser construction are returned as is.
    pub fn init_with<F>(&self, load: F) -> Result<&Parser>
    where
        F: FnOnce() -> Result<Model>,
    {
        self.parser.get_or_try_init(|| {
            let model = load()?;
            let parser = Parser::new(model)?;
            log::info!("model store is ready");
            Ok(parser)
        })
    }

    /// Loads a JSON model unless a model is already loaded.
    pub fn init_from_json<R>(&self, rdr: &mut R) -> Result<&Parser>
    where
        R: Read,
    {
        self.init_with(|| Model::from_json(rdr))
    }

    pub fn is_ready(&self) -> bool {
        self.parser.get().is_some()
    }

    /// Returns the loaded parser, if any.
    pub fn get(&self) -> Option<&Parser> {
        self.parser.get()
    }

    fn ready_parser(&self) -> Option<&Parser> {
        let parser = self.parser.get();
        if parser.is_none() {
            log::warn!("prediction requested before the model was loaded");
        }
        parser
    }

    /// Parses a note into line items, or returns an empty list if no model is loaded.
    pub fn predict(&self, text: &str) -> Vec<LineItem> {
        self.ready_parser()
            .map_or_else(Vec::new, |parser| parser.predict(text))
    }

    /// Parses a note, or returns `None` if no model is loaded.
    pub fn process(&self, text: &str) -> Option<Transaction> {
        self.ready_parser().map(|parser| parser.process(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::errors::NotaError;
    use crate::model::tests::{toy_model, TOY_MODEL};

    #[test]
    fn test_predict_before_init() {
        let store = ModelStore::new();

        assert!(!store.is_ready());
        assert!(store.predict("beli 2 nasi goreng 15rb").is_empty());
        assert!(store.process("beli 2 nasi goreng 15rb").is_none());
    }

    #[test]
    fn test_init_once() {
        let store = ModelStore::new();
        let mut calls = 0;
        store
            .init_with(|| {
                calls += 1;
                Ok(toy_model())
            })
            .unwrap();
        store
            .init_with(|| {
                calls += 1;
                Ok(toy_model())
            })
            .unwrap();

        assert_eq!(1, calls);
        assert!(store.is_ready());
        assert_eq!(1, store.predict("beli 2 nasi goreng 15rb").len());
    }

    #[test]
    fn test_failed_init_leaves_store_empty() {
        let store = ModelStore::new();
        let result = store.init_with(|| Err(NotaError::invalid_model("unreachable")));

        assert!(result.is_err());
        assert!(!store.is_ready());
        assert!(store.predict("kopi 5rb").is_empty());

        store.init_with(|| Ok(toy_model())).unwrap();

        assert!(store.is_ready());
    }

    #[test]
    fn test_predict_from_threads() {
        static STORE: ModelStore = ModelStore::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        thread::scope(|s| {
            let handles = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        STORE
                            .init_with(|| {
                                calls.fetch_add(1, Ordering::SeqCst);
                                Ok(toy_model())
                            })
                            .unwrap();
                        STORE.predict("beli 2 nasi goreng 15rb")
                    })
                })
                .collect::<Vec<_>>();
            for handle in handles {
                let items = handle.join().unwrap();

                assert_eq!(1, items.len());
                assert_eq!("nasi goreng", items[0].item_name);
            }
        });

        assert_eq!(1, counter.load(Ordering::SeqCst));
    }

    #[test]
    fn test_init_from_json() {
        let store = ModelStore::new();
        store.init_from_json(&mut TOY_MODEL.as_bytes()).unwrap();

        assert!(store.get().is_some());
    }

    #[test]
    fn test_init_from_broken_json() {
        let store = ModelStore::new();
        let result = store.init_from_json(&mut r#"{"classes": ["O"]}"#.as_bytes());

        assert!(result.is_err());
        assert!(!store.is_ready());
    }
}
