//! Message protocol for running the parser in an isolated worker.
//!
//! Every message is a JSON object whose `type` field names the variant:
//!
//! ```text
//! -> {"type":"PARSE_TEXT","payload":"beli 2 nasi goreng 15rb"}
//! <- {"type":"PARSE_RESULT","data":[...],"meta":{...}}
//! ```
//!
//! The worker announces `READY` once its model is loaded, or `ERROR` if loading fails.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::decoder::LineItem;
use crate::errors::Result;
use crate::meta::ParsedMeta;
use crate::model::Model;
use crate::store::ModelStore;

/// Message sent to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    ParseText { payload: String },
}

/// Message sent by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Ready,
    ParseResult {
        data: Vec<LineItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<ParsedMeta>,
    },
    Error {
        error: String,
    },
}

/// Request handler backed by a [`ModelStore`].
///
/// Once loading has failed, requests are answered with `ERROR` until a later load succeeds.
#[derive(Default)]
pub struct Worker {
    store: ModelStore,
    load_error: OnceCell<String>,
}

impl Worker {
    pub const fn new() -> Self {
        Self {
            store: ModelStore::new(),
            load_error: OnceCell::new(),
        }
    }

    /// Loads the model and returns the message announcing the outcome.
    pub fn load<F>(&self, load: F) -> Response
    where
        F: FnOnce() -> Result<Model>,
    {
        match self.store.init_with(load) {
            Ok(_) => Response::Ready,
            Err(e) => {
                log::error!("failed to load the model: {}", e);
                let error = format!("failed to load the model: {e}");
                let _ = self.load_error.set(error.clone());
                Response::Error { error }
            }
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Handles a request. Before the model is loaded, texts parse to no items. After a failed
    /// load, the load error is returned instead.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::ParseText { payload } => {
                if !self.store.is_ready() {
                    if let Some(error) = self.load_error.get() {
                        return Response::Error {
                            error: error.clone(),
                        };
                    }
                }
                match self.store.process(&payload) {
                    Some(tx) => Response::ParseResult {
                        data: tx.items,
                        meta: Some(tx.meta),
                    },
                    None => Response::ParseResult {
                        data: vec![],
                        meta: None,
                    },
                }
            }
        }
    }

    /// Handles one JSON-encoded request and returns the JSON-encoded response.
    pub fn handle_json(&self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => Response::Error {
                error: format!("invalid request: {e}"),
            },
        };
        encode_response(&response)
    }
}

/// Encodes a response as a single JSON line.
pub fn encode_response(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        log::error!("failed to encode a response: {}", e);
        r#"{"type":"ERROR","error":"failed to encode the response"}"#.to_string()
    })
}
