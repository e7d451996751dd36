use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// Dereference a URL (a key or controller identifier) into a JSON document.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DocumentLoader: Sync {
    async fn load(&self, url: &str) -> Result<Value, Error>;
}

/// In-memory loader over a fixed set of documents.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    documents: HashMap<String, Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn insert(&mut self, url: &str, document: Value) -> Option<Value> {
        self.documents.insert(url.to_string(), document)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DocumentLoader for StaticLoader {
    async fn load(&self, url: &str) -> Result<Value, Error> {
        match self.documents.get(url) {
            Some(document) => Ok(document.clone()),
            None => {
                log::debug!("unknown document {}", url);
                Err(Error::ResourceNotFound(url.to_string()))
            }
        }
    }
}
