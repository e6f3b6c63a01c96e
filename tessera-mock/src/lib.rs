use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use tessera_core::{BatchSink, RawResponse, TesseraError, Transport};

pub mod fixtures;

/// One request observed by a transport double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first parameter named `key`, if present.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport double that replays a fixed script of exchanges in order.
///
/// Each `get` pops the next scripted reply and records the URL and
/// parameters it was asked for, so tests can assert the exact request
/// sequence alongside the data flow. Running past the end of the script
/// fails the call.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TesseraError>>>,
    seen: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    /// Script built from status/body pairs.
    #[must_use]
    pub fn replying<B: Into<String>>(replies: impl IntoIterator<Item = (u16, B)>) -> Self {
        Self::with_script(
            replies
                .into_iter()
                .map(|(status, body)| Ok(RawResponse::new(status, body)))
                .collect::<Vec<_>>(),
        )
    }

    /// Script that may include transport-level failures.
    #[must_use]
    pub fn with_script(replies: impl IntoIterator<Item = Result<RawResponse, TesseraError>>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Requests observed so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.seen.lock().expect("request log poisoned").clone()
    }

    /// Scripted replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script poisoned").len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<RawResponse, TesseraError> {
        self.seen.lock().expect("request log poisoned").push(RecordedRequest {
            url: url.to_owned(),
            params: params.to_vec(),
        });
        self.script
            .lock()
            .expect("script poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TesseraError::transport(format!("script exhausted at {url}"))))
    }
}

/// Transport double that routes by marker instead of call order.
///
/// Each route pairs a marker string with a canned reply; a request matches
/// the first route whose marker occurs in its URL or in a parameter value.
/// Stateless replay makes it safe under concurrent partitions, where call
/// order depends on scheduling.
pub struct RoutedTransport {
    routes: Vec<(String, RawResponse)>,
    seen: Mutex<Vec<RecordedRequest>>,
}

impl RoutedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Add a route; earlier routes win when several markers match.
    #[must_use]
    pub fn route(mut self, marker: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((marker.into(), RawResponse::new(status, body)));
        self
    }

    /// Requests observed so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.seen.lock().expect("request log poisoned").clone()
    }
}

impl Default for RoutedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<RawResponse, TesseraError> {
        self.seen.lock().expect("request log poisoned").push(RecordedRequest {
            url: url.to_owned(),
            params: params.to_vec(),
        });
        self.routes
            .iter()
            .find(|(marker, _)| {
                url.contains(marker.as_str()) || params.iter().any(|(_, v)| v.contains(marker.as_str()))
            })
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| TesseraError::transport(format!("no route matches {url}")))
    }
}

/// Sink double that records every batch in memory.
pub struct MemorySink<R> {
    batches: Mutex<Vec<Vec<R>>>,
}

impl<R: Clone> MemorySink<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Batches stored so far, in hand-off order.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<R>> {
        self.batches.lock().expect("sink poisoned").clone()
    }

    /// All stored records, flattened across batches.
    #[must_use]
    pub fn records(&self) -> Vec<R> {
        self.batches
            .lock()
            .expect("sink poisoned")
            .iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl<R: Clone> Default for MemorySink<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> BatchSink<R> for MemorySink<R> {
    async fn store_batch(&self, batch: &[R]) -> Result<(), TesseraError> {
        self.batches.lock().expect("sink poisoned").push(batch.to_vec());
        Ok(())
    }
}

/// Sink double that refuses every batch, for error-path tests.
pub struct FailingSink;

#[async_trait]
impl<R: Send + Sync> BatchSink<R> for FailingSink {
    async fn store_batch(&self, _batch: &[R]) -> Result<(), TesseraError> {
        Err(TesseraError::sink("sink refused the batch"))
    }
}
