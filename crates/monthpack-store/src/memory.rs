//! In-process object sink used for dry runs and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::sink::{ObjectSink, PutObjectReceipt, PutObjectRequest};

/// Records every put in memory; clones share the same state.
#[derive(Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    objects: BTreeMap<String, PutObjectRequest>,
    order: Vec<String>,
    rejected: BTreeSet<String>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future put to `key` fail like a remote rejection.
    pub fn reject_key(&self, key: impl Into<String>) {
        self.state().rejected.insert(key.into());
    }

    /// Stored request for `key`, if any.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<PutObjectRequest> {
        self.state().objects.get(key).cloned()
    }

    /// Keys in the order they were stored.
    #[must_use]
    pub fn keys_in_order(&self) -> Vec<String> {
        self.state().order.clone()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().objects.len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectSink for MemorySink {
    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<PutObjectReceipt> {
        let mut state = self.state();
        if state.rejected.contains(&request.key) {
            return Err(StoreError::transport(
                "memory.put_object",
                request.key,
                "key rejected",
                io::Error::new(io::ErrorKind::PermissionDenied, "key rejected"),
            ));
        }
        let e_tag = format!("\"{:x}-{}\"", state.order.len() + 1, request.body.len());
        state.order.push(request.key.clone());
        state.objects.insert(request.key.clone(), request);
        drop(state);
        Ok(PutObjectReceipt { e_tag: Some(e_tag) })
    }
}
