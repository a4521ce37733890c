//! Per-session result cache.
//!
//! A session keeps every computed [`PipelineState`] keyed by its exact topic
//! string, so asking for the same topic again reuses the stored articles,
//! summaries and report instead of calling the backends.

use crate::error::Result;
use crate::models::PipelineState;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

#[derive(Debug, Default)]
pub struct SessionCache {
    states: HashMap<String, PipelineState>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, topic: &str) -> Option<&PipelineState> {
        self.states.get(topic)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Return the cached state for `topic`, running `compute` on a miss.
    ///
    /// Failed computations are not cached.
    pub async fn get_or_compute<F, Fut>(&mut self, topic: &str, compute: F) -> Result<&PipelineState>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<PipelineState>>,
    {
        if self.states.contains_key(topic) {
            debug!(%topic, "Session cache hit");
        } else {
            debug!(%topic, "Session cache miss");
            let state = compute(topic.to_string()).await?;
            self.states.insert(topic.to_string(), state);
        }
        Ok(&self.states[topic])
    }
}
