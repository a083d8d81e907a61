//! Live-preview support
//!
//! Two small pieces layered over the router, neither required for
//! correctness: a bounded FIFO cache of recent routing results keyed on
//! content + template, and a generation counter that discards results of
//! superseded preview requests. The counter replaces the usual debounce
//! timer: each new request bumps the generation, and an in-flight result is
//! dropped on arrival if a newer request has started since.

use crate::router::{RoutedContent, Router};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use thinkerbell_core::Result;
use tracing::debug;

/// Default cache capacity
pub const DEFAULT_PREVIEW_CAPACITY: usize = 50;

/// Cache key over content and template identifier
fn cache_key(content: &str, template: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update([0u8]);
    hasher.update(template.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Bounded FIFO cache of routing results. Oldest entry is evicted first.
pub struct PreviewCache {
    capacity: usize,
    entries: HashMap<String, RoutedContent>,
    order: VecDeque<String>,
}

impl PreviewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, content: &str, template: &str) -> Option<&RoutedContent> {
        self.entries.get(&cache_key(content, template))
    }

    pub fn insert(&mut self, content: &str, template: &str, routed: RoutedContent) {
        let key = cache_key(content, template);

        if self.entries.insert(key.clone(), routed).is_some() {
            // Refreshed entry keeps a single slot; move it to the back.
            self.order.retain(|k| k != &key);
        } else if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}

/// Router wrapper for debounced live previews.
///
/// Scoring is stateless and idempotent, so a superseded request's work can
/// be discarded without side effects; only the most recent request's result
/// is delivered.
pub struct PreviewService {
    router: Router,
    cache: Mutex<PreviewCache>,
    generation: AtomicU64,
}

impl PreviewService {
    pub fn new(router: Router) -> Self {
        Self::with_capacity(router, DEFAULT_PREVIEW_CAPACITY)
    }

    pub fn with_capacity(router: Router, capacity: usize) -> Self {
        Self {
            router,
            cache: Mutex::new(PreviewCache::new(capacity)),
            generation: AtomicU64::new(0),
        }
    }

    /// Route content for a preview. Returns `None` when a newer preview
    /// request started while this one was in flight.
    pub async fn preview(&self, content: &str, template: &str) -> Result<Option<RoutedContent>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(hit) = self.cache.lock().get(content, template) {
            debug!(template, "preview cache hit");
            return Ok(Some(hit.clone()));
        }

        let routed = self.router.route(content).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(template, "discarding superseded preview result");
            return Ok(None);
        }

        self.cache.lock().insert(content, template, routed.clone());
        Ok(Some(routed))
    }

    /// Access the wrapped router directly
    pub fn router(&self) -> &Router {
        &self.router
    }
}
