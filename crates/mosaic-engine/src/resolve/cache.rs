//! Per-project module resolver cache
//!
//! Each module gets a slot that moves from unbuilt to building to built.
//! A build runs at most once per slot: a second thread asking for a module
//! that is being built waits for it, and a failed build returns the slot to
//! unbuilt so the next request retries.

use super::ResolverForModule;
use crate::error::ResolveError;
use crate::module::ModuleInfo;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

#[derive(Debug)]
enum SlotState {
    Unbuilt,
    Building(ThreadId),
    Built(Arc<ResolverForModule>),
}

#[derive(Debug)]
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Unbuilt),
            ready: Condvar::new(),
        }
    }
}

/// Returns a building slot to unbuilt unless the build completed
///
/// Covers both error returns and panics inside the build closure.
struct BuildGuard<'a> {
    slot: &'a Slot,
    completed: bool,
}

impl BuildGuard<'_> {
    fn complete(mut self, resolver: Arc<ResolverForModule>) {
        *self.slot.state.lock() = SlotState::Built(resolver);
        self.completed = true;
        self.slot.ready.notify_all();
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.slot.state.lock() = SlotState::Unbuilt;
            self.slot.ready.notify_all();
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of built resolvers
    pub entries: usize,
    /// Requests answered from the cache
    pub hits: usize,
    /// Requests that started a build
    pub misses: usize,
    /// Builds that completed
    pub builds: usize,
}

impl CacheStats {
    /// Get cache hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Module resolvers of one project, built lazily and at most once
#[derive(Debug, Default)]
pub struct ModuleResolverCache {
    slots: DashMap<ModuleInfo, Arc<Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    builds: AtomicUsize,
}

impl ModuleResolverCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, module: &ModuleInfo) -> Arc<Slot> {
        // Clone out of the map so no shard lock is held while building
        Arc::clone(
            self.slots
                .entry(module.clone())
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        )
    }

    /// The built resolver for `module`, without building or waiting
    ///
    /// Returns `None` while the module is unbuilt or being built.
    pub fn try_get(&self, module: &ModuleInfo) -> Option<Arc<ResolverForModule>> {
        let slot = self.slots.get(module).map(|entry| Arc::clone(entry.value()))?;
        let state = slot.state.lock();
        match &*state {
            SlotState::Built(resolver) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(resolver))
            }
            SlotState::Unbuilt | SlotState::Building(_) => None,
        }
    }

    /// The resolver for `module`, running `build` if it was never built
    ///
    /// If another thread is building the module this call waits for it. A
    /// request from the thread that is already building the module fails
    /// with [`ResolveError::ReentrantConstruction`].
    pub fn get_or_build<F>(
        &self,
        module: &ModuleInfo,
        build: F,
    ) -> Result<Arc<ResolverForModule>, ResolveError>
    where
        F: FnOnce() -> Result<ResolverForModule, ResolveError>,
    {
        let slot = self.slot(module);
        let current = thread::current().id();

        let mut state = slot.state.lock();
        loop {
            match &*state {
                SlotState::Built(resolver) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(module = %module, "resolver cache hit");
                    return Ok(Arc::clone(resolver));
                }
                SlotState::Building(owner) if *owner == current => {
                    return Err(ResolveError::ReentrantConstruction {
                        module: module.name().to_string(),
                    });
                }
                SlotState::Building(_) => {
                    tracing::trace!(module = %module, "waiting for resolver build");
                    slot.ready.wait(&mut state);
                }
                SlotState::Unbuilt => break,
            }
        }
        *state = SlotState::Building(current);
        drop(state);

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(module = %module, "resolver cache miss, building");

        let guard = BuildGuard {
            slot: &slot,
            completed: false,
        };
        match build() {
            Ok(resolver) => {
                let resolver = Arc::new(resolver);
                guard.complete(Arc::clone(&resolver));
                self.builds.fetch_add(1, Ordering::Relaxed);
                Ok(resolver)
            }
            Err(err) => {
                drop(guard);
                tracing::debug!(module = %module, error = %err, "resolver build failed");
                Err(err)
            }
        }
    }

    /// Check whether `module` is being built right now
    pub fn is_building(&self, module: &ModuleInfo) -> bool {
        self.slots
            .get(module)
            .is_some_and(|slot| matches!(*slot.state.lock(), SlotState::Building(_)))
    }

    /// Check whether `module` has a built resolver
    pub fn contains(&self, module: &ModuleInfo) -> bool {
        self.slots
            .get(module)
            .is_some_and(|slot| matches!(*slot.state.lock(), SlotState::Built(_)))
    }

    /// Number of built resolvers
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(*slot.state.lock(), SlotState::Built(_)))
            .count()
    }

    /// Check if nothing has been built
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every slot; builds in flight finish into detached slots
    pub fn invalidate_all(&self) {
        let dropped = self.slots.len();
        self.slots.clear();
        tracing::debug!(slots = dropped, "invalidated module resolver cache");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }
}
