//! Process-wide invalidation registry.
//!
//! Every component that memoizes derived results registers its own clear
//! function here. A data-mutation event calls `invalidate_all`, which runs
//! the invalidators in registration order and stops at the first failure.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{ConcordanceError, Result};

/// Something that can drop its memoized state.
pub trait Invalidate: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Drop memoized state.
    fn invalidate(&self) -> Result<()>;
}

/// Adapter turning a closure into an `Invalidate`.
pub struct NamedInvalidator<F> {
    name: String,
    callback: F,
}

impl<F> NamedInvalidator<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> Invalidate for NamedInvalidator<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invalidate(&self) -> Result<()> {
        (self.callback)()
    }
}

/// Wrap a closure as a shareable invalidator handle.
pub fn invalidator<F>(name: impl Into<String>, callback: F) -> Arc<dyn Invalidate>
where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    Arc::new(NamedInvalidator::new(name, callback))
}

fn same_invalidator(a: &Arc<dyn Invalidate>, b: &Arc<dyn Invalidate>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Ordered list of invalidators.
///
/// Built once at startup and handed by `Arc` to every cache-owning component.
/// Identity is the handle: registering the same `Arc` twice is a no-op.
#[derive(Default)]
pub struct CacheRegistry {
    invalidators: RwLock<Vec<Arc<dyn Invalidate>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invalidator. Returns `false` if it was already registered.
    pub fn register(&self, invalidator: Arc<dyn Invalidate>) -> bool {
        let mut invalidators = self.invalidators.write();
        if invalidators.iter().any(|i| same_invalidator(i, &invalidator)) {
            return false;
        }
        invalidators.push(invalidator);
        true
    }

    /// Remove a previously registered invalidator.
    pub fn unregister(&self, invalidator: &Arc<dyn Invalidate>) -> Result<()> {
        let mut invalidators = self.invalidators.write();
        match invalidators.iter().position(|i| same_invalidator(i, invalidator)) {
            Some(index) => {
                invalidators.remove(index);
                Ok(())
            }
            None => Err(ConcordanceError::InvalidatorNotRegistered(
                invalidator.name().to_string(),
            )),
        }
    }

    /// Run every invalidator in registration order.
    ///
    /// Fail-fast: the first error aborts the pass and later invalidators are
    /// not called. Returns the number of invalidators run.
    pub fn invalidate_all(&self) -> Result<usize> {
        // Snapshot so callbacks may touch the registry.
        let snapshot: Vec<Arc<dyn Invalidate>> = self.invalidators.read().clone();

        for (index, invalidator) in snapshot.iter().enumerate() {
            if let Err(e) = invalidator.invalidate() {
                warn!(
                    invalidator = invalidator.name(),
                    skipped = snapshot.len() - index - 1,
                    error = %e,
                    "invalidation aborted"
                );
                return Err(ConcordanceError::Invalidation {
                    name: invalidator.name().to_string(),
                    source: Box::new(e),
                });
            }
        }

        info!(count = snapshot.len(), "invalidated all caches");
        Ok(snapshot.len())
    }

    /// Names of registered invalidators, in order.
    pub fn names(&self) -> Vec<String> {
        self.invalidators
            .read()
            .iter()
            .map(|i| i.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.invalidators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.invalidators.read().is_empty()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("invalidators", &self.names())
            .finish()
    }
}
