// src/storage/scope.rs
// DOCUMENTATION: Request scopes for staged storage changes
// PURPOSE: Give every request its own staging area on a shared engine, so one
// request's teardown or save never touches another request's pending changes

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scope used by callers running outside any request (startup, CLI, tests)
pub const DETACHED: u64 = 0;

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static CURRENT_SCOPE: u64;
}

/// One request's staging scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestScope(u64);

impl RequestScope {
    /// Allocate a fresh, never reused scope
    pub fn new() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    /// Run `fut` with every storage call inside it bound to this scope
    pub async fn run<F: Future>(&self, fut: F) -> F::Output {
        CURRENT_SCOPE.scope(self.0, fut).await
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope of the calling task, or `DETACHED`
pub fn current() -> u64 {
    CURRENT_SCOPE.try_with(|id| *id).unwrap_or(DETACHED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scopes_are_distinct_and_nest() {
        assert_eq!(current(), DETACHED);

        let outer = RequestScope::new();
        let inner = RequestScope::new();
        assert_ne!(outer, inner);

        outer
            .run(async {
                assert_eq!(current(), outer.id());
                inner.run(async { assert_eq!(current(), inner.id()) }).await;
                assert_eq!(current(), outer.id());
            })
            .await;

        assert_eq!(current(), DETACHED);
    }
}
