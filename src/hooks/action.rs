//! Action hook
//!
//! Contains:
//! - `ActionFilter` trait - for implementing filters
//! - `Next` - the remaining chain handed to each filter
//! - `ActionHook` - stores filters and runs the chain
//!
//! An `ActionHook` wraps a base action with an ordered onion of filters:
//! the first registered filter runs outermost, receives the rest of the
//! chain as `Next`, and may call it zero or more times, rewrite its
//! arguments, rewrite its result, or skip it entirely. The innermost link
//! is the base action supplied at the call site, so a hook with no filters
//! behaves exactly like a direct call.
//!
//! Registration takes `&mut self` and happens during startup only; the
//! wired hook set is then moved into `Arc` and shared read-only across
//! request tasks. Immutability during serving is enforced by construction,
//! not by locks.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::PipelineResult;

/// Trait for filter implementations
///
/// Filters are async. A filter that only observes calls `next.call(args)`
/// and returns its result; a filter that overrides returns without calling
/// `next` at all.
#[async_trait]
pub trait ActionFilter<A, O>: Send + Sync
where
    A: Send + 'static,
    O: Send + 'static,
{
    /// Run the filter with the rest of the chain
    async fn filter(&self, next: Next<'_, A, O>, args: A) -> PipelineResult<O>;
}

/// Implement ActionFilter for closures
///
/// Uses Higher-Ranked Trait Bounds (HRTB) so the closure works with any
/// lifetime of the chain it receives.
#[async_trait]
impl<A, O, F> ActionFilter<A, O> for F
where
    A: Send + 'static,
    O: Send + 'static,
    F: for<'a> Fn(Next<'a, A, O>, A) -> BoxFuture<'a, PipelineResult<O>> + Send + Sync,
{
    async fn filter(&self, next: Next<'_, A, O>, args: A) -> PipelineResult<O> {
        (self)(next, args).await
    }
}

/// Type alias for stored filters
pub type ArcFilter<A, O> = Arc<dyn ActionFilter<A, O>>;

type BaseAction<'a, A, O> = &'a (dyn Fn(A) -> BoxFuture<'static, PipelineResult<O>> + Send + Sync);

/// The remaining links of a filter chain
///
/// `Next` is `Copy`, so a filter may invoke the tail of the chain more than
/// once (retries, fan-out) as long as it can produce the arguments again.
pub struct Next<'a, A, O> {
    filters: &'a [ArcFilter<A, O>],
    base: BaseAction<'a, A, O>,
}

impl<'a, A, O> Clone for Next<'a, A, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A, O> Copy for Next<'a, A, O> {}

impl<'a, A, O> Next<'a, A, O>
where
    A: Send + 'static,
    O: Send + 'static,
{
    /// Invoke the rest of the chain, ending in the base action
    pub async fn call(self, args: A) -> PipelineResult<O> {
        match self.filters.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    filters: rest,
                    base: self.base,
                };
                head.filter(next, args).await
            }
            None => (self.base)(args).await,
        }
    }
}

/// A composable, overridable async extension point
///
/// # Example
///
/// ```ignore
/// let mut hook: ActionHook<i64, i64> = ActionHook::new();
/// hook.register(DoubleResult);          // runs first
/// hook.register(AddOneToArgs);          // runs second, closest to the base
///
/// let hook = Arc::new(hook);            // frozen: serving phase
/// let result = hook.call_action(|n| async move { Ok(n * 10) }, 3).await?;
/// ```
pub struct ActionHook<A, O> {
    filters: Vec<ArcFilter<A, O>>,
}

impl<A, O> ActionHook<A, O>
where
    A: Send + 'static,
    O: Send + 'static,
{
    /// Create a hook with no filters
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Register a filter
    ///
    /// Filters run in registration order; the first registered is the
    /// outermost link. Registration happens at startup, before the hook is
    /// shared.
    pub fn register<F>(&mut self, filter: F)
    where
        F: ActionFilter<A, O> + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    /// Register a pre-built shared filter
    pub fn register_arc(&mut self, filter: ArcFilter<A, O>) {
        self.filters.push(filter);
    }

    /// Number of registered filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if any filters are registered
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run the chain around a base action
    ///
    /// With no registered filters this is behaviorally identical to calling
    /// `action(args)` directly. Errors from filters or the base action
    /// propagate unmodified.
    pub async fn call_action<F, Fut>(&self, action: F, args: A) -> PipelineResult<O>
    where
        F: Fn(A) -> Fut + Send + Sync,
        Fut: Future<Output = PipelineResult<O>> + Send + 'static,
    {
        let base = move |args: A| -> BoxFuture<'static, PipelineResult<O>> {
            Box::pin(action(args))
        };
        let next = Next {
            filters: &self.filters,
            base: &base,
        };
        next.call(args).await
    }
}

impl<A, O> Default for ActionHook<A, O>
where
    A: Send + 'static,
    O: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, O> std::fmt::Debug for ActionHook<A, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHook")
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::PipelineError;

    async fn base_action(n: i64) -> PipelineResult<i64> {
        Ok(n * 10)
    }

    /// Records its tag, then delegates
    struct Tracer {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl ActionFilter<i64, i64> for Tracer {
        async fn filter(&self, next: Next<'_, i64, i64>, args: i64) -> PipelineResult<i64> {
            self.log.lock().unwrap().push(self.tag);
            next.call(args).await
        }
    }

    /// Adds one to the argument before delegating
    struct AddOne;

    #[async_trait]
    impl ActionFilter<i64, i64> for AddOne {
        async fn filter(&self, next: Next<'_, i64, i64>, args: i64) -> PipelineResult<i64> {
            next.call(args + 1).await
        }
    }

    /// Never calls the rest of the chain
    struct ShortCircuit;

    #[async_trait]
    impl ActionFilter<i64, i64> for ShortCircuit {
        async fn filter(&self, _next: Next<'_, i64, i64>, _args: i64) -> PipelineResult<i64> {
            Ok(-1)
        }
    }

    #[tokio::test]
    async fn test_no_filters_is_direct_call() {
        let hook: ActionHook<i64, i64> = ActionHook::new();
        assert!(hook.is_empty());

        for n in [-3, 0, 7] {
            assert_eq!(hook.call_action(base_action, n).await.unwrap(), n * 10);
        }
    }

    #[tokio::test]
    async fn test_registration_order_is_invocation_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(Tracer {
            tag: "first",
            log: log.clone(),
        });
        hook.register(Tracer {
            tag: "second",
            log: log.clone(),
        });

        // Stable across repeated calls
        for _ in 0..3 {
            hook.call_action(base_action, 1).await.unwrap();
        }
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second", "first", "second"]
        );
    }

    #[tokio::test]
    async fn test_filter_transforms_arguments() {
        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(AddOne);
        hook.register(AddOne);

        assert_eq!(hook.call_action(base_action, 1).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_filter_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(ShortCircuit);
        hook.register(Tracer {
            tag: "unreachable",
            log: log.clone(),
        });

        assert_eq!(hook.call_action(base_action, 1).await.unwrap(), -1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_can_call_next_twice() {
        struct Twice;

        #[async_trait]
        impl ActionFilter<i64, i64> for Twice {
            async fn filter(&self, next: Next<'_, i64, i64>, args: i64) -> PipelineResult<i64> {
                let first = next.call(args).await?;
                let second = next.call(args).await?;
                Ok(first + second)
            }
        }

        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(Twice);
        assert_eq!(hook.call_action(base_action, 2).await.unwrap(), 40);
    }

    #[tokio::test]
    async fn test_errors_propagate_unmodified() {
        async fn failing_action(_: i64) -> PipelineResult<i64> {
            Err(PipelineError::store("down"))
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(Tracer {
            tag: "seen",
            log: log.clone(),
        });

        let err = hook.call_action(failing_action, 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::Store(_)));
        assert_eq!(*log.lock().unwrap(), vec!["seen"]);
    }

    #[tokio::test]
    async fn test_function_filter() {
        fn add_five(next: Next<'_, i64, i64>, args: i64) -> BoxFuture<'_, PipelineResult<i64>> {
            Box::pin(async move { Ok(next.call(args).await? + 5) })
        }

        let mut hook: ActionHook<i64, i64> = ActionHook::new();
        hook.register(add_five);

        assert_eq!(hook.call_action(base_action, 1).await.unwrap(), 15);
    }
}
