use std::fmt;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

/// A hook as seen by one pipeline run.
pub struct RegisteredHook<H: ?Sized> {
    pub name: String,
    pub priority: i32,
    pub hook: Arc<H>,
}

impl<H: ?Sized> Clone for RegisteredHook<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            priority: self.priority,
            hook: Arc::clone(&self.hook),
        }
    }
}

/// Explicit, ordered set of hooks.
///
/// Hooks run by ascending priority; equal priorities run in registration
/// order. The set may change at runtime, and each pipeline run works on a
/// [`snapshot`](Self::snapshot) taken when it starts.
pub struct HookRegistry<H: ?Sized> {
    entries: RwLock<Vec<RegisteredHook<H>>>,
}

impl<H: ?Sized> HookRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Register `hook` under `name`.
    ///
    /// Names are labels for logs and removal; duplicates are allowed.
    pub fn register(&self, name: impl Into<String>, priority: i32, hook: Arc<H>) {
        let mut entries = self.write();
        let position = entries
            .iter()
            .position(|entry| entry.priority > priority)
            .unwrap_or(entries.len());

        entries.insert(
            position,
            RegisteredHook {
                name: name.into(),
                priority,
                hook,
            },
        );
    }

    /// Remove every hook registered under `name`.
    ///
    /// # Returns
    /// True if at least one hook was removed
    pub fn unregister(&self, name: &str) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|entry| entry.name != name);
        entries.len() != before
    }

    /// Hooks in execution order, detached from the registry.
    pub fn snapshot(&self) -> Vec<RegisteredHook<H>> {
        self.read().clone()
    }

    /// Hook names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking writer cannot leave the vector half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<RegisteredHook<H>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<RegisteredHook<H>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: ?Sized> Default for HookRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for HookRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Label: Send + Sync {
        fn label(&self) -> &'static str;
    }

    struct Named(&'static str);

    impl Label for Named {
        fn label(&self) -> &'static str {
            self.0
        }
    }

    fn labels(registry: &HookRegistry<dyn Label>) -> Vec<&'static str> {
        registry
            .snapshot()
            .iter()
            .map(|entry| entry.hook.label())
            .collect()
    }

    #[test]
    fn test_empty_registry() {
        let registry: HookRegistry<dyn Label> = HookRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_orders_by_priority_then_registration() {
        let registry: HookRegistry<dyn Label> = HookRegistry::new();
        registry.register("audit", 100, Arc::new(Named("audit")));
        registry.register("shape", 0, Arc::new(Named("shape")));
        registry.register("captcha", 10, Arc::new(Named("captcha")));
        registry.register("blocklist", 10, Arc::new(Named("blocklist")));
        registry.register("early", -5, Arc::new(Named("early")));

        assert_eq!(
            labels(&registry),
            vec!["early", "shape", "captcha", "blocklist", "audit"]
        );
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_unregister_removes_all_matching() {
        let registry: HookRegistry<dyn Label> = HookRegistry::new();
        registry.register("audit", 0, Arc::new(Named("a1")));
        registry.register("other", 0, Arc::new(Named("o")));
        registry.register("audit", 1, Arc::new(Named("a2")));

        assert!(registry.unregister("audit"));
        assert_eq!(registry.names(), vec!["other".to_string()]);
        assert!(!registry.unregister("audit"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry: HookRegistry<dyn Label> = HookRegistry::new();
        registry.register("first", 0, Arc::new(Named("first")));

        let snapshot = registry.snapshot();
        registry.register("second", 0, Arc::new(Named("second")));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
