//! Subscriber registry
//!
//! Maps each [`SubscriberId`] to its [`RegistrationEntry`]. The registry only
//! stores entries; evaluation and notification are driven by the router.

use crate::matcher::{CompiledMatcher, MatchResult, MatcherKind};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a subscriber
///
/// Identities are unique for the whole process, so a subscriber can move
/// between routers without colliding with another subscriber's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Allocate a fresh identity
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receives match results for a registered template
///
/// Called once at registration and then on every dispatch pass. The router
/// holds no internal borrows while calling it, so an observer may register,
/// unregister or navigate (navigation is rejected during a pass).
pub trait RouteObserver {
    fn on_match(&self, result: &MatchResult);
}

impl<F> RouteObserver for F
where
    F: Fn(&MatchResult),
{
    fn on_match(&self, result: &MatchResult) {
        self(result);
    }
}

/// Shared observer handle stored in the registry
pub type BoxedObserver = Rc<dyn RouteObserver>;

/// One registered subscriber
#[derive(Clone)]
pub struct RegistrationEntry {
    pub kind: MatcherKind,
    /// Normalized template
    pub template: String,
    pub matcher: Rc<CompiledMatcher>,
    pub exact: bool,
    observer: BoxedObserver,
}

impl RegistrationEntry {
    pub fn new(matcher: Rc<CompiledMatcher>, exact: bool, observer: BoxedObserver) -> Self {
        Self {
            kind: matcher.kind(),
            template: matcher.template().to_string(),
            matcher,
            exact,
            observer,
        }
    }

    /// Run the matcher against `path` with this entry's exactness
    pub fn evaluate(&self, path: &str) -> MatchResult {
        self.matcher.evaluate(path, self.exact)
    }

    /// Evaluate and hand the result to the observer
    pub fn notify(&self, path: &str) {
        let result = self.evaluate(path);
        self.observer.on_match(&result);
    }
}

impl fmt::Debug for RegistrationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationEntry")
            .field("kind", &self.kind)
            .field("template", &self.template)
            .field("exact", &self.exact)
            .finish_non_exhaustive()
    }
}

/// Identity → entry map; at most one entry per identity
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    entries: HashMap<SubscriberId, RegistrationEntry>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry`, returning the entry it replaced
    pub fn insert(&mut self, id: SubscriberId, entry: RegistrationEntry) -> Option<RegistrationEntry> {
        self.entries.insert(id, entry)
    }

    /// Remove the entry for `id`; absent ids are ignored
    pub fn remove(&mut self, id: SubscriberId) -> Option<RegistrationEntry> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: SubscriberId) -> Option<&RegistrationEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Identities registered right now, in unspecified order
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
