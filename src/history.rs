//! History backends
//!
//! The router talks to browser history through [`HistoryBackend`]. Each
//! history entry carries a url (what the address bar shows) and an optional
//! state holding the normalized path the router wrote; the router's current
//! path is read from that state.
//!
//! [`MemoryHistory`] is an in-process stack with the same semantics, used by
//! tests and native hosts. The `web` feature adds `BrowserHistory` over
//! `window.history`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback run after a back/forward navigation changed the current entry
pub type PopHandler = Rc<dyn Fn()>;

/// Handle returned by [`HistoryBackend::subscribe_pop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopSubscription(u64);

impl PopSubscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// The history primitives the router needs
pub trait HistoryBackend {
    /// Add an entry whose url and state are both `path`
    fn push_state(&self, path: &str);

    /// Overwrite the current entry with `path`
    fn replace_state(&self, path: &str);

    /// Path stored in the current entry's state, if the router wrote one
    fn state_path(&self) -> Option<String>;

    /// Raw path of the current url, still percent-encoded
    fn location_path(&self) -> String;

    /// Run `handler` after every back/forward navigation
    fn subscribe_pop(&self, handler: PopHandler) -> PopSubscription;

    /// Detach a handler; unknown subscriptions are ignored
    fn unsubscribe_pop(&self, subscription: PopSubscription);
}

// ============================================================================
// MemoryHistory
// ============================================================================

/// One entry of the in-memory stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Url shown for this entry
    pub url: String,
    /// Path written by the router, `None` for entries it did not create
    pub state: Option<String>,
}

impl HistoryEntry {
    /// An entry the router has not touched yet
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: None,
        }
    }

    /// An entry written through push/replace
    pub fn with_state(path: &str) -> Self {
        Self {
            url: path.to_string(),
            state: Some(path.to_string()),
        }
    }
}

#[derive(Debug)]
struct HistoryStack {
    entries: Vec<HistoryEntry>,
    current: usize,
    /// Maximum stack size (0 = unlimited)
    max_size: usize,
}

impl HistoryStack {
    fn push(&mut self, entry: HistoryEntry) {
        // Pushing drops any forward history
        self.entries.truncate(self.current + 1);
        self.entries.push(entry);
        self.current += 1;

        if self.max_size > 0 && self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(0..excess);
            self.current = self.current.saturating_sub(excess);
        }
    }

    fn step(&mut self, delta: isize) -> bool {
        let Some(target) = self.current.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.entries.len() {
            return false;
        }
        self.current = target;
        true
    }
}

/// In-memory history stack
///
/// Cloning yields another handle to the same stack, so a test can keep one
/// handle while the router owns another. `back`, `forward` and `go` notify pop
/// subscribers synchronously, like a `popstate` event would.
///
/// # Example
///
/// ```
/// use path_navigator::{HistoryBackend, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push_state("/users");
/// history.push_state("/users/42");
///
/// assert!(history.back());
/// assert_eq!(history.state_path().as_deref(), Some("/users"));
/// ```
#[derive(Clone)]
pub struct MemoryHistory {
    stack: Rc<RefCell<HistoryStack>>,
    listeners: Rc<RefCell<Vec<(PopSubscription, PopHandler)>>>,
    next_subscription: Rc<Cell<u64>>,
}

impl MemoryHistory {
    const DEFAULT_MAX_SIZE: usize = 1000;

    /// Create a history whose only entry shows `initial_url`
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self::with_max_size(initial_url, Self::DEFAULT_MAX_SIZE)
    }

    /// Create with a custom stack limit (0 = unlimited)
    pub fn with_max_size(initial_url: impl Into<String>, max_size: usize) -> Self {
        Self {
            stack: Rc::new(RefCell::new(HistoryStack {
                entries: vec![HistoryEntry::new(initial_url)],
                current: 0,
                max_size,
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_subscription: Rc::new(Cell::new(1)),
        }
    }

    /// Go back one entry; returns false at the start of the stack
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Go forward one entry; returns false at the end of the stack
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries and notify pop subscribers if the move happened
    pub fn go(&self, delta: isize) -> bool {
        let moved = self.stack.borrow_mut().step(delta);
        if moved {
            self.notify_pop();
        }
        moved
    }

    fn notify_pop(&self) {
        // Handlers may touch the history again, so no borrow is held while they run.
        let handlers: Vec<PopHandler> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn current_entry(&self) -> HistoryEntry {
        let stack = self.stack.borrow();
        stack.entries[stack.current].clone()
    }

    pub fn current_url(&self) -> String {
        self.current_entry().url
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.borrow().entries.clone()
    }

    pub fn current_index(&self) -> usize {
        self.stack.borrow().current
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    /// Always false: the stack holds at least the initial entry
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.borrow().current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let stack = self.stack.borrow();
        stack.current + 1 < stack.entries.len()
    }

    /// Number of attached pop handlers
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &stack.entries)
            .field("current", &stack.current)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl HistoryBackend for MemoryHistory {
    fn push_state(&self, path: &str) {
        self.stack.borrow_mut().push(HistoryEntry::with_state(path));
    }

    fn replace_state(&self, path: &str) {
        let mut stack = self.stack.borrow_mut();
        let current = stack.current;
        stack.entries[current] = HistoryEntry::with_state(path);
    }

    fn state_path(&self) -> Option<String> {
        self.current_entry().state
    }

    fn location_path(&self) -> String {
        self.current_url()
    }

    fn subscribe_pop(&self, handler: PopHandler) -> PopSubscription {
        let subscription = PopSubscription::new(self.next_subscription.get());
        self.next_subscription.set(subscription.id() + 1);
        self.listeners.borrow_mut().push((subscription, handler));
        subscription
    }

    fn unsubscribe_pop(&self, subscription: PopSubscription) {
        self.listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != subscription);
    }
}
