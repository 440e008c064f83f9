//! Navigation controller and notification dispatcher
//!
//! [`Router`] owns the subscriber registry, the template caches and the
//! dispatch state, and drives a [`HistoryBackend`]. All operations run to
//! completion synchronously on the calling thread.
//!
//! A dispatch pass walks a snapshot of the registered identities. Entries
//! removed during the pass are skipped; entries added during the pass are left
//! for the next one (they were already notified at registration).

use crate::compiler::{CompilerStats, PatternCompiler};
use crate::error::{NavigationResult, TemplateError};
use crate::history::{HistoryBackend, PopSubscription};
use crate::matcher::CompiledMatcher;
use crate::path::{decode_location_path, normalize};
use crate::registry::{BoxedObserver, RegistrationEntry, SubscriberId, SubscriberRegistry};
use crate::state::{DispatchGuard, DispatchState};
use crate::{debug_log, trace_log, warn_log};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Router options
///
/// # Example
///
/// ```
/// use path_navigator::{MemoryHistory, Router, RouterConfig};
///
/// let config = RouterConfig::new().decode_location(false);
/// let router = Router::with_config(MemoryHistory::new("/a%20b"), config);
/// router.start();
///
/// assert_eq!(router.current_path(), "/a%20b");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Percent-decode paths read from the location
    pub decode_location: bool,
    /// Run a dispatch pass as part of [`Router::start`]
    pub dispatch_on_start: bool,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode_location(mut self, decode: bool) -> Self {
        self.decode_location = decode;
        self
    }

    pub fn dispatch_on_start(mut self, dispatch: bool) -> Self {
        self.dispatch_on_start = dispatch;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            decode_location: true,
            dispatch_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum HistoryUpdate {
    Push,
    Replace,
}

impl HistoryUpdate {
    fn verb(self) -> &'static str {
        match self {
            HistoryUpdate::Push => "go",
            HistoryUpdate::Replace => "redirect",
        }
    }
}

/// Path router synchronised with a history backend
///
/// Routers are handed out as `Rc<Router>`; [`start`](Router::start) needs the
/// `Rc` to hand a weak reference to the back/forward listener.
pub struct Router {
    history: Box<dyn HistoryBackend>,
    config: RouterConfig,
    registry: RefCell<SubscriberRegistry>,
    compiler: RefCell<PatternCompiler>,
    state: Cell<DispatchState>,
    /// A back/forward event arrived mid-pass
    pending_pop: Cell<bool>,
    listening: Cell<bool>,
    pop_subscription: Cell<Option<PopSubscription>>,
}

impl Router {
    /// Create a router with default options; call [`start`](Router::start) to activate it
    pub fn new(history: impl HistoryBackend + 'static) -> Rc<Self> {
        Self::with_config(history, RouterConfig::default())
    }

    pub fn with_config(history: impl HistoryBackend + 'static, config: RouterConfig) -> Rc<Self> {
        Self::with_backend(Box::new(history), config)
    }

    pub fn with_backend(history: Box<dyn HistoryBackend>, config: RouterConfig) -> Rc<Self> {
        Rc::new(Self {
            history,
            config,
            registry: RefCell::new(SubscriberRegistry::new()),
            compiler: RefCell::new(PatternCompiler::new()),
            state: Cell::new(DispatchState::Idle),
            pending_pop: Cell::new(false),
            listening: Cell::new(false),
            pop_subscription: Cell::new(None),
        })
    }

    // ------------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------------

    /// Adopt the current location and start following back/forward events
    ///
    /// The location path is decoded once, normalized and written back with
    /// `replace_state`, so the stored path and the visible url agree. Calling
    /// `start` while already listening does nothing.
    pub fn start(self: &Rc<Self>) {
        if self.listening.replace(true) {
            return;
        }

        let path = self.location_path();
        self.history.replace_state(&path);
        debug_log!("Router started at '{}'", path);

        if self.config.dispatch_on_start {
            self.refresh();
        }

        let router = Rc::downgrade(self);
        let subscription = self.history.subscribe_pop(Rc::new(move || {
            if let Some(router) = router.upgrade() {
                router.on_pop();
            }
        }));
        self.pop_subscription.set(Some(subscription));
    }

    /// Stop following back/forward events; no-op when not listening
    pub fn unlisten(&self) {
        if let Some(subscription) = self.pop_subscription.take() {
            self.history.unsubscribe_pop(subscription);
            debug_log!("Router stopped listening");
        }
        self.listening.set(false);
    }

    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }

    fn on_pop(&self) {
        trace_log!("Back/forward navigation to '{}'", self.current_path());
        self.refresh();
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// The path stored in the current history entry
    ///
    /// Entries the router did not write (before [`start`](Router::start), or
    /// fragment navigations in a browser) fall back to the location path,
    /// decoded and normalized the same way `start` does it.
    pub fn current_path(&self) -> String {
        self.history
            .state_path()
            .unwrap_or_else(|| self.location_path())
    }

    fn location_path(&self) -> String {
        let raw = self.history.location_path();
        let decoded = if self.config.decode_location {
            decode_location_path(&raw)
        } else {
            raw
        };
        normalize(&decoded)
    }

    /// Push `to` onto history and notify subscribers
    ///
    /// # Example
    ///
    /// ```
    /// use path_navigator::{MemoryHistory, Router};
    ///
    /// let router = Router::new(MemoryHistory::new("/"));
    /// router.start();
    ///
    /// assert!(router.go("/users//42/").is_navigated());
    /// assert_eq!(router.current_path(), "/users/42");
    /// assert!(router.go("/users/42").is_unchanged());
    /// ```
    pub fn go(&self, to: &str) -> NavigationResult {
        self.navigate(to, HistoryUpdate::Push)
    }

    /// Replace the current history entry with `to` and notify subscribers
    pub fn redirect(&self, to: &str) -> NavigationResult {
        self.navigate(to, HistoryUpdate::Replace)
    }

    fn navigate(&self, to: &str, update: HistoryUpdate) -> NavigationResult {
        if self.is_dispatching() {
            warn_log!(
                "Router.{}('{}') called during a dispatch pass; ignored",
                update.verb(),
                to
            );
            return NavigationResult::Rejected {
                requested: to.to_string(),
            };
        }

        let path = normalize(to);
        if path == self.current_path() {
            trace_log!("Router.{}('{}'): already current", update.verb(), path);
            return NavigationResult::Unchanged { path };
        }

        match update {
            HistoryUpdate::Push => self.history.push_state(&path),
            HistoryUpdate::Replace => self.history.replace_state(&path),
        }
        debug_log!("Router.{} -> '{}'", update.verb(), path);

        self.refresh();
        NavigationResult::Navigated { path }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register (or re-register) a route subscriber
    ///
    /// The observer is called once immediately with the result for the
    /// current path. On a template error the registry is left untouched.
    pub fn register_route(
        &self,
        id: SubscriberId,
        template: &str,
        exact: bool,
        observer: BoxedObserver,
    ) -> Result<(), TemplateError> {
        let matcher = self.compiler.borrow_mut().compile_route(template)?;
        self.register(id, matcher, exact, observer);
        Ok(())
    }

    /// Register (or re-register) a link subscriber
    pub fn register_link(
        &self,
        id: SubscriberId,
        url: &str,
        exact: bool,
        observer: BoxedObserver,
    ) -> Result<(), TemplateError> {
        let matcher = self.compiler.borrow_mut().compile_link(url)?;
        self.register(id, matcher, exact, observer);
        Ok(())
    }

    fn register(
        &self,
        id: SubscriberId,
        matcher: Rc<CompiledMatcher>,
        exact: bool,
        observer: BoxedObserver,
    ) {
        let entry = RegistrationEntry::new(matcher, exact, observer);
        debug_log!(
            "Registering {:?} subscriber {} for '{}' (exact: {})",
            entry.kind,
            id,
            entry.template,
            exact
        );
        self.registry.borrow_mut().insert(id, entry.clone());
        entry.notify(&self.current_path());
    }

    /// Remove a subscriber; unknown ids are ignored
    pub fn unregister(&self, id: SubscriberId) {
        if self.registry.borrow_mut().remove(id).is_none() {
            trace_log!("unregister({}): not registered", id);
        }
    }

    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.registry.borrow().contains(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().len()
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    pub fn is_dispatching(&self) -> bool {
        self.state.get().is_dispatching()
    }

    /// Run a pass now, or right after the running one
    ///
    /// Only back/forward events can arrive mid-pass (synchronous backends);
    /// any number of them collapse into a single follow-up pass.
    fn refresh(&self) {
        if self.is_dispatching() {
            self.pending_pop.set(true);
            return;
        }

        self.dispatch_pass();
        while self.pending_pop.replace(false) {
            self.dispatch_pass();
        }
    }

    fn dispatch_pass(&self) {
        let _pass = DispatchGuard::begin(&self.state);
        let path = self.current_path();
        let snapshot = self.registry.borrow().snapshot();
        trace_log!(
            "Dispatching '{}' to {} subscribers",
            path,
            snapshot.len()
        );

        for id in snapshot {
            let entry = self.registry.borrow().get(id).cloned();
            // Removed by an earlier callback in this pass
            let Some(entry) = entry else {
                continue;
            };
            entry.notify(&path);
        }
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    pub fn compiler_stats(&self) -> CompilerStats {
        self.compiler.borrow().stats()
    }

    pub fn history(&self) -> &dyn HistoryBackend {
        self.history.as_ref()
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        if let Some(subscription) = self.pop_subscription.take() {
            self.history.unsubscribe_pop(subscription);
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current_path", &self.current_path())
            .field("state", &self.state.get())
            .field("listening", &self.listening.get())
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
