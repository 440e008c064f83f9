//! Thread-local default router
//!
//! UI code that cannot thread an `Rc<Router>` through every component can use
//! the default instance instead. Routers are `!Send`, so there is one default
//! per thread; in a browser that is the whole page.

use crate::debug_log;
use crate::error::NavigationResult;
use crate::history::HistoryBackend;
use crate::router::{Router, RouterConfig};
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static GLOBAL_ROUTER: RefCell<Option<Rc<Router>>> = const { RefCell::new(None) };
}

/// Install and start a default router over `history`
///
/// A previously installed default stops listening and is replaced.
///
/// # Example
///
/// ```
/// use path_navigator::{global_router, init_router, MemoryHistory};
///
/// init_router(MemoryHistory::new("/inbox/"));
/// assert_eq!(global_router().current_path(), "/inbox");
/// ```
pub fn init_router(history: impl HistoryBackend + 'static) -> Rc<Router> {
    install(Router::new(history))
}

/// Like [`init_router`] with explicit options
pub fn init_router_with_config(
    history: impl HistoryBackend + 'static,
    config: RouterConfig,
) -> Rc<Router> {
    install(Router::with_config(history, config))
}

fn install(router: Rc<Router>) -> Rc<Router> {
    let previous = GLOBAL_ROUTER.with(|slot| slot.borrow_mut().replace(Rc::clone(&router)));
    if let Some(previous) = previous {
        previous.unlisten();
    }
    router.start();
    router
}

/// The default router, created over the default backend on first use
pub fn global_router() -> Rc<Router> {
    if let Some(router) = GLOBAL_ROUTER.with(|slot| slot.borrow().clone()) {
        return router;
    }
    debug_log!("Creating default router");
    install(Router::with_backend(default_backend(), RouterConfig::default()))
}

#[cfg(feature = "web")]
fn default_backend() -> Box<dyn HistoryBackend> {
    match crate::browser::BrowserHistory::new() {
        Some(history) => Box::new(history),
        None => Box::new(crate::history::MemoryHistory::default()),
    }
}

#[cfg(not(feature = "web"))]
fn default_backend() -> Box<dyn HistoryBackend> {
    Box::new(crate::history::MemoryHistory::default())
}

/// Push a path on the default router
pub fn navigate(to: &str) -> NavigationResult {
    global_router().go(to)
}

/// Replace the current entry on the default router
pub fn redirect(to: &str) -> NavigationResult {
    global_router().redirect(to)
}

/// Current path of the default router
pub fn current_path() -> String {
    global_router().current_path()
}
