//! `window.history` backend (feature `web`)

use crate::history::{HistoryBackend, PopHandler, PopSubscription};
use crate::warn_log;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

type PopClosure = Closure<dyn FnMut(web_sys::Event)>;

/// History backend over the browser's `History` and `Location` objects
///
/// The router's path is stored as the entry state (a plain string), so
/// [`HistoryBackend::state_path`] returns `None` for entries created outside the
/// router, e.g. the initial page load.
pub struct BrowserHistory {
    window: web_sys::Window,
    listeners: RefCell<HashMap<u64, PopClosure>>,
    next_subscription: Cell<u64>,
}

impl BrowserHistory {
    /// Returns `None` outside a browser window (e.g. in a worker)
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            window,
            listeners: RefCell::new(HashMap::new()),
            next_subscription: Cell::new(1),
        })
    }

    fn history(&self) -> Option<web_sys::History> {
        self.window.history().ok()
    }
}

impl HistoryBackend for BrowserHistory {
    fn push_state(&self, path: &str) {
        let Some(history) = self.history() else {
            return;
        };
        if let Err(err) = history.push_state_with_url(&JsValue::from_str(path), "", Some(path)) {
            warn_log!("pushState({}) failed: {:?}", path, err);
        }
    }

    fn replace_state(&self, path: &str) {
        let Some(history) = self.history() else {
            return;
        };
        if let Err(err) = history.replace_state_with_url(&JsValue::from_str(path), "", Some(path))
        {
            warn_log!("replaceState({}) failed: {:?}", path, err);
        }
    }

    fn state_path(&self) -> Option<String> {
        self.history()?.state().ok()?.as_string()
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn subscribe_pop(&self, handler: PopHandler) -> PopSubscription {
        let subscription = PopSubscription::new(self.next_subscription.get());
        self.next_subscription.set(subscription.id() + 1);

        let callback = PopClosure::wrap(Box::new(move |_event: web_sys::Event| handler()));
        if let Err(err) = self
            .window
            .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
        {
            warn_log!("failed to attach popstate listener: {:?}", err);
        }
        self.listeners
            .borrow_mut()
            .insert(subscription.id(), callback);
        subscription
    }

    fn unsubscribe_pop(&self, subscription: PopSubscription) {
        let Some(callback) = self.listeners.borrow_mut().remove(&subscription.id()) else {
            return;
        };
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
        {
            warn_log!("failed to detach popstate listener: {:?}", err);
        }
    }
}

impl Drop for BrowserHistory {
    fn drop(&mut self) {
        for (_, callback) in self.listeners.get_mut().drain() {
            let _ = self
                .window
                .remove_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
        }
    }
}
