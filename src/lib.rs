//! # Path Navigator
//!
//! A history-synchronised path router for single-page applications:
//!
//! - **Template Matching** - `/users/:id` style templates compiled once and cached
//! - **Exact and Prefix Matching** - prefix matches stop at segment boundaries
//! - **Subscribers** - routes and links register and are notified on every change
//! - **History Sync** - `go` pushes, `redirect` replaces, back/forward re-dispatches
//! - **Re-entrancy Safety** - navigation requested during notification is rejected
//!
//! # Quick Start
//!
//! ```
//! use path_navigator::*;
//! use std::rc::Rc;
//!
//! let router = Router::new(MemoryHistory::new("/"));
//! router.start();
//!
//! let observer: BoxedObserver = Rc::new(|result: &MatchResult| {
//!     if let Some(m) = result.as_route() {
//!         println!("user route active: {}", m.active);
//!     }
//! });
//! router
//!     .register_route(SubscriberId::next(), "/users/:id", true, observer)
//!     .unwrap();
//!
//! router.go("/users/42");
//! assert_eq!(router.current_path(), "/users/42");
//! ```
//!
//! # Nested Routes
//!
//! [`RouteView`] and [`NavLinkView`] keep the state a route or navigation link
//! component needs and resolve relative paths against their parent:
//!
//! ```
//! use path_navigator::*;
//!
//! let router = Router::new(MemoryHistory::new("/projects/7/tasks"));
//! router.start();
//!
//! let project = RouteView::mount(&router, None, RouteProps::new("/projects/:id")).unwrap();
//! let tasks = NavLinkView::mount(&router, Some(&project.context()), NavLinkProps::new("tasks"))
//!     .unwrap();
//!
//! assert_eq!(tasks.href(), "/projects/7/tasks");
//! assert!(tasks.is_active());
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `web` - `BrowserHistory` backend over `window.history`

#![doc(html_root_url = "https://docs.rs/path-navigator/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Matching
pub mod compiler;
pub mod matcher;
pub mod params;
pub mod path;

// Navigation core
pub mod history;
pub mod registry;
pub mod router;
pub mod state;

#[cfg(feature = "web")]
pub mod browser;

// Error handling
pub mod error;

// Collaborators
pub mod nested;
pub mod views;

// Default router instance
mod context;

#[cfg(feature = "web")]
pub use browser::BrowserHistory;
pub use compiler::{CompilerStats, PatternCompiler};
pub use context::{
    current_path, global_router, init_router, init_router_with_config, navigate, redirect,
};
pub use error::{NavigationResult, TemplateError};
pub use history::{HistoryBackend, HistoryEntry, MemoryHistory, PopHandler, PopSubscription};
pub use matcher::{CompiledMatcher, LinkMatch, MatchResult, MatcherKind, RouteMatch};
pub use nested::{build_child_path, resolve_link_target, resolve_route_path, RouteContext};
pub use params::RouteParams;
pub use path::{decode_location_path, normalize};
pub use registry::{BoxedObserver, RegistrationEntry, RouteObserver, SubscriberId, SubscriberRegistry};
pub use router::{Router, RouterConfig};
pub use state::DispatchState;
pub use views::{
    IndexRedirect, Link, NavLinkProps, NavLinkView, Redirect, RouteProps, RouteView,
};
