//! Headless route and link subscribers
//!
//! These types carry the routing half of the UI components that sit on top
//! of the router: they resolve their paths against the enclosing
//! [`RouteContext`], register with the router, track what they would render
//! and unregister when dropped. Rendering is left to the host toolkit, which
//! can poll [`RouteView::render_count`] / [`NavLinkView::render_count`] to
//! know when state changed.

use crate::error::{NavigationResult, TemplateError};
use crate::matcher::MatchResult;
use crate::nested::{resolve_link_target, resolve_route_path, RouteContext};
use crate::params::RouteParams;
use crate::registry::{RouteObserver, SubscriberId};
use crate::router::Router;
use crate::trace_log;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

// ============================================================================
// RouteView
// ============================================================================

/// Properties of a route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteProps {
    pub path: String,
    /// Only match the full path, not children of it
    pub exact: bool,
    /// Join a relative path to the parent's template instead of its matched url
    pub merge: bool,
}

impl RouteProps {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// The index route: empty template, exact
    pub fn index() -> Self {
        Self::new("").exact(true)
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }
}

#[derive(Debug, Default)]
struct RouteSlot {
    url: RefCell<Option<String>>,
    params: RefCell<Option<RouteParams>>,
    renders: Cell<usize>,
}

impl RouteObserver for RouteSlot {
    fn on_match(&self, result: &MatchResult) {
        let Some(m) = result.as_route() else {
            return;
        };
        // A re-registered template can capture different params from the same url
        if *self.url.borrow() == m.matched_url && *self.params.borrow() == m.params {
            return;
        }
        *self.url.borrow_mut() = m.matched_url.clone();
        *self.params.borrow_mut() = m.params.clone();
        self.renders.set(self.renders.get() + 1);
    }
}

/// A mounted route
///
/// # Example
///
/// ```
/// use path_navigator::{MemoryHistory, RouteProps, RouteView, Router};
///
/// let router = Router::new(MemoryHistory::new("/users/42"));
/// router.start();
///
/// let users = RouteView::mount(&router, None, RouteProps::new("/users/:id")).unwrap();
/// assert!(users.is_rendered());
/// assert_eq!(users.params().unwrap().get("id"), Some("42"));
///
/// let posts = RouteView::mount(&router, Some(&users.context()), RouteProps::new("posts")).unwrap();
/// assert_eq!(posts.template(), "/users/42/posts");
/// assert!(!posts.is_rendered());
/// ```
#[derive(Debug)]
pub struct RouteView {
    router: Weak<Router>,
    id: SubscriberId,
    template: String,
    props: RouteProps,
    slot: Rc<RouteSlot>,
}

impl RouteView {
    /// Resolve the template against `parent` and register it
    pub fn mount(
        router: &Rc<Router>,
        parent: Option<&RouteContext>,
        props: RouteProps,
    ) -> Result<Self, TemplateError> {
        let mut view = Self {
            router: Rc::downgrade(router),
            id: SubscriberId::next(),
            template: String::new(),
            props: RouteProps::default(),
            slot: Rc::new(RouteSlot::default()),
        };
        view.update(parent, props)?;
        Ok(view)
    }

    /// Re-register after the parent context or the props changed
    ///
    /// On error the previous registration stays in place.
    pub fn update(
        &mut self,
        parent: Option<&RouteContext>,
        props: RouteProps,
    ) -> Result<(), TemplateError> {
        let template = resolve_route_path(parent, &props.path, props.merge).into_owned();
        if let Some(router) = self.router.upgrade() {
            let observer: Rc<RouteSlot> = Rc::clone(&self.slot);
            router.register_route(self.id, &template, props.exact, observer)?;
        }
        trace_log!("Route {} mounted at '{}'", self.id, template);
        self.template = template;
        self.props = props;
        Ok(())
    }

    /// Context handed to nested routes and links
    pub fn context(&self) -> RouteContext {
        RouteContext {
            path: self.template.clone(),
            url: self.matched_url(),
            params: self.params(),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// The resolved (unnormalized) template registered with the router
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn props(&self) -> &RouteProps {
        &self.props
    }

    /// Whether the route's content is shown
    pub fn is_rendered(&self) -> bool {
        self.slot.url.borrow().is_some()
    }

    pub fn matched_url(&self) -> Option<String> {
        self.slot.url.borrow().clone()
    }

    pub fn params(&self) -> Option<RouteParams> {
        self.slot.params.borrow().clone()
    }

    /// Number of state changes since mounting
    pub fn render_count(&self) -> usize {
        self.slot.renders.get()
    }
}

impl Drop for RouteView {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.unregister(self.id);
        }
    }
}

// ============================================================================
// NavLinkView
// ============================================================================

/// Properties of a navigation link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkProps {
    pub to: String,
    pub exact: bool,
    pub class_name: String,
    pub active_class_name: String,
}

impl NavLinkProps {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            exact: false,
            class_name: String::new(),
            active_class_name: "active".to_string(),
        }
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn active_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.active_class_name = class_name.into();
        self
    }
}

#[derive(Debug, Default)]
struct LinkSlot {
    active: Cell<bool>,
    renders: Cell<usize>,
}

impl RouteObserver for LinkSlot {
    fn on_match(&self, result: &MatchResult) {
        let active = result.is_active();
        if self.active.replace(active) != active {
            self.renders.set(self.renders.get() + 1);
        }
    }
}

/// A mounted link that tracks whether its target is the current location
#[derive(Debug)]
pub struct NavLinkView {
    router: Weak<Router>,
    id: SubscriberId,
    target: String,
    props: NavLinkProps,
    slot: Rc<LinkSlot>,
}

impl NavLinkView {
    pub fn mount(
        router: &Rc<Router>,
        parent: Option<&RouteContext>,
        props: NavLinkProps,
    ) -> Result<Self, TemplateError> {
        let mut view = Self {
            router: Rc::downgrade(router),
            id: SubscriberId::next(),
            target: String::new(),
            props: NavLinkProps::new(""),
            slot: Rc::new(LinkSlot::default()),
        };
        view.update(parent, props)?;
        Ok(view)
    }

    pub fn update(
        &mut self,
        parent: Option<&RouteContext>,
        props: NavLinkProps,
    ) -> Result<(), TemplateError> {
        let target = resolve_link_target(parent, &props.to).into_owned();
        if let Some(router) = self.router.upgrade() {
            let observer: Rc<LinkSlot> = Rc::clone(&self.slot);
            router.register_link(self.id, &target, props.exact, observer)?;
        }
        self.target = target;
        self.props = props;
        Ok(())
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Resolved navigation target
    pub fn href(&self) -> &str {
        &self.target
    }

    pub fn is_active(&self) -> bool {
        self.slot.active.get()
    }

    /// Base class, plus the active class while the link is active
    pub fn class_name(&self) -> String {
        let NavLinkProps {
            class_name,
            active_class_name,
            ..
        } = &self.props;

        if !self.is_active() {
            return class_name.clone();
        }
        if class_name.is_empty() {
            active_class_name.clone()
        } else {
            format!("{} {}", class_name, active_class_name)
        }
    }

    /// Navigate to the target; `None` when the router is gone
    pub fn click(&self) -> Option<NavigationResult> {
        Some(self.router.upgrade()?.go(&self.target))
    }

    pub fn render_count(&self) -> usize {
        self.slot.renders.get()
    }
}

impl Drop for NavLinkView {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.unregister(self.id);
        }
    }
}

// ============================================================================
// Link / Redirect
// ============================================================================

/// A plain link: resolves its target but does not subscribe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    target: String,
}

impl Link {
    pub fn new(parent: Option<&RouteContext>, to: &str) -> Self {
        Self {
            target: resolve_link_target(parent, to).into_owned(),
        }
    }

    pub fn href(&self) -> &str {
        &self.target
    }

    /// Push the target onto history
    pub fn follow(&self, router: &Router) -> NavigationResult {
        router.go(&self.target)
    }
}

/// Replaces the current history entry when mounted
#[derive(Debug, Clone, Copy)]
pub struct Redirect;

impl Redirect {
    /// Redirect to `to`, resolved against the enclosing route
    ///
    /// Mount redirects outside of subscriber callbacks; during a dispatch pass
    /// the request is rejected.
    pub fn mount(router: &Router, parent: Option<&RouteContext>, to: &str) -> NavigationResult {
        router.redirect(&resolve_link_target(parent, to))
    }
}

/// An index route that redirects whenever it is shown
///
/// `to` is resolved against the index route itself, which matches the url of
/// the enclosing route. Mounting redirects right away if that route's path is
/// the whole current path. Redirects are rejected
/// during a dispatch pass, so after later navigations the host calls
/// [`apply`](IndexRedirect::apply) instead of redirecting from a callback.
///
/// # Example
///
/// ```
/// use path_navigator::{MemoryHistory, Redirect, RouteProps, RouteView, Router};
///
/// let router = Router::new(MemoryHistory::new("/settings"));
/// router.start();
///
/// let settings = RouteView::mount(&router, None, RouteProps::new("/settings")).unwrap();
/// let _index = Redirect::index(&router, Some(&settings.context()), "profile").unwrap();
///
/// assert_eq!(router.current_path(), "/settings/profile");
/// ```
#[derive(Debug)]
pub struct IndexRedirect {
    route: RouteView,
    to: String,
}

impl IndexRedirect {
    pub fn mount(
        router: &Rc<Router>,
        parent: Option<&RouteContext>,
        to: &str,
    ) -> Result<Self, TemplateError> {
        let route = RouteView::mount(router, parent, RouteProps::index())?;
        let redirect = Self {
            route,
            to: to.to_string(),
        };
        redirect.apply();
        Ok(redirect)
    }

    /// Redirect if the index route is shown; `None` when it is not
    pub fn apply(&self) -> Option<NavigationResult> {
        if !self.route.is_rendered() {
            return None;
        }
        let router = self.route.router.upgrade()?;
        let target = self.target();
        trace_log!("Index route {} redirects to '{}'", self.route.id(), target);
        Some(router.redirect(&target))
    }

    /// Redirect target for the current match
    pub fn target(&self) -> String {
        resolve_link_target(Some(&self.route.context()), &self.to).into_owned()
    }

    /// The underlying index route
    pub fn route(&self) -> &RouteView {
        &self.route
    }
}

impl Redirect {
    /// Mount an [`IndexRedirect`] under `parent`
    pub fn index(
        router: &Rc<Router>,
        parent: Option<&RouteContext>,
        to: &str,
    ) -> Result<IndexRedirect, TemplateError> {
        IndexRedirect::mount(router, parent, to)
    }
}
