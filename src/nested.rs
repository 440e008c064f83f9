//! Child path resolution for nested routes and relative links
//!
//! A route passes a [`RouteContext`] to the routes and links rendered inside
//! it. Paths starting with `/` are absolute and ignore the context; relative
//! ones are joined onto it. Joined paths are not normalized here; the router
//! normalizes every template on registration and every target on navigation.

use crate::params::RouteParams;
use std::borrow::Cow;

/// What an enclosing route exposes to its children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
    /// The route's own (resolved) template
    pub path: String,
    /// Part of the current path the route matched, `None` while inactive
    pub url: Option<String>,
    /// Parameters the route captured, `None` while inactive
    pub params: Option<RouteParams>,
}

impl RouteContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
            params: None,
        }
    }

    /// Context of an active route
    pub fn matched(path: impl Into<String>, url: impl Into<String>, params: RouteParams) -> Self {
        Self {
            path: path.into(),
            url: Some(url.into()),
            params: Some(params),
        }
    }
}

/// Join a child onto a parent path with a single `/`
///
/// # Example
///
/// ```
/// use path_navigator::build_child_path;
///
/// assert_eq!(build_child_path("/dashboard", "settings"), "/dashboard/settings");
/// assert_eq!(build_child_path("/dashboard/", "/settings"), "/dashboard/settings");
/// assert_eq!(build_child_path("", "settings"), "/settings");
/// ```
pub fn build_child_path<'a>(parent_path: &'a str, child_path: &'a str) -> Cow<'a, str> {
    let parent = parent_path.trim_end_matches('/');
    let child = child_path.trim_start_matches('/');

    if child.is_empty() {
        Cow::Borrowed(parent)
    } else {
        Cow::Owned(format!("{}/{}", parent, child))
    }
}

/// Template a route registers with, given its parent context
///
/// With `merge` the child is joined to the parent's template, so the child
/// template also carries the parent's parameters. Without it the child is
/// joined to the url the parent matched; if the parent is inactive its template
/// is used instead.
pub fn resolve_route_path<'a>(
    parent: Option<&'a RouteContext>,
    path: &'a str,
    merge: bool,
) -> Cow<'a, str> {
    let Some(parent) = parent else {
        return Cow::Borrowed(path);
    };
    if path.starts_with('/') || parent.path.is_empty() {
        return Cow::Borrowed(path);
    }

    let base = if merge {
        parent.path.as_str()
    } else {
        parent.url.as_deref().unwrap_or(&parent.path)
    };
    Cow::Owned(build_child_path(base, path).into_owned())
}

/// Navigation target of a link inside a route
///
/// Relative targets are joined to the url the enclosing route matched; they are
/// left alone when there is no enclosing route or it matched nothing.
pub fn resolve_link_target<'a>(parent: Option<&'a RouteContext>, to: &'a str) -> Cow<'a, str> {
    match parent.and_then(|p| p.url.as_deref()) {
        Some(url) if !url.is_empty() && !to.starts_with('/') => {
            Cow::Owned(build_child_path(url, to).into_owned())
        }
        _ => Cow::Borrowed(to),
    }
}
