//! Integration tests for path_navigator
//!
//! These tests drive a router over an in-memory history and verify
//! registration, navigation, back/forward handling and the behaviour of
//! subscribers that call back into the router while being notified.

use path_navigator::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn started(url: &str) -> (MemoryHistory, Rc<Router>) {
    init_logging();
    let history = MemoryHistory::new(url);
    let router = Router::new(history.clone());
    router.start();
    (history, router)
}

/// Observer that records every result it receives
#[derive(Default)]
struct Recorder {
    results: RefCell<Vec<MatchResult>>,
}

impl RouteObserver for Recorder {
    fn on_match(&self, result: &MatchResult) {
        self.results.borrow_mut().push(result.clone());
    }
}

impl Recorder {
    fn calls(&self) -> usize {
        self.results.borrow().len()
    }

    fn last(&self) -> MatchResult {
        self.results.borrow().last().cloned().unwrap()
    }
}

// ============================================================================
// Startup Tests
// ============================================================================

#[test]
fn test_startup_decodes_and_normalizes_location() {
    let (history, router) = started("/search//rust%20lang/");

    assert_eq!(router.current_path(), "/search/rust lang");
    assert_eq!(history.current_url(), "/search/rust lang");
    assert_eq!(history.len(), 1);
}

#[test]
fn test_startup_without_decoding() {
    init_logging();
    let history = MemoryHistory::new("/a%20b/");
    let router = Router::with_config(history.clone(), RouterConfig::new().decode_location(false));
    router.start();

    assert_eq!(router.current_path(), "/a%20b");
}

#[test]
fn test_startup_dispatches_to_early_subscribers() {
    init_logging();
    let history = MemoryHistory::new("/inbox");
    let router = Router::new(history);
    let recorder = Rc::new(Recorder::default());
    router
        .register_link(SubscriberId::next(), "/inbox", true, recorder.clone())
        .unwrap();
    assert_eq!(recorder.calls(), 1);

    router.start();
    assert_eq!(recorder.calls(), 2);
    assert!(recorder.last().is_active());
}

#[test]
fn test_startup_dispatch_can_be_disabled() {
    init_logging();
    let router = Router::with_config(
        MemoryHistory::new("/"),
        RouterConfig::new().dispatch_on_start(false),
    );
    let recorder = Rc::new(Recorder::default());
    router
        .register_route(SubscriberId::next(), "", false, recorder.clone())
        .unwrap();

    router.start();
    assert_eq!(recorder.calls(), 1);
}

// ============================================================================
// Matching Through The Router
// ============================================================================

#[test]
fn test_route_round_trip() {
    let (_history, router) = started("/");
    let exact = Rc::new(Recorder::default());
    let prefix = Rc::new(Recorder::default());
    router
        .register_route(SubscriberId::next(), "/user/:id", true, exact.clone())
        .unwrap();
    router
        .register_route(SubscriberId::next(), "/user/:id", false, prefix.clone())
        .unwrap();

    router.go("/user/42");
    let m = exact.last().as_route().cloned().unwrap();
    assert!(m.active);
    assert_eq!(m.matched_url.as_deref(), Some("/user/42"));
    assert_eq!(m.params.unwrap().get("id"), Some("42"));

    router.go("/user/42/edit");
    assert_eq!(
        exact.last(),
        MatchResult::Route(RouteMatch {
            active: false,
            params: None,
            matched_url: None,
        })
    );
    let m = prefix.last().as_route().cloned().unwrap();
    assert!(m.active);
    assert_eq!(m.matched_url.as_deref(), Some("/user/42"));
    assert_eq!(m.params.unwrap().get("id"), Some("42"));
}

#[test]
fn test_index_template_semantics() {
    let (_history, router) = started("/");
    let index = Rc::new(Recorder::default());
    let everything = Rc::new(Recorder::default());
    router
        .register_route(SubscriberId::next(), "", true, index.clone())
        .unwrap();
    router
        .register_route(SubscriberId::next(), "", false, everything.clone())
        .unwrap();

    assert!(index.last().is_active());
    for path in ["/a", "/a/b", "/c/d/e"] {
        router.go(path);
        assert!(!index.last().is_active(), "index active at {path}");
        assert!(everything.last().is_active(), "root inactive at {path}");
    }
}

#[test]
fn test_link_results_never_carry_params() {
    let (_history, router) = started("/user/:id");
    let recorder = Rc::new(Recorder::default());
    router
        .register_link(SubscriberId::next(), "/user/:id", false, recorder.clone())
        .unwrap();
    router.go("/user/:id/more");

    for result in recorder.results.borrow().iter() {
        assert_eq!(result, &MatchResult::Link(LinkMatch { active: true }));
    }
}

#[test]
fn test_template_error_surfaces_at_registration() {
    let (_history, router) = started("/");
    let recorder = Rc::new(Recorder::default());
    let err = router
        .register_route(SubscriberId::next(), "/orders/:/items", false, recorder.clone())
        .unwrap_err();

    assert_eq!(err.template(), "/orders/:/items");
    assert_eq!(recorder.calls(), 0);
    assert_eq!(router.subscriber_count(), 0);
}

#[test]
fn test_compilation_is_memoized_per_template() {
    let (_history, router) = started("/");
    let ids: Vec<_> = (0..5).map(|_| SubscriberId::next()).collect();
    for id in &ids {
        router
            .register_route(*id, "/a/:b", false, Rc::new(Recorder::default()))
            .unwrap();
        router
            .register_link(*id, "/a", false, Rc::new(Recorder::default()))
            .unwrap();
    }

    let stats = router.compiler_stats();
    assert_eq!(stats.route_misses, 1);
    assert_eq!(stats.link_misses, 1);
    assert_eq!(stats.route_hits, 4);
    assert_eq!(stats.link_hits, 4);
    // Each id ended up as a link: re-registration replaces the entry
    assert_eq!(router.subscriber_count(), 5);
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_go_to_current_path_is_noop() {
    let (history, router) = started("/home");
    let recorder = Rc::new(Recorder::default());
    router
        .register_route(SubscriberId::next(), "/home", false, recorder.clone())
        .unwrap();

    let result = router.go(&router.current_path());
    assert_eq!(
        result,
        NavigationResult::Unchanged {
            path: "/home".to_string()
        }
    );
    assert!(router.redirect("//home/").is_unchanged());
    assert_eq!(history.len(), 1);
    assert_eq!(recorder.calls(), 1);
}

#[test]
fn test_push_and_back_forward() {
    let (history, router) = started("/");
    let page = Rc::new(Recorder::default());
    router
        .register_link(SubscriberId::next(), "/page1", true, page.clone())
        .unwrap();

    router.go("/page1");
    router.go("/page2");
    assert_eq!(history.len(), 3);

    assert!(history.back());
    assert_eq!(router.current_path(), "/page1");
    assert!(page.last().is_active());

    assert!(history.forward());
    assert_eq!(router.current_path(), "/page2");
    assert!(!page.last().is_active());

    // go, go, back, forward: one registration call plus four passes
    assert_eq!(page.calls(), 5);
}

#[test]
fn test_redirect_does_not_grow_history() {
    let (history, router) = started("/");
    router.go("/login");
    router.redirect("/dashboard");

    assert_eq!(history.len(), 2);
    assert_eq!(router.current_path(), "/dashboard");

    history.back();
    assert_eq!(router.current_path(), "/");
}

// ============================================================================
// Dispatch Tests
// ============================================================================

/// Counts calls and optionally runs an action while the router dispatches
struct Probe {
    calls: Cell<usize>,
    action: RefCell<Option<Box<dyn Fn()>>>,
    router: Weak<Router>,
}

impl Probe {
    fn new(router: &Rc<Router>) -> Rc<Self> {
        Rc::new(Self {
            calls: Cell::new(0),
            action: RefCell::new(None),
            router: Rc::downgrade(router),
        })
    }

    fn on_dispatch(&self, action: impl Fn() + 'static) {
        *self.action.borrow_mut() = Some(Box::new(action));
    }
}

impl RouteObserver for Probe {
    fn on_match(&self, _result: &MatchResult) {
        self.calls.set(self.calls.get() + 1);
        let dispatching = self
            .router
            .upgrade()
            .is_some_and(|router| router.is_dispatching());
        if dispatching {
            if let Some(action) = self.action.borrow().as_ref() {
                action();
            }
        }
    }
}

#[test]
fn test_unregistering_during_dispatch_leaves_others_notified() {
    let (_history, router) = started("/");

    let mut probes = HashMap::new();
    for _ in 0..16 {
        let id = SubscriberId::next();
        let probe = Probe::new(&router);
        router.register_route(id, "", false, probe.clone()).unwrap();
        probes.insert(id, probe);
    }

    let ids: Vec<_> = probes.keys().copied().collect();
    let (killer, victim) = (ids[0], ids[1]);
    let weak = Rc::downgrade(&router);
    probes[&killer].on_dispatch(move || {
        if let Some(router) = weak.upgrade() {
            router.unregister(victim);
        }
    });

    let before: HashMap<_, _> = probes.iter().map(|(id, p)| (*id, p.calls.get())).collect();
    router.go("/somewhere");

    for (id, probe) in &probes {
        let delta = probe.calls.get() - before[id];
        // Visit order is unspecified, so the victim may already have been notified
        if *id == victim {
            assert!(delta <= 1, "victim notified {delta} times");
        } else {
            assert_eq!(delta, 1, "subscriber {id} notified {delta} times");
        }
    }
    assert!(!router.is_registered(victim));
    assert_eq!(router.subscriber_count(), 15);
}

#[test]
fn test_navigation_during_dispatch_is_rejected() {
    let (history, router) = started("/");
    let probe = Probe::new(&router);
    let outcome = Rc::new(RefCell::new(None));

    let weak = Rc::downgrade(&router);
    let sink = Rc::clone(&outcome);
    probe.on_dispatch(move || {
        if let Some(router) = weak.upgrade() {
            *sink.borrow_mut() = Some((router.go("/hijack"), router.redirect("/hijack")));
        }
    });
    router
        .register_route(SubscriberId::next(), "", false, probe.clone())
        .unwrap();

    assert!(router.go("/target").is_navigated());

    let (go, redirect) = outcome.borrow_mut().take().unwrap();
    assert!(go.is_rejected());
    assert!(redirect.is_rejected());
    assert_eq!(router.current_path(), "/target");
    assert_eq!(history.len(), 2);
    assert!(!router.is_dispatching());

    // The busy flag was released: later navigation works
    probe.action.borrow_mut().take();
    assert!(router.go("/after").is_navigated());
}

#[test]
fn test_registration_during_dispatch_waits_for_next_pass() {
    let (_history, router) = started("/");
    let late = Rc::new(Recorder::default());
    let late_id = SubscriberId::next();

    let probe = Probe::new(&router);
    let weak = Rc::downgrade(&router);
    let late_observer = Rc::clone(&late);
    probe.on_dispatch(move || {
        if let Some(router) = weak.upgrade() {
            if !router.is_registered(late_id) {
                router
                    .register_link(late_id, "/x", false, late_observer.clone())
                    .unwrap();
            }
        }
    });
    router
        .register_route(SubscriberId::next(), "", false, probe.clone())
        .unwrap();

    router.go("/x");
    // Only the registration-time evaluation
    assert_eq!(late.calls(), 1);
    assert!(late.last().is_active());

    router.go("/y");
    assert_eq!(late.calls(), 2);
    assert!(!late.last().is_active());
}

#[test]
fn test_back_during_dispatch_runs_follow_up_pass() {
    let (history, router) = started("/");
    router.go("/a");

    let link = Rc::new(Recorder::default());
    router
        .register_link(SubscriberId::next(), "/b", true, link.clone())
        .unwrap();

    let probe = Probe::new(&router);
    let back = history.clone();
    let fired = Rc::new(Cell::new(false));
    let once = Rc::clone(&fired);
    probe.on_dispatch(move || {
        if !once.replace(true) {
            back.back();
        }
    });
    router
        .register_route(SubscriberId::next(), "", false, probe.clone())
        .unwrap();

    router.go("/b");

    assert_eq!(router.current_path(), "/a");
    assert!(!router.is_dispatching());
    assert!(!link.last().is_active());
    // The probe saw the /b pass and the follow-up /a pass
    assert_eq!(probe.calls.get(), 3);
}

#[test]
fn test_panicking_subscriber_releases_dispatch_state() {
    let (_history, router) = started("/");
    let armed = Rc::new(Cell::new(false));
    let trigger = Rc::clone(&armed);
    let observer: BoxedObserver = Rc::new(move |_: &MatchResult| {
        if trigger.get() {
            panic!("subscriber failure");
        }
    });
    let id = SubscriberId::next();
    router.register_route(id, "", false, observer).unwrap();

    armed.set(true);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        router.go("/boom");
    }));
    assert!(result.is_err());
    assert!(!router.is_dispatching());

    router.unregister(id);
    assert!(router.go("/fine").is_navigated());
}

// ============================================================================
// Collaborator Tests
// ============================================================================

#[test]
fn test_nested_routes_follow_navigation() {
    let (_history, router) = started("/");
    let users = RouteView::mount(&router, None, RouteProps::new("/users/:id")).unwrap();
    let mut posts = RouteView::mount(
        &router,
        Some(&users.context()),
        RouteProps::new("posts/:post").merge(true),
    )
    .unwrap();
    assert_eq!(posts.template(), "/users/:id/posts/:post");

    router.go("/users/3/posts/9");
    assert!(users.is_rendered());
    let params = posts.params().unwrap();
    assert_eq!(params.get_as::<u32>("id"), Some(3));
    assert_eq!(params.get_as::<u32>("post"), Some(9));

    // Re-resolve against the now active parent without merging
    posts
        .update(Some(&users.context()), RouteProps::new("posts/:post"))
        .unwrap();
    assert_eq!(posts.template(), "/users/3/posts/:post");
    assert!(posts.is_rendered());
    let params = posts.params().unwrap();
    assert_eq!(params.get("id"), None);
    assert_eq!(params.get("post"), Some("9"));
    assert_eq!(router.subscriber_count(), 2);

    drop(posts);
    drop(users);
    assert_eq!(router.subscriber_count(), 0);
}

#[test]
fn test_nav_links_track_active_state() {
    let (_history, router) = started("/");
    let home = NavLinkView::mount(&router, None, NavLinkProps::new("/").exact(true)).unwrap();
    let docs = NavLinkView::mount(&router, None, NavLinkProps::new("/docs")).unwrap();

    assert!(home.is_active());
    assert!(!docs.is_active());

    docs.click();
    router.go("/docs/guide");
    assert!(!home.is_active());
    assert!(docs.is_active());
    assert_eq!(docs.class_name(), "active");
    assert_eq!(docs.render_count(), 1);
}

#[test]
fn test_index_redirect() {
    let (history, router) = started("/settings");
    let settings = RouteView::mount(&router, None, RouteProps::new("/settings")).unwrap();
    let index = Redirect::index(&router, Some(&settings.context()), "profile").unwrap();

    // The index route of /settings matches /settings exactly
    assert_eq!(index.route().template(), "/settings");
    assert_eq!(router.current_path(), "/settings/profile");
    assert_eq!(history.len(), 1);
    assert!(settings.is_rendered());
    assert!(!index.route().is_rendered());

    router.go("/settings");
    assert!(index.apply().unwrap().is_navigated());
    assert_eq!(router.current_path(), "/settings/profile");
    assert_eq!(history.len(), 2);
}
