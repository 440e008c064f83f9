//! Memoized template compilation
//!
//! [`PatternCompiler`] keeps two append-only tables, one for route templates
//! and one for link urls, keyed by the raw template string. Entries live as
//! long as the compiler, in practice as long as the router.

use crate::error::TemplateError;
use crate::matcher::{CompiledMatcher, MatcherKind};
use crate::trace_log;
use std::collections::HashMap;
use std::rc::Rc;

/// Compilation cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerStats {
    pub route_hits: usize,
    pub route_misses: usize,
    pub link_hits: usize,
    pub link_misses: usize,
}

impl CompilerStats {
    /// Number of templates actually compiled
    pub fn compilations(&self) -> usize {
        self.route_misses + self.link_misses
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.route_hits + self.link_hits;
        let total = hits + self.compilations();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// Compiles templates into shared matchers, at most once per distinct string
#[derive(Debug, Default)]
pub struct PatternCompiler {
    routes: HashMap<String, Rc<CompiledMatcher>>,
    links: HashMap<String, Rc<CompiledMatcher>>,
    stats: CompilerStats,
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile (or fetch) the matcher for a route template
    ///
    /// Failed compilations are not cached.
    pub fn compile_route(&mut self, template: &str) -> Result<Rc<CompiledMatcher>, TemplateError> {
        self.compile(MatcherKind::Route, template)
    }

    /// Compile (or fetch) the matcher for a link url
    pub fn compile_link(&mut self, template: &str) -> Result<Rc<CompiledMatcher>, TemplateError> {
        self.compile(MatcherKind::Link, template)
    }

    fn compile(
        &mut self,
        kind: MatcherKind,
        template: &str,
    ) -> Result<Rc<CompiledMatcher>, TemplateError> {
        let (table, hits, misses) = match kind {
            MatcherKind::Route => (
                &mut self.routes,
                &mut self.stats.route_hits,
                &mut self.stats.route_misses,
            ),
            MatcherKind::Link => (
                &mut self.links,
                &mut self.stats.link_hits,
                &mut self.stats.link_misses,
            ),
        };

        if let Some(matcher) = table.get(template) {
            *hits += 1;
            return Ok(Rc::clone(matcher));
        }

        let matcher = Rc::new(match kind {
            MatcherKind::Route => CompiledMatcher::compile_route(template)?,
            MatcherKind::Link => CompiledMatcher::compile_link(template)?,
        });
        *misses += 1;
        trace_log!("Compiled {:?} template '{}'", kind, template);

        table.insert(template.to_string(), Rc::clone(&matcher));
        Ok(matcher)
    }

    pub fn stats(&self) -> CompilerStats {
        self.stats
    }

    /// Number of cached route matchers
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of cached link matchers
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
