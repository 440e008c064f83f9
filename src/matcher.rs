//! Template compilation and matching
//!
//! A template is compiled once into a [`CompiledMatcher`] holding two
//! expressions: an exact one (`^(src)/?$`) and a prefix one
//! (`^(src)(?:/|$)`). The prefix form requires a separator or the end of the
//! path after the template, so `/user` never matches `/username`.
//!
//! Route templates may contain `:name` parameter segments, each of which
//! captures one or more non-separator characters. Link templates are literal
//! and only report whether they are active.

use crate::error::TemplateError;
use crate::params::RouteParams;
use crate::path::normalize;
use regex::{Captures, Regex};

/// Which kind of subscriber a matcher was compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// Template with `:name` parameters; results carry params and the matched url
    Route,
    /// Literal url; results only carry the active flag
    Link,
}

/// Match result delivered to a route subscriber
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    pub active: bool,
    /// Captured parameters in declaration order, `None` when inactive
    pub params: Option<RouteParams>,
    /// The part of the path matched by the template, `None` when inactive
    pub matched_url: Option<String>,
}

impl RouteMatch {
    /// The result for a path that did not match
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Match result delivered to a link subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkMatch {
    pub active: bool,
}

/// Result handed to a subscriber callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Route(RouteMatch),
    Link(LinkMatch),
}

impl MatchResult {
    /// Whether the subscriber's template matched the current path
    pub fn is_active(&self) -> bool {
        match self {
            MatchResult::Route(m) => m.active,
            MatchResult::Link(m) => m.active,
        }
    }

    pub fn as_route(&self) -> Option<&RouteMatch> {
        match self {
            MatchResult::Route(m) => Some(m),
            MatchResult::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkMatch> {
        match self {
            MatchResult::Link(m) => Some(m),
            MatchResult::Route(_) => None,
        }
    }
}

/// An immutable matcher compiled from one template
#[derive(Debug)]
pub struct CompiledMatcher {
    kind: MatcherKind,
    template: String,
    exact: Regex,
    prefix: Regex,
    param_names: Vec<String>,
}

impl CompiledMatcher {
    /// Compile a route template, extracting `:name` parameters
    ///
    /// # Example
    ///
    /// ```
    /// use path_navigator::CompiledMatcher;
    ///
    /// let matcher = CompiledMatcher::compile_route("/user/:id").unwrap();
    /// let m = matcher.match_route("/user/42/edit", false);
    ///
    /// assert!(m.active);
    /// assert_eq!(m.matched_url.as_deref(), Some("/user/42"));
    /// assert_eq!(m.params.unwrap().get("id"), Some("42"));
    /// ```
    pub fn compile_route(template: &str) -> Result<Self, TemplateError> {
        let normalized = normalize_template(template);
        let (source, param_names) = route_source(&normalized)?;
        Self::build(MatcherKind::Route, normalized, &source, param_names)
    }

    /// Compile a literal link url
    pub fn compile_link(template: &str) -> Result<Self, TemplateError> {
        let normalized = normalize_template(template);
        let source = regex::escape(&normalized);
        Self::build(MatcherKind::Link, normalized, &source, Vec::new())
    }

    fn build(
        kind: MatcherKind,
        template: String,
        source: &str,
        param_names: Vec<String>,
    ) -> Result<Self, TemplateError> {
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|source| TemplateError::InvalidPattern {
                template: template.clone(),
                source,
            })
        };

        // An empty source gives `^()/?$` and `^()`: the root only, or anything.
        let exact = compile(format!("^({source})/?$"))?;
        let prefix = if source.is_empty() {
            compile("^()".to_string())?
        } else {
            compile(format!("^({source})(?:/|$)"))?
        };

        Ok(Self {
            kind,
            template,
            exact,
            prefix,
            param_names,
        })
    }

    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    /// The normalized template this matcher was built from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in declaration order (empty for links)
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    fn captures<'p>(&self, path: &'p str, exact: bool) -> Option<Captures<'p>> {
        if exact {
            self.exact.captures(path)
        } else {
            self.prefix.captures(path)
        }
    }

    /// Test `path`, extracting parameters and the matched prefix
    pub fn match_route(&self, path: &str, exact: bool) -> RouteMatch {
        let Some(caps) = self.captures(path, exact) else {
            return RouteMatch::inactive();
        };

        let matched_url = caps
            .get(1)
            .or_else(|| caps.get(0))
            .map_or("", |m| m.as_str());

        let params = self
            .param_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = caps.get(i + 2).map_or("", |m| m.as_str());
                (name.as_str(), value)
            })
            .collect();

        RouteMatch {
            active: true,
            params: Some(params),
            matched_url: Some(matched_url.to_string()),
        }
    }

    /// Test `path` for containment only
    pub fn match_link(&self, path: &str, exact: bool) -> LinkMatch {
        let active = if exact {
            self.exact.is_match(path)
        } else {
            self.prefix.is_match(path)
        };
        LinkMatch { active }
    }

    /// Evaluate according to the matcher's kind
    pub fn evaluate(&self, path: &str, exact: bool) -> MatchResult {
        match self.kind {
            MatcherKind::Route => MatchResult::Route(self.match_route(path, exact)),
            MatcherKind::Link => MatchResult::Link(self.match_link(path, exact)),
        }
    }
}

/// Normalize a template; a lone separator means the root (empty) template.
fn normalize_template(template: &str) -> String {
    let normalized = normalize(template);
    if normalized == "/" {
        String::new()
    } else {
        normalized
    }
}

/// Split a route template into escaped literals and `([^/]+)` captures.
fn route_source(template: &str) -> Result<(String, Vec<String>), TemplateError> {
    let mut source = String::with_capacity(template.len() + 16);
    let mut names = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find(':') {
        let colon = cursor + offset;
        source.push_str(&regex::escape(&template[cursor..colon]));

        let name_start = colon + 1;
        let name_len = template[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if name_len == 0 {
            return Err(TemplateError::EmptyParamName {
                template: template.to_string(),
                position: colon,
            });
        }

        names.push(template[name_start..name_start + name_len].to_string());
        source.push_str("([^/]+)");
        cursor = name_start + name_len;
    }
    source.push_str(&regex::escape(&template[cursor..]));

    Ok((source, names))
}
