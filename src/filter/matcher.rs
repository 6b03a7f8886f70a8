use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reserved token standing for an IPv4-shaped host address.
pub const HOST_TOKEN: &str = "<HOST>";

/// Dotted-decimal IPv4 sub-pattern. Each octet is range-limited
/// (`25[0-5]`, `2[0-4][0-9]` or `[01]?[0-9][0-9]?`), so values like
/// `999.999.999.999` never count as a host address.
const HOST_PATTERN: &str =
    r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

/// Mapping from reserved placeholder tokens to the sub-patterns they
/// expand to before compilation.
///
/// Defaults to the single `<HOST>` entry. Extra tokens can be layered on
/// top, e.g. from a config profile.
#[derive(Debug, Clone)]
pub struct Placeholders {
    expansions: BTreeMap<String, String>,
}

impl Default for Placeholders {
    fn default() -> Self {
        let mut expansions = BTreeMap::new();
        expansions.insert(HOST_TOKEN.to_string(), HOST_PATTERN.to_string());
        Self { expansions }
    }
}

impl Placeholders {
    /// Register or override a token expansion.
    pub fn insert(&mut self, token: impl Into<String>, pattern: impl Into<String>) {
        self.expansions.insert(token.into(), pattern.into());
    }

    /// Replace every placeholder occurrence in a fragment, textually.
    pub fn expand(&self, fragment: &str) -> String {
        let mut expanded = fragment.to_string();
        for (token, pattern) in &self.expansions {
            if expanded.contains(token.as_str()) {
                expanded = expanded.replace(token.as_str(), pattern);
            }
        }
        expanded
    }
}

/// A single successfully compiled failregex rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// Fragment as extracted from the filter definition.
    pub fragment: String,
    /// Pattern after placeholder expansion, as handed to the regex engine.
    pub pattern: String,
    pub regex: Regex,
}

/// A fragment that failed to compile, kept as an operator diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct CompileDiagnostic {
    pub fragment: String,
    pub pattern: String,
    pub error: String,
}

/// The ordered set of compiled matchers derived from one filter
/// definition. Read-only after construction.
#[derive(Debug, Default)]
pub struct MatcherSet {
    rules: Vec<CompiledRule>,
    diagnostics: Vec<CompileDiagnostic>,
}

impl MatcherSet {
    /// Compile every fragment after placeholder expansion.
    ///
    /// Never fails: a fragment with invalid syntax is dropped into the
    /// diagnostics list and the remaining fragments still compile, so one
    /// broken rule cannot disable the rest of a filter.
    pub fn build(fragments: &[String], placeholders: &Placeholders) -> Self {
        let mut rules = Vec::with_capacity(fragments.len());
        let mut diagnostics = Vec::new();

        for fragment in fragments {
            let pattern = placeholders.expand(fragment);
            match Regex::new(&pattern) {
                Ok(regex) => rules.push(CompiledRule {
                    fragment: fragment.clone(),
                    pattern,
                    regex,
                }),
                Err(error) => diagnostics.push(CompileDiagnostic {
                    fragment: fragment.clone(),
                    pattern,
                    error: error.to_string(),
                }),
            }
        }

        Self { rules, diagnostics }
    }

    /// True when any rule matches anywhere in the line.
    ///
    /// Rules are tried in stored order and the first hit short-circuits;
    /// the boolean result does not depend on the order.
    pub fn any_match(&self, line: &str) -> bool {
        self.rules.iter().any(|rule| rule.regex.is_match(line))
    }

    /// The first rule in stored order whose pattern matches the line.
    pub fn first_match(&self, line: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.regex.is_match(line))
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn diagnostics(&self) -> &[CompileDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compile fragments with the built-in placeholder table.
pub fn build_matchers(fragments: &[String]) -> MatcherSet {
    MatcherSet::build(fragments, &Placeholders::default())
}

/// Print warnings for fragments that failed to compile.
///
/// This helps operators fix a broken filter definition while the valid
/// rules in it keep matching.
pub fn print_compile_warnings(set: &MatcherSet) {
    for diagnostic in set.diagnostics() {
        eprintln!(
            "Warning: could not compile fragment '{}': {}",
            diagnostic.fragment, diagnostic.error
        );
    }
}
