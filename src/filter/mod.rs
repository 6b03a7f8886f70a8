//! Fail2Ban filter rule extraction and matching
//!
//! A filter definition is a plain-text, line-oriented file. The rule
//! section starts at the `failregex =` key and runs until an
//! `ignoreregex` key or end of input; every non-empty line in between is
//! a rule fragment, except comments and bracketed section headers:
//!
//! ```text
//! [Definition]
//!
//! # RouterOS logs failed logins on the system,error,critical topics
//! failregex = ^.*login failure for user \S+ from <HOST> via (ssh|winbox|api)
//!             ^.*sent CHAP Failure
//! ignoreregex =
//! ```
//!
//! The `<HOST>` token is a placeholder for a dotted-decimal IPv4 address
//! and is substituted with a range-limited sub-pattern before the
//! fragments are compiled. Fragments that fail to compile are dropped
//! with a diagnostic; the remaining fragments still form a usable
//! matcher set.

pub mod error;
pub mod extract;
pub mod matcher;

pub use error::FilterError;
pub use extract::extract_rules;
pub use matcher::{
    CompileDiagnostic, CompiledRule, HOST_TOKEN, MatcherSet, Placeholders, build_matchers,
    print_compile_warnings,
};

use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a filter name against the filter directory and read it.
///
/// A name that is an absolute path or already exists as given is used
/// directly; anything else is joined to `dir`. A missing file is the one
/// hard error in this crate.
pub fn read_filter_definition(dir: &Path, name: &str) -> Result<String, FilterError> {
    let path = resolve_filter_path(dir, name);
    if !path.exists() {
        return Err(FilterError::MissingInput { path });
    }
    fs::read_to_string(&path).map_err(|source| FilterError::Read { path, source })
}

fn resolve_filter_path(dir: &Path, name: &str) -> PathBuf {
    let direct = Path::new(name);
    if direct.is_absolute() || direct.exists() {
        direct.to_path_buf()
    } else {
        dir.join(name)
    }
}
