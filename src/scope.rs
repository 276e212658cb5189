//! Package scopes (`@acme`) and name filtering.

use std::fmt;

/// A package namespace prefix, always starting with `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope(String);

impl Scope {
    /// Normalize a user-supplied scope, prefixing `@` when missing.
    pub fn new(raw: &str) -> Self {
        if raw.starts_with('@') {
            Self(raw.to_string())
        } else {
            Self(format!("@{}", raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain prefix match, so `@acme` also matches `@acme-labs/x`.
    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.0)
    }

    /// Keep the names under this scope, in iteration order.
    pub fn select<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| self.matches(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
