//! Static routing of query names to a handling path.
//!
//! Rules are whole-label suffixes of fully-qualified names. The root rule `.`
//! is always present and routes everything else to pass-through.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutePath {
    /// Forward, then strip AAAA/IN records from the answer and additional sections.
    Filtered,
    /// Forward and return the upstream answer untouched.
    PassThrough,
}

impl RoutePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::PassThrough => "pass-through",
        }
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub suffix: Arc<str>,
    pub path: RoutePath,
}

impl RoutingRule {
    pub fn new(suffix: &str, path: RoutePath) -> Self {
        Self {
            suffix: normalize_name(suffix).into(),
            path,
        }
    }

    /// Number of labels in the suffix; the root rule has none.
    fn label_count(&self) -> usize {
        if &*self.suffix == "." {
            0
        } else {
            self.suffix.trim_end_matches('.').split('.').count()
        }
    }

    /// `name` must already be normalized.
    fn matches(&self, name: &str) -> bool {
        if &*self.suffix == "." || name == &*self.suffix {
            return true;
        }
        name.len() > self.suffix.len()
            && name.ends_with(&*self.suffix)
            && name.as_bytes()[name.len() - self.suffix.len() - 1] == b'.'
    }
}

#[derive(Debug, Clone)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
}

impl RoutingTable {
    /// Builds a table from `rules` plus the pass-through root fallback.
    ///
    /// Rules are kept most-specific first so the first hit is the longest match.
    /// A later rule for an already registered suffix replaces the earlier one.
    pub fn new(rules: impl IntoIterator<Item = RoutingRule>) -> Self {
        let mut table: Vec<RoutingRule> = Vec::new();
        for rule in rules {
            match table.iter_mut().find(|r| r.suffix == rule.suffix) {
                Some(existing) => existing.path = rule.path,
                None => table.push(rule),
            }
        }
        if !table.iter().any(|r| &*r.suffix == ".") {
            table.push(RoutingRule::new(".", RoutePath::PassThrough));
        }
        table.sort_by_key(|r| std::cmp::Reverse(r.label_count()));
        Self { rules: table }
    }

    pub fn route(&self, name: &str) -> RoutePath {
        self.matching_rule(name)
            .map(|rule| rule.path)
            .unwrap_or(RoutePath::PassThrough)
    }

    pub fn matching_rule(&self, name: &str) -> Option<&RoutingRule> {
        let name = normalize_name(name);
        self.rules.iter().find(|rule| rule.matches(&name))
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn filtered_suffixes(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|r| r.path == RoutePath::Filtered)
            .map(|r| &*r.suffix)
    }
}

/// Lowercases `name` and makes it fully qualified.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." {
        return ".".to_string();
    }
    let mut normalized = trimmed.to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

/// Checks label syntax of a configured domain (length limits, no empty labels).
pub fn validate_domain_name(name: &str) -> Result<(), String> {
    let normalized = normalize_name(name);
    if normalized == "." {
        return Err("domain name cannot be empty or the root".to_string());
    }
    if normalized.len() > 254 {
        return Err(format!("domain name '{}' exceeds 253 characters", name));
    }
    for label in normalized.trim_end_matches('.').split('.') {
        if label.is_empty() {
            return Err(format!("domain name '{}' has an empty label", name));
        }
        if label.len() > 63 {
            return Err(format!("label '{}' in '{}' exceeds 63 characters", label, name));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{}' in '{}' starts or ends with '-'", label, name));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(format!("label '{}' in '{}' has invalid characters", label, name));
        }
    }
    Ok(())
}
