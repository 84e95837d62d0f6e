//! Version constraints used to filter remote tags
//!
//! Supported syntax:
//! - comparators `>=`, `<=`, `>`, `<`, `=`, `~`, `^`, separated by whitespace or commas (AND)
//! - `||` between alternatives (OR)
//! - wildcards: `1.x`, `1.2.*`, `*`
//! - hyphen ranges: `1.2 - 1.4.5` means `>=1.2, <=1.4.5`
//! - a bare version means `=`: `1.2` matches any `1.2.x`

use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};

use crate::version::error::PolicyError;
use crate::version::semver::strip_v_prefix;

const OPERATORS: &[&str] = &[">=", "<=", ">", "<", "=", "~", "^"];
const UNSUPPORTED_OPERATORS: &[&str] = &["!=", "~>"];

#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl Constraint {
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let invalid = |reason: String| PolicyError::InvalidConstraint {
            constraint: raw.to_string(),
            reason,
        };

        let alternatives = raw
            .split("||")
            .map(|alternative| {
                let normalized = normalize_alternative(alternative).map_err(invalid)?;
                VersionReq::parse(&normalized).map_err(|e| invalid(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.trim().to_string(),
            alternatives,
        })
    }

    /// Check if a version satisfies any of the alternatives
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for Constraint {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Rewrite one `||` alternative into the comma separated form `VersionReq` accepts
fn normalize_alternative(alternative: &str) -> Result<String, String> {
    let tokens: Vec<&str> = alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err("empty constraint".to_string());
    }

    let mut comparators = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if let Some(op) = UNSUPPORTED_OPERATORS.iter().find(|op| token.starts_with(**op)) {
            return Err(format!("unsupported operator '{op}'"));
        }

        if tokens.get(i + 1) == Some(&"-") {
            let upper = tokens
                .get(i + 2)
                .ok_or_else(|| format!("hyphen range '{token} -' has no upper bound"))?;
            comparators.push(format!(">={}", strip_v_prefix(token)));
            comparators.push(format!("<={}", strip_v_prefix(upper)));
            i += 3;
            continue;
        }

        if OPERATORS.contains(&token) {
            let version = tokens
                .get(i + 1)
                .ok_or_else(|| format!("operator '{token}' has no version"))?;
            comparators.push(format!("{token}{}", strip_v_prefix(version)));
            i += 2;
            continue;
        }

        let (op, version) = split_operator(token);
        let version = strip_v_prefix(version);
        if op.is_empty() && is_wildcard(version) {
            comparators.push("*".to_string());
        } else {
            let op = if op.is_empty() { "=" } else { op };
            comparators.push(format!("{op}{version}"));
        }
        i += 1;
    }

    Ok(comparators.join(", "))
}

fn split_operator(token: &str) -> (&str, &str) {
    OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token))
}

fn is_wildcard(version: &str) -> bool {
    matches!(version, "*" | "x" | "X")
}
