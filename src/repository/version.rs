use std::cmp::Ordering;
use std::fmt;

use crate::repository::CatalogError;

const WILDCARD: &str = "+";
const QUALIFIER_SEPARATOR: char = '_';
const MAX_COMPONENTS: usize = 3;

/// A `major[.minor[.micro[_qualifier]]]` version, or a constraint when the last component is `+`.
#[derive(Debug, Clone)]
pub struct TokenizedVersion {
    raw: String,
    numbers: Vec<u64>,
    wildcard: bool,
    qualifier: Option<String>,
}

impl TokenizedVersion {
    /// Parse a concrete version, as found in a repository index.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let version = Self::parse_constraint(raw)?;
        if version.wildcard {
            return Err(invalid(raw, "wildcards are only allowed in version constraints"));
        }
        Ok(version)
    }

    /// Parse a version constraint such as `1.+`, `1.2.+`, `+` or `1.2.3_RELEASE`.
    pub fn parse_constraint(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid(raw, "version is empty"));
        }

        let (numeric, qualifier) = match trimmed.split_once(QUALIFIER_SEPARATOR) {
            Some((numeric, qualifier)) => {
                if qualifier.is_empty() {
                    return Err(invalid(raw, "qualifier is empty"));
                }
                (numeric, Some(qualifier.to_string()))
            }
            None => (trimmed, None),
        };

        let components: Vec<&str> = numeric.split('.').collect();
        if components.len() > MAX_COMPONENTS {
            return Err(invalid(raw, "too many components"));
        }

        let mut numbers = Vec::with_capacity(components.len());
        let mut wildcard = false;
        for (i, component) in components.iter().enumerate() {
            if *component == WILDCARD {
                if i != components.len() - 1 {
                    return Err(invalid(raw, "a wildcard must be the last component"));
                }
                wildcard = true;
            } else if !component.is_empty() && component.chars().all(|c| c.is_ascii_digit()) {
                numbers.push(
                    component
                        .parse()
                        .map_err(|_| invalid(raw, "component is too large"))?,
                );
            } else {
                return Err(invalid(raw, &format!("'{}' is not numeric", component)));
            }
        }

        if wildcard && qualifier.is_some() {
            return Err(invalid(raw, "a wildcard cannot carry a qualifier"));
        }

        Ok(TokenizedVersion {
            raw: trimmed.to_string(),
            numbers,
            wildcard,
            qualifier,
        })
    }

    fn number(&self, i: usize) -> u64 {
        self.numbers.get(i).copied().unwrap_or(0)
    }

    /// Whether the concrete `version` satisfies this constraint.
    pub fn matches(&self, version: &TokenizedVersion) -> bool {
        if self.wildcard {
            self.numbers
                .iter()
                .enumerate()
                .all(|(i, n)| version.number(i) == *n)
        } else {
            (0..MAX_COMPONENTS).all(|i| self.number(i) == version.number(i))
                && self.qualifier == version.qualifier
        }
    }
}

impl PartialEq for TokenizedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TokenizedVersion {}

impl PartialOrd for TokenizedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenizedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (0..MAX_COMPONENTS)
            .map(|i| self.number(i).cmp(&other.number(i)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl fmt::Display for TokenizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// The highest of `versions` satisfying `candidate`, if any does.
pub fn resolve<'a>(
    candidate: &str,
    versions: impl IntoIterator<Item = &'a str>,
) -> Result<Option<&'a str>, CatalogError> {
    let constraint = TokenizedVersion::parse_constraint(candidate)?;
    let mut best: Option<(TokenizedVersion, &'a str)> = None;
    for raw in versions {
        let version = TokenizedVersion::parse(raw)?;
        if !constraint.matches(&version) {
            continue;
        }
        if best.as_ref().map_or(true, |(current, _)| version > *current) {
            best = Some((version, raw));
        }
    }
    Ok(best.map(|(_, raw)| raw))
}

fn invalid(version: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidVersion {
        version: version.to_string(),
        reason: reason.to_string(),
    }
}
