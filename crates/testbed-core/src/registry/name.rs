use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::kernel::constants::FULL_NAME_SEPARATOR;
use crate::registry::error::RegistryError;

/// A `"<kind>:<identifier>"` key, e.g. `component:x-foo` or `service:store`.
///
/// Both halves are non-empty and the separator appears exactly once.
#[derive(Clone)]
pub struct FullName {
    raw: String,
    split: usize,
}

impl FullName {
    /// Parse and validate a full name
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let malformed = |reason: &str| RegistryError::MalformedFullName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = raw.split(FULL_NAME_SEPARATOR);
        let (kind, identifier) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(identifier), None) => (kind, identifier),
            (_, None, _) => return Err(malformed("missing ':' separator")),
            _ => return Err(malformed("expected exactly one ':' separator")),
        };
        if kind.is_empty() {
            return Err(malformed("kind segment is empty"));
        }
        if identifier.is_empty() {
            return Err(malformed("identifier segment is empty"));
        }

        Ok(Self {
            raw: raw.to_string(),
            split: kind.len(),
        })
    }

    /// Build a full name from its two halves
    pub fn new(kind: &str, identifier: &str) -> Result<Self, RegistryError> {
        Self::parse(&format!("{}{}{}", kind, FULL_NAME_SEPARATOR, identifier))
    }

    /// The part before the separator
    pub fn kind(&self) -> &str {
        &self.raw[..self.split]
    }

    /// The part after the separator
    pub fn identifier(&self) -> &str {
        &self.raw[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Dasherize a camel-cased property name: `otherThing` becomes `other-thing`
/// and `HTMLParser` becomes `html-parser`.
///
/// Used to derive the full name an injection points at from the property it
/// is stored under. A run of capitals is one word; its last capital starts
/// the next word when a lowercase letter follows.
pub fn normalize_identifier(property: &str) -> String {
    let chars: Vec<char> = property.chars().collect();
    let mut out = String::with_capacity(property.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            out.push('-');
            continue;
        }
        if ch.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word {
                out.push('-');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

// Equality, ordering and hashing only look at the raw string; `split` is
// derived from it.
impl PartialEq for FullName {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for FullName {}

impl PartialOrd for FullName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FullName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for FullName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Debug for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FullName({})", self.raw)
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FullName {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FullName {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
