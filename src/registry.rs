//! Audience registry: the ordered list of raffle entrants.

use crate::error::ValidationError;

/// One validated name. Never empty, always trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant(String);

impl Entrant {
    /// Trim `raw` and wrap it, or `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Entrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default, Clone)]
pub struct AudienceRegistry {
    entrants: Vec<Entrant>,
}

impl AudienceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every non-blank line of `raw_text`, in order.
    ///
    /// All-or-nothing: when no line survives trimming the list is untouched
    /// and `EmptyInput` is returned.
    pub fn append(&mut self, raw_text: &str) -> Result<usize, ValidationError> {
        let names: Vec<Entrant> = raw_text.lines().filter_map(Entrant::parse).collect();
        if names.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        let added = names.len();
        self.entrants.extend(names);
        Ok(added)
    }

    pub fn clear(&mut self) {
        self.entrants.clear();
    }

    pub fn size(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entrant> {
        self.entrants.get(index)
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn names(&self) -> Vec<String> {
        self.entrants().iter().map(Entrant::to_string).collect()
    }
}
