//! Accumulating name filters.

/// A set of accepted names. An empty filter accepts everything; once any
/// name is added, only matching names pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    names: Vec<String>,
}

impl NameFilter {
    /// Filter that accepts every name.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_unrestricted(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact name match.
    pub fn allows(&self, name: &str) -> bool {
        self.allows_by(|n| n == name)
    }

    /// Match with a custom comparison, e.g. dotted-or-bare page type names.
    pub fn allows_by(&self, matches: impl Fn(&str) -> bool) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| matches(n))
    }
}
