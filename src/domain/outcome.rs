//! Result of applying an engine operation to a snapshot.

/// Either a new snapshot or a marker that nothing changed.
///
/// Engines never mutate their input; callers compare on this tag to decide
/// whether to re-render and notify listeners.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Changed(T),
    Unchanged,
}

impl<T> Outcome<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }

    /// The new snapshot, if any.
    pub fn changed(self) -> Option<T> {
        match self {
            Outcome::Changed(t) => Some(t),
            Outcome::Unchanged => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Changed(t) => Outcome::Changed(f(t)),
            Outcome::Unchanged => Outcome::Unchanged,
        }
    }

    /// Resolve to a snapshot, falling back to `current` when unchanged.
    pub fn unwrap_or_else(self, current: impl FnOnce() -> T) -> T {
        match self {
            Outcome::Changed(t) => t,
            Outcome::Unchanged => current(),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(t) => Outcome::Changed(t),
            None => Outcome::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_falls_back_to_current() {
        let outcome: Outcome<u8> = Outcome::Unchanged;
        assert!(!outcome.is_changed());
        assert_eq!(outcome.unwrap_or_else(|| 7), 7);
    }

    #[test]
    fn map_preserves_tag() {
        assert_eq!(Outcome::Changed(2).map(|v| v * 2), Outcome::Changed(4));
        assert_eq!(Outcome::<u8>::Unchanged.map(|v| v * 2), Outcome::Unchanged);
    }
}
