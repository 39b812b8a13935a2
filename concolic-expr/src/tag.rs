//! Tag/label registry (C1): the sole authority on whether an
//! instrumentation event is relevant to the path condition.

use hashbrown::HashSet;
use std::sync::Mutex;

/// An opaque marker the host attaches to a runtime value at
/// instrumentation time. Carries zero or more symbolic labels.
///
/// Two tags compare equal iff their label sets are equal; a `null`
/// tag (no labels) is never user-symbolic.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Tag {
    labels: HashSet<String>,
}

impl Tag {
    /// The tag with no labels at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A tag carrying a single label.
    pub fn with_label(label: impl Into<String>) -> Self {
        let mut labels = HashSet::new();
        labels.insert(label.into());
        Self { labels }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Process-wide set of registered symbolic labels (§4.1, §5).
///
/// Readers (the Recorder's relevance filter) vastly outnumber writers
/// (`add_label` calls at symbolicator setup time), so a single mutex is
/// uncontended in the hot path -- matching the teacher's "readers
/// outnumber writers" design note.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    registered: Mutex<HashSet<String>>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label as symbolic. Idempotent.
    pub fn add_label(&self, label: impl Into<String>) {
        let label = label.into();
        log::trace!("registering symbolic label {label:?}");
        self.registered.lock().unwrap().insert(label);
    }

    /// Clear all registered labels, e.g. on session `reset()`.
    pub fn clear(&self) {
        self.registered.lock().unwrap().clear();
    }

    /// A tag is user-symbolic iff its label set intersects the
    /// registered set. Never guess from value identity -- this is the
    /// sole relevance decision the Recorder is allowed to make.
    pub fn is_user_symbolic(&self, tag: &Tag) -> bool {
        if tag.is_empty() {
            return false;
        }
        let registered = self.registered.lock().unwrap();
        tag.labels().any(|label| registered.contains(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_is_never_symbolic() {
        let registry = LabelRegistry::new();
        registry.add_label("x");
        assert!(!registry.is_user_symbolic(&Tag::empty()));
    }

    #[test]
    fn tag_is_symbolic_once_its_label_is_registered() {
        let registry = LabelRegistry::new();
        let tag = Tag::with_label("x");
        assert!(!registry.is_user_symbolic(&tag));

        registry.add_label("x");
        assert!(registry.is_user_symbolic(&tag));
    }

    #[test]
    fn clear_revokes_all_registrations() {
        let registry = LabelRegistry::new();
        let tag = Tag::with_label("x");
        registry.add_label("x");
        assert!(registry.is_user_symbolic(&tag));

        registry.clear();
        assert!(!registry.is_user_symbolic(&tag));
    }

    #[test]
    fn tags_compare_equal_iff_label_sets_equal() {
        let mut a = Tag::with_label("x");
        let b = Tag::with_label("x");
        assert_eq!(a, b);

        a.add_label("y");
        assert_ne!(a, b);
    }
}
