// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

/// Mirror of the selection key kept in sync with the selector state, the
/// way a reflected attribute mirrors a property.
///
/// Synchronisation is a plain write: [`sync`](Self::sync) never routes
/// back into selection logic, so sync writes cannot echo. Inbound edits
/// go through [`observe`](Self::observe), which reports whether the value
/// actually changed; the caller forwards only genuine changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeReflector {
    value: Option<String>,
}

impl AttributeReflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Outbound write from the selector. Overwrites unconditionally and
    /// triggers nothing.
    pub fn sync(&mut self, key: Option<&str>) {
        self.value = key.map(str::to_owned);
    }

    /// Inbound edit from outside the selector. Returns `true` when the
    /// stored value changed and the edit should be routed onward, `false`
    /// when the write was a no-op (including an echo of a prior sync).
    pub fn observe(&mut self, new_value: Option<&str>) -> bool {
        if self.value.as_deref() == new_value {
            return false;
        }
        self.value = new_value.map(str::to_owned);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::AttributeReflector;

    #[test]
    fn sync_overwrites_without_feedback() {
        let mut reflector = AttributeReflector::new();
        reflector.sync(Some("ionian"));
        assert_eq!(reflector.value(), Some("ionian"));
        reflector.sync(None);
        assert_eq!(reflector.value(), None);
    }

    #[test]
    fn observe_reports_only_real_changes() {
        let mut reflector = AttributeReflector::new();
        assert!(reflector.observe(Some("dorian")));
        assert!(!reflector.observe(Some("dorian")));
        assert!(reflector.observe(None));
        assert!(!reflector.observe(None));
    }

    #[test]
    fn echo_of_a_sync_is_a_noop() {
        let mut reflector = AttributeReflector::new();
        reflector.sync(Some("ionian"));
        assert!(!reflector.observe(Some("ionian")));
    }
}
