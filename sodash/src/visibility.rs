//! Per-chart series show/hide flags. Hiding a series never touches its data.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct SeriesVisibility {
    flags: BTreeMap<String, bool>,
}

impl SeriesVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent keys are visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, key: &str) {
        let next = !self.is_visible(key);
        self.flags.insert(key.to_string(), next);
    }

    /// Record a newly observed series as visible; keeps any existing choice.
    pub fn ensure_known(&mut self, key: &str) {
        if !self.flags.contains_key(key) {
            self.flags.insert(key.to_string(), true);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.flags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fail_open() {
        let v = SeriesVisibility::new();
        assert!(v.is_visible("core7"));
        assert!(v.is_empty());
    }

    #[test]
    fn first_toggle_hides() {
        let mut v = SeriesVisibility::new();
        v.toggle("overall");
        assert!(!v.is_visible("overall"));
        v.toggle("overall");
        assert!(v.is_visible("overall"));
    }

    #[test]
    fn ensure_known_never_overwrites() {
        let mut v = SeriesVisibility::new();
        v.ensure_known("core0");
        v.toggle("core0");
        v.ensure_known("core0");
        assert!(!v.is_visible("core0"));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn toggles_are_independent_and_order_free() {
        let mut a = SeriesVisibility::new();
        a.toggle("x");
        a.toggle("y");
        let mut b = SeriesVisibility::new();
        b.toggle("y");
        b.toggle("x");
        for k in ["x", "y", "z"] {
            assert_eq!(a.is_visible(k), b.is_visible(k));
        }
    }
}
