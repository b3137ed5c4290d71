//! Structural change detection for watched config fields.

/// Remembers the last observed value and reports when it changes.
#[derive(Debug)]
pub struct ChangeObserver<T> {
    last: Option<T>,
}

impl<T> Default for ChangeObserver<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq> ChangeObserver<T> {
    /// New observer; its first observation always counts as a change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value`, returning `true` if it differs from the previous one.
    pub fn observe(&mut self, value: T) -> bool {
        if self.last.as_ref() == Some(&value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// Invokes `on_change` with the new value whenever it differs.
    pub fn observe_with(&mut self, value: T, on_change: impl FnOnce(&T)) {
        if self.observe(value) {
            if let Some(current) = &self.last {
                on_change(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_is_a_change() {
        let mut observer = ChangeObserver::new();
        assert!(observer.observe(1));
    }

    #[test]
    fn equal_content_is_not_a_change() {
        let mut observer = ChangeObserver::new();
        assert!(observer.observe(vec!["AAPL".to_string()]));
        assert!(!observer.observe(vec!["AAPL".to_string()]));
        assert!(observer.observe(vec!["AAPL".to_string(), "MSFT".to_string()]));
    }

    #[test]
    fn callback_runs_only_on_change() {
        let mut observer = ChangeObserver::new();
        let mut seen = Vec::new();
        for value in [1, 1, 2, 2, 1] {
            observer.observe_with(value, |v| seen.push(*v));
        }
        assert_eq!(seen, vec![1, 2, 1]);
    }
}
