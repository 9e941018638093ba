//! Skill meter reveal.
//!
//! Each `.meter` element gets the `on` class the first time the visibility
//! notifier reports it intersecting the viewport. The class is sticky.

#[cfg(test)]
#[path = "meter_test.rs"]
mod tests;

/// Class added to a revealed meter.
pub const REVEALED_CLASS: &str = "on";

#[derive(Debug, Clone, PartialEq)]
pub struct MeterReveal {
    threshold: f64,
    revealed: Vec<bool>,
}

impl MeterReveal {
    /// Track `count` meters. `None` when the page has none, in which case no
    /// observer should be created.
    #[must_use]
    pub fn install(count: usize, threshold: f64) -> Option<Self> {
        (count > 0).then(|| Self { threshold, revealed: vec![false; count] })
    }

    /// Visibility ratio to configure on the notifier.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Handle one notifier entry. Returns `true` only when the meter was
    /// revealed by this entry.
    pub fn observe(&mut self, index: usize, is_intersecting: bool) -> bool {
        if !is_intersecting {
            return false;
        }
        match self.revealed.get_mut(index) {
            Some(revealed) if !*revealed => {
                *revealed = true;
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!(index, "visibility entry for unknown meter");
                false
            }
        }
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}
