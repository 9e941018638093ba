//! Scroll-driven page chrome: the back-to-top button and the footer year.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

/// Back-to-top button visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackToTop {
    threshold_px: u32,
    visible: bool,
}

impl BackToTop {
    /// Install the button and evaluate the current scroll offset once.
    #[must_use]
    pub fn install(threshold_px: u32, scroll_y: f64) -> Self {
        let mut button = Self { threshold_px, visible: false };
        button.on_scroll(scroll_y);
        button
    }

    /// Update visibility for a new scroll offset. Returns the new state.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        self.visible = scroll_y > f64::from(self.threshold_px);
        self.visible
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Inline `display` value for the button.
    #[must_use]
    pub fn display(&self) -> &'static str {
        if self.visible { "grid" } else { "none" }
    }
}

/// Text for the footer `#year` element.
#[must_use]
pub fn footer_year_text(year: i32) -> String {
    year.to_string()
}

/// Current calendar year (UTC).
#[cfg(feature = "native")]
#[must_use]
pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}
