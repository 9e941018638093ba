//! Mobile sidebar navigation.
//!
//! The sidebar is only wired when the burger button, the sidebar, and the menu
//! are all present. The open state is mirrored into the burger's
//! `aria-expanded` attribute.

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;

/// Class toggled on the sidebar element.
pub const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    open: bool,
    breakpoint_px: u32,
}

impl Sidebar {
    /// Closed sidebar that auto-closes on menu clicks at or below
    /// `breakpoint_px` viewport width.
    #[must_use]
    pub fn new(breakpoint_px: u32) -> Self {
        Self { open: false, breakpoint_px }
    }

    /// Resolve the sidebar from the three elements it needs.
    #[must_use]
    pub fn detect(has_burger: bool, has_sidebar: bool, has_menu: bool, breakpoint_px: u32) -> Option<Self> {
        (has_burger && has_sidebar && has_menu).then(|| Self::new(breakpoint_px))
    }

    /// Burger click. Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Click inside the menu. Closes an open sidebar when the click landed on
    /// a menu item and the viewport is narrow. Returns whether it closed.
    pub fn menu_click(&mut self, on_item: bool, viewport_width: u32) -> bool {
        if !on_item || viewport_width > self.breakpoint_px || !self.open {
            return false;
        }
        self.open = false;
        true
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value for the burger's `aria-expanded` attribute.
    #[must_use]
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}
