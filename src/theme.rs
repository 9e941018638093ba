//! Light/dark theme preference.
//!
//! DESIGN
//! ======
//! `ThemeController` owns the document's active mode (`DocumentTheme`), the
//! optional toggle controls, and the durable store. The document attribute is
//! never inspected directly: the browser binding reflects `DocumentTheme` into
//! `data-theme` after each apply, so everything here runs without a live DOM.
//!
//! An explicit preference (the user clicked a toggle) is persisted and always
//! wins over the OS color-scheme signal. An inferred preference (derived from
//! the OS) is applied for the session only.

use serde::{Deserialize, Serialize};

use crate::store::PreferenceStore;

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;

/// Attribute on the root element that carries the active mode.
pub const THEME_ATTRIBUTE: &str = "data-theme";

// =============================================================================
// MODE
// =============================================================================

/// The active light/dark display setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    /// Stored and attribute form: `"light"` or `"dark"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse the stored form. Anything other than the two exact values is
    /// not a mode.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// Label shown on the text toggle: it names the mode a click switches to.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Dark => "Light mode",
            Self::Light => "Dark mode",
        }
    }

    /// Switch position for this mode. The switch reads "on" for light.
    #[must_use]
    pub fn switch_checked(self) -> bool {
        self == Self::Light
    }

    /// Mode selected by a switch position.
    #[must_use]
    pub fn from_switch(checked: bool) -> Self {
        if checked { Self::Light } else { Self::Dark }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a mode came from. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// The user chose it; persisted.
    Explicit,
    /// Derived from the OS signal; session only.
    Inferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    pub mode: Mode,
    pub source: PreferenceSource,
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// OS-level color-scheme query (`prefers-color-scheme: dark`).
pub trait ColorSchemeSignal {
    /// `Some(true)` when the OS prefers dark, `None` when the environment
    /// cannot answer.
    fn prefers_dark(&self) -> Option<bool>;
}

/// Color-scheme signal with a fixed answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedScheme(pub Option<bool>);

impl FixedScheme {
    pub const DARK: Self = Self(Some(true));
    pub const LIGHT: Self = Self(Some(false));
    pub const UNSUPPORTED: Self = Self(None);
}

impl ColorSchemeSignal for FixedScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

/// Holder for the document's active mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentTheme {
    mode: Option<Mode>,
}

impl DocumentTheme {
    /// Active mode; reads as light before anything was applied.
    #[must_use]
    pub fn current_mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.mode.is_some()
    }
}

/// Text button toggle (`#themeBtn`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleButton {
    label: String,
}

impl ToggleButton {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Switch-style toggle (`#switch`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleSwitch {
    checked: bool,
}

impl ToggleSwitch {
    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }
}

/// Toggle controls present on the page, resolved once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleControls {
    pub button: Option<ToggleButton>,
    pub switch: Option<ToggleSwitch>,
}

impl ToggleControls {
    #[must_use]
    pub fn new(has_button: bool, has_switch: bool) -> Self {
        Self {
            button: has_button.then(ToggleButton::default),
            switch: has_switch.then(ToggleSwitch::default),
        }
    }

    fn render(&mut self, mode: Mode) {
        if let Some(button) = self.button.as_mut() {
            mode.button_label().clone_into(&mut button.label);
        }
        if let Some(switch) = self.switch.as_mut() {
            switch.checked = mode.switch_checked();
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Keeps the document mode, the toggle controls, and the durable preference
/// consistent.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    key: String,
    document: DocumentTheme,
    controls: ToggleControls,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn new(store: S, key: impl Into<String>, controls: ToggleControls) -> Self {
        Self { store, key: key.into(), document: DocumentTheme::default(), controls }
    }

    /// Compute the initial mode and apply it without persisting.
    pub fn install(&mut self, signal: &impl ColorSchemeSignal) -> ThemePreference {
        let initial = self.compute_initial_mode(signal);
        self.apply_mode(initial.mode, false);
        tracing::debug!(mode = %initial.mode, source = ?initial.source, "theme installed");
        initial
    }

    /// Stored preference if any, otherwise the OS signal, otherwise light.
    pub fn compute_initial_mode(&self, signal: &impl ColorSchemeSignal) -> ThemePreference {
        if let Some(mode) = self.stored_preference() {
            return ThemePreference { mode, source: PreferenceSource::Explicit };
        }
        let mode = Mode::from_prefers_dark(signal.prefers_dark().unwrap_or(false));
        ThemePreference { mode, source: PreferenceSource::Inferred }
    }

    /// Set the document mode, sync the controls, and optionally persist.
    ///
    /// Storage failures are logged and swallowed; the document mode still
    /// applies for the session.
    pub fn apply_mode(&mut self, mode: Mode, persist: bool) {
        self.document.set_mode(mode);
        self.controls.render(mode);
        if persist {
            if let Err(e) = self.store.set(&self.key, mode.as_str()) {
                tracing::debug!(error = %e, %mode, "theme preference not persisted");
            }
        }
    }

    /// Flip the current mode and persist it.
    pub fn handle_manual_toggle(&mut self) -> Mode {
        let next = self.current_mode().opposite();
        self.apply_mode(next, true);
        next
    }

    /// Apply the mode selected by the switch position and persist it.
    pub fn handle_switch_change(&mut self, checked: bool) -> Mode {
        let next = Mode::from_switch(checked);
        self.apply_mode(next, true);
        next
    }

    /// Follow an OS scheme change unless the user chose a mode explicitly.
    ///
    /// Returns whether the document mode was re-applied.
    pub fn handle_system_change(&mut self, os_mode: Mode) -> bool {
        if self.has_explicit_preference() {
            return false;
        }
        self.apply_mode(os_mode, false);
        true
    }

    #[must_use]
    pub fn current_mode(&self) -> Mode {
        self.document.current_mode()
    }

    #[must_use]
    pub fn has_explicit_preference(&self) -> bool {
        self.stored_preference().is_some()
    }

    #[must_use]
    pub fn document(&self) -> &DocumentTheme {
        &self.document
    }

    #[must_use]
    pub fn controls(&self) -> &ToggleControls {
        &self.controls
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn stored_preference(&self) -> Option<Mode> {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => {
                let mode = Mode::parse(&raw);
                if mode.is_none() {
                    tracing::debug!(value = %raw, "ignoring unrecognized stored theme");
                }
                mode
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "theme preference unreadable");
                None
            }
        }
    }
}
