use super::*;
use crate::store::{DisabledStore, MemoryStore, StoreError};

const KEY: &str = "portfolio-theme";

fn controller(store: MemoryStore, controls: ToggleControls) -> ThemeController<MemoryStore> {
    ThemeController::new(store, KEY, controls)
}

fn stored(ctrl: &ThemeController<MemoryStore>) -> Option<String> {
    ctrl.store().get(KEY).unwrap()
}

/// Accepts reads, rejects writes (quota exceeded, private browsing).
#[derive(Default)]
struct ReadOnlyStore(MemoryStore);

impl PreferenceStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Rejected { op: "set", key: key.into(), reason: "quota exceeded".into() })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key)
    }
}

// =============================================================
// Mode
// =============================================================

#[test]
fn mode_parse_accepts_exact_values_only() {
    assert_eq!(Mode::parse("light"), Some(Mode::Light));
    assert_eq!(Mode::parse("dark"), Some(Mode::Dark));
    assert_eq!(Mode::parse("Dark"), None);
    assert_eq!(Mode::parse(""), None);
}

#[test]
fn mode_opposite_flips() {
    assert_eq!(Mode::Light.opposite(), Mode::Dark);
    assert_eq!(Mode::Dark.opposite(), Mode::Light);
}

#[test]
fn mode_switch_reads_on_for_light() {
    assert!(Mode::Light.switch_checked());
    assert!(!Mode::Dark.switch_checked());
    assert_eq!(Mode::from_switch(true), Mode::Light);
    assert_eq!(Mode::from_switch(false), Mode::Dark);
}

#[test]
fn mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Dark).unwrap(), "\"dark\"");
    assert_eq!(Mode::Light.to_string(), "light");
}

#[test]
fn document_reads_light_before_first_apply() {
    let doc = DocumentTheme::default();
    assert!(!doc.is_applied());
    assert_eq!(doc.current_mode(), Mode::Light);
}

// =============================================================
// Initial mode
// =============================================================

#[test]
fn no_preference_and_os_dark_infers_dark_without_persisting() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::default());
    let pref = ctrl.install(&FixedScheme::DARK);
    assert_eq!(pref, ThemePreference { mode: Mode::Dark, source: PreferenceSource::Inferred });
    assert_eq!(ctrl.current_mode(), Mode::Dark);
    assert!(ctrl.store().is_empty());
}

#[test]
fn no_preference_and_os_light_infers_light_without_persisting() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::default());
    ctrl.install(&FixedScheme::LIGHT);
    assert_eq!(ctrl.current_mode(), Mode::Light);
    assert!(ctrl.document().is_applied());
    assert!(ctrl.store().is_empty());
}

#[test]
fn stored_light_wins_over_os_dark() {
    let mut ctrl = controller(MemoryStore::with_entry(KEY, "light"), ToggleControls::default());
    let pref = ctrl.install(&FixedScheme::DARK);
    assert_eq!(pref, ThemePreference { mode: Mode::Light, source: PreferenceSource::Explicit });
    assert_eq!(ctrl.current_mode(), Mode::Light);
}

#[test]
fn unsupported_os_signal_degrades_to_light() {
    let ctrl = controller(MemoryStore::new(), ToggleControls::default());
    let pref = ctrl.compute_initial_mode(&FixedScheme::UNSUPPORTED);
    assert_eq!(pref.mode, Mode::Light);
    assert_eq!(pref.source, PreferenceSource::Inferred);
}

#[test]
fn unrecognized_stored_value_falls_back_to_os() {
    let ctrl = controller(MemoryStore::with_entry(KEY, "sepia"), ToggleControls::default());
    let pref = ctrl.compute_initial_mode(&FixedScheme::DARK);
    assert_eq!(pref, ThemePreference { mode: Mode::Dark, source: PreferenceSource::Inferred });
}

#[test]
fn install_renders_present_controls() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::new(true, true));
    ctrl.install(&FixedScheme::DARK);
    let controls = ctrl.controls();
    assert_eq!(controls.button.as_ref().map(ToggleButton::label), Some("Light mode"));
    assert_eq!(controls.switch.map(|s| s.checked()), Some(false));
}

// =============================================================
// Apply / toggle
// =============================================================

#[test]
fn manual_toggle_from_light_persists_dark() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::new(true, false));
    ctrl.install(&FixedScheme::LIGHT);

    assert_eq!(ctrl.handle_manual_toggle(), Mode::Dark);
    assert_eq!(ctrl.current_mode(), Mode::Dark);
    assert_eq!(stored(&ctrl).as_deref(), Some("dark"));
    assert_eq!(ctrl.store().len(), 1);
    assert_eq!(ctrl.controls().button.as_ref().map(ToggleButton::label), Some("Light mode"));
}

#[test]
fn manual_toggle_store_always_matches_document() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::default());
    ctrl.install(&FixedScheme::DARK);
    for _ in 0..3 {
        let mode = ctrl.handle_manual_toggle();
        assert_eq!(stored(&ctrl).as_deref(), Some(mode.as_str()));
        assert_eq!(ctrl.current_mode(), mode);
    }
}

#[test]
fn switch_and_button_converge_on_same_mode() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::new(true, true));
    ctrl.install(&FixedScheme::LIGHT);

    // A click on the switch flips its position before the change fires.
    let flipped = !ctrl.controls().switch.map_or(false, |s| s.checked());
    assert_eq!(ctrl.handle_switch_change(flipped), Mode::Dark);
    assert_eq!(stored(&ctrl).as_deref(), Some("dark"));

    assert_eq!(ctrl.handle_manual_toggle(), Mode::Light);
    assert_eq!(stored(&ctrl).as_deref(), Some("light"));
    assert_eq!(ctrl.controls().switch.map(|s| s.checked()), Some(true));
    assert_eq!(ctrl.controls().button.as_ref().map(ToggleButton::label), Some("Dark mode"));
}

#[test]
fn apply_mode_twice_is_idempotent() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::new(true, true));
    ctrl.apply_mode(Mode::Dark, true);
    let doc_once = *ctrl.document();
    let controls_once = ctrl.controls().clone();
    let store_once = stored(&ctrl);

    ctrl.apply_mode(Mode::Dark, true);
    assert_eq!(*ctrl.document(), doc_once);
    assert_eq!(*ctrl.controls(), controls_once);
    assert_eq!(stored(&ctrl), store_once);
    assert_eq!(ctrl.store().len(), 1);
}

#[test]
fn apply_without_persist_leaves_store_untouched() {
    let mut ctrl = controller(MemoryStore::with_entry(KEY, "light"), ToggleControls::default());
    ctrl.apply_mode(Mode::Dark, false);
    assert_eq!(ctrl.current_mode(), Mode::Dark);
    assert_eq!(stored(&ctrl).as_deref(), Some("light"));
}

// =============================================================
// OS changes
// =============================================================

#[test]
fn system_change_followed_without_explicit_preference() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::new(false, true));
    ctrl.install(&FixedScheme::LIGHT);
    assert!(ctrl.handle_system_change(Mode::Dark));
    assert_eq!(ctrl.current_mode(), Mode::Dark);
    assert_eq!(ctrl.controls().switch.map(|s| s.checked()), Some(false));
    assert!(ctrl.store().is_empty());
}

#[test]
fn system_change_ignored_after_explicit_preference() {
    let mut ctrl = controller(MemoryStore::new(), ToggleControls::default());
    ctrl.install(&FixedScheme::LIGHT);
    ctrl.handle_manual_toggle();
    assert!(ctrl.has_explicit_preference());

    assert!(!ctrl.handle_system_change(Mode::Light));
    assert_eq!(ctrl.current_mode(), Mode::Dark);
}

#[test]
fn cleared_preference_lets_os_win_again() {
    let mut ctrl = controller(MemoryStore::with_entry(KEY, "dark"), ToggleControls::default());
    ctrl.install(&FixedScheme::LIGHT);
    ctrl.store_mut().remove(KEY).unwrap();
    assert!(ctrl.handle_system_change(Mode::Light));
    assert_eq!(ctrl.current_mode(), Mode::Light);
}

// =============================================================
// Storage failures
// =============================================================

#[test]
fn disabled_storage_still_applies_for_session() {
    let mut ctrl = ThemeController::new(DisabledStore, KEY, ToggleControls::new(true, false));
    ctrl.install(&FixedScheme::DARK);
    assert_eq!(ctrl.current_mode(), Mode::Dark);

    assert_eq!(ctrl.handle_manual_toggle(), Mode::Light);
    assert_eq!(ctrl.current_mode(), Mode::Light);
    assert_eq!(ctrl.controls().button.as_ref().map(ToggleButton::label), Some("Dark mode"));

    // Unreadable storage counts as no preference.
    assert!(ctrl.handle_system_change(Mode::Dark));
}

#[test]
fn rejected_write_does_not_block_apply() {
    let mut ctrl = ThemeController::new(ReadOnlyStore::default(), KEY, ToggleControls::default());
    ctrl.install(&FixedScheme::LIGHT);
    assert_eq!(ctrl.handle_manual_toggle(), Mode::Dark);
    assert_eq!(ctrl.current_mode(), Mode::Dark);
    assert!(!ctrl.has_explicit_preference());
}
