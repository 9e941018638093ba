use super::*;

#[test]
fn detect_requires_all_three_elements() {
    assert!(Sidebar::detect(true, true, true, 900).is_some());
    assert!(Sidebar::detect(false, true, true, 900).is_none());
    assert!(Sidebar::detect(true, false, true, 900).is_none());
    assert!(Sidebar::detect(true, true, false, 900).is_none());
}

#[test]
fn burger_toggles_and_mirrors_aria() {
    let mut sidebar = Sidebar::new(900);
    assert_eq!(sidebar.aria_expanded(), "false");
    assert!(sidebar.toggle());
    assert_eq!(sidebar.aria_expanded(), "true");
    assert!(!sidebar.toggle());
    assert_eq!(sidebar.aria_expanded(), "false");
}

#[test]
fn menu_item_click_closes_on_narrow_viewport() {
    let mut sidebar = Sidebar::new(900);
    sidebar.toggle();
    assert!(sidebar.menu_click(true, 900));
    assert!(!sidebar.is_open());
    assert_eq!(sidebar.aria_expanded(), "false");
}

#[test]
fn menu_item_click_keeps_open_on_wide_viewport() {
    let mut sidebar = Sidebar::new(900);
    sidebar.toggle();
    assert!(!sidebar.menu_click(true, 901));
    assert!(sidebar.is_open());
}

#[test]
fn click_outside_menu_item_is_ignored() {
    let mut sidebar = Sidebar::new(900);
    sidebar.toggle();
    assert!(!sidebar.menu_click(false, 320));
    assert!(sidebar.is_open());
}

#[test]
fn menu_click_on_closed_sidebar_is_noop() {
    let mut sidebar = Sidebar::new(900);
    assert!(!sidebar.menu_click(true, 320));
    assert!(!sidebar.is_open());
}
