use super::*;

#[derive(Default)]
struct RecordingEngine {
    plugin: bool,
    registered: bool,
    tweens: Vec<Tween>,
}

impl AnimationEngine for RecordingEngine {
    fn has_scroll_trigger(&self) -> bool {
        self.plugin
    }

    fn register_scroll_trigger(&mut self) {
        self.registered = true;
    }

    fn run(&mut self, tween: &Tween) {
        self.tweens.push(tween.clone());
    }
}

fn bar(aria: Option<&str>, data: Option<&str>, tooltip: Option<&str>) -> SkillBar {
    SkillBar {
        aria_valuenow: aria.map(str::to_owned),
        data_percentage: data.map(str::to_owned),
        tooltip_text: tooltip.map(str::to_owned),
    }
}

// =============================================================
// Skill bar percentage
// =============================================================

#[test]
fn percent_prefers_aria_valuenow() {
    assert!((bar(Some("85"), Some("40"), Some("10%")).percent() - 85.0).abs() < f64::EPSILON);
}

#[test]
fn percent_falls_back_to_data_attribute() {
    assert!((bar(None, Some("40"), Some("10%")).percent() - 40.0).abs() < f64::EPSILON);
    assert!((bar(Some(""), Some("40"), None).percent() - 40.0).abs() < f64::EPSILON);
}

#[test]
fn percent_falls_back_to_tooltip_text() {
    assert!((bar(None, None, Some("72%")).percent() - 72.0).abs() < f64::EPSILON);
    assert!((bar(None, None, Some(" 60% ")).percent() - 60.0).abs() < f64::EPSILON);
}

#[test]
fn percent_accepts_exponent_and_radix_forms() {
    assert!((bar(Some(" 1e2 "), None, None).percent() - 100.0).abs() < f64::EPSILON);
    assert!((bar(Some("0x10"), None, None).percent() - 16.0).abs() < f64::EPSILON);
    assert!((bar(Some("0o17"), None, None).percent() - 15.0).abs() < f64::EPSILON);
    assert!((bar(None, None, Some("0b101%")).percent() - 5.0).abs() < f64::EPSILON);
}

#[test]
fn percent_bad_radix_digits_are_zero() {
    assert!(bar(Some("0x"), None, None).percent().abs() < f64::EPSILON);
    assert!(bar(Some("0xZZ"), None, None).percent().abs() < f64::EPSILON);
    assert!(bar(Some("0b12"), None, None).percent().abs() < f64::EPSILON);
}

#[test]
fn percent_non_numeric_is_zero() {
    assert!(bar(Some("lots"), None, None).percent().abs() < f64::EPSILON);
    assert!(bar(None, None, Some("50%%")).percent().abs() < f64::EPSILON);
    assert!(bar(None, None, None).percent().abs() < f64::EPSILON);
    assert!(bar(Some("inf"), None, None).percent().abs() < f64::EPSILON);
}

// =============================================================
// Plan
// =============================================================

#[test]
fn plan_without_bars_or_cards_has_five_fixed_tweens() {
    let plan = build_plan(&PageScan::default());
    assert_eq!(plan.len(), 5);
    assert!(plan.iter().all(|t| t.kind == TweenKind::From));
    assert_eq!(plan[0].target, Target::Selector(".about-hero .title".into()));
    assert!(plan[0].vars.scroll_trigger.is_none());
    assert_eq!(plan[2].vars.scroll_trigger.as_ref().map(|s| s.start.as_str()), Some("top 85%"));
}

#[test]
fn skill_bar_is_reset_then_grown_to_percent() {
    let scan = PageScan { skill_bars: vec![bar(Some("85.5"), None, None)], card_count: 0 };
    let plan = build_plan(&scan);
    assert_eq!(plan.len(), 7);

    let reset = &plan[5];
    assert_eq!(reset.kind, TweenKind::Set);
    assert_eq!(reset.vars.width.as_deref(), Some("0%"));

    let grow = &plan[6];
    assert_eq!(grow.kind, TweenKind::To);
    assert_eq!(grow.target, Target::Nth { selector: SKILL_BAR_SELECTOR.into(), index: 0 });
    assert_eq!(grow.vars.width.as_deref(), Some("85.5%"));
    let trigger = grow.vars.scroll_trigger.as_ref().unwrap();
    assert_eq!(trigger.trigger.as_ref(), Some(&grow.target));
    assert_eq!(trigger.toggle_actions.as_deref(), Some("play none none none"));
}

#[test]
fn integral_percent_has_no_fraction() {
    let scan = PageScan { skill_bars: vec![bar(Some("90"), None, None)], card_count: 0 };
    assert_eq!(build_plan(&scan)[6].vars.width.as_deref(), Some("90%"));
}

#[test]
fn each_card_gets_entrance_tween() {
    let plan = build_plan(&PageScan { skill_bars: Vec::new(), card_count: 3 });
    let cards: Vec<_> = plan.iter().skip(5).collect();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[2].target, Target::Nth { selector: CARD_SELECTOR.into(), index: 2 });
    assert_eq!(
        cards[0].vars.scroll_trigger.as_ref().and_then(|s| s.toggle_actions.as_deref()),
        Some("play none none reverse")
    );
}

#[test]
fn vars_serialize_camel_case_without_empty_fields() {
    let plan = build_plan(&PageScan { skill_bars: Vec::new(), card_count: 1 });
    let json = serde_json::to_value(&plan[5].vars).unwrap();
    assert_eq!(json["rotateX"], 3.0);
    assert_eq!(json["scrollTrigger"]["toggleActions"], "play none none reverse");
    assert!(json["scrollTrigger"].get("trigger").is_none());
    assert!(json.get("x").is_none());
    assert!(json.get("width").is_none());
}

// =============================================================
// Install
// =============================================================

#[test]
fn install_without_engine_issues_nothing() {
    assert_eq!(install::<RecordingEngine>(None, &PageScan::default()), 0);
}

#[test]
fn install_without_plugin_issues_nothing() {
    let mut engine = RecordingEngine::default();
    assert_eq!(install(Some(&mut engine), &PageScan::default()), 0);
    assert!(!engine.registered);
    assert!(engine.tweens.is_empty());
}

#[test]
fn install_registers_plugin_and_runs_plan() {
    let mut engine = RecordingEngine { plugin: true, ..RecordingEngine::default() };
    let scan = PageScan { skill_bars: vec![bar(Some("50"), None, None)], card_count: 2 };
    assert_eq!(install(Some(&mut engine), &scan), 9);
    assert!(engine.registered);
    assert_eq!(engine.tweens, build_plan(&scan));
}
