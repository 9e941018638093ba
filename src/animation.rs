//! Scroll-in animation plan.
//!
//! DESIGN
//! ======
//! The animation engine and its scroll-trigger plugin are external. This
//! module only decides *what* to animate: `build_plan` turns a scan of the
//! page into a list of declarative tweens, and `install` hands them to the
//! engine when (and only when) the engine and plugin are both present. Tween
//! parameters serialize to the engine's camelCase vars object.

use serde::Serialize;

#[cfg(test)]
#[path = "animation_test.rs"]
mod tests;

pub const SKILL_BAR_SELECTOR: &str = ".skill-per";
pub const CARD_SELECTOR: &str = ".card";

const EASE_HERO: &str = "power3.out";
const EASE_DEFAULT: &str = "power2.out";

// =============================================================================
// TWEENS
// =============================================================================

/// What a tween applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every element matching a selector.
    Selector(String),
    /// The `index`-th match of a selector.
    Nth { selector: String, index: usize },
}

impl Target {
    fn selector(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }

    fn nth(selector: &str, index: usize) -> Self {
        Self::Nth { selector: selector.to_owned(), index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Animate from the given vars to the element's current state.
    From,
    /// Animate from the current state to the given vars.
    To,
    /// Apply the vars immediately.
    Set,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTrigger {
    /// Element whose visibility starts the tween. Resolved by the binding.
    #[serde(skip)]
    pub trigger: Option<Target>,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle_actions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweenVars {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "rotateX")]
    pub rotate_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_trigger: Option<ScrollTrigger>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub target: Target,
    pub vars: TweenVars,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Animation scheduler detected on the page.
pub trait AnimationEngine {
    /// Whether the scroll-trigger plugin is loaded alongside the engine.
    fn has_scroll_trigger(&self) -> bool;

    fn register_scroll_trigger(&mut self);

    /// Schedule one tween. Fire-and-forget.
    fn run(&mut self, tween: &Tween);
}

// =============================================================================
// PAGE SCAN
// =============================================================================

/// Attributes of one `.skill-per` bar that can carry its percentage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillBar {
    pub aria_valuenow: Option<String>,
    pub data_percentage: Option<String>,
    pub tooltip_text: Option<String>,
}

impl SkillBar {
    /// Percentage from `aria-valuenow`, then `data-percentage`, then the
    /// tooltip text with its first `%` removed. Decimal, exponent, and
    /// `0x`/`0o`/`0b` integer forms are accepted; anything else reads as 0.
    #[must_use]
    pub fn percent(&self) -> f64 {
        let raw = non_empty(self.aria_valuenow.as_deref())
            .or_else(|| non_empty(self.data_percentage.as_deref()))
            .map_or_else(
                || self.tooltip_text.as_deref().unwrap_or_default().replacen('%', "", 1),
                str::to_owned,
            );
        parse_percent(&raw)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_percent(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_prefixed_integer(trimmed) {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// `0x1f`, `0o17`, `0b101`: unsigned integer literals with a radix prefix.
/// Digits outside the radix read as 0.
fn parse_prefixed_integer(raw: &str) -> Option<f64> {
    let radix = match raw.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &raw[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(0.0);
    }
    Some(u32::from_str_radix(digits, radix).map_or(0.0, f64::from))
}

/// Elements the plan needs to know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    pub skill_bars: Vec<SkillBar>,
    pub card_count: usize,
}

// =============================================================================
// PLAN
// =============================================================================

fn hero_text(selector: &str, y: f64, duration: f64, delay: f64) -> Tween {
    Tween {
        kind: TweenKind::From,
        target: Target::selector(selector),
        vars: TweenVars {
            y: Some(y),
            opacity: Some(0.0),
            duration: Some(duration),
            delay: Some(delay),
            ease: Some(EASE_HERO.into()),
            ..TweenVars::default()
        },
    }
}

fn slide_in(selector: &str, trigger: &str, start: &str, x: f64) -> Tween {
    Tween {
        kind: TweenKind::From,
        target: Target::selector(selector),
        vars: TweenVars {
            x: Some(x),
            opacity: Some(0.0),
            duration: Some(1.0),
            ease: Some(EASE_DEFAULT.into()),
            scroll_trigger: Some(ScrollTrigger {
                trigger: Some(Target::selector(trigger)),
                start: start.into(),
                toggle_actions: None,
            }),
            ..TweenVars::default()
        },
    }
}

fn skill_bar_tweens(index: usize, bar: &SkillBar) -> [Tween; 2] {
    let target = Target::nth(SKILL_BAR_SELECTOR, index);
    let reset = Tween {
        kind: TweenKind::Set,
        target: target.clone(),
        vars: TweenVars { width: Some("0%".into()), opacity: Some(1.0), ..TweenVars::default() },
    };
    let grow = Tween {
        kind: TweenKind::To,
        target: target.clone(),
        vars: TweenVars {
            width: Some(format!("{}%", bar.percent())),
            duration: Some(1.2),
            ease: Some(EASE_DEFAULT.into()),
            scroll_trigger: Some(ScrollTrigger {
                trigger: Some(target),
                start: "top 85%".into(),
                toggle_actions: Some("play none none none".into()),
            }),
            ..TweenVars::default()
        },
    };
    [reset, grow]
}

fn card_tween(index: usize) -> Tween {
    let target = Target::nth(CARD_SELECTOR, index);
    Tween {
        kind: TweenKind::From,
        target: target.clone(),
        vars: TweenVars {
            y: Some(30.0),
            opacity: Some(0.0),
            scale: Some(0.97),
            rotate_x: Some(3.0),
            duration: Some(0.8),
            ease: Some(EASE_DEFAULT.into()),
            scroll_trigger: Some(ScrollTrigger {
                trigger: Some(target),
                start: "top 85%".into(),
                toggle_actions: Some("play none none reverse".into()),
            }),
            ..TweenVars::default()
        },
    }
}

/// All tweens for a page, in issue order.
#[must_use]
pub fn build_plan(scan: &PageScan) -> Vec<Tween> {
    let mut plan = vec![
        hero_text(".about-hero .title", 40.0, 1.0, 0.15),
        hero_text(".about-hero .subtitle", 20.0, 0.9, 0.25),
        slide_in(".about-hero .imag img", ".about-hero", "top 85%", -40.0),
        slide_in(".about-main .image img", ".about-main .image", "top 80%", -40.0),
        slide_in(".about-main .text", ".about-main .text", "top 80%", 40.0),
    ];
    for (index, bar) in scan.skill_bars.iter().enumerate() {
        plan.extend(skill_bar_tweens(index, bar));
    }
    plan.extend((0..scan.card_count).map(card_tween));
    plan
}

/// Register the plugin and issue the plan if the engine is usable.
///
/// Returns the number of tweens issued; zero when the engine or its plugin
/// is missing.
pub fn install<E: AnimationEngine + ?Sized>(engine: Option<&mut E>, scan: &PageScan) -> usize {
    let Some(engine) = engine else {
        tracing::debug!("animation engine absent, skipping");
        return 0;
    };
    if !engine.has_scroll_trigger() {
        tracing::debug!("scroll-trigger plugin absent, skipping");
        return 0;
    }
    engine.register_scroll_trigger();
    let plan = build_plan(scan);
    for tween in &plan {
        engine.run(tween);
    }
    tracing::debug!(tweens = plan.len(), "animations scheduled");
    plan.len()
}
