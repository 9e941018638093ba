//! Browser binding.
//!
//! Build with `--no-default-features --features hydrate` for
//! `wasm32-unknown-unknown`. On start the binding reads the published site
//! settings (defaults when unavailable), resolves the page's elements once,
//! turns DOM callbacks into `PageEvent`s, and runs the page loop on the
//! browser's task queue.

pub mod adapters;
pub mod view;

use futures::channel::mpsc::UnboundedSender;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Element, Event, EventTarget, HtmlFormElement};

use crate::animation::{self, CARD_SELECTOR, PageScan, SKILL_BAR_SELECTOR, SkillBar};
use crate::config::{SITE_CONFIG_PATH, SiteConfig};
use crate::contact::{ContactForm, FormField};
use crate::page::{Page, PageElements, PageEvent, event_channel};
use adapters::{GlooTransport, GsapEngine, LocalStorage, MediaQuerySignal};
use view::DomView;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        tracing::debug!(error = %e, "console logger already installed");
    }
    wasm_bindgen_futures::spawn_local(mount());
}

/// Wire the current document and start its event loop.
pub async fn mount() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let config = fetch_config().await;
    let view = DomView::resolve(&document);
    let signal = MediaQuerySignal::new();
    let (tx, rx) = event_channel();

    let elements = PageElements {
        theme_button: view.theme_button.is_some(),
        theme_switch: view.theme_switch.is_some(),
        burger: view.burger.is_some(),
        sidebar: view.sidebar.is_some(),
        menu: view.menu.is_some(),
        back_to_top: view.back_to_top.is_some(),
        scroll_y: window.scroll_y().unwrap_or(0.0),
        footer_year: view.year.as_ref().map(|_| current_year()),
        meter_count: view.meters.len(),
        contact_form: view
            .form
            .as_ref()
            .map(|form| contact_form(form, view.status.is_some(), view.success.is_some())),
    };

    wire_theme(&view, &signal, &tx);
    wire_chrome(&window, &view, &tx);
    wire_meters(&view, config.meter_threshold, &tx);
    wire_form(&view, &tx);

    animation::install(GsapEngine::detect().as_mut(), &scan_page(&document));

    let mut page = Page::install(&config, elements, LocalStorage, &signal, GlooTransport, view);
    wasm_bindgen_futures::spawn_local(async move {
        page.run(rx).await;
    });
}

async fn fetch_config() -> SiteConfig {
    let response = match gloo_net::http::Request::get(SITE_CONFIG_PATH).send().await {
        Ok(response) if (200..300).contains(&response.status()) => response,
        _ => {
            tracing::debug!("site config unavailable, using defaults");
            return SiteConfig::default();
        }
    };
    match response.json::<SiteConfig>().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "site config unreadable, using defaults");
            SiteConfig::default()
        }
    }
}

fn current_year() -> i32 {
    i32::try_from(js_sys::Date::new_0().get_full_year()).unwrap_or_default()
}

// =============================================================================
// LISTENERS
// =============================================================================

fn send(tx: &UnboundedSender<PageEvent>, event: PageEvent) {
    if let Err(e) = tx.unbounded_send(event) {
        tracing::debug!(error = %e, "page loop gone, event dropped");
    }
}

/// Attach `handler` for the page's lifetime.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        tracing::debug!(error = ?e, event, "listener not attached");
    }
    closure.forget();
}

fn wire_theme(view: &DomView, signal: &MediaQuerySignal, tx: &UnboundedSender<PageEvent>) {
    if let Some(button) = &view.theme_button {
        let tx = tx.clone();
        listen(button, "click", move |_| send(&tx, PageEvent::ThemeButtonClick));
    }
    if let Some(switch) = &view.theme_switch {
        let tx = tx.clone();
        let input = switch.clone();
        listen(switch, "change", move |_| send(&tx, PageEvent::ThemeSwitchChange { checked: input.checked() }));
    }
    if let Some(query) = signal.query() {
        let tx = tx.clone();
        listen(query, "change", move |event| {
            if let Some(change) = event.dyn_ref::<web_sys::MediaQueryListEvent>() {
                send(&tx, PageEvent::ColorSchemeChange { prefers_dark: change.matches() });
            }
        });
    }
}

fn wire_chrome(window: &web_sys::Window, view: &DomView, tx: &UnboundedSender<PageEvent>) {
    if let (Some(burger), Some(_), Some(menu)) = (&view.burger, &view.sidebar, &view.menu) {
        let burger_tx = tx.clone();
        listen(burger, "click", move |_| send(&burger_tx, PageEvent::BurgerClick));

        let menu_tx = tx.clone();
        let win = window.clone();
        listen(menu, "click", move |event| {
            let on_item = event.target().is_some_and(|t| {
                t.dyn_ref::<Element>().is_some_and(|el| matches!(el.closest(".menu-item"), Ok(Some(_))))
            });
            let viewport_width = win.inner_width().map_or(0, |w| viewport_px(w.as_f64().unwrap_or(0.0)));
            send(&menu_tx, PageEvent::MenuClick { on_item, viewport_width });
        });
    }

    if let Some(button) = &view.back_to_top {
        let scroll_tx = tx.clone();
        let win = window.clone();
        listen(window, "scroll", move |_| {
            send(&scroll_tx, PageEvent::Scroll { y: win.scroll_y().unwrap_or(0.0) });
        });

        let click_tx = tx.clone();
        listen(button, "click", move |_| send(&click_tx, PageEvent::BackToTopClick));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn viewport_px(width: f64) -> u32 {
    width.clamp(0.0, f64::from(u32::MAX)) as u32
}

fn wire_meters(view: &DomView, threshold: f64, tx: &UnboundedSender<PageEvent>) {
    if view.meters.is_empty() {
        return;
    }
    let meters = view.meters.clone();
    let tx = tx.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                if let Some(index) = meters.iter().position(|m| *m == target) {
                    send(&tx, PageEvent::MeterVisibility { index, is_intersecting: entry.is_intersecting() });
                }
            }
        },
    );

    let options = web_sys::IntersectionObserverInit::new();
    options.set_threshold(&threshold.into());
    match web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            for meter in &view.meters {
                observer.observe(meter);
            }
        }
        Err(e) => tracing::debug!(error = ?e, "visibility observer unavailable"),
    }
    callback.forget();
}

fn wire_form(view: &DomView, tx: &UnboundedSender<PageEvent>) {
    let Some(form) = &view.form else {
        return;
    };
    let tx = tx.clone();
    let form_el = form.clone();
    listen(form, "submit", move |event| {
        event.prevent_default();
        send(&tx, PageEvent::Submit { entries: form_entries(&form_el) });
    });
}

// =============================================================================
// SCANS
// =============================================================================

/// Text name/value pairs currently held by `form`. File inputs are skipped.
fn form_entries(form: &HtmlFormElement) -> Vec<(String, String)> {
    let Ok(data) = web_sys::FormData::new_with_form(form) else {
        return Vec::new();
    };
    let Ok(Some(iter)) = js_sys::try_iter(&data) else {
        return Vec::new();
    };
    iter.flatten()
        .filter_map(|item| {
            let pair = js_sys::Array::from(&item);
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

fn contact_form(form: &HtmlFormElement, has_status: bool, has_success: bool) -> ContactForm {
    let fields = form_entries(form)
        .into_iter()
        .map(|(name, value)| FormField { name, default_value: value.clone(), value })
        .collect();
    let mut contact = ContactForm::from_fields(form.action(), fields);
    if has_status {
        contact = contact.with_status_line();
    }
    if has_success {
        contact = contact.with_success_indicator();
    }
    contact
}

fn scan_page(document: &web_sys::Document) -> PageScan {
    let skill_bars = view::select_all(document, SKILL_BAR_SELECTOR)
        .iter()
        .map(|el| SkillBar {
            aria_valuenow: el.get_attribute("aria-valuenow"),
            data_percentage: el.get_attribute("data-percentage"),
            tooltip_text: match el.query_selector(".tooltip") {
                Ok(Some(tooltip)) => tooltip.text_content(),
                _ => None,
            },
        })
        .collect();
    PageScan { skill_bars, card_count: view::select_all(document, CARD_SELECTOR).len() }
}
