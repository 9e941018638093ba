//! DOM view: writes page state back into the document.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::contact::field_selector;
use crate::meter::REVEALED_CLASS;
use crate::nav::OPEN_CLASS;
use crate::page::{Change, PageState, PageView};
use crate::theme::THEME_ATTRIBUTE;

/// Element handles resolved once at startup. Every field is optional; a
/// missing element just means that part of the page is not rendered.
#[derive(Debug, Default)]
pub struct DomView {
    pub root: Option<Element>,
    pub theme_button: Option<Element>,
    pub theme_switch: Option<HtmlInputElement>,
    pub burger: Option<Element>,
    pub sidebar: Option<Element>,
    pub menu: Option<Element>,
    pub back_to_top: Option<HtmlElement>,
    pub year: Option<Element>,
    pub meters: Vec<Element>,
    pub form: Option<HtmlFormElement>,
    pub status: Option<Element>,
    pub success: Option<HtmlElement>,
}

impl DomView {
    /// Look up the page's elements by their ids and selectors.
    #[must_use]
    pub fn resolve(document: &web_sys::Document) -> Self {
        Self {
            root: document.document_element(),
            theme_button: document.get_element_by_id("themeBtn"),
            theme_switch: by_id(document, "switch"),
            burger: document.get_element_by_id("burger"),
            sidebar: document.get_element_by_id("sidebar"),
            menu: document.get_element_by_id("menu"),
            back_to_top: by_id(document, "toTop"),
            year: document.get_element_by_id("year"),
            meters: select_all(document, ".meter"),
            form: by_id(document, "contactForm"),
            status: document.get_element_by_id("formStatus"),
            success: match document.query_selector("[data-formspree-success]") {
                Ok(Some(el)) => el.dyn_ref::<HtmlElement>().cloned(),
                _ => None,
            },
        }
    }

    fn render<S>(&self, change: Change, state: &PageState<S>) -> Result<(), JsValue> {
        match change {
            Change::Theme => {
                let mode = state.theme.current_mode();
                if let Some(root) = &self.root {
                    root.set_attribute(THEME_ATTRIBUTE, mode.as_str())?;
                }
                let controls = state.theme.controls();
                if let (Some(el), Some(button)) = (&self.theme_button, &controls.button) {
                    el.set_text_content(Some(button.label()));
                }
                if let (Some(el), Some(switch)) = (&self.theme_switch, controls.switch) {
                    el.set_checked(switch.checked());
                }
            }
            Change::Sidebar => {
                if let (Some(sidebar), Some(burger), Some(nav)) = (&self.sidebar, &self.burger, state.sidebar) {
                    sidebar.class_list().toggle_with_force(OPEN_CLASS, nav.is_open())?;
                    burger.set_attribute("aria-expanded", nav.aria_expanded())?;
                }
            }
            Change::BackToTop => {
                if let (Some(el), Some(button)) = (&self.back_to_top, state.back_to_top) {
                    el.style().set_property("display", button.display())?;
                }
            }
            Change::FooterYear => {
                if let (Some(el), Some(year)) = (&self.year, &state.footer_year) {
                    el.set_text_content(Some(year));
                }
            }
            Change::MeterRevealed(index) => {
                if let Some(meter) = self.meters.get(index) {
                    meter.class_list().add_1(REVEALED_CLASS)?;
                }
            }
            Change::ContactForm => self.render_form(state)?,
            Change::ScrollToTop => {
                if let Some(window) = web_sys::window() {
                    let options = web_sys::ScrollToOptions::new();
                    options.set_top(0.0);
                    options.set_behavior(web_sys::ScrollBehavior::Smooth);
                    window.scroll_to_with_scroll_to_options(&options);
                }
            }
        }
        Ok(())
    }

    fn render_form<S>(&self, state: &PageState<S>) -> Result<(), JsValue> {
        let Some(form) = &state.contact else {
            return Ok(());
        };
        if let (Some(el), Some(text)) = (&self.status, form.status()) {
            el.set_text_content(Some(text));
        }
        if let (Some(el), Some(visible)) = (&self.success, form.success_visible()) {
            el.style().set_property("display", if visible { "block" } else { "none" })?;
        }
        if let Some(form_el) = &self.form {
            for field in form.fields() {
                let written = match form_el.query_selector(&field_selector(&field.name)) {
                    Ok(Some(input)) => {
                        js_sys::Reflect::set(&input, &JsValue::from_str("value"), &JsValue::from_str(&field.value))
                    }
                    Ok(None) => Ok(true),
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    tracing::debug!(error = ?e, field = %field.name, "form field not updated");
                }
            }
        }
        Ok(())
    }
}

impl<S> PageView<S> for DomView {
    fn apply(&mut self, change: Change, state: &PageState<S>) {
        if let Err(e) = self.render(change, state) {
            tracing::debug!(error = ?e, ?change, "DOM update failed");
        }
    }
}

fn by_id<T: JsCast + Clone>(document: &web_sys::Document, id: &str) -> Option<T> {
    document.get_element_by_id(id).and_then(|el| el.dyn_ref::<T>().cloned())
}

pub(crate) fn select_all(document: &web_sys::Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}
