//! Browser implementations of the collaborator traits.

use wasm_bindgen::{JsCast, JsValue};

use crate::animation::{AnimationEngine, Target, Tween, TweenKind};
use crate::contact::{ContactError, FormTransport, TransportResponse};
use crate::store::{PreferenceStore, StoreError};
use crate::theme::ColorSchemeSignal;

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

// =============================================================================
// STORAGE
// =============================================================================

/// `window.localStorage`, resolved on every access so a store that becomes
/// unavailable mid-session degrades instead of failing hard.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => Ok(storage),
            _ => Err(StoreError::Unavailable),
        }
    }
}

fn rejected(op: &'static str, key: &str, err: &JsValue) -> StoreError {
    StoreError::Rejected { op, key: key.to_owned(), reason: format!("{err:?}") }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?.get_item(key).map_err(|e| rejected("get", key, &e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?.set_item(key, value).map_err(|e| rejected("set", key, &e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?.remove_item(key).map_err(|e| rejected("remove", key, &e))
    }
}

// =============================================================================
// COLOR SCHEME
// =============================================================================

/// `matchMedia("(prefers-color-scheme: dark)")`.
#[derive(Debug, Clone, Default)]
pub struct MediaQuerySignal {
    query: Option<web_sys::MediaQueryList>,
}

impl MediaQuerySignal {
    #[must_use]
    pub fn new() -> Self {
        let query = match web_sys::window().map(|w| w.match_media(DARK_SCHEME_QUERY)) {
            Some(Ok(query)) => query,
            _ => None,
        };
        Self { query }
    }

    #[must_use]
    pub fn query(&self) -> Option<&web_sys::MediaQueryList> {
        self.query.as_ref()
    }
}

impl ColorSchemeSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> Option<bool> {
        self.query.as_ref().map(web_sys::MediaQueryList::matches)
    }
}

// =============================================================================
// FORM TRANSPORT
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl FormTransport for GlooTransport {
    async fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<TransportResponse, ContactError> {
        let params = web_sys::UrlSearchParams::new().map_err(|e| ContactError::Transport(format!("{e:?}")))?;
        for (name, value) in fields {
            params.append(name, value);
        }

        let response = gloo_net::http::Request::post(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(params)
            .map_err(|e| ContactError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ContactError::Transport(e.to_string()))?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if (200..300).contains(&status) => {
                tracing::debug!(error = %e, status, "accepted response body unreadable");
                String::new()
            }
            Err(e) => return Err(ContactError::Transport(e.to_string())),
        };
        Ok(TransportResponse { status, body })
    }
}

// =============================================================================
// ANIMATION ENGINE
// =============================================================================

/// The page's global `gsap` object and its `ScrollTrigger` plugin.
pub struct GsapEngine {
    gsap: JsValue,
    scroll_trigger: JsValue,
    document: web_sys::Document,
}

impl GsapEngine {
    /// `None` when the engine is not loaded on this page.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let gsap = global(&window, "gsap")?;
        let scroll_trigger = global(&window, "ScrollTrigger").unwrap_or(JsValue::UNDEFINED);
        Some(Self { gsap, scroll_trigger, document })
    }

    fn resolve(&self, target: &Target) -> JsValue {
        match target {
            Target::Selector(selector) => JsValue::from_str(selector),
            Target::Nth { selector, index } => {
                let node = self
                    .document
                    .query_selector_all(selector)
                    .map(|list| list.get(u32::try_from(*index).unwrap_or(u32::MAX)));
                match node {
                    Ok(Some(node)) => node.into(),
                    _ => JsValue::UNDEFINED,
                }
            }
        }
    }

    fn vars(&self, tween: &Tween) -> Result<JsValue, JsValue> {
        let json = serde_json::to_string(&tween.vars).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let vars = js_sys::JSON::parse(&json)?;
        if let Some(trigger) = tween.vars.scroll_trigger.as_ref().and_then(|st| st.trigger.as_ref()) {
            let scroll_trigger = js_sys::Reflect::get(&vars, &JsValue::from_str("scrollTrigger"))?;
            js_sys::Reflect::set(&scroll_trigger, &JsValue::from_str("trigger"), &self.resolve(trigger))?;
        }
        Ok(vars)
    }

    fn call(&self, method: &str, args: &[&JsValue]) -> Result<(), JsValue> {
        let func: js_sys::Function = js_sys::Reflect::get(&self.gsap, &JsValue::from_str(method))?.dyn_into()?;
        match args {
            [a] => func.call1(&self.gsap, a),
            [a, b] => func.call2(&self.gsap, a, b),
            _ => func.call0(&self.gsap),
        }
        .map(|_| ())
    }
}

fn global(window: &web_sys::Window, name: &str) -> Option<JsValue> {
    match js_sys::Reflect::get(window, &JsValue::from_str(name)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => Some(value),
        _ => None,
    }
}

impl AnimationEngine for GsapEngine {
    fn has_scroll_trigger(&self) -> bool {
        !self.scroll_trigger.is_undefined()
    }

    fn register_scroll_trigger(&mut self) {
        if let Err(e) = self.call("registerPlugin", &[&self.scroll_trigger]) {
            tracing::warn!(error = ?e, "registerPlugin failed");
        }
    }

    fn run(&mut self, tween: &Tween) {
        let method = match tween.kind {
            TweenKind::From => "from",
            TweenKind::To => "to",
            TweenKind::Set => "set",
        };
        let result = self.vars(tween).and_then(|vars| self.call(method, &[&self.resolve(&tween.target), &vars]));
        if let Err(e) = result {
            tracing::debug!(error = ?e, method, "tween not scheduled");
        }
    }
}
