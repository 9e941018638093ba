//! Page wiring and event dispatch.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every browser callback the site reacts to (clicks, switch changes, OS
//! scheme changes, scrolls, visibility entries, form submits) is turned into a
//! `PageEvent` and pushed into one channel. `Page::run` drains that channel in
//! order on the UI thread. Only a form submit suspends: its request is polled
//! next to the channel, and its verdict is applied when it resolves, so
//! clicks, scrolls, and visibility reports stay live while it is pending.
//! Submits are not queued behind each other; each one applies its own verdict
//! to the form when it lands.
//!
//! After each state change the page calls `PageView::apply` with what
//! changed. The browser binding implements `PageView` by writing the new
//! state into the DOM; tests record the calls.

use futures::channel::mpsc;
use futures::stream::FuturesUnordered;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::{Stream, StreamExt};

use crate::config::SiteConfig;
use crate::contact::{
    ContactClient, ContactError, ContactForm, FormTransport, SubmitOutcome, SubmitRequest, TransportResponse,
};
use crate::meter::MeterReveal;
use crate::nav::Sidebar;
use crate::scroll::{BackToTop, footer_year_text};
use crate::store::PreferenceStore;
use crate::theme::{ColorSchemeSignal, Mode, ThemeController, ToggleControls};

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ThemeButtonClick,
    /// The switch's position after the user flipped it.
    ThemeSwitchChange { checked: bool },
    ColorSchemeChange { prefers_dark: bool },
    BurgerClick,
    /// Click inside the menu; `on_item` when it landed on a `.menu-item`.
    MenuClick { on_item: bool, viewport_width: u32 },
    Scroll { y: f64 },
    BackToTopClick,
    MeterVisibility { index: usize, is_intersecting: bool },
    /// Form submitted with the name/value pairs it held at that moment.
    Submit { entries: Vec<(String, String)> },
}

/// Channel feeding a page loop.
#[must_use]
pub fn event_channel() -> (mpsc::UnboundedSender<PageEvent>, mpsc::UnboundedReceiver<PageEvent>) {
    mpsc::unbounded()
}

/// What a dispatch changed, for the view to reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Document mode and toggle controls.
    Theme,
    /// Sidebar open class and burger `aria-expanded`.
    Sidebar,
    /// Back-to-top display.
    BackToTop,
    FooterYear,
    MeterRevealed(usize),
    /// Status line, success indicator, and field values.
    ContactForm,
    /// Smooth scroll to the top requested.
    ScrollToTop,
}

/// Reflects page state into the document.
pub trait PageView<S> {
    fn apply(&mut self, change: Change, state: &PageState<S>);
}

impl<S> PageView<S> for () {
    fn apply(&mut self, _change: Change, _state: &PageState<S>) {}
}

// =============================================================================
// STATE
// =============================================================================

/// Elements found on the page at load, plus the load-time scroll offset.
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    pub theme_button: bool,
    pub theme_switch: bool,
    pub burger: bool,
    pub sidebar: bool,
    pub menu: bool,
    pub back_to_top: bool,
    pub scroll_y: f64,
    /// Year to show when the page has a `#year` element.
    pub footer_year: Option<i32>,
    pub meter_count: usize,
    pub contact_form: Option<ContactForm>,
}

#[derive(Debug)]
pub struct PageState<S> {
    pub theme: ThemeController<S>,
    pub sidebar: Option<Sidebar>,
    pub back_to_top: Option<BackToTop>,
    pub footer_year: Option<String>,
    pub meters: Option<MeterReveal>,
    pub contact: Option<ContactForm>,
}

// =============================================================================
// PAGE
// =============================================================================

pub struct Page<S, T, V> {
    state: PageState<S>,
    client: ContactClient<T>,
    view: V,
}

impl<S, T, V> Page<S, T, V>
where
    S: PreferenceStore,
    T: FormTransport,
    V: PageView<S>,
{
    /// Resolve components from the elements present, apply the initial
    /// theme, and render the initial state.
    pub fn install(
        config: &SiteConfig,
        elements: PageElements,
        store: S,
        signal: &impl ColorSchemeSignal,
        transport: T,
        view: V,
    ) -> Self {
        let controls = ToggleControls::new(elements.theme_button, elements.theme_switch);
        let mut theme = ThemeController::new(store, config.theme_key.clone(), controls);
        theme.install(signal);

        let state = PageState {
            theme,
            sidebar: Sidebar::detect(elements.burger, elements.sidebar, elements.menu, config.mobile_breakpoint_px),
            back_to_top: elements
                .back_to_top
                .then(|| BackToTop::install(config.back_to_top_px, elements.scroll_y)),
            footer_year: elements.footer_year.map(footer_year_text),
            meters: MeterReveal::install(elements.meter_count, config.meter_threshold),
            contact: elements.contact_form,
        };

        let mut page = Self { state, client: ContactClient::new(transport, config.contact.clone()), view };
        page.render(Change::Theme);
        if page.state.sidebar.is_some() {
            page.render(Change::Sidebar);
        }
        if page.state.back_to_top.is_some() {
            page.render(Change::BackToTop);
        }
        if page.state.footer_year.is_some() {
            page.render(Change::FooterYear);
        }
        tracing::info!(
            mode = %page.state.theme.current_mode(),
            sidebar = page.state.sidebar.is_some(),
            meters = page.state.meters.as_ref().map_or(0, MeterReveal::len),
            contact = page.state.contact.is_some(),
            "page installed"
        );
        page
    }

    /// Process events until the stream ends and every in-flight submit has
    /// resolved. A submit's request runs alongside the stream, so other
    /// events keep being handled while it is pending.
    pub async fn run(&mut self, events: impl Stream<Item = PageEvent> + Unpin) {
        let Self { state, client, view } = self;
        let client = &*client;
        let mut events = events.fuse();
        let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Result<TransportResponse, ContactError>>> =
            FuturesUnordered::new();

        loop {
            futures::select_biased! {
                result = in_flight.select_next_some() => finish_submit(state, view, client, result),
                event = events.next() => {
                    let Some(event) = event else {
                        tracing::debug!(pending = in_flight.len(), "page event stream closed");
                        continue;
                    };
                    let Some(entries) = handle(state, view, event) else {
                        continue;
                    };
                    match begin_submit(state, view, client, entries) {
                        Some(Ok(request)) => in_flight.push(client.deliver(request).boxed_local()),
                        Some(Err(e)) => finish_submit(state, view, client, Err(e)),
                        None => {}
                    }
                }
                complete => break,
            }
        }
    }

    /// Handle one event. Events aimed at elements the page lacks are ignored.
    /// A submit is awaited to completion before this returns.
    pub async fn dispatch(&mut self, event: PageEvent) {
        if let Some(entries) = handle(&mut self.state, &mut self.view, event) {
            if let Some(form) = self.state.contact.as_mut() {
                form.fill(entries);
            }
            self.submit().await;
        }
    }

    /// Submit the contact form, rendering the interim status before the
    /// request and the verdict after it. `None` when the page has no form.
    pub async fn submit(&mut self) -> Option<SubmitOutcome> {
        self.client.begin(self.state.contact.as_mut()?);
        self.render(Change::ContactForm);

        let result = self.client.send(self.state.contact.as_ref()?).await;

        let outcome = self.client.finish(self.state.contact.as_mut()?, result);
        self.render(Change::ContactForm);
        Some(outcome)
    }

    #[must_use]
    pub fn state(&self) -> &PageState<S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState<S> {
        &mut self.state
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    fn render(&mut self, change: Change) {
        self.view.apply(change, &self.state);
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Apply every event except a submit, whose entries are handed back.
fn handle<S, V>(state: &mut PageState<S>, view: &mut V, event: PageEvent) -> Option<Vec<(String, String)>>
where
    S: PreferenceStore,
    V: PageView<S>,
{
    let change = match event {
        PageEvent::ThemeButtonClick => state.theme.controls().button.is_some().then(|| {
            state.theme.handle_manual_toggle();
            Change::Theme
        }),
        PageEvent::ThemeSwitchChange { checked } => state.theme.controls().switch.is_some().then(|| {
            state.theme.handle_switch_change(checked);
            Change::Theme
        }),
        PageEvent::ColorSchemeChange { prefers_dark } => state
            .theme
            .handle_system_change(Mode::from_prefers_dark(prefers_dark))
            .then_some(Change::Theme),
        PageEvent::BurgerClick => state.sidebar.as_mut().map(|sidebar| {
            sidebar.toggle();
            Change::Sidebar
        }),
        PageEvent::MenuClick { on_item, viewport_width } => state
            .sidebar
            .as_mut()
            .is_some_and(|sidebar| sidebar.menu_click(on_item, viewport_width))
            .then_some(Change::Sidebar),
        PageEvent::Scroll { y } => state
            .back_to_top
            .as_mut()
            .is_some_and(|button| {
                let before = button.is_visible();
                button.on_scroll(y) != before
            })
            .then_some(Change::BackToTop),
        PageEvent::BackToTopClick => state.back_to_top.is_some().then_some(Change::ScrollToTop),
        PageEvent::MeterVisibility { index, is_intersecting } => state
            .meters
            .as_mut()
            .is_some_and(|meters| meters.observe(index, is_intersecting))
            .then_some(Change::MeterRevealed(index)),
        PageEvent::Submit { entries } => return Some(entries),
    };
    if let Some(change) = change {
        view.apply(change, state);
    }
    None
}

/// Fill the form, show the interim status, and capture the request.
/// `None` when the page has no form.
fn begin_submit<S, T, V>(
    state: &mut PageState<S>,
    view: &mut V,
    client: &ContactClient<T>,
    entries: Vec<(String, String)>,
) -> Option<Result<SubmitRequest, ContactError>>
where
    T: FormTransport,
    V: PageView<S>,
{
    let form = state.contact.as_mut()?;
    form.fill(entries);
    client.begin(form);
    let request = client.request(form);
    view.apply(Change::ContactForm, state);
    Some(request)
}

fn finish_submit<S, T, V>(
    state: &mut PageState<S>,
    view: &mut V,
    client: &ContactClient<T>,
    result: Result<TransportResponse, ContactError>,
) where
    T: FormTransport,
    V: PageView<S>,
{
    if let Some(form) = state.contact.as_mut() {
        client.finish(form, result);
        view.apply(Change::ContactForm, state);
    }
}
