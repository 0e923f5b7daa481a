//! Browser entry point
//!
//! The module start function installs logging and runs the pre-paint
//! low-capability check. Page scripts then create a [`LandingPage`] and call
//! `start()` once the window has loaded:
//!
//! ```js
//! import init, { LandingPage } from "./landing_web.js";
//!
//! await init();
//! const page = new LandingPage();
//! window.addEventListener("load", () => page.start());
//! ```

mod canvas;
mod dom;
mod signals;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use app::{PageConfig, PageSession};
use devices::{DeviceProfile, SignalSource, Thresholds};
use effects::render::LOW_CAPABILITY_CLASS;
use effects::{selectors, IntersectionWatch, Surface};
use glam::Vec2;
use system::{Clock, Instant, SystemClock};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventTarget, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, TouchEvent, Window,
};
use widgets::Rect;

pub use canvas::CanvasConfetti;
pub use dom::DomSurface;
pub use signals::{battery_manager, BrowserSignals};

/// Interval at which session timers are checked
const TICK_INTERVAL_MS: i32 = 50;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    // runs before first paint with default thresholds; a session booted
    // with its own config sets the class again
    let Some(window) = web_sys::window() else {
        return;
    };
    let signals = BrowserSignals::new(window.clone());
    let profile = DeviceProfile::classify(&signals.snapshot(), &Thresholds::default());
    if profile.is_low_capability_os {
        if let Some(root) = window.document().and_then(|doc| doc.document_element()) {
            let _ = root.class_list().add_1(LOW_CAPABILITY_CLASS);
        }
        tracing::info!("Low-capability OS, minimal effects");
    }
}

/// Session state shared with every event callback
struct Page {
    window: Window,
    session: PageSession<DomSurface>,
    signals: BrowserSignals,
    canvas: Option<CanvasConfetti>,
    confetti_drawn: bool,
    clock: SystemClock,
}

impl Page {
    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn refresh_signals(&mut self) {
        let now = self.now();
        let snapshot = self.signals.snapshot();
        self.session.on_signals_changed(&snapshot, now);
    }

    fn frame(&mut self) {
        let now = self.now();
        self.session.on_frame(now);

        let active = self.session.confetti().is_active();
        if let Some(canvas) = self.canvas.as_mut() {
            // one extra draw clears the last pieces
            if active || self.confetti_drawn {
                self.session.confetti().draw(canvas);
            }
        }
        self.confetti_drawn = active;
    }

    fn scroll(&mut self) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let hero_height = self
            .session
            .surface()
            .document()
            .query_selector(selectors::HERO)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map_or(0.0, |el| f64::from(el.offset_height()));
        let now = self.now();
        self.session.on_scroll(scroll_y, hero_height, now);
    }

    fn pointer_move(&mut self, event: &Event) {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        let surface = self.session.surface();
        let rects: Vec<Rect> = surface
            .query_all(selectors::AVATAR_TILT)
            .into_iter()
            .filter_map(|node| surface.element(node))
            .map(|el| {
                let r = el.get_bounding_client_rect();
                Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
            })
            .collect();
        self.session.on_pointer_move(pointer, &rects);
    }

    fn touch_start(&mut self, event: &Event) {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };
        let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
        let now = self.now();
        self.session.on_touch_start(point, now);
    }

    fn intersections(&mut self, watch: IntersectionWatch, entries: &js_sys::Array) {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Some(node) = self.session.surface().node_of(&entry.target()) else {
                continue;
            };
            self.session
                .on_intersection(node, watch, entry.is_intersecting());
        }
    }
}

type SharedPage = Rc<RefCell<Page>>;

/// An event listener removed again when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type Listeners = Rc<RefCell<Vec<Listener>>>;

fn listen<F>(
    listeners: &Listeners,
    page: &SharedPage,
    target: &EventTarget,
    event: &'static str,
    mut handler: F,
) where
    F: FnMut(&mut Page, &Event) + 'static,
{
    let page = Rc::clone(page);
    let callback = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
        let Ok(mut page) = page.try_borrow_mut() else {
            tracing::trace!(event, "Page busy, dropping event");
            return;
        };
        handler(&mut page, &e);
    });
    if target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::warn!(event, "Failed to add event listener");
        return;
    }
    listeners.borrow_mut().push(Listener {
        target: target.clone(),
        event,
        callback,
    });
}

/// The running landing page
#[wasm_bindgen]
pub struct LandingPage {
    window: Window,
    page: SharedPage,
    listeners: Listeners,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    frame_id: Rc<Cell<Option<i32>>>,
    ticker: Option<(i32, Closure<dyn FnMut()>)>,
    observers: Vec<Closure<dyn FnMut(js_sys::Array)>>,
    started: bool,
}

#[wasm_bindgen]
impl LandingPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<LandingPage, JsValue> {
        Self::create(PageConfig::default())
    }

    /// Create a page tuned by a TOML document
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(source: &str) -> Result<LandingPage, JsValue> {
        let config =
            PageConfig::from_toml_str(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::create(config)
    }

    /// Evaluate the device and start effects, listeners and timers
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        // installed first so decorations spawned by start are watched
        self.install_observers()?;
        {
            let mut page = self.page.borrow_mut();
            let page = &mut *page;
            let now = page.clock.now();
            let snapshot = page.signals.snapshot();
            page.session.start(&snapshot, now);
        }
        self.listen_window()?;
        self.listen_controls();
        self.watch_battery();
        self.start_ticker()?;
        self.start_frames()?;
        Ok(())
    }

    /// Remove listeners, stop timers and tear down every effect
    pub fn stop(&mut self) {
        self.listeners.borrow_mut().clear();
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.frame.borrow_mut().take();
        if let Some((id, _callback)) = self.ticker.take() {
            self.window.clear_interval_with_handle(id);
        }
        if let Ok(mut page) = self.page.try_borrow_mut() {
            page.session.stop();
            page.session.surface_mut().disconnect_observers();
        }
        self.observers.clear();
    }

    /// Current effect tier name
    pub fn tier(&self) -> String {
        self.page.borrow().session.tier().name().to_string()
    }
}

impl LandingPage {
    fn create(config: PageConfig) -> Result<LandingPage, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas = CanvasConfetti::attach(&document, selectors::CONFETTI_CANVAS);
        let signals = BrowserSignals::new(window.clone());
        let clock = SystemClock::new();
        let mut session = PageSession::new(DomSurface::new(document), config);
        session.boot(&signals.snapshot(), clock.now());

        let page = Page {
            window: window.clone(),
            session,
            signals,
            canvas,
            confetti_drawn: false,
            clock,
        };
        Ok(Self {
            window,
            page: Rc::new(RefCell::new(page)),
            listeners: Rc::new(RefCell::new(Vec::new())),
            frame: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            ticker: None,
            observers: Vec::new(),
            started: false,
        })
    }

    fn listen_window(&self) -> Result<(), JsValue> {
        let window: &EventTarget = self.window.as_ref();
        listen(&self.listeners, &self.page, window, "resize", |page, _| {
            page.refresh_signals()
        });
        listen(&self.listeners, &self.page, window, "scroll", |page, _| page.scroll());
        listen(&self.listeners, &self.page, window, "mousemove", |page, event| {
            page.pointer_move(event)
        });

        let document = self
            .window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        listen(
            &self.listeners,
            &self.page,
            document.as_ref(),
            "visibilitychange",
            |page, _| {
                let hidden = page.signals.page_hidden();
                let now = page.now();
                page.session.on_visibility_change(hidden, now);
            },
        );

        let connection = self.page.borrow().signals.connection_target();
        if let Some(connection) = connection {
            listen(&self.listeners, &self.page, &connection, "change", |page, _| {
                page.refresh_signals()
            });
        }
        Ok(())
    }

    fn install_observers(&mut self) -> Result<(), JsValue> {
        let watches = [
            (IntersectionWatch::Offscreen, "50px", 0.1),
            (IntersectionWatch::Reveal, "0px 0px -100px 0px", 0.3),
        ];
        for (watch, margin, threshold) in watches {
            let page = Rc::clone(&self.page);
            let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                match page.try_borrow_mut() {
                    Ok(mut page) => page.intersections(watch, &entries),
                    Err(_) => tracing::trace!(?watch, "Page busy, dropping intersections"),
                }
            });
            let options = IntersectionObserverInit::new();
            options.set_root_margin(margin);
            options.set_threshold(&JsValue::from_f64(threshold));
            let observer =
                IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
            self.page
                .borrow_mut()
                .session
                .surface_mut()
                .set_observer(watch, observer);
            self.observers.push(callback);
        }
        Ok(())
    }

    fn element_target(&self, selector: &str) -> Option<EventTarget> {
        let page = self.page.borrow();
        let surface = page.session.surface();
        let node = surface.query(selector)?;
        surface.element(node).map(Into::into)
    }

    fn element_targets(&self, selector: &str) -> Vec<EventTarget> {
        let page = self.page.borrow();
        let surface = page.session.surface();
        surface
            .query_all(selector)
            .into_iter()
            .filter_map(|node| surface.element(node))
            .map(Into::into)
            .collect()
    }

    fn listen_controls(&self) {
        if let Some(next) = self.element_target(selectors::NEXT_TESTIMONIAL) {
            listen(&self.listeners, &self.page, &next, "click", |page, _| {
                let now = page.now();
                page.session.on_carousel_next(now);
            });
        }
        if let Some(prev) = self.element_target(selectors::PREV_TESTIMONIAL) {
            listen(&self.listeners, &self.page, &prev, "click", |page, _| {
                let now = page.now();
                page.session.on_carousel_prev(now);
            });
        }
        for (index, dot) in self
            .element_targets(selectors::TESTIMONIAL_DOT)
            .into_iter()
            .enumerate()
        {
            listen(&self.listeners, &self.page, &dot, "click", move |page, _| {
                let now = page.now();
                page.session.on_carousel_dot(index, now);
            });
        }

        if let Some(form) = self.element_target(selectors::CONTACT_FORM) {
            listen(&self.listeners, &self.page, &form, "submit", |page, event| {
                event.prevent_default();
                let now = page.now();
                page.session.on_submit(now);
            });
        }

        if let Some(hero) = self.element_target(selectors::HERO) {
            listen(&self.listeners, &self.page, &hero, "touchstart", |page, event| {
                page.touch_start(event)
            });
        }
        if let Some(indicator) = self.element_target(selectors::SCROLL_INDICATOR) {
            listen(&self.listeners, &self.page, &indicator, "click", |page, _| {
                page.session.on_scroll_indicator();
            });
        }

        if let Some(button) = self.element_target(selectors::MENU_BUTTON) {
            listen(&self.listeners, &self.page, &button, "click", |page, _| {
                page.session.on_menu_toggle();
            });
        }
        for link in self.element_targets(selectors::MENU_LINK) {
            listen(&self.listeners, &self.page, &link, "click", |page, _| {
                page.session.on_menu_link();
            });
        }
    }

    fn watch_battery(&self) {
        let window = self.window.clone();
        let page = Rc::clone(&self.page);
        let listeners = Rc::clone(&self.listeners);
        wasm_bindgen_futures::spawn_local(async move {
            let Some(manager) = battery_manager(&window).await else {
                tracing::debug!("Battery API unavailable");
                return;
            };
            {
                let Ok(mut current) = page.try_borrow_mut() else {
                    return;
                };
                if current.session.state() != app::SessionState::Running {
                    return;
                }
                current.signals.update_battery(&manager);
                current.refresh_signals();
            }
            let Ok(target) = manager.clone().dyn_into::<EventTarget>() else {
                return;
            };
            for event in ["levelchange", "chargingchange"] {
                let manager = manager.clone();
                listen(&listeners, &page, &target, event, move |page, _| {
                    page.signals.update_battery(&manager);
                    page.refresh_signals();
                });
            }
        });
    }

    fn start_ticker(&mut self) -> Result<(), JsValue> {
        let page = Rc::clone(&self.page);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut page) = page.try_borrow_mut() {
                let now = page.now();
                page.session.tick(now);
            }
        });
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                TICK_INTERVAL_MS,
            )?;
        self.ticker = Some((id, callback));
        Ok(())
    }

    fn start_frames(&self) -> Result<(), JsValue> {
        let page = Rc::clone(&self.page);
        let frame = Rc::clone(&self.frame);
        let frame_id = Rc::clone(&self.frame_id);
        let window = self.window.clone();
        *self.frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_: f64| {
            if let Ok(mut page) = page.try_borrow_mut() {
                page.frame();
            }
            if let Some(callback) = frame.borrow().as_ref() {
                frame_id.set(
                    window
                        .request_animation_frame(callback.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }));

        if let Some(callback) = self.frame.borrow().as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.frame_id.set(Some(id));
        }
        Ok(())
    }
}

impl Drop for LandingPage {
    fn drop(&mut self) {
        self.stop();
    }
}
