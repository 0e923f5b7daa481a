//! Browser implementation of [`SignalSource`]
//!
//! Optional APIs (`deviceMemory`, `connection`, `getBattery`) are read
//! through `js_sys::Reflect` so a missing property is just `undefined`.

use std::cell::Cell;

use devices::{BatteryStatus, EffectiveConnectionType, SignalSource, Viewport};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{EventTarget, Navigator, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

pub struct BrowserSignals {
    window: Window,
    battery: Cell<Option<BatteryStatus>>,
}

impl BrowserSignals {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            battery: Cell::new(None),
        }
    }

    fn navigator(&self) -> Navigator {
        self.window.navigator()
    }

    /// `navigator.connection`, which fires `change`
    pub fn connection_target(&self) -> Option<EventTarget> {
        property(&self.navigator(), "connection")?.dyn_into().ok()
    }

    /// Record a battery reading taken from a `BatteryManager`
    pub fn update_battery(&self, manager: &JsValue) {
        self.battery.set(read_battery(manager));
    }
}

impl SignalSource for BrowserSignals {
    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value
                .ok()
                .and_then(|v| v.as_f64())
                .map_or(0, |v| v.max(0.0) as u32)
        };
        let default = Viewport::default();
        let width = dimension(self.window.inner_width());
        let height = dimension(self.window.inner_height());
        Viewport::new(
            if width == 0 { default.width } else { width },
            if height == 0 { default.height } else { height },
        )
    }

    fn device_memory_gb(&self) -> Option<f32> {
        property(&self.navigator(), "deviceMemory")?
            .as_f64()
            .map(|gb| gb as f32)
    }

    fn effective_connection(&self) -> Option<EffectiveConnectionType> {
        let connection = property(&self.navigator(), "connection")?;
        let kind = property(&connection, "effectiveType")?.as_string()?;
        EffectiveConnectionType::parse_lenient(&kind)
    }

    fn user_agent(&self) -> Option<String> {
        self.navigator().user_agent().ok()
    }

    fn battery(&self) -> Option<BatteryStatus> {
        self.battery.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn page_hidden(&self) -> bool {
        self.window.document().is_some_and(|doc| doc.hidden())
    }
}

/// Resolve `navigator.getBattery()`, `None` when unsupported or rejected
pub async fn battery_manager(window: &Window) -> Option<JsValue> {
    let navigator: JsValue = window.navigator().into();
    let get_battery: Function = property(&navigator, "getBattery")?.dyn_into().ok()?;
    let promise: Promise = get_battery.call0(&navigator).ok()?.dyn_into().ok()?;
    JsFuture::from(promise).await.ok()
}

fn read_battery(manager: &JsValue) -> Option<BatteryStatus> {
    let level = property(manager, "level")?.as_f64()?;
    let charging = property(manager, "charging")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    Some(BatteryStatus::new(level as f32, charging))
}
