//! Browser bindings: a thin `wasm_bindgen` surface over [`App`].
//!
//! JS drives the app with monotonic `performance.now()` timestamps and
//! reads the current selection back as JSON after any call.

use std::cell::RefCell;

use adapters::KeyCommand;
use engine::{GeoBounds, PhotoKey};
use geo::Coord;
use gloo_net::http::Request;
use urlsync::BrowserHistory;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::App;
use crate::dto::SelectionDto;

thread_local! {
    static APP: RefCell<Option<App<BrowserHistory>>> = const { RefCell::new(None) };
}

fn with_app<T>(f: impl FnOnce(&mut App<BrowserHistory>) -> T) -> Result<T, JsValue> {
    APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        let app = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("app not initialized"))?;
        Ok(f(app))
    })
}

fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Creates the app, seeding viewer state from the current URL.
#[wasm_bindgen]
pub fn init(now_ms: f64) {
    APP.with(|cell| {
        *cell.borrow_mut() = Some(App::new(BrowserHistory::new(), now_ms));
    });
}

/// Current selection as JSON for the rendering layer.
#[wasm_bindgen]
pub fn selection_json() -> Result<String, JsValue> {
    with_app(|app| SelectionDto::from_engine(app.engine()).to_json())
}

#[wasm_bindgen]
pub fn key(name: &str, coarse: bool, now_ms: f64) -> Result<(), JsValue> {
    let cmd = match name {
        "rotate-left" => KeyCommand::RotateLeft,
        "rotate-right" => KeyCommand::RotateRight,
        "turn-left" => KeyCommand::TurnLeft,
        "turn-right" => KeyCommand::TurnRight,
        "cycle-debug-pane" => KeyCommand::CycleDebugPane,
        "toggle-display-mode" => KeyCommand::ToggleDisplayMode,
        other => return Err(JsValue::from_str(&format!("unknown key command: {other}"))),
    };
    with_app(|app| app.key(cmd, coarse, now_ms))
}

#[wasm_bindgen]
pub fn gesture_begin() -> Result<(), JsValue> {
    with_app(|app| app.gesture_begin())
}

#[wasm_bindgen]
pub fn gesture_rotate(delta_deg: f64, now_ms: f64) -> Result<(), JsValue> {
    with_app(|app| app.gesture_rotate(delta_deg, now_ms))
}

#[wasm_bindgen]
pub fn gesture_end() -> Result<(), JsValue> {
    with_app(|app| app.gesture_end())
}

#[wasm_bindgen]
pub fn compass_start() -> Result<(), JsValue> {
    with_app(|app| app.compass_start())
}

#[wasm_bindgen]
pub fn compass_stop() -> Result<(), JsValue> {
    with_app(|app| app.compass_stop())
}

#[wasm_bindgen]
pub fn compass_sample(heading_deg: f64, now_ms: f64) -> Result<(), JsValue> {
    with_app(|app| app.compass_sample(heading_deg, now_ms))
}

#[wasm_bindgen]
pub fn pan(lat: f64, lon: f64, now_ms: f64) -> Result<(), JsValue> {
    with_app(|app| app.pan(Coord::new(lat, lon), now_ms))
}

#[wasm_bindgen]
pub fn set_zoom(zoom: f64, now_ms: f64) -> Result<(), JsValue> {
    with_app(|app| app.set_zoom(zoom, now_ms))
}

/// Visible extent from the map widget, north-west then south-east corner.
#[wasm_bindgen]
pub fn set_bounds(nw_lat: f64, nw_lon: f64, se_lat: f64, se_lon: f64) -> Result<(), JsValue> {
    with_app(|app| {
        app.set_bounds(Some(GeoBounds {
            nw: Coord::new(nw_lat, nw_lon),
            se: Coord::new(se_lat, se_lon),
        }))
    })
}

/// `key` is the `<source>-<id>` form used by the URL `photo` parameter.
#[wasm_bindgen]
pub fn focus_photo(key: &str, now_ms: f64) -> Result<bool, JsValue> {
    let key = PhotoKey::parse(key)
        .ok_or_else(|| JsValue::from_str(&format!("malformed photo key: {key}")))?;
    with_app(|app| app.focus(&key, now_ms))
}

#[wasm_bindgen]
pub fn apply_snapshot(source: &str, json: &str, now_ms: f64) -> Result<usize, JsValue> {
    with_app(|app| app.snapshot(source, json, now_ms))?
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn set_source_enabled(source: &str, enabled: bool) -> Result<(), JsValue> {
    with_app(|app| app.set_source_enabled(source, enabled))
}

/// Fetches a feed snapshot and applies it when it arrives.
#[wasm_bindgen]
pub fn load_feed(source: String, url: String, now_ms: f64) {
    spawn_local(async move {
        let json = match fetch_text(&url).await {
            Ok(body) => body,
            Err(err) => {
                console_log(&format!("feed fetch failed for {source}: {err:?}"));
                return;
            }
        };
        match with_app(|app| app.snapshot(&source, &json, now_ms)) {
            Ok(Ok(count)) => console_log(&format!("feed {source}: {count} photos")),
            Ok(Err(err)) => console_log(&format!("feed decode failed for {source}: {err}")),
            Err(err) => console_log(&format!("feed apply failed: {err:?}")),
        }
    });
}

/// Drives debounced URL writes; call from the animation frame loop.
#[wasm_bindgen]
pub fn tick(now_ms: f64) -> Result<(), JsValue> {
    with_app(|app| app.tick(now_ms))
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
