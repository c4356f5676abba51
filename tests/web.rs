//! Browser tests, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use relationship_flower::date::{DateTracker, KeyValueStore, LocalStorage, START_DATE_KEY};
use relationship_flower::RelationshipFlower;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

fn has_webgl2() -> bool {
    matches!(canvas(1, 1).get_context("webgl2"), Ok(Some(_)))
}

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut storage = LocalStorage::open().unwrap();
    storage.set("flower-test", "2024-01-01").unwrap();
    assert_eq!(storage.get("flower-test").unwrap().as_deref(), Some("2024-01-01"));
    storage.remove("flower-test").unwrap();
    assert_eq!(storage.get("flower-test").unwrap(), None);
}

#[wasm_bindgen_test]
fn tracker_persists_to_local_storage() {
    let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    let mut tracker = DateTracker::new(LocalStorage::open().unwrap());
    assert_eq!(tracker.set_date("2024-05-03", today).unwrap(), 7);

    let mut reloaded = DateTracker::new(LocalStorage::open().unwrap());
    assert_eq!(reloaded.load(today).unwrap(), 7);

    reloaded.reset().unwrap();
    assert_eq!(LocalStorage::open().unwrap().get(START_DATE_KEY).unwrap(), None);
}

#[wasm_bindgen_test]
fn flower_glows_and_renders() {
    if !has_webgl2() {
        return;
    }

    let flower = RelationshipFlower::new(canvas(320, 240)).unwrap();
    assert_eq!(flower.update_glow(25), 5);
    assert_eq!(flower.sparkle_count(), 5);
    assert_eq!(flower.update_glow(19), 0);
    assert!((flower.glow_intensity() - 0.19).abs() < 1e-9);

    flower.frame(16.0);
    flower.frame(32.0);
    flower.resize(640, 480).unwrap();
    flower.resize(0, 0).unwrap();
    assert!(!flower.is_context_lost());
}

#[wasm_bindgen_test]
fn flower_loop_starts_once() {
    if !has_webgl2() {
        return;
    }

    let mut flower = RelationshipFlower::new(canvas(64, 64)).unwrap();
    flower.start().unwrap();
    assert!(flower.is_running());
    assert!(flower.start().is_err());
    flower.stop();
    assert!(!flower.is_running());
}

#[wasm_bindgen_test]
fn config_errors_reach_javascript() {
    let result = RelationshipFlower::with_config(canvas(8, 8), "particles:\n  count: 0\n");
    assert!(result.is_err());
}
