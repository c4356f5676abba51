//! Relationship Flower: a procedurally built 3D flower that glows brighter
//! the longer a relationship lasts.
//!
//! The host page creates a [`RelationshipTracker`] for the start date and a
//! [`RelationshipFlower`] on a canvas, then feeds elapsed days into
//! [`RelationshipFlower::update_glow`].

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod date;
pub mod error;
pub mod geometry;
pub mod glow;
pub mod math;
pub mod render;
pub mod scene;

pub use config::FlowerConfig;
pub use error::{FlowerError, Result};

use animation::{AnimationLoop, FrameScheduler, FrameTask, RafScheduler};
use date::{format_date, DateTracker, LocalStorage};
use glow::GlowController;
use render::{RenderPipeline, RenderSettings};
use scene::Scene;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Today's local calendar date from the browser clock
fn today() -> Result<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .ok_or_else(|| FlowerError::Js("browser clock returned an invalid date".into()))
}

fn webgl2_context(canvas: &HtmlCanvasElement) -> Result<WebGl2RenderingContext> {
    canvas
        .get_context("webgl2")?
        .ok_or_else(|| FlowerError::ContextUnavailable("canvas has no webgl2 context".into()))?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| FlowerError::ContextUnavailable("context is not WebGL2".into()))
}

/// Everything one frame touches; shared with the frame scheduler
struct FlowerState {
    canvas: HtmlCanvasElement,
    scene: Scene,
    animation: AnimationLoop,
    glow: GlowController,
    pipeline: Option<RenderPipeline>,
    settings: RenderSettings,
    max_pixel_ratio: f64,
    warned_lost: bool,
}

impl FlowerState {
    fn pixel_ratio(&self) -> f64 {
        web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .clamp(1.0, self.max_pixel_ratio.max(1.0))
    }

    fn backing_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let viewport = self.scene.viewport;
        (
            (viewport.width as f64 * ratio).round() as u32,
            (viewport.height as f64 * ratio).round() as u32,
        )
    }

    /// Resize to `width` x `height` CSS pixels; zero sizes are ignored
    fn resize(&mut self, width: u32, height: u32) -> Result<bool> {
        if !self.scene.resize(width, height) {
            return Ok(false);
        }

        let (backing_width, backing_height) = self.backing_size();
        self.canvas.set_width(backing_width);
        self.canvas.set_height(backing_height);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", width))?;
        style.set_property("height", &format!("{}px", height))?;

        if let Some(pipeline) = &mut self.pipeline {
            pipeline.resize(backing_width as i32, backing_height as i32);
        }
        Ok(true)
    }

    /// Rebuild every GPU resource from the scene
    fn rebuild_pipeline(&mut self) -> Result<()> {
        self.pipeline = None;
        let gl = webgl2_context(&self.canvas)?;
        let (width, height) = self.backing_size();
        self.pipeline = Some(RenderPipeline::new(
            gl,
            &self.scene,
            self.settings,
            width as i32,
            height as i32,
        )?);
        self.warned_lost = false;
        Ok(())
    }

    fn render(&mut self) {
        match &self.pipeline {
            Some(pipeline) if !pipeline.is_context_lost() => pipeline.render(&self.scene),
            _ => {
                if !self.warned_lost {
                    log::warn!("WebGL context lost, skipping frames until it is restored");
                    self.warned_lost = true;
                }
            }
        }
    }
}

impl FrameTask for FlowerState {
    fn frame(&mut self, now_ms: f64) {
        self.animation.step(&mut self.scene, now_ms);
        self.render();
    }
}

type EventCallback = Closure<dyn FnMut(Event)>;

/// The 3D flower widget bound to a canvas
#[wasm_bindgen]
pub struct RelationshipFlower {
    state: Rc<RefCell<FlowerState>>,
    scheduler: RafScheduler,
    listeners: Vec<(&'static str, EventCallback)>,
}

#[wasm_bindgen]
impl RelationshipFlower {
    /// Create the widget with default settings
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> std::result::Result<RelationshipFlower, JsValue> {
        Ok(Self::build(canvas, FlowerConfig::default())?)
    }

    /// Create the widget with YAML overrides for camera, controls, motion,
    /// particles and render settings
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> std::result::Result<RelationshipFlower, JsValue> {
        let config = FlowerConfig::from_yaml(yaml)?;
        Ok(Self::build(canvas, config)?)
    }

    /// Begin the requestAnimationFrame loop
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        let task: Rc<RefCell<dyn FrameTask>> = self.state.clone();
        Ok(self.scheduler.start(task)?)
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Advance and draw one frame by hand, for hosts that run their own loop
    pub fn frame(&self, now_ms: f64) {
        self.state.borrow_mut().frame(now_ms);
    }

    /// Drive glow and sparkles from elapsed days; returns the sparkle count
    pub fn update_glow(&self, days: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.glow.update(days, &mut state.scene.sparkles).sparkle_count as u32
    }

    pub fn glow_intensity(&self) -> f64 {
        self.state.borrow().glow.level().intensity
    }

    pub fn sparkle_count(&self) -> u32 {
        self.state.borrow().scene.sparkles.len() as u32
    }

    /// Resize to CSS pixels; zero sizes are ignored
    pub fn resize(&self, width: u32, height: u32) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().resize(width, height)?;
        Ok(())
    }

    /// Queue an orbit drag in pixels
    pub fn orbit(&self, delta_x: f32, delta_y: f32) {
        self.state.borrow_mut().scene.controls.rotate(delta_x, delta_y);
    }

    /// Zoom by wheel steps; positive moves closer
    pub fn zoom(&self, steps: f32) {
        self.state.borrow_mut().scene.controls.zoom(steps);
    }

    pub fn is_context_lost(&self) -> bool {
        match &self.state.borrow().pipeline {
            Some(pipeline) => pipeline.is_context_lost(),
            None => true,
        }
    }

    /// Re-upload everything after the browser restored a lost context
    pub fn restore_context(&self) -> std::result::Result<(), JsValue> {
        self.state.borrow_mut().rebuild_pipeline()?;
        log::info!("WebGL context restored");
        Ok(())
    }
}

impl RelationshipFlower {
    fn build(canvas: HtmlCanvasElement, config: FlowerConfig) -> Result<Self> {
        let (width, height) = match (canvas.client_width(), canvas.client_height()) {
            (w, h) if w > 0 && h > 0 => (w as u32, h as u32),
            _ => (canvas.width().max(1), canvas.height().max(1)),
        };

        let scene = Scene::assemble(&config, width, height);
        let glow_seed = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
        let glow = GlowController::new(
            scene.flower.petal_material.clone(),
            scene.flower.center_material.clone(),
            glow_seed,
        );

        let mut state = FlowerState {
            canvas: canvas.clone(),
            scene,
            animation: AnimationLoop::new(config.motion.clone()),
            glow,
            pipeline: None,
            settings: RenderSettings {
                clear_color: config.render.clear_color,
                exposure: config.render.exposure,
            },
            max_pixel_ratio: config.render.max_pixel_ratio,
            warned_lost: false,
        };
        state.resize(width, height)?;
        state.rebuild_pipeline()?;

        log::info!("Relationship flower created at {}x{}", width, height);

        let state = Rc::new(RefCell::new(state));
        let listeners = Self::watch_context(&canvas, &state)?;

        Ok(Self {
            state,
            scheduler: RafScheduler::new(),
            listeners,
        })
    }

    /// Keep the context restorable and rebuild once the browser restores it
    fn watch_context(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<FlowerState>>,
    ) -> Result<Vec<(&'static str, EventCallback)>> {
        let lost = Closure::wrap(Box::new(|event: Event| {
            // Without this the browser never fires webglcontextrestored
            event.prevent_default();
            log::warn!("WebGL context lost");
        }) as Box<dyn FnMut(Event)>);

        let weak = Rc::downgrade(state);
        let restored = Closure::wrap(Box::new(move |_event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let result = state.borrow_mut().rebuild_pipeline();
            match result {
                Ok(()) => log::info!("WebGL context restored"),
                Err(err) => log::error!("Failed to rebuild after context restore: {}", err),
            }
        }) as Box<dyn FnMut(Event)>);

        let listeners = vec![("webglcontextlost", lost), ("webglcontextrestored", restored)];
        for (name, callback) in &listeners {
            canvas.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
        }
        Ok(listeners)
    }
}

impl Drop for RelationshipFlower {
    fn drop(&mut self) {
        self.scheduler.stop();
        let canvas = self.state.borrow().canvas.clone();
        for (name, callback) in &self.listeners {
            let _ = canvas.remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
        }
    }
}

/// Start date tracker backed by `window.localStorage`
#[wasm_bindgen]
pub struct RelationshipTracker {
    tracker: DateTracker<LocalStorage>,
}

#[wasm_bindgen]
impl RelationshipTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<RelationshipTracker, JsValue> {
        let storage = LocalStorage::open()?;
        Ok(Self {
            tracker: DateTracker::new(storage),
        })
    }

    /// Load the saved date and return elapsed days
    pub fn load(&mut self) -> std::result::Result<u32, JsValue> {
        Ok(self.tracker.load(today()?)?)
    }

    /// Store a `YYYY-MM-DD` start date and return elapsed days
    pub fn set_date(&mut self, date: &str) -> std::result::Result<u32, JsValue> {
        Ok(self.tracker.set_date(date, today()?)?)
    }

    /// Forget the saved date; returns 0
    pub fn reset(&mut self) -> std::result::Result<u32, JsValue> {
        Ok(self.tracker.reset()?)
    }

    pub fn days(&self) -> std::result::Result<u32, JsValue> {
        Ok(self.tracker.days(today()?))
    }

    pub fn is_set(&self) -> bool {
        self.tracker.is_set()
    }

    /// Milestone text for today, if today is one
    pub fn milestone_message(&self) -> std::result::Result<Option<String>, JsValue> {
        Ok(self.tracker.milestone(today()?).map(|m| m.message()))
    }

    /// The start date as `YYYY-MM-DD`, today when unset
    pub fn start_date(&self) -> std::result::Result<String, JsValue> {
        Ok(format_date(self.tracker.start_date(today()?)))
    }
}
