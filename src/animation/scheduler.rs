//! Frame scheduling
//!
//! The frame task is registered exactly once. In the browser the
//! [`RafScheduler`] re-arms `requestAnimationFrame` after every frame until
//! stopped; [`ManualScheduler`] lets tests and headless hosts pump frames by hand.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{FlowerError, Result};

/// Work done once per display frame
pub trait FrameTask {
    fn frame(&mut self, now_ms: f64);
}

pub trait FrameScheduler {
    /// Register the task and begin ticking it; fails if already running
    fn start(&mut self, task: Rc<RefCell<dyn FrameTask>>) -> Result<()>;

    /// Stop ticking; a stopped scheduler never re-arms by itself
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Scheduler driven explicitly through [`ManualScheduler::advance`]
#[derive(Default)]
pub struct ManualScheduler {
    task: Option<Rc<RefCell<dyn FrameTask>>>,
    frames: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame at `now_ms`; returns false when nothing is registered
    pub fn advance(&mut self, now_ms: f64) -> bool {
        match &self.task {
            Some(task) => {
                task.borrow_mut().frame(now_ms);
                self.frames += 1;
                true
            }
            None => false,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self, task: Rc<RefCell<dyn FrameTask>>) -> Result<()> {
        if self.task.is_some() {
            return Err(FlowerError::AlreadyRunning);
        }
        self.task = Some(task);
        Ok(())
    }

    fn stop(&mut self) {
        self.task = None;
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

#[derive(Default)]
struct RafState {
    callback: Option<FrameCallback>,
    handle: Option<i32>,
}

/// `requestAnimationFrame` loop.
///
/// The callback lives in shared state so it can re-arm itself; stopping (or
/// dropping the scheduler) cancels the pending request and releases it.
#[derive(Default)]
pub struct RafScheduler {
    state: Rc<RefCell<RafState>>,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| FlowerError::Js("no global window".into()))
}

fn request_frame(callback: &FrameCallback) -> Result<i32> {
    Ok(window()?.request_animation_frame(callback.as_ref().unchecked_ref())?)
}

impl FrameScheduler for RafScheduler {
    fn start(&mut self, task: Rc<RefCell<dyn FrameTask>>) -> Result<()> {
        if self.is_running() {
            return Err(FlowerError::AlreadyRunning);
        }

        let state = Rc::downgrade(&self.state);
        let callback = Closure::wrap(Box::new(move |now_ms: f64| {
            let Some(state) = state.upgrade() else {
                return;
            };

            task.borrow_mut().frame(now_ms);

            let next = match state.borrow().callback.as_ref() {
                Some(callback) => request_frame(callback),
                None => return,
            };
            match next {
                Ok(handle) => state.borrow_mut().handle = Some(handle),
                Err(err) => {
                    log::error!("Failed to schedule next frame: {}", err);
                    state.borrow_mut().handle = None;
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let handle = request_frame(&callback)?;
        let mut state = self.state.borrow_mut();
        state.callback = Some(callback);
        state.handle = Some(handle);
        log::info!("Animation loop started");
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            if let Ok(window) = window() {
                if let Err(err) = window.cancel_animation_frame(handle) {
                    log::warn!("cancelAnimationFrame failed: {:?}", err);
                }
            }
        }
        if state.callback.take().is_some() {
            log::info!("Animation loop stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.state.borrow().callback.is_some()
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        times: Vec<f64>,
    }

    impl FrameTask for Recorder {
        fn frame(&mut self, now_ms: f64) {
            self.times.push(now_ms);
        }
    }

    #[test]
    fn test_manual_scheduler_runs_registered_task() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.advance(0.0));

        scheduler.start(recorder.clone()).unwrap();
        assert!(scheduler.is_running());
        scheduler.advance(16.0);
        scheduler.advance(32.0);

        assert_eq!(recorder.borrow().times, vec![16.0, 32.0]);
        assert_eq!(scheduler.frames(), 2);
    }

    #[test]
    fn test_double_start_is_rejected() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut scheduler = ManualScheduler::new();
        scheduler.start(recorder.clone()).unwrap();
        assert!(matches!(scheduler.start(recorder.clone()), Err(FlowerError::AlreadyRunning)));

        scheduler.advance(1.0);
        assert_eq!(recorder.borrow().times.len(), 1);
    }

    #[test]
    fn test_stopped_scheduler_does_not_tick() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut scheduler = ManualScheduler::new();
        scheduler.start(recorder.clone()).unwrap();
        scheduler.stop();

        assert!(!scheduler.is_running());
        assert!(!scheduler.advance(1.0));
        assert!(recorder.borrow().times.is_empty());

        // Restart after stop is allowed
        scheduler.start(recorder.clone()).unwrap();
        assert!(scheduler.advance(2.0));
    }
}
