//! Per-frame animation: flower spin, particle drift, sparkle twinkle and
//! orbit easing, plus the scheduler that drives it.

pub mod frame;
pub mod orbit;
pub mod scheduler;

pub use frame::AnimationLoop;
pub use orbit::OrbitControls;
pub use scheduler::{FrameScheduler, FrameTask, ManualScheduler, RafScheduler};
