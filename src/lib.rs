//! Scene registry, live-window tracking and initial placement for apps
//! that open several native windows.
//!
//! A [`WindowManager`] owns the registered scenes, tracks which native
//! windows belong to each, decides where a new window appears (cascade,
//! restore, anchor) and persists the last window's frame per scene.

pub mod activation;
pub mod backend;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod monitor;
pub mod placement;
pub mod registry;
pub mod runner;
pub mod scene;
pub mod session;
pub mod store;
pub mod tracking;
pub mod tracing_sub;
pub mod window;

pub use activation::{ActivationChannel, ActivationResult, QueueChannel, SystemChannel};
pub use config::WindowManagerConfig;
pub use descriptor::{FrameSnapshot, GeometryDescriptor};
pub use geometry::{Point, Rect, Size, UnitPoint};
pub use manager::{OpenOutcome, WindowManager};
pub use placement::Placement;
pub use scene::{SceneConfiguration, SceneId};
pub use store::{FrameStore, JsonFileStore, MemoryStore, SettingsStore};
pub use window::{WindowHandle, WindowingLayer};
