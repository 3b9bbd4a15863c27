//! Windowing layer implementations.
//!
//! Native backends implement [`crate::window::WindowingLayer`] on top of
//! the platform toolkit. [`headless::HeadlessDesktop`] simulates a desktop
//! in memory and backs the demo binary and the test suite.

pub mod headless;
