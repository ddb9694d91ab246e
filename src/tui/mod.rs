//! Terminal dashboard.
//!
//! Plots live CPU and memory usage for a node or for the containers of a
//! pod, one band per container, redrawn on every tick and resize.

mod app;
mod event;
mod input;
pub mod layout;
pub mod render;
pub mod state;
mod style;
mod widgets;

#[cfg(test)]
mod tests;

pub use app::{App, Phase};
pub use event::{Event, EventHandler, EventSource};
