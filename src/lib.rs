//! kube-metrics - live CPU and memory plots for Kubernetes nodes and pods.
//!
//! The library holds everything except argument parsing:
//! - `source` - cluster access (Kubernetes API and `metrics.k8s.io`)
//! - `poller` - usage readings in display units
//! - `series` - fixed-capacity sample history
//! - `tui` - layout, rendering and the event loop

pub mod config;
pub mod entity;
pub mod error;
pub mod fmt;
pub mod logging;
pub mod poller;
pub mod quantity;
pub mod series;
pub mod source;
pub mod tui;
pub mod util;
