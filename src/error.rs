//! Dashboard error type.
//!
//! Everything here is a startup or terminal failure. Per-tick fetch errors
//! never reach this type: the event loop logs and absorbs them.

use std::io;

use thiserror::Error;

use crate::fmt::LocaleError;
use crate::source::SourceError;

/// Errors that abort a dashboard run.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Cluster lookup failed while resolving the entity.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The container filter matched nothing in the pod spec.
    #[error("selected container \"{container}\" not found in pod \"{namespace}/{pod}\"")]
    ContainerNotFound {
        container: String,
        namespace: String,
        pod: String,
    },

    /// The terminal is too narrow to hold even one sample per plot.
    #[error("terminal is {width} columns wide; at least {min} are needed")]
    TerminalTooNarrow { width: u16, min: u16 },

    /// The number format language tag was malformed.
    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// Terminal setup, drawing or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
