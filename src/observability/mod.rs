//! Observability for version lineages
//!
//! This module provides:
//! - Structured logging (JSON), silent by default
//! - Per-lineage operation counters
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on the version history
//! 3. No background threads

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
