//! # Utility Modules
//!
//! Supporting utilities for logging and observability.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` setup driven by [`LoggingConfig`](crate::config::LoggingConfig)
//! - **Metrics**: Thread-safe allocator counters

pub mod logging;
pub mod metrics;

pub use metrics::{AllocatorMetrics, AllocatorSnapshot};
