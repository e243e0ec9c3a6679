//! Drowsiness Monitoring
//!
//! Owns the lifecycle of the background metrics loop:
//! - `DrowsinessMetrics`: the single shared snapshot readers poll
//! - simulator: placeholder per-tick metrics generation
//! - `MonitorService`: Stopped/Running state machine with idempotent
//!   start/stop and unconditional camera release on stop
//!
//! The generated values carry no physiological meaning; only the record
//! shape, update cadence, and snapshot consistency are contractual. A
//! sensor-derived implementation replaces `simulator::sample` without
//! touching the lifecycle.

pub mod metrics;
pub mod service;
pub mod simulator;

pub use metrics::{DrowsinessMetrics, SharedMetrics};
pub use service::{ControlOutcome, MonitorService};
