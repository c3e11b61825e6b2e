//! Background tasks module
//!
//! This module contains the tick sources and the task that feeds their ticks
//! into the controller.

pub mod tick_pump;
pub mod ticker;

// Re-export main types
pub use tick_pump::tick_pump_task;
pub use ticker::{IntervalTicker, ManualTicker, TickSource};
