//! Shared data structures for production control resolution
//!
//! - ControlMode: the closed set of quantities that can govern a producer
//! - ControlSet: the controls currently available to a well
//! - ProductionControls: the resolved, immutable control state per report step

mod control_mode;
mod control_set;
mod production_controls;

pub use control_mode::*;
pub use control_set::*;
pub use production_controls::*;
