//! # Liner Job Calculations
//!
//! Each stage of the engine lives in its own module and is a pure function
//! of its inputs:
//!
//! - [`geometry`] - Derived depths, capacities and volumes
//! - [`placement`] - Annulus and inside fluid columns
//! - [`hydrostatic`] - Column pressures and the U-tube force
//! - [`mechanics`] - Buoyed weights, stretch, hookload, hanger force
//! - [`plug`] - Dart shear, plug bump and seat capacity
//! - [`torque_drag`] - Soft-string slack-off model
//! - [`status`] - Success / warning / failure classification
//!
//! Stages are chained by [`crate::job::compute`]. Results are plain
//! serializable records; none of them hold references into the input.

pub mod geometry;
pub mod hydrostatic;
pub mod mechanics;
pub mod placement;
pub mod plug;
pub mod status;
pub mod torque_drag;

pub use geometry::WellGeometry;
pub use hydrostatic::{ColumnStack, HydrostaticResult, UTubeColumn};
pub use mechanics::{MechanicsResult, SectionLoad};
pub use placement::{BatchPlacement, ColumnLocation, FluidKind, PlacedColumn, PlacementResult};
pub use plug::PlugResult;
pub use status::{JobStatus, JobWarning, Severity, StatusReport};
pub use torque_drag::{TorqueDragPoint, TorqueDragResult};
