//! # Drilling Mechanics Equations
//!
//! Closed-form formulas shared by the calculation modules. Keeping them in one
//! place makes it easy to check each constant against its reference.
//!
//! ## Modules
//!
//! - [`tubular`] - Capacities and areas of pipe, casing and hole
//! - [`mechanics`] - Buoyancy, weight and stretch
//!
//! ## Sign Conventions
//!
//! - **Depth**: positive downward from the rotary table
//! - **Axial load**: positive in tension
//! - **U-tube force**: positive pushes the liner down

pub mod mechanics;
pub mod tubular;

pub use mechanics::{air_weight, buoyancy_factor, buoyed_weight, stretch_in};
pub use tubular::{capacity_annular, capacity_internal, circle_area, pipe_steel_area};
