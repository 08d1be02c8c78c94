//! # Materials
//!
//! Reference data for the steel tubulars run in the well.
//!
//! - [`tubulars`] - Casing, liner and drill pipe size table
//!
//! ## Example
//!
//! ```rust
//! use liner_core::materials::{builtin_tubulars, TubularKind};
//!
//! let dp = builtin_tubulars().of_kind(TubularKind::DrillPipe);
//! assert!(!dp.is_empty());
//! ```

pub mod tubulars;

pub use tubulars::{builtin_tubulars, TubularKind, TubularSize, TubularTable};
