//! Products domain module.
//!
//! This crate contains the product catalog model and the availability-window
//! logic, implemented purely as deterministic domain code (no IO, no HTTP, no
//! storage).

pub mod attributes;
pub mod availability;
pub mod interval;
pub mod product;

pub use attributes::{Brand, Color, Size};
pub use availability::{AvailabilitySet, EMPTY_AVAILABILITY};
pub use interval::{
    parse_epoch_millis, Interval, IntervalProjection, MAX_INSTANT_MILLIS, MIN_INSTANT_MILLIS,
};
pub use product::{NewProduct, ProductPatch, ProductRecord};
