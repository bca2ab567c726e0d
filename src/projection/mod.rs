//! Rate computation for unpublished years: projection, blending and rounding

mod blending;
mod calculator;
mod rounding;

pub use blending::{BlendWeight, StaticBlender};
pub use calculator::ProjectionCalculator;
pub use rounding::{round_half_up, Rounder};
