//! Shelf-based strip packing.
//!
//! Rectangles are expanded from `(width, height, quantity)` specs, sorted
//! tallest-first and assigned to horizontal levels of a fixed-width bin by
//! one of three strategies: a single-column baseline, Next-Fit Decreasing
//! Height and First-Fit Decreasing Height.

pub mod error;
pub mod generate;
pub mod packer;
pub mod render;
pub mod shelf;
pub mod types;

pub use error::{GenerateError, PackError, Result};
pub use packer::{Packer, pack};
pub use shelf::Level;
pub use types::{
    Item, ItemSpec, OverflowPolicy, PackingInput, PackingResult, Placement, Strategy,
};
