//! Color model shared by the renderer and the demo driver.

pub mod color;

pub use color::{Color, ParseColorError};
