//! Reusable graphics utilities for debugger rendering.

pub mod color;

pub use color::ColorOps;
