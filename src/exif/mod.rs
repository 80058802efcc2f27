//! EXIF metadata handling
//!
//! Phone cameras store rotation in the EXIF Orientation tag instead of
//! rotating the pixels. The pattern detectors scan rows, so images are turned
//! upright before analysis.

pub mod orientation;

pub use orientation::{apply_orientation, read_orientation};
