//! Display models for CLI output
//!
//! Converts store types into CLI-friendly rows and text blocks.

pub mod display;

pub use display::{ProductDisplay, pretty_card, pretty_detail};
