//! Display model implementations for table and pretty output

mod product;

pub use product::{ProductDisplay, pretty_card, pretty_detail};
