//! Use-case handlers, grouped by area.

pub mod display;
pub mod orders;
