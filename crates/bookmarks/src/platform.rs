//! Platforms the interactions run on.

pub mod browser;
pub mod memory;
