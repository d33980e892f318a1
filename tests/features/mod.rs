//! Cucumber feature support

pub mod support;

pub use support::TestWorld;
