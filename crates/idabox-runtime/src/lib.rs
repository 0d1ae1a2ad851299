//! Instance lifecycle for idabox.
//!
//! Everything here drives an external container runtime CLI through a
//! [`process::CommandRunner`]; no container state is kept locally.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod display;
pub mod docker;
pub mod engine;
pub mod host;
pub mod image;
pub mod process;
