//! Build a container image and pull prebuilt binaries out of it.
//!
//! The run is a fixed sequence of container-tool invocations: `build`,
//! `create`, one `cp` per artifact, and a final `rm` that always runs once a
//! container exists.

pub mod config;
pub mod docker;
pub mod pipeline;
