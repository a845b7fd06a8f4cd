//! Test utilities for the pgarrow crates.
//!
//! This crate provides:
//! - A writer for the binary COPY wire format, used to hand-craft row buffers
//! - Builders for complete COPY streams and temporary COPY files
//! - Seeded random row generation
//!
//! It has no dependency on the decoder itself, so the decoder's own tests can use it.

pub mod copy_file;
pub mod data_gen;
pub mod wire;

pub use wire::WireWriter;
