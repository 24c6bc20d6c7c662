//! Core pipeline for yearbook.
//!
//! This crate ties together discovery, the markdown passes, and the external
//! converter into the two end-to-end workflows: `merge` and `build`.

pub mod converter;
pub mod merger;
pub mod pipeline;
