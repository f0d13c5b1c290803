//! Content-hash fingerprinting for static web assets.
//!
//! The pipeline discovers assets reachable from a set of seed files, renames
//! each one to embed a hash of its content, rewrites every reference to a
//! renamed asset, and writes the result to an output directory.
//!
//! ```text
//! graph::discover -> plan::plan -> rewrite::rewrite_all -> write::write_assets
//! ```
//!
//! [`pipeline::run`] chains the stages; [`cli`] wraps it for the command line.

pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod hash;
pub mod logger;
pub mod pattern;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod rewrite;
pub mod utils;
pub mod write;
