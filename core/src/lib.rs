//! # framepass core
//!
//! Core utilities shared by the framepass scheduler: allocation pooling and
//! optional profiling instrumentation.

pub mod pool;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
