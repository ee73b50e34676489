//! # bakefs Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every filesystem
//! operation and by the `bakefs` binary:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: The library error type (`FsError`), its `ErrorKind`, and the `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::core::config; // For loading configuration
//! use bakefs::core::error::{ErrorKind, FsError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
