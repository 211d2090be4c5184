//! Services layer - business operations and utilities.
//!
//! This module contains the operations the controllers lean on:
//! - Fetching resources (HTTP, disk, memory)
//! - Syntax highlighting of code blocks
//! - Query string handling

pub mod fetch;
pub mod query;
pub mod syntax;
