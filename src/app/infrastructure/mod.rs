//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that stands in for the browser environment:
//! - Document access (`Dom`)
//! - Durable key/value storage
//! - Platform color-scheme detection
//! - Error types

pub mod dom;
pub mod error;
pub mod platform;
pub mod storage;
