//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the document:
//! - Content routing
//! - Theme store
//! - Profile loading
//! - Markdown articles
//! - Carousel view

pub mod carousel;
pub mod markdown;
pub mod profile;
pub mod router;
pub mod theme;
