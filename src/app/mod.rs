//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (PageRegistry, SiteConfig, Carousel, Messages)
//! - `controllers/` - Orchestration (ContentRouter, ThemeStore, ProfileLoader, etc.)
//! - `services/` - Business operations (fetching, syntax highlighting, query strings)
//! - `infrastructure/` - Environment integrations (document, storage, platform, error)
//! - `state.rs` - Main site coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::router::PageRequest;
pub use domain::{Message, PageRegistry, ProfileRecord, SiteConfig, ThemeMode};
pub use infrastructure::dom::{Dom, MemoryDom, NodeId};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
pub use services::query::page_key_from_query;
pub use state::Site;
