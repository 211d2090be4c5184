//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Page registry
//! - Site configuration and theme preference
//! - Profile record
//! - Carousel position model
//! - Message types for the event system

pub mod carousel;
pub mod messages;
pub mod profile;
pub mod registry;
pub mod settings;

pub use carousel::{Carousel, EndBehavior, SlideDirection, SlideMove, SlideView, StartingPosition};
pub use messages::{Message, RequestId};
pub use profile::ProfileRecord;
pub use registry::{PageEntry, PageRegistry, ResolvedPage};
pub use settings::{PageConfig, ProfileTargets, Selectors, SiteConfig, SyntaxTheme, ThemeMode};
