//! Page loading, theming and markdown rendering for a personal portfolio
//! site, with the browser environment behind small capability traits.

pub mod app;
pub mod ui;
