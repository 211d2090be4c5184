//! Page shell: builds the document the scripts operate on and writes it
//! back out as HTML.

pub mod shell;
