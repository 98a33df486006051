//! # folio-render
//!
//! Page assembly for folio.
//!
//! This crate wraps rendered markdown in a complete HTML document using
//! Askama, and owns the escaping routine applied to every interpolated value.

pub mod escape;
pub mod templates;

pub use escape::escape_html;
pub use templates::{assemble_page, ClapsWidget, CommentsWidget, Page, RenderError, Widgets};
