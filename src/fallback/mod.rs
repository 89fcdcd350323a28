//! # Browser Print Fallback
//!
//! When the wireless channel is unavailable or fails, the same receipt is
//! rendered as a self-contained HTML page and handed to the platform's
//! print dialog.
//!
//! - [`html`]: document rendering
//! - [`surface`]: where the document is mounted and printed

pub mod html;
pub mod surface;

pub use html::render_document;
pub use surface::{BrowserSurface, PrintSurface, render_and_print};
