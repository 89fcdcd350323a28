//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! spoken by generic thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, feed, cut)
//! - [`text`]: Alignment, emphasis, character size and column layout
//! - [`graphics`]: Raster bit images
//!
//! ## Usage Example
//!
//! ```
//! use tillprint::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align_center());
//! data.extend(text::bold_on());
//! data.extend(text::line("RECEIPT"));
//! data.extend(text::bold_off());
//! data.extend(text::align_left());
//! data.extend(commands::feed_lines(3));
//! data.extend(commands::cut_full_feed(0));
//!
//! // Send `data` to the printer via a transport...
//! ```

pub mod commands;
pub mod graphics;
pub mod text;

pub use graphics::RasterImage;
