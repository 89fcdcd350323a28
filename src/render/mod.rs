//! # Receipt Graphics
//!
//! Turns logos and social-media rows into packed monochrome rasters ready
//! for the `GS v 0` command.
//!
//! ## Submodules
//!
//! - [`raster`]: Luminance threshold rasterizer and bit packing
//! - [`social`]: Greedy row-wrap compositor for icon/label pairs
//! - [`icons`]: Procedural social-media glyphs
//! - [`host`]: Decode/measure/draw capabilities and the Spleen-font host
//!
//! ## Example
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use tillprint::render::raster;
//!
//! let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([0, 0, 0, 255])));
//! let image = raster::rasterize(&logo, 384).unwrap();
//! assert_eq!(image.y_bits(), 192);
//! assert_eq!(image.body().len(), 48 * 192);
//! ```

pub mod host;
pub mod icons;
pub mod raster;
pub mod social;

pub use host::{GlyphHost, ImageDecoder, SpleenHost, TextMeasurer};
pub use icons::SocialIcon;
pub use social::SocialEntry;
