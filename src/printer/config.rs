//! # Printer Configuration
//!
//! This module defines the paper widths supported by the receipt pipeline.
//!
//! ## Supported Widths
//!
//! | Paper | Columns (Font A) | Print width (dots) | Bytes per row |
//! |-------|------------------|--------------------|---------------|
//! | 58mm  | 32               | 384                | 48            |
//! | 80mm  | 48               | 576                | 72            |
//!
//! [`PrinterWidth`] is the single configuration point for both backends:
//! the ESC/POS encoder derives its column width from it, the rasterizer and
//! glyph compositor derive their dot width from it, and the browser fallback
//! derives its paper CSS from it.
//!
//! ## Usage
//!
//! ```
//! use tillprint::printer::PrinterWidth;
//!
//! let width = PrinterWidth::Mm58;
//! assert_eq!(width.columns(), 32);
//! assert_eq!(width.width_dots(), 384);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// # Thermal Paper Width
///
/// Both widths print at 203 DPI (about 8 dots per mm):
///
/// ```text
/// 58mm paper: 48mm printable = 384 dots
/// 80mm paper: 72mm printable = 576 dots
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrinterWidth {
    #[serde(rename = "58mm")]
    #[default]
    Mm58,
    #[serde(rename = "80mm")]
    Mm80,
}

impl PrinterWidth {
    /// Characters per line in the printer's default font (12×24 dots).
    #[inline]
    pub const fn columns(self) -> usize {
        match self {
            Self::Mm58 => 32,
            Self::Mm80 => 48,
        }
    }

    /// Printable width in dots.
    #[inline]
    pub const fn width_dots(self) -> u16 {
        match self {
            Self::Mm58 => 384,
            Self::Mm80 => 576,
        }
    }

    /// Nominal paper width in millimeters, used for the fallback page size.
    #[inline]
    pub const fn paper_mm(self) -> u16 {
        match self {
            Self::Mm58 => 58,
            Self::Mm80 => 80,
        }
    }
}

impl fmt::Display for PrinterWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.paper_mm())
    }
}

impl FromStr for PrinterWidth {
    type Err = String;

    /// Accepts `"58mm"`, `"80mm"`, `"58"` or `"80"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.trim_end_matches("mm") {
            "58" => Ok(Self::Mm58),
            "80" => Ok(Self::Mm80),
            _ => Err(format!(
                "Unknown printer width '{}'. Use '58mm' or '80mm'",
                s
            )),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
