//! # Printer Module
//!
//! Paper geometry and per-shop configuration.
//!
//! ## Modules
//!
//! - [`config`]: Paper widths, columns and dot widths
//! - [`settings`]: Shop branding file merged into receipts

pub mod config;
pub mod settings;

pub use config::PrinterWidth;
pub use settings::ShopSettings;
