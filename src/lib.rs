//! # tillprint - Receipt Printing for Small Shops
//!
//! tillprint turns a point-of-sale order into a printed receipt over two
//! channels:
//!
//! - **ESC/POS**: a byte-exact command stream with a rasterized logo and a
//!   social-media row, streamed to a wireless printer in paced chunks
//! - **Browser fallback**: the same receipt as a standalone HTML page handed
//!   to the platform print dialog
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tillprint::{
//!     receipt::{self, HttpFetcher, ReceiptData},
//!     render::SpleenHost,
//!     transport::{RfcommHost, TransportConfig, WirelessTransport},
//!     fallback,
//! };
//!
//! # async fn example(order: ReceiptData) -> Result<(), tillprint::TillprintError> {
//! let fetcher = HttpFetcher::new(receipt::assets::FETCH_TIMEOUT)?;
//! let bytes = receipt::build_receipt(&order, &SpleenHost::new(), &fetcher).await;
//!
//! let transport = WirelessTransport::new(
//!     Arc::new(RfcommHost::new(Some("/dev/rfcomm0".into()), None)),
//!     TransportConfig::default(),
//! );
//! if !transport.send(&bytes).await {
//!     fallback::render_and_print(
//!         &order,
//!         fallback::BrowserSurface::new(),
//!         fallback::surface::DEFAULT_DISPOSE_AFTER,
//!     )?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`receipt`] | Receipt model, validating conversion, asset resolution, encoder |
//! | [`protocol`] | ESC/POS command builders |
//! | [`render`] | Monochrome rasterizer and social row compositor |
//! | [`transport`] | Chunked wireless transport |
//! | [`fallback`] | Printable HTML and print surfaces |
//! | [`printer`] | Paper widths and shop settings |
//! | [`server`] | HTTP print bridge |
//! | [`error`] | Error types |

pub mod error;
pub mod fallback;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::TillprintError;
pub use printer::PrinterWidth;
pub use receipt::{ReceiptData, encode};
pub use transport::WirelessTransport;
