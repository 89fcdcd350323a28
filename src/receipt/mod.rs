//! # Receipts
//!
//! The logical receipt (`types`), its validating boundary from loosely typed
//! backend rows (`convert`), asset resolution (`assets`) and the ESC/POS
//! encoder (`encode`).
//!
//! ```text
//! serde_json::Value ──convert──▶ ReceiptData ──resolve_assets──▶ ReceiptAssets
//!                                     │                               │
//!                                     └──────────── encode ◀──────────┘
//!                                                     │
//!                                                  Vec<u8>
//! ```

pub mod assets;
pub mod convert;
pub mod encode;
pub mod types;

pub use assets::{HttpFetcher, ImageFetcher, ReceiptAssets, resolve_assets};
pub use convert::{ConvertError, receipt_from_value};
pub use encode::encode;
pub use types::{AdditionalCharge, LineItem, ReceiptData, ShopIdentity};

use crate::render::host::GlyphHost;

/// Resolve assets, then encode.
pub async fn build_receipt(
    data: &ReceiptData,
    host: &dyn GlyphHost,
    fetcher: &dyn ImageFetcher,
) -> Vec<u8> {
    let assets = resolve_assets(data, host, fetcher).await;
    encode(data, &assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::assets::tests::{OfflineFetcher, png_data_uri};
    use crate::receipt::types::fixtures;
    use crate::render::host::SpleenHost;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[tokio::test]
    async fn test_build_with_logo() {
        let mut receipt = fixtures::sample();
        receipt.shop.logo_url = Some(png_data_uri(96, 48));
        let bytes = build_receipt(&receipt, &SpleenHost::new(), &OfflineFetcher).await;
        // 384 dots wide, 192 rows tall
        let header = [0x1D, 0x76, 0x30, 0x00, 48, 0, 192, 0];
        let logo_at = find(&bytes, &header).unwrap();
        let name_at = find(&bytes, b"Annapurna Cafe").unwrap();
        assert!(logo_at < name_at);
    }

    #[tokio::test]
    async fn test_build_without_logo_matches_plain_encode() {
        let mut receipt = fixtures::sample();
        receipt.shop.logo_url = Some("https://unreachable.invalid/logo.png".to_string());
        let bytes = build_receipt(&receipt, &SpleenHost::new(), &OfflineFetcher).await;
        assert_eq!(bytes, encode(&receipt, &ReceiptAssets::default()));
    }
}
