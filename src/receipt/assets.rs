//! Image resolution for receipts.
//!
//! Fetches and rasterizes the visual elements of a receipt (logo, social
//! row) before encoding, so that [`encode`](super::encode::encode) stays a
//! pure function. Every failure here degrades to "no image" with a warning;
//! nothing in this module can stop a receipt from printing.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use super::types::ReceiptData;
use crate::error::TillprintError;
use crate::protocol::RasterImage;
use crate::render::host::GlyphHost;
use crate::render::raster::rasterize_bytes;
use crate::render::social::{compose, shop_social_entries};

/// Default timeout for remote logo downloads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves remote image bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TillprintError>;
}

/// `reqwest`-backed fetcher for `http(s)` logo URLs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, TillprintError> {
        let client = reqwest::Client::builder()
            .user_agent("tillprint/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| TillprintError::Http(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TillprintError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TillprintError::Http(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(TillprintError::Http(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TillprintError::Http(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Rasterized visuals for one receipt. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptAssets {
    pub logo: Option<RasterImage>,
    pub social: Option<RasterImage>,
}

/// Decode a `data:` URI payload.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, TillprintError> {
    let rest = &uri["data:".len()..];
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| TillprintError::Image("Malformed data URI".to_string()))?;
    if meta.ends_with(";base64") {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(cleaned)
            .map_err(|e| TillprintError::Image(format!("Invalid base64 in data URI: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Load the raw bytes behind a logo source.
///
/// Accepts `data:` URIs, `http(s)://` URLs (through `fetcher`), `file://`
/// URLs and bare filesystem paths.
pub async fn load_source(
    source: &str,
    fetcher: &dyn ImageFetcher,
) -> Result<Vec<u8>, TillprintError> {
    let source = source.trim();
    if source.starts_with("data:") {
        decode_data_uri(source)
    } else if source.starts_with("http://") || source.starts_with("https://") {
        fetcher.fetch(source).await
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        Ok(tokio::fs::read(Path::new(path)).await?)
    }
}

/// Rasterize the shop logo at the receipt's dot width.
pub async fn resolve_logo(
    data: &ReceiptData,
    host: &dyn GlyphHost,
    fetcher: &dyn ImageFetcher,
) -> Option<RasterImage> {
    let source = data.shop.logo_url()?;
    let bytes = match load_source(source, fetcher).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "logo unavailable, printing without it");
            return None;
        }
    };
    rasterize_bytes(&bytes, data.printer_width.width_dots(), host)
}

/// # Resolve Receipt Assets
///
/// Loads and rasterizes the logo and composes the social row. This is the
/// only step of receipt generation that performs I/O.
pub async fn resolve_assets(
    data: &ReceiptData,
    host: &dyn GlyphHost,
    fetcher: &dyn ImageFetcher,
) -> ReceiptAssets {
    let logo = resolve_logo(data, host, fetcher).await;
    let social = compose(
        &shop_social_entries(&data.shop),
        data.printer_width.width_dots(),
        host,
    );
    debug!(
        logo = logo.is_some(),
        social = social.is_some(),
        "resolved receipt assets"
    );
    ReceiptAssets { logo, social }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::receipt::types::fixtures;
    use crate::render::host::SpleenHost;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Fetcher that never reaches the network.
    pub(crate) struct OfflineFetcher;

    #[async_trait]
    impl ImageFetcher for OfflineFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, TillprintError> {
            Err(TillprintError::Http(format!("offline: {}", url)))
        }
    }

    pub(crate) fn png_data_uri(width: u32, height: u32) -> String {
        let image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
    }

    #[test]
    fn test_decode_data_uri_base64() {
        let bytes = decode_data_uri("data:text/plain;base64,aGk=").unwrap();
        assert_eq!(bytes, b"hi");
    }

    #[test]
    fn test_decode_data_uri_plain() {
        assert_eq!(decode_data_uri("data:,raw").unwrap(), b"raw");
        assert!(decode_data_uri("data:nocomma").is_err());
    }

    #[tokio::test]
    async fn test_logo_from_data_uri() {
        let mut receipt = fixtures::sample();
        receipt.shop.logo_url = Some(png_data_uri(40, 20));
        let logo = resolve_logo(&receipt, &SpleenHost::new(), &OfflineFetcher)
            .await
            .unwrap();
        assert_eq!(logo.width_dots(), 384);
        assert_eq!(logo.y_bits(), 192);
    }

    #[tokio::test]
    async fn test_unreachable_logo_is_none() {
        let mut receipt = fixtures::sample();
        receipt.shop.logo_url = Some("https://logo.invalid/logo.png".to_string());
        assert!(
            resolve_logo(&receipt, &SpleenHost::new(), &OfflineFetcher)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let mut receipt = fixtures::sample();
        receipt.shop.logo_url = Some("/nonexistent/tillprint/logo.png".to_string());
        assert!(
            resolve_logo(&receipt, &SpleenHost::new(), &OfflineFetcher)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_resolve_assets_social_only() {
        let mut receipt = fixtures::sample();
        receipt.shop.instagram = Some("@annapurna".to_string());
        let assets = resolve_assets(&receipt, &SpleenHost::new(), &OfflineFetcher).await;
        assert!(assets.logo.is_none());
        assert!(assets.social.is_some());
    }
}
