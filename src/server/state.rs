//! Server state and configuration.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::printer::ShopSettings;
use crate::receipt::ImageFetcher;
use crate::render::SpleenHost;
use crate::transport::WirelessTransport;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:9100")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub transport: WirelessTransport,
    pub settings: ShopSettings,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub glyphs: SpleenHost,
    /// One print job on the wire at a time.
    pub print_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        transport: WirelessTransport,
        settings: ShopSettings,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            config,
            transport,
            settings,
            fetcher,
            glyphs: SpleenHost::new(),
            print_lock: Mutex::new(()),
        }
    }
}
