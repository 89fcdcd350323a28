//! # Wireless Transport
//!
//! Discover → connect → enumerate → select → stream, with one connection per
//! send. Writes are strictly sequential: each chunk is awaited before the
//! pacing delay, and there is no delay after the last chunk. Receipt
//! printers have small receive buffers and drop data when flooded.
//!
//! ```text
//! 1300 bytes, chunk 512, delay 50ms:
//!
//! t=0      write [0..512)
//! t=50ms   write [512..1024)
//! t=100ms  write [1024..1300)   → disconnect
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use super::{
    Characteristic, GattServer, PeripheralHost, SendReport, Stage, TransportConfig,
    TransportError,
};

/// Run `fut` with a deadline, mapping expiry to [`TransportError::Timeout`].
async fn within<T, F>(stage: Stage, limit: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(stage)),
    }
}

/// # Wireless Printer Transport
///
/// `host == None` models a platform without a peripheral stack; every send
/// then fails fast with [`TransportError::Unsupported`].
#[derive(Clone)]
pub struct WirelessTransport {
    host: Option<Arc<dyn PeripheralHost>>,
    config: TransportConfig,
}

impl WirelessTransport {
    pub fn new(host: Arc<dyn PeripheralHost>, config: TransportConfig) -> Self {
        Self {
            host: Some(host),
            config,
        }
    }

    /// A transport with no peripheral capability.
    pub fn unsupported(config: TransportConfig) -> Self {
        Self { host: None, config }
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_some()
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Send `bytes`, reporting only success.
    ///
    /// Never panics and never returns an error; failures are logged and the
    /// caller is expected to fall back to another channel.
    pub async fn send(&self, bytes: &[u8]) -> bool {
        match self.try_send(bytes).await {
            Ok(report) => {
                info!(chunks = report.chunks, bytes = report.bytes, "receipt printed");
                true
            }
            Err(e) => {
                error!(error = %e, "wireless print failed");
                false
            }
        }
    }

    /// Send `bytes` over a fresh connection.
    ///
    /// The connection is always closed before returning once it has been
    /// established, whether streaming succeeded or not.
    pub async fn try_send(&self, bytes: &[u8]) -> Result<SendReport, TransportError> {
        let host = self.host.as_ref().ok_or(TransportError::Unsupported)?;

        let filter = self.config.device_filter();
        debug!(services = ?filter.services, "requesting device");
        let mut device = within(
            Stage::Discover,
            self.config.discover_timeout,
            host.request_device(&filter),
        )
        .await?;

        debug!(device = %device.name(), "connecting");
        let mut server = within(
            Stage::Connect,
            self.config.connect_timeout,
            device.connect(),
        )
        .await?;

        let result = self.stream(server.as_mut(), bytes).await;
        server.disconnect().await;
        debug!(device = %device.name(), "disconnected");
        result
    }

    /// First characteristic that accepts writes, across all primary services.
    async fn select_characteristic(
        &self,
        server: &mut dyn GattServer,
    ) -> Result<Characteristic, TransportError> {
        let limit = self.config.connect_timeout;
        let services = within(Stage::Enumerate, limit, server.primary_services()).await?;
        for service in &services {
            let characteristics =
                within(Stage::Enumerate, limit, service.characteristics()).await?;
            if let Some(found) = characteristics
                .into_iter()
                .find(|c| c.properties.writable())
            {
                debug!(service = service.uuid(), characteristic = %found.uuid, "selected characteristic");
                return Ok(found);
            }
        }
        Err(TransportError::NoWritableCharacteristic)
    }

    async fn stream(
        &self,
        server: &mut dyn GattServer,
        bytes: &[u8],
    ) -> Result<SendReport, TransportError> {
        let characteristic = self.select_characteristic(server).await?;

        let chunk_size = self.config.chunk_size.max(1);
        let total = bytes.len().div_ceil(chunk_size);
        let mut report = SendReport::default();

        for (index, chunk) in bytes.chunks(chunk_size).enumerate() {
            if index > 0 && !self.config.chunk_delay.is_zero() {
                sleep(self.config.chunk_delay).await;
            }
            let write = async {
                server
                    .write(&characteristic, chunk)
                    .await
                    .map_err(|e| TransportError::Write {
                        chunk: index,
                        message: e.to_string(),
                    })
            };
            within(Stage::Write, self.config.write_timeout, write).await?;

            report.chunks += 1;
            report.bytes += chunk.len();
            debug!(chunk = index + 1, total, len = chunk.len(), "wrote chunk");
        }

        Ok(report)
    }
}

// ============================================================================
// TESTS
// ============================================================================
