//! # Printer Transport Layer
//!
//! Streams an encoded receipt to a wireless printer in paced chunks.
//!
//! ## Peripheral Model
//!
//! The printer is reached through a small GATT-shaped capability surface so
//! the pipeline does not care whether the link is BLE, classic Bluetooth
//! RFCOMM, or a test double:
//!
//! ```text
//! PeripheralHost ──request_device──▶ GattConnector ──connect──▶ GattServer
//!                                                                 │
//!                                           primary_services ◀────┤
//!                                                  │              │
//!                                   GattService::characteristics  │
//!                                                  │              │
//!                                  first writable Characteristic ─┴─▶ write(chunk)…
//! ```
//!
//! ## Available Hosts
//!
//! - [`rfcomm`]: Bluetooth SPP via a bound `/dev/rfcommN` tty (Linux)
//!
//! [`WirelessTransport`] drives any host; see [`wireless`].

pub mod rfcomm;
pub mod wireless;

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use rfcomm::RfcommHost;
pub use wireless::WirelessTransport;

/// Service UUID advertised by most BLE receipt printers.
pub const DEFAULT_PRINTER_SERVICE: &str = "000018f0-0000-1000-8000-00805f9b34fb";

/// Largest payload per write.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Pause between consecutive writes.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(50);

/// Pipeline stage, used to report timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Connect,
    Enumerate,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discovery",
            Stage::Connect => "connect",
            Stage::Enumerate => "service enumeration",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Failure anywhere between discovery and the last chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("wireless printing is not available on this host")]
    Unsupported,

    #[error("no printer found: {0}")]
    Discovery(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("printer exposes no writable characteristic")]
    NoWritableCharacteristic,

    #[error("write failed at chunk {chunk}: {message}")]
    Write { chunk: usize, message: String },

    #[error("{0} timed out")]
    Timeout(Stage),
}

/// What to look for when requesting a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Service UUIDs; empty accepts any device.
    pub services: Vec<String>,
}

/// Capability flags of one characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacteristicProperties {
    pub read: bool,
    pub write: bool,
    pub write_without_response: bool,
    pub notify: bool,
}

impl CharacteristicProperties {
    pub fn writable(&self) -> bool {
        self.write || self.write_without_response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    pub uuid: String,
    pub properties: CharacteristicProperties,
}

/// Entry point to the platform's peripheral stack.
#[async_trait]
pub trait PeripheralHost: Send + Sync {
    /// Find a printer matching `filter`.
    async fn request_device(
        &self,
        filter: &DeviceFilter,
    ) -> Result<Box<dyn GattConnector>, TransportError>;
}

/// A discovered device that has not been connected yet.
#[async_trait]
pub trait GattConnector: Send + Sync {
    fn name(&self) -> String;

    async fn connect(&mut self) -> Result<Box<dyn GattServer>, TransportError>;
}

/// An open connection.
#[async_trait]
pub trait GattServer: Send + Sync {
    async fn primary_services(&mut self) -> Result<Vec<Box<dyn GattService>>, TransportError>;

    async fn write(&mut self, characteristic: &Characteristic, data: &[u8]) -> io::Result<()>;

    /// Close the link. Safe to call more than once.
    async fn disconnect(&mut self);
}

#[async_trait]
pub trait GattService: Send + Sync {
    fn uuid(&self) -> &str;

    async fn characteristics(&self) -> Result<Vec<Characteristic>, TransportError>;
}

/// Pacing, timeouts and discovery filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub chunk_size: usize,
    pub chunk_delay: Duration,
    pub discover_timeout: Duration,
    pub connect_timeout: Duration,
    pub write_timeout: Duration,
    pub service_filter: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            discover_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(5),
            service_filter: Some(DEFAULT_PRINTER_SERVICE.to_string()),
        }
    }
}

impl TransportConfig {
    pub fn device_filter(&self) -> DeviceFilter {
        DeviceFilter {
            services: self.service_filter.iter().cloned().collect(),
        }
    }
}

/// Outcome of a successful send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub chunks: usize,
    pub bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.chunk_size, 512);
        assert_eq!(config.chunk_delay, Duration::from_millis(50));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(
            config.device_filter().services,
            vec!["000018f0-0000-1000-8000-00805f9b34fb".to_string()]
        );
    }

    #[test]
    fn test_no_service_filter_accepts_all() {
        let config = TransportConfig {
            service_filter: None,
            ..Default::default()
        };
        assert!(config.device_filter().services.is_empty());
    }

    #[test]
    fn test_writable() {
        let mut props = CharacteristicProperties::default();
        assert!(!props.writable());
        props.write_without_response = true;
        assert!(props.writable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TransportError::Timeout(Stage::Connect).to_string(),
            "connect timed out"
        );
        assert_eq!(
            TransportError::Write {
                chunk: 2,
                message: "broken pipe".to_string()
            }
            .to_string(),
            "write failed at chunk 2: broken pipe"
        );
    }
}
