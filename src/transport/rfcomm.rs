//! # Bluetooth RFCOMM Host
//!
//! Classic-Bluetooth receipt printers speak the Serial Port Profile. On
//! Linux a paired printer is bound to a tty:
//!
//! ```bash
//! $ bluetoothctl pair 66:32:8A:12:34:56
//! $ sudo rfcomm bind 0 66:32:8A:12:34:56
//! # creates /dev/rfcomm0
//! ```
//!
//! [`RfcommHost`] exposes that tty through the peripheral traits: one
//! serial-port service with one writable characteristic. Discovery resolves
//! the device path (explicit path, then MAC lookup, then `/dev/rfcomm0`);
//! connecting opens it in raw mode.
//!
//! ## TTY Configuration
//!
//! Raster data contains arbitrary bytes, including 0x11/0x13 (XON/XOFF) and
//! CR/LF, so the tty is put in raw mode: no input or output processing,
//! no software flow control, 8-bit characters, no echo, non-canonical.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
#[cfg(unix)]
use tokio::io::unix::AsyncFd;
use tracing::{debug, warn};

use super::{
    Characteristic, CharacteristicProperties, DeviceFilter, GattConnector, GattServer,
    GattService, PeripheralHost, TransportError,
};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Serial Port Profile service class.
pub const SPP_SERVICE: &str = "00001101-0000-1000-8000-00805f9b34fb";

/// The single write endpoint of an SPP link.
pub const SPP_DATA_CHARACTERISTIC: &str = "spp-data";

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Find the device name bound to `mac` in an rfcomm listing.
///
/// Both `/proc/net/rfcomm` and `rfcomm -a` print one binding per line,
/// starting with `rfcommN:`.
fn device_name_in_listing<'a>(listing: &'a str, mac: &str) -> Option<&'a str> {
    let mac = mac.to_uppercase();
    listing
        .lines()
        .filter(|line| line.to_uppercase().contains(&mac))
        .filter_map(|line| line.split(':').next())
        .map(str::trim)
        .find(|name| name.starts_with("rfcomm"))
}

/// Find an existing RFCOMM device bound to `mac`.
///
/// Checks `/proc/net/rfcomm`, then falls back to `rfcomm -a`.
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<PathBuf>, TransportError> {
    let existing = |name: &str| {
        let path = PathBuf::from(format!("/dev/{}", name));
        path.exists().then_some(path)
    };

    if let Ok(contents) = std::fs::read_to_string("/proc/net/rfcomm") {
        if let Some(path) = device_name_in_listing(&contents, mac).and_then(existing) {
            return Ok(Some(path));
        }
    }

    let output = Command::new("rfcomm")
        .arg("-a")
        .output()
        .map_err(|e| TransportError::Discovery(format!("failed to run 'rfcomm -a': {}", e)))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(device_name_in_listing(&stdout, mac).and_then(existing))
}

/// Configure a file descriptor for raw TTY mode.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    // Software flow control must be off: 0x11/0x13 appear in raster data
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn open_raw(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    let file = OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK | libc::O_NOCTTY)
        .open(path)?;
    match configure_tty_raw(file.as_raw_fd()) {
        Ok(()) => {}
        // Plain files (captures, FIFOs) are not ttys
        Err(e) if e.raw_os_error() == Some(libc::ENOTTY) => {
            debug!(path = %path.display(), "not a tty, writing without termios");
        }
        Err(e) => return Err(e),
    }
    Ok(file)
}

#[cfg(not(unix))]
fn open_raw(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

/// Where link writes go.
enum Sink {
    /// ttys and FIFOs: non-blocking writes driven by the reactor, so a
    /// dropped write stops at the next `EAGAIN`.
    #[cfg(unix)]
    Polled(AsyncFd<File>),
    /// Regular files cannot be polled and never block.
    Plain(File),
}

impl Sink {
    #[cfg(unix)]
    fn new(file: File) -> io::Result<Self> {
        if file.metadata()?.file_type().is_file() {
            Ok(Sink::Plain(file))
        } else {
            Ok(Sink::Polled(AsyncFd::new(file)?))
        }
    }

    #[cfg(not(unix))]
    fn new(file: File) -> io::Result<Self> {
        Ok(Sink::Plain(file))
    }

    async fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Sink::Polled(fd) => {
                let mut written = 0;
                while written < data.len() {
                    let mut guard = fd.writable().await?;
                    match guard.try_io(|inner| inner.get_ref().write(&data[written..])) {
                        Ok(Ok(0)) => return Err(io::ErrorKind::WriteZero.into()),
                        Ok(Ok(n)) => written += n,
                        Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {}
                        Ok(Err(e)) => return Err(e),
                        Err(_would_block) => {}
                    }
                }
                Ok(())
            }
            Sink::Plain(file) => {
                let mut file = file;
                file.write_all(data)?;
                file.flush()
            }
        }
    }

    /// Drop output the kernel has queued but not yet transmitted.
    #[cfg(unix)]
    fn discard_queued(&self) {
        use std::os::unix::io::AsRawFd;

        if let Sink::Polled(fd) = self {
            if unsafe { libc::tcflush(fd.as_raw_fd(), libc::TCOFLUSH) } != 0 {
                let e = io::Error::last_os_error();
                if e.raw_os_error() != Some(libc::ENOTTY) {
                    warn!(error = %e, "tcflush on disconnect failed");
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn discard_queued(&self) {}
}

/// How to locate the printer's tty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RfcommHost {
    /// Explicit device path; wins over `mac`.
    pub device: Option<PathBuf>,
    /// Printer MAC, resolved through the kernel's rfcomm bindings.
    pub mac: Option<String>,
}

impl RfcommHost {
    pub fn new(device: Option<PathBuf>, mac: Option<String>) -> Self {
        Self { device, mac }
    }

    fn resolve_path(&self) -> Result<PathBuf, TransportError> {
        let path = if let Some(device) = &self.device {
            device.clone()
        } else if let Some(mac) = &self.mac {
            if !is_valid_mac(mac) {
                return Err(TransportError::Discovery(format!(
                    "invalid MAC address '{}'",
                    mac
                )));
            }
            find_rfcomm_for_mac(mac)?.ok_or_else(|| {
                TransportError::Discovery(format!(
                    "no RFCOMM device bound to {} (try: sudo rfcomm bind 0 {})",
                    mac, mac
                ))
            })?
        } else {
            PathBuf::from(DEFAULT_DEVICE)
        };

        if !path.exists() {
            return Err(TransportError::Discovery(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Ok(path)
    }
}

#[async_trait]
impl PeripheralHost for RfcommHost {
    async fn request_device(
        &self,
        filter: &DeviceFilter,
    ) -> Result<Box<dyn GattConnector>, TransportError> {
        if !filter.services.is_empty() {
            debug!(services = ?filter.services, "RFCOMM exposes only the serial port service, ignoring filter");
        }
        let host = self.clone();
        let path = tokio::task::spawn_blocking(move || host.resolve_path())
            .await
            .map_err(|e| TransportError::Discovery(e.to_string()))??;
        debug!(path = %path.display(), "found RFCOMM device");
        Ok(Box::new(RfcommDevice { path }))
    }
}

struct RfcommDevice {
    path: PathBuf,
}

#[async_trait]
impl GattConnector for RfcommDevice {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn connect(&mut self) -> Result<Box<dyn GattServer>, TransportError> {
        let path = self.path.clone();
        let file = tokio::task::spawn_blocking(move || open_raw(&path))
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?
            .map_err(|e| {
                TransportError::Connect(format!("failed to open {}: {}", self.path.display(), e))
            })?;
        let sink = Sink::new(file).map_err(|e| {
            TransportError::Connect(format!("failed to register {}: {}", self.path.display(), e))
        })?;
        Ok(Box::new(RfcommLink {
            sink: Some(sink),
            interrupted: false,
        }))
    }
}

struct RfcommLink {
    sink: Option<Sink>,
    /// A write started but never completed (failed or timed out).
    interrupted: bool,
}

#[async_trait]
impl GattServer for RfcommLink {
    async fn primary_services(&mut self) -> Result<Vec<Box<dyn GattService>>, TransportError> {
        Ok(vec![Box::new(SerialPortService)])
    }

    async fn write(&mut self, _characteristic: &Characteristic, data: &[u8]) -> io::Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "link closed"))?;
        self.interrupted = true;
        sink.write_all(data).await?;
        self.interrupted = false;
        Ok(())
    }

    /// Closes the device. Nothing is written once this returns; after an
    /// interrupted write the unsent tail of the chunk is discarded.
    async fn disconnect(&mut self) {
        if let Some(sink) = self.sink.take() {
            if self.interrupted {
                debug!("discarding output of interrupted write");
                sink.discard_queued();
            }
        }
    }
}

struct SerialPortService;

#[async_trait]
impl GattService for SerialPortService {
    fn uuid(&self) -> &str {
        SPP_SERVICE
    }

    async fn characteristics(&self) -> Result<Vec<Characteristic>, TransportError> {
        Ok(vec![Characteristic {
            uuid: SPP_DATA_CHARACTERISTIC.to_string(),
            properties: CharacteristicProperties {
                write: true,
                ..Default::default()
            },
        }])
    }
}

// ============================================================================
// TESTS
// ============================================================================
