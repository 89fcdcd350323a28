//! # tillprint CLI
//!
//! Command-line interface for receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Encode a receipt to raw ESC/POS bytes
//! tillprint encode order.json -o order.bin
//!
//! # Print over the paired Bluetooth printer, falling back to the browser
//! tillprint --mac 66:32:8A:12:34:56 print order.json --fallback
//!
//! # Open the browser print dialog directly
//! tillprint html order.json --open
//!
//! # Inspect the rasterized logo and social row
//! tillprint --settings shop.json preview order.json -o images.png
//!
//! # Run the print bridge for a web client
//! tillprint --settings shop.json serve --listen 127.0.0.1:9100
//! ```

use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Luma};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use tillprint::{
    TillprintError,
    fallback::{self, BrowserSurface, surface::DEFAULT_DISPOSE_AFTER},
    printer::{PrinterWidth, ShopSettings},
    protocol::RasterImage,
    receipt::{self, HttpFetcher, ReceiptData, assets::FETCH_TIMEOUT},
    render::SpleenHost,
    server::{self, AppState, ServerConfig},
    transport::{RfcommHost, TransportConfig, WirelessTransport},
};

/// tillprint - receipt printing for small shops
#[derive(Parser, Debug)]
#[command(name = "tillprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Printer device path (e.g. /dev/rfcomm0)
    #[arg(long, global = true, env = "TILLPRINT_DEVICE")]
    device: Option<PathBuf>,

    /// Printer Bluetooth MAC, resolved to its bound RFCOMM device
    #[arg(long, global = true)]
    mac: Option<String>,

    /// Paper width for receipts that do not name one, overriding the settings file (58mm or 80mm)
    #[arg(long, global = true)]
    width: Option<PrinterWidth>,

    /// Shop settings JSON file
    #[arg(long, global = true, env = "TILLPRINT_SETTINGS")]
    settings: Option<PathBuf>,

    /// Bytes per wireless write
    #[arg(long, global = true, default_value_t = 512)]
    chunk_size: usize,

    /// Pause between wireless writes in milliseconds
    #[arg(long, global = true, default_value_t = 50)]
    chunk_delay_ms: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a receipt to ESC/POS bytes
    Encode {
        /// Receipt JSON file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render the printable HTML fallback
    Html {
        /// Receipt JSON file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Open the document in the browser and print it
        #[arg(long)]
        open: bool,
    },

    /// Send a receipt to the printer
    Print {
        /// Receipt JSON file
        input: PathBuf,

        /// Use the browser print dialog if the printer is unreachable
        #[arg(long)]
        fallback: bool,
    },

    /// Save the receipt's rasterized images as PNG
    Preview {
        /// Receipt JSON file
        input: PathBuf,

        /// PNG output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Run the HTTP print bridge
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:9100")]
        listen: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tillprint=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TillprintError> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.global)?;

    match cli.command {
        Commands::Encode { input, output } => {
            let receipt = load_receipt(&input, &settings)?;
            let bytes = receipt::build_receipt(&receipt, &SpleenHost::new(), &fetcher()?).await;
            write_output(output.as_deref(), &bytes)?;
            info!(bytes = bytes.len(), "encoded receipt");
        }

        Commands::Html {
            input,
            output,
            open,
        } => {
            let receipt = load_receipt(&input, &settings)?;
            if open {
                browser_print(&receipt).await?;
            } else {
                write_output(output.as_deref(), fallback::render_document(&receipt).as_bytes())?;
            }
        }

        Commands::Print {
            input,
            fallback: use_fallback,
        } => {
            let receipt = load_receipt(&input, &settings)?;
            let bytes = receipt::build_receipt(&receipt, &SpleenHost::new(), &fetcher()?).await;
            let transport = build_transport(&cli.global);

            match transport.try_send(&bytes).await {
                Ok(report) => {
                    println!(
                        "Printed bill {} ({} bytes in {} chunks)",
                        receipt.bill_no, report.bytes, report.chunks
                    );
                }
                Err(e) if use_fallback => {
                    warn!(error = %e, "wireless print failed, opening browser print dialog");
                    browser_print(&receipt).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Preview { input, output } => {
            let receipt = load_receipt(&input, &settings)?;
            let assets =
                receipt::resolve_assets(&receipt, &SpleenHost::new(), &fetcher()?).await;
            let images: Vec<&RasterImage> =
                assets.logo.iter().chain(assets.social.iter()).collect();
            if images.is_empty() {
                return Err(TillprintError::Config(
                    "receipt has no logo or social handles to preview".to_string(),
                ));
            }
            save_png(&output, &images)?;
            println!("Saved {} image(s) to {}", images.len(), output.display());
        }

        Commands::Serve { listen } => {
            let state = AppState::new(
                ServerConfig {
                    listen_addr: listen,
                },
                build_transport(&cli.global),
                settings,
                Arc::new(fetcher()?),
            );
            server::serve(state).await?;
        }
    }

    Ok(())
}

fn load_settings(opts: &GlobalOpts) -> Result<ShopSettings, TillprintError> {
    let mut settings = match &opts.settings {
        Some(path) => ShopSettings::load(path)?,
        None => ShopSettings::default(),
    };
    if let Some(width) = opts.width {
        settings.set_printer_width(width);
    }
    Ok(settings)
}

fn load_receipt(path: &Path, settings: &ShopSettings) -> Result<ReceiptData, TillprintError> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        TillprintError::Config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    Ok(receipt::receipt_from_value(&value, Some(settings.value()))?)
}

fn fetcher() -> Result<HttpFetcher, TillprintError> {
    HttpFetcher::new(FETCH_TIMEOUT)
}

fn build_transport(opts: &GlobalOpts) -> WirelessTransport {
    let config = TransportConfig {
        chunk_size: opts.chunk_size,
        chunk_delay: Duration::from_millis(opts.chunk_delay_ms),
        ..Default::default()
    };
    let host = RfcommHost::new(opts.device.clone(), opts.mac.clone());
    WirelessTransport::new(Arc::new(host), config)
}

async fn browser_print(receipt: &ReceiptData) -> Result<(), TillprintError> {
    let dispose = fallback::render_and_print(receipt, BrowserSurface::new(), DEFAULT_DISPOSE_AFTER)?;
    println!("Opened bill {} in the browser for printing", receipt.bill_no);
    // Keep the document on disk until the browser has loaded it
    dispose
        .await
        .map_err(|e| TillprintError::Io(std::io::Error::other(e)))
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), TillprintError> {
    match path {
        Some(path) => std::fs::write(path, data)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Stack the rasters vertically, 8 white rows apart.
fn save_png(path: &Path, images: &[&RasterImage]) -> Result<(), TillprintError> {
    const GAP: u32 = 8;
    let width = images.iter().map(|i| i.width_dots() as u32).max().unwrap_or(0);
    let height = images.iter().map(|i| i.y_bits() as u32).sum::<u32>()
        + GAP * (images.len() as u32).saturating_sub(1);

    let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
    let mut top = 0;
    for image in images {
        for y in 0..image.y_bits() as u32 {
            for x in 0..image.width_dots() as u32 {
                if image.is_black(x as usize, y as usize) {
                    canvas.put_pixel(x, top + y, Luma([0]));
                }
            }
        }
        top += image.y_bits() as u32 + GAP;
    }

    canvas
        .save(path)
        .map_err(|e| TillprintError::Image(format!("Failed to save {}: {}", path.display(), e)))
}
