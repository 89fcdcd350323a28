//! Print surfaces for the HTML fallback.
//!
//! A surface is anything that can hold a document and ask the platform to
//! print it: a hidden frame in a web client, a browser tab opened from the
//! CLI, or a recorder in tests.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::html::render_document;
use crate::error::TillprintError;
use crate::receipt::types::ReceiptData;

/// How long a surface stays alive after `print` by default.
pub const DEFAULT_DISPOSE_AFTER: Duration = Duration::from_secs(5);

/// An isolated place to mount and print one document.
pub trait PrintSurface: Send {
    fn mount(&mut self, html: &str) -> Result<(), TillprintError>;

    /// Trigger the print flow for the mounted document.
    fn print(&mut self) -> Result<(), TillprintError>;

    /// Release the surface. Must tolerate being called more than once.
    fn dispose(&mut self);
}

/// Writes the document to a temp file and opens it in the default browser.
///
/// The document's `onload` handler invokes the print dialog.
#[derive(Debug)]
pub struct BrowserSurface {
    dir: PathBuf,
    path: Option<PathBuf>,
}

impl Default for BrowserSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserSurface {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            path: None,
        }
    }

    /// Path of the mounted document, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn opener() -> Command {
        if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else {
            Command::new("xdg-open")
        }
    }
}

impl PrintSurface for BrowserSurface {
    fn mount(&mut self, html: &str) -> Result<(), TillprintError> {
        self.dispose();
        let path = self
            .dir
            .join(format!("tillprint-receipt-{}.html", uuid::Uuid::new_v4()));
        std::fs::write(&path, html)?;
        debug!(path = %path.display(), "mounted fallback document");
        self.path = Some(path);
        Ok(())
    }

    fn print(&mut self) -> Result<(), TillprintError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| TillprintError::Config("no document mounted".to_string()))?;
        Self::opener().arg(path).spawn()?;
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove fallback document");
            }
        }
    }
}

/// # Render and Print
///
/// Renders `data`, mounts it on `surface` and triggers printing. Returns as
/// soon as printing is triggered; the surface is disposed `dispose_after`
/// later on a background task, whose handle is returned.
///
/// A failed mount or print disposes the surface right away.
pub fn render_and_print<S>(
    data: &ReceiptData,
    mut surface: S,
    dispose_after: Duration,
) -> Result<JoinHandle<()>, TillprintError>
where
    S: PrintSurface + 'static,
{
    let html = render_document(data);
    if let Err(e) = surface.mount(&html).and_then(|_| surface.print()) {
        surface.dispose();
        return Err(e);
    }
    debug!(bill = %data.bill_no, "fallback print triggered");

    Ok(tokio::spawn(async move {
        tokio::time::sleep(dispose_after).await;
        surface.dispose();
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::types::fixtures;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
        fail_print: bool,
    }

    impl PrintSurface for Recorder {
        fn mount(&mut self, html: &str) -> Result<(), TillprintError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("mount:{}", html.len()));
            Ok(())
        }

        fn print(&mut self) -> Result<(), TillprintError> {
            if self.fail_print {
                return Err(TillprintError::Config("print blocked".to_string()));
            }
            self.events.lock().unwrap().push("print".to_string());
            Ok(())
        }

        fn dispose(&mut self) {
            self.events.lock().unwrap().push("dispose".to_string());
        }
    }

    fn kinds(recorder: &Recorder) -> Vec<String> {
        recorder
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_is_delayed() {
        let recorder = Recorder::default();
        let handle = render_and_print(
            &fixtures::sample(),
            recorder.clone(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(kinds(&recorder), vec!["mount", "print"]);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(kinds(&recorder), vec!["mount", "print"]);

        handle.await.unwrap();
        assert_eq!(kinds(&recorder), vec!["mount", "print", "dispose"]);
    }

    #[tokio::test]
    async fn test_print_failure_disposes_immediately() {
        let recorder = Recorder {
            fail_print: true,
            ..Default::default()
        };
        let result = render_and_print(&fixtures::sample(), recorder.clone(), DEFAULT_DISPOSE_AFTER);
        assert!(result.is_err());
        assert_eq!(kinds(&recorder), vec!["mount", "dispose"]);
    }

    #[test]
    fn test_browser_surface_mount_and_dispose() {
        let mut surface = BrowserSurface::new();
        surface.mount("<!DOCTYPE html><html></html>").unwrap();
        let path = surface.path().cloned().unwrap();
        assert!(path.exists());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("tillprint-receipt-")
        );

        surface.dispose();
        assert!(!path.exists());
        surface.dispose();
    }

    #[test]
    fn test_print_without_mount_fails() {
        assert!(BrowserSurface::new().print().is_err());
    }
}
