use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

/// Programs tried, in order, to open a link in the user's browser.
const LAUNCHERS: [&str; 2] = ["xdg-open", "open"];

#[derive(Debug, Error)]
pub enum ShareError {
    /// The platform cannot hand a file to another app.
    #[error("File sharing is not supported here; export a backup and send it manually")]
    Unsupported,

    #[error("No link launcher found (tried {})", LAUNCHERS.join(", "))]
    NoLauncher,

    #[error("Could not open link: {0}")]
    Launch(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShareError>;

/// Compose-message link carrying `text`, e.g. `https://wa.me/?text=...`.
pub fn compose_link(base: &str, text: &str) -> String {
    format!("{base}{}", urlencoding::encode(text))
}

/// Hands text or files to whatever the user shares with.
#[async_trait]
pub trait ShareProvider: Send + Sync {
    async fn open_link(&self, url: &str) -> Result<()>;

    async fn share_file(&self, path: &Path) -> Result<()>;
}

/// Opens links with the desktop's opener. Cannot share files.
#[derive(Debug, Clone)]
pub struct DesktopSharer {
    launcher: Option<PathBuf>,
}

impl DesktopSharer {
    /// Look up the first available opener on `PATH`.
    pub fn detect() -> Self {
        let launcher = LAUNCHERS.iter().find_map(|name| which::which(name).ok());
        debug!(launcher = ?launcher, "share launcher detected");
        Self { launcher }
    }

    pub fn with_launcher(launcher: impl Into<PathBuf>) -> Self {
        Self {
            launcher: Some(launcher.into()),
        }
    }

    pub fn launcher(&self) -> Option<&Path> {
        self.launcher.as_deref()
    }
}

#[async_trait]
impl ShareProvider for DesktopSharer {
    async fn open_link(&self, url: &str) -> Result<()> {
        let launcher = self.launcher.as_ref().ok_or(ShareError::NoLauncher)?;
        let status = tokio::process::Command::new(launcher).arg(url).status().await?;
        if !status.success() {
            return Err(ShareError::Launch(io::Error::other(format!(
                "{} exited with {status}",
                launcher.display()
            ))));
        }
        info!(launcher = %launcher.display(), "link opened");
        Ok(())
    }

    async fn share_file(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "file sharing requested");
        Err(ShareError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_link_encodes_text() {
        let link = compose_link("https://wa.me/?text=", "*REPORT* 20/10 & more\n📅");
        assert_eq!(
            link,
            "https://wa.me/?text=%2AREPORT%2A%2020%2F10%20%26%20more%0A%F0%9F%93%85"
        );
    }

    #[tokio::test]
    async fn file_sharing_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let sharer = DesktopSharer::with_launcher("/nonexistent/opener");
        let err = sharer.share_file(&dir.path().join("rota.json")).await.unwrap_err();
        assert!(matches!(err, ShareError::Unsupported));
    }

    #[tokio::test]
    async fn missing_launcher_is_reported() {
        let sharer = DesktopSharer { launcher: None };
        assert!(matches!(
            sharer.open_link("https://example.com").await,
            Err(ShareError::NoLauncher)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launcher_exit_status_is_checked() {
        let ok = DesktopSharer::with_launcher(which::which("true").unwrap());
        ok.open_link("https://example.com").await.unwrap();

        let failing = DesktopSharer::with_launcher(which::which("false").unwrap());
        assert!(matches!(
            failing.open_link("https://example.com").await,
            Err(ShareError::Launch(_))
        ));

        let missing = DesktopSharer::with_launcher("/nonexistent/opener");
        assert!(matches!(
            missing.open_link("https://example.com").await,
            Err(ShareError::Launch(_))
        ));
    }
}
