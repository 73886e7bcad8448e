//! System URL opener.
//!
//! Only `http://` and `https://` URLs are handed to the platform launcher.

use async_trait::async_trait;
use sage_chat::{validate_url, ChatError, UrlOpener};
use tokio::process::Command;

/// Opens URLs in the default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUrlOpener;

/// Launcher program and arguments for `url` on this platform.
pub fn launcher(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

#[async_trait]
impl UrlOpener for SystemUrlOpener {
    async fn open(&self, url: &str) -> Result<(), ChatError> {
        let url = validate_url(url)?;
        let (program, args) = launcher(url.as_str());

        let status = Command::new(program)
            .args(&args)
            .status()
            .await
            .map_err(|e| ChatError::UrlOpen(format!("failed to start {program}: {e}")))?;
        if !status.success() {
            return Err(ChatError::UrlOpen(format!("{program} exited with {status}")));
        }

        tracing::info!(url = %url, "Opened URL");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_passes_url_last() {
        let (_, args) = launcher("https://example.com");
        assert_eq!(args.last().map(String::as_str), Some("https://example.com"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_launcher_linux() {
        assert_eq!(launcher("https://x.com").0, "xdg-open");
    }

    #[tokio::test]
    async fn test_rejects_non_http_before_launch() {
        let err = SystemUrlOpener.open("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, ChatError::UrlOpen(_)));
        assert!(err.to_string().contains("only http and https"));
    }
}
