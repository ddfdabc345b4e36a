//! Favicon download for apps installed without an explicit icon.

use crate::config::SsbDefaults;
use crate::error::{Result, SsbError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Fetches icon bytes for a site.
pub trait IconSource {
    /// Return the favicon of `url`, or an error describing why there is none.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// `<url>/favicon.ico`, with any trailing `/` on `url` removed first.
pub fn favicon_url(url: &str) -> String {
    format!(
        "{}/{}",
        url.trim_end_matches('/'),
        SsbDefaults::FAVICON_FILE_NAME
    )
}

/// Downloads `favicon.ico` over HTTP.
pub struct HttpIconSource {
    client: Client,
}

impl HttpIconSource {
    /// Create a source with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(SsbDefaults::FAVICON_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("firefox-ssb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SsbError::Network {
                message: format!("Failed to build HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self { client })
    }
}

impl IconSource for HttpIconSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let icon_url = favicon_url(url);
        debug!("Trying to download the favicon from {}", icon_url);

        let response = self.client.get(&icon_url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(SsbError::Network {
                message: format!("status code {} returned for {}", status.as_u16(), icon_url),
                status: Some(status.as_u16()),
            });
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(SsbError::Network {
                message: format!("empty favicon body from {}", icon_url),
                status: Some(status.as_u16()),
            });
        }

        debug!("Downloaded {} bytes from {}", bytes.len(), icon_url);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("https://mail.example.com"),
            "https://mail.example.com/favicon.ico"
        );
        assert_eq!(
            favicon_url("https://mail.example.com/"),
            "https://mail.example.com/favicon.ico"
        );
        assert_eq!(
            favicon_url("https://example.com/app"),
            "https://example.com/app/favicon.ico"
        );
    }
}
