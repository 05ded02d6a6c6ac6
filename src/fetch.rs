//! Transports that fetch site-relative resources (`data.json`,
//! `image/status.json`, `image/{class}.webp`).

use crate::{Error, Result};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Fetch a resource addressed relative to the site root.
pub trait Fetcher: Send {
    fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Absolute location of `path`, for logs and static display sources.
    fn locate(&self, path: &str) -> String;
}

/// Reads resources from a local directory laid out like the site.
///
/// Query strings are ignored, so cache-busting suffixes resolve to the file.
/// Paths are percent-decoded like a static file server would, and may not
/// leave the root.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let raw = path.split(['?', '#']).next().unwrap_or(path);
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        let relative = Path::new(decoded.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(Error::Network(format!("Refusing path outside the site root: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

impl Fetcher for DirFetcher {
    fn get(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path)?;
        std::fs::read(&file).map_err(|e| Error::Network(format!("Failed to read {}: {}", file.display(), e)))
    }

    fn locate(&self, path: &str) -> String {
        match self.resolve(path) {
            Ok(file) => file.display().to_string(),
            Err(_) => path.to_string(),
        }
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use super::Fetcher;
    use crate::{Error, Result, ViewerConfig};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    /// Fetches over HTTP(S) relative to a base URL. No cookies are stored or
    /// sent.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        base: Url,
        user_agent: String,
    }

    impl HttpFetcher {
        pub fn new(config: &ViewerConfig) -> Result<Self> {
            let mut base = Url::parse(&config.base_url)
                .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
            // Resolve relative paths inside the base, not next to it.
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
            let client = Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
            Ok(Self {
                client,
                base,
                user_agent: config.user_agent.clone(),
            })
        }

        fn url(&self, path: &str) -> Result<Url> {
            self.base
                .join(path.trim_start_matches('/'))
                .map_err(|e| Error::Network(format!("Invalid resource path '{}': {}", path, e)))
        }
    }

    impl Fetcher for HttpFetcher {
        fn get(&self, path: &str) -> Result<Vec<u8>> {
            let url = self.url(path)?;
            log::debug!("GET {}", url);
            let resp = self
                .client
                .get(url.clone())
                .header("User-Agent", self.user_agent.clone())
                .send()
                .map_err(|e| Error::Network(format!("Failed to fetch {}: {}", url, e)))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(Error::Network(format!("{} returned {}", url, status)));
            }
            let body = resp
                .bytes()
                .map_err(|e| Error::Network(format!("Failed to read body of {}: {}", url, e)))?;
            Ok(body.to_vec())
        }

        fn locate(&self, path: &str) -> String {
            self.url(path).map(|u| u.to_string()).unwrap_or_else(|_| path.to_string())
        }
    }
}
