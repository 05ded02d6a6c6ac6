//! rosterpix
//!
//! Renders a class roster (student id, name, class) into a compact table
//! image instead of page text, filtered by the selected class.
//!
//! # Features
//!
//! - **Live mode**: fetch `data.json` once, then filter and render locally on
//!   every selector change
//! - **Pre-rendered mode**: for in-app webviews that only load static assets,
//!   look up `image/{class}.webp` generated by [`prerender::write_site`]
//! - **Deterministic rendering**: fixed column geometry and a built-in bitmap
//!   font give byte-identical rasters
//! - **Bounded resources**: every displayed image is a revocable handle that
//!   is released as soon as it is replaced
//!
//! # Example
//!
//! ```
//! use rosterpix::{ClassSelector, Roster, Row, TableRenderer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let roster = Roster::new(vec![
//!     Row::new("1001", "Alice", "C1"),
//!     Row::new("1002", "Bob", "C1"),
//!     Row::new("2001", "Carl", "C2"),
//! ])?;
//! let selector = ClassSelector::parse("C1");
//! let rows = roster.filter(&selector);
//! let raster = TableRenderer::default().rasterize(rows, selector.is_all());
//! assert_eq!((raster.width, raster.height), (208, 75));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod display;
pub mod fetch;
pub mod filter;
pub mod metadata;
pub mod platform;
pub mod prerender;
pub mod rendering;
pub mod roster;
pub mod session;
pub mod store;
pub mod strategy;

// Async-friendly viewer (worker-thread backed)
pub mod async_api;

pub use async_api::Viewer;
pub use filter::filter;
pub use metadata::LastModified;
pub use platform::FetchMode;
pub use rendering::{OutputFormat, TableImage, TableRenderer};
pub use roster::{ClassSelector, PrerenderStatus, Roster, RosterPayload, Row};
pub use session::Session;

/// Font files looked up in the working directory by default.
pub const FONT_SEARCH: [&str; 2] = ["font.otf", "font.ttf"];

/// Configuration for a viewer session
///
/// The defaults describe a regular desktop browser in live mode, rendering
/// WebP at quality 85 with the built-in font and an in-memory selector store.
///
/// # Examples
///
/// ```
/// let cfg = rosterpix::ViewerConfig::default();
/// assert_eq!(cfg.fetch_mode(), rosterpix::FetchMode::Live);
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Site root that holds `data.json` and `image/`
    pub base_url: String,
    /// User agent sent with requests and used to pick the fetch mode
    pub user_agent: String,
    /// Force (or forbid) pre-rendered mode instead of sniffing the user agent
    pub restricted: Option<bool>,
    /// HTTP timeout in milliseconds
    pub timeout_ms: u64,
    /// Encoding of locally rendered tables
    pub format: OutputFormat,
    /// TrueType/OpenType font; `font_search` is tried when unset
    pub font_path: Option<PathBuf>,
    /// Fonts used when present and `font_path` is unset; the built-in bitmap
    /// font is the last resort
    pub font_search: Vec<PathBuf>,
    /// Pixel size for `font_path`
    pub font_size: f32,
    /// Colours and header labels of rendered tables
    pub style: rendering::TableStyle,
    /// JSON file persisting the selected class; in-memory when unset
    pub store_path: Option<PathBuf>,
    /// Lifetime of the persisted selector
    pub selector_max_age: Duration,
    /// In pre-rendered mode, download image bytes instead of handing out URLs
    pub fetch_prerendered_images: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) rosterpix/0.1".to_string(),
            restricted: None,
            timeout_ms: 30000,
            format: OutputFormat::default(),
            font_path: None,
            font_search: FONT_SEARCH.iter().map(PathBuf::from).collect(),
            font_size: 18.0,
            style: rendering::TableStyle::default(),
            store_path: None,
            selector_max_age: store::SELECTOR_MAX_AGE,
            fetch_prerendered_images: true,
        }
    }
}

impl ViewerConfig {
    pub fn fetch_mode(&self) -> FetchMode {
        match self.restricted {
            Some(r) => FetchMode::from_restricted(r),
            None => FetchMode::detect(&self.user_agent),
        }
    }
}

/// Build the table renderer described by `config`.
///
/// An explicit `font_path` must load. Otherwise the first existing file of
/// `font_search` is used, and the built-in font when none exists.
pub fn build_renderer(config: &ViewerConfig) -> Result<TableRenderer> {
    let font: Arc<dyn rendering::TableFont> = match &config.font_path {
        Some(path) => Arc::new(rendering::OutlineFont::from_file(path, config.font_size)?),
        None if config.font_search.iter().any(|p| p.exists()) => {
            Arc::new(rendering::OutlineFont::from_first(&config.font_search, config.font_size)?)
        }
        None => Arc::new(rendering::BuiltinFont::default()),
    };
    Ok(TableRenderer::new(font, config.format).with_style(config.style.clone()))
}

/// Build a session reading site resources through `fetcher`.
pub fn session_with_fetcher(config: &ViewerConfig, fetcher: Box<dyn fetch::Fetcher>) -> Result<Session> {
    let mode = config.fetch_mode();
    log::info!("starting session in {:?} mode", mode);
    let strategy: Box<dyn strategy::FrameStrategy> = match mode {
        FetchMode::Live => Box::new(strategy::LiveQuery::new(fetcher)),
        FetchMode::Prerendered => Box::new(strategy::PrerenderedLookup::new(
            fetcher,
            config.fetch_prerendered_images,
        )),
    };
    let store: Box<dyn store::KeyValueStore> = match &config.store_path {
        Some(path) => Box::new(store::JsonFileStore::new(path)),
        None => Box::new(store::MemoryStore::new()),
    };
    Ok(Session::new(strategy, build_renderer(config)?, store).with_selector_max_age(config.selector_max_age))
}

/// Build a session that fetches from `config.base_url` over HTTP.
#[cfg(feature = "http")]
pub fn new_session(config: ViewerConfig) -> Result<Session> {
    let fetcher = fetch::HttpFetcher::new(&config)?;
    session_with_fetcher(&config, Box::new(fetcher))
}
