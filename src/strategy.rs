//! Fetch strategies: how a frame for a selector is obtained.
//!
//! [`LiveQuery`] downloads the whole roster once and renders tables locally.
//! [`PrerenderedLookup`] downloads only the status file and then picks the
//! server-rendered image of the selected class. One of them is chosen at
//! startup and handed to the [`crate::Session`].

use crate::fetch::Fetcher;
use crate::metadata::LastModified;
use crate::platform::FetchMode;
use crate::rendering::{encode::DEFAULT_QUALITY, OutputFormat, TableImage, TableRenderer};
use crate::roster::{ClassSelector, PrerenderStatus, Roster, RosterPayload};
use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but RFC 3986 unreserved characters is escaped in a class
/// segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

pub const DATA_PATH: &str = "data.json";
pub const STATUS_PATH: &str = "image/status.json";

/// The image part of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameImage {
    /// Encoded bytes to register as a revocable resource.
    Encoded(TableImage),
    /// A URL the display loads by itself.
    Static(String),
}

/// Everything the page shows for one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub image: FrameImage,
    /// Rows in the table, when known.
    pub count: Option<usize>,
}

pub trait FrameStrategy: Send {
    fn mode(&self) -> FetchMode;

    /// Fetch whatever the strategy caches for the page lifetime. Called once
    /// per load; a failed call leaves earlier data in place.
    fn load(&mut self) -> Result<LastModified>;

    fn is_loaded(&self) -> bool;

    /// Produce the frame for `selector`.
    fn frame(&self, selector: &ClassSelector, renderer: &TableRenderer) -> Result<Frame>;

    /// Classes known after `load`.
    fn class_names(&self) -> Vec<String>;
}

/// Fetches `data.json` and renders tables on demand.
pub struct LiveQuery {
    fetcher: Box<dyn Fetcher>,
    roster: Option<Roster>,
    class_names: Vec<String>,
}

impl LiveQuery {
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            roster: None,
            class_names: Vec::new(),
        }
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }
}

impl FrameStrategy for LiveQuery {
    fn mode(&self) -> FetchMode {
        FetchMode::Live
    }

    fn load(&mut self) -> Result<LastModified> {
        let body = self.fetcher.get(DATA_PATH)?;
        let payload = RosterPayload::from_json(&body)?;
        let roster = Roster::new(payload.form_data)?;
        log::info!(
            "loaded {} rows from {}",
            roster.len(),
            self.fetcher.locate(DATA_PATH)
        );
        self.class_names = if payload.class_name.is_empty() {
            roster.class_names()
        } else {
            payload.class_name
        };
        self.roster = Some(roster);
        Ok(LastModified(payload.last_modified))
    }

    fn is_loaded(&self) -> bool {
        self.roster.is_some()
    }

    fn frame(&self, selector: &ClassSelector, renderer: &TableRenderer) -> Result<Frame> {
        let roster = self
            .roster
            .as_ref()
            .ok_or_else(|| Error::Render("no roster loaded".into()))?;
        let rows = roster.filter(selector);
        let image = renderer.render(rows, selector.is_all())?;
        Ok(Frame {
            image: FrameImage::Encoded(image),
            count: Some(rows.len()),
        })
    }

    fn class_names(&self) -> Vec<String> {
        self.class_names.clone()
    }
}

/// Fetches `image/status.json` and looks up `image/{class}.webp`.
pub struct PrerenderedLookup {
    fetcher: Box<dyn Fetcher>,
    status: Option<PrerenderStatus>,
    fetch_images: bool,
}

impl PrerenderedLookup {
    /// With `fetch_images` the image bytes are downloaded and registered as
    /// a local resource; otherwise the frame carries the asset URL.
    pub fn new(fetcher: Box<dyn Fetcher>, fetch_images: bool) -> Self {
        Self {
            fetcher,
            status: None,
            fetch_images,
        }
    }

    pub fn status(&self) -> Option<&PrerenderStatus> {
        self.status.as_ref()
    }

    /// Site path of the image for `selector`; the query defeats caches
    /// holding an older rendering. The class is percent-encoded so it stays
    /// one path segment.
    pub fn image_path(selector: &ClassSelector, last_modified: i64) -> String {
        format!(
            "image/{}.webp?{}",
            utf8_percent_encode(selector.as_str(), SEGMENT),
            last_modified
        )
    }
}

impl FrameStrategy for PrerenderedLookup {
    fn mode(&self) -> FetchMode {
        FetchMode::Prerendered
    }

    fn load(&mut self) -> Result<LastModified> {
        let body = self.fetcher.get(STATUS_PATH)?;
        let status = PrerenderStatus::from_json(&body)?;
        log::info!(
            "loaded status for {} classes from {}",
            status.remains.len(),
            self.fetcher.locate(STATUS_PATH)
        );
        let lm = LastModified(status.last_modified);
        self.status = Some(status);
        Ok(lm)
    }

    fn is_loaded(&self) -> bool {
        self.status.is_some()
    }

    fn frame(&self, selector: &ClassSelector, _renderer: &TableRenderer) -> Result<Frame> {
        let status = self
            .status
            .as_ref()
            .ok_or_else(|| Error::Render("no status loaded".into()))?;
        let path = Self::image_path(selector, status.last_modified);
        let image = if self.fetch_images {
            let bytes = self.fetcher.get(&path)?;
            FrameImage::Encoded(TableImage::from_bytes(OutputFormat::WebP(DEFAULT_QUALITY), bytes))
        } else {
            FrameImage::Static(self.fetcher.locate(&path))
        };
        Ok(Frame {
            image,
            count: status.remaining(selector),
        })
    }

    fn class_names(&self) -> Vec<String> {
        self.status
            .as_ref()
            .map(|s| s.remains.keys().cloned().collect())
            .unwrap_or_default()
    }
}
