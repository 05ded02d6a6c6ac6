//! Display surface and revocable image handles.
//!
//! A [`ResourceRegistry`] hands out [`ObjectUrl`]s for encoded images. An
//! `ObjectUrl` revokes its registry entry when dropped, so replacing the
//! image on a [`DisplaySurface`] (or discarding a stale one, or bailing out on
//! an error) always releases the old bytes.

use crate::rendering::TableImage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const URL_PREFIX: &str = "blob:rosterpix/";

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<u64, Arc<TableImage>>,
}

/// Owner of every live image resource.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    inner: Mutex<RegistryInner>,
}

impl ResourceRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `image` and return a handle that keeps it alive.
    pub fn create(self: &Arc<Self>, image: TableImage) -> ObjectUrl {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id, Arc::new(image));
        ObjectUrl {
            id,
            url: format!("{}{}", URL_PREFIX, id),
            registry: Arc::clone(self),
        }
    }

    /// Look up a live resource by URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<TableImage>> {
        let id = url.strip_prefix(URL_PREFIX)?.parse::<u64>().ok()?;
        self.lock().live.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    fn revoke(&self, id: u64) -> bool {
        self.lock().live.remove(&id).is_some()
    }
}

/// A revocable reference to a registered image.
#[derive(Debug)]
pub struct ObjectUrl {
    id: u64,
    url: String,
    registry: Arc<ResourceRegistry>,
}

impl ObjectUrl {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> Option<Arc<TableImage>> {
        self.registry.resolve(&self.url)
    }

    /// Release the resource now instead of at drop.
    pub fn revoke(self) {}
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if self.registry.revoke(self.id) {
            log::debug!("revoked {}", self.url);
        }
    }
}

/// What the surface is showing.
#[derive(Debug)]
pub enum DisplaySource {
    /// A locally rendered image owned through a handle.
    Object(ObjectUrl),
    /// A static asset addressed by URL; nothing to release.
    Static(String),
}

impl DisplaySource {
    pub fn url(&self) -> &str {
        match self {
            DisplaySource::Object(o) => o.url(),
            DisplaySource::Static(s) => s,
        }
    }
}

/// Orders render requests; newer tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

/// The single image slot of the page.
#[derive(Debug, Default)]
pub struct DisplaySurface {
    current: Option<(RenderTicket, DisplaySource)>,
    issued: u64,
}

impl DisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a render about to start.
    pub fn begin(&mut self) -> RenderTicket {
        self.issued += 1;
        RenderTicket(self.issued)
    }

    /// Show `source` unless something from a newer request is already shown.
    ///
    /// The previous source is detached before it is released. A rejected
    /// source is dropped (and so revoked) before returning `false`.
    pub fn install(&mut self, ticket: RenderTicket, source: DisplaySource) -> bool {
        if let Some((shown, _)) = &self.current {
            if *shown > ticket {
                log::debug!("discarding stale frame {:?} (showing {:?})", ticket, shown);
                return false;
            }
        }
        let previous = self.current.take();
        drop(previous);
        self.current = Some((ticket, source));
        true
    }

    /// Detach and release whatever is shown.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&DisplaySource> {
        self.current.as_ref().map(|(_, s)| s)
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current().map(DisplaySource::url)
    }
}
