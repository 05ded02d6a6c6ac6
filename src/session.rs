//! Page session: cached data, selected class and the displayed image.

use crate::display::{DisplaySource, DisplaySurface, ResourceRegistry};
use crate::metadata::LastModified;
use crate::rendering::{TableImage, TableRenderer};
use crate::roster::ClassSelector;
use crate::store::{KeyValueStore, SELECTOR_KEY, SELECTOR_MAX_AGE};
use crate::strategy::{FrameImage, FrameStrategy};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// State of one viewer page.
///
/// The strategy is fixed at construction. `load` fetches once; every
/// `select` afterwards re-runs only filter and render.
pub struct Session {
    strategy: Box<dyn FrameStrategy>,
    renderer: TableRenderer,
    store: Box<dyn KeyValueStore>,
    selector_max_age: Duration,
    registry: Arc<ResourceRegistry>,
    surface: DisplaySurface,
    selector: ClassSelector,
    last_modified: Option<LastModified>,
    count: Option<usize>,
}

impl Session {
    /// Create a session, restoring the selector persisted in `store`.
    pub fn new(strategy: Box<dyn FrameStrategy>, renderer: TableRenderer, store: Box<dyn KeyValueStore>) -> Self {
        let mut session = Self {
            strategy,
            renderer,
            store,
            selector_max_age: SELECTOR_MAX_AGE,
            registry: ResourceRegistry::new(),
            surface: DisplaySurface::new(),
            selector: ClassSelector::All,
            last_modified: None,
            count: None,
        };
        session.restore_selector();
        session
    }

    pub fn with_selector_max_age(mut self, max_age: Duration) -> Self {
        self.selector_max_age = max_age;
        self
    }

    fn restore_selector(&mut self) {
        match self.store.get(SELECTOR_KEY) {
            Ok(Some(value)) => {
                self.selector = ClassSelector::parse(&value);
                self.persist_selector();
            }
            Ok(None) => {}
            Err(e) => log::warn!("could not read stored class: {}", e),
        }
    }

    fn persist_selector(&self) {
        if let Err(e) = self.store.set(SELECTOR_KEY, self.selector.as_str(), self.selector_max_age) {
            log::warn!("could not store class '{}': {}", self.selector, e);
        }
    }

    /// Fetch the strategy's data and render the current selector.
    ///
    /// A failed fetch is logged and returned; metadata, count and image stay
    /// as they were.
    pub fn load(&mut self) -> Result<()> {
        let lm = match self.strategy.load() {
            Ok(lm) => lm,
            Err(e) => {
                log::warn!("{:?} fetch failed: {}", self.strategy.mode(), e);
                return Err(e);
            }
        };
        self.last_modified = Some(lm);
        self.refresh()
    }

    /// Change the selector, persist it and re-render.
    ///
    /// Before the first successful `load` only the selector is recorded.
    pub fn select(&mut self, selector: ClassSelector) -> Result<()> {
        self.selector = selector;
        self.persist_selector();
        if !self.strategy.is_loaded() {
            return Ok(());
        }
        self.refresh()
    }

    /// Re-render the current selector.
    pub fn refresh(&mut self) -> Result<()> {
        let ticket = self.surface.begin();
        let frame = match self.strategy.frame(&self.selector, &self.renderer) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("no frame for class '{}': {}", self.selector, e);
                return Err(e);
            }
        };
        let source = match frame.image {
            FrameImage::Encoded(image) => DisplaySource::Object(self.registry.create(image)),
            FrameImage::Static(url) => DisplaySource::Static(url),
        };
        if self.surface.install(ticket, source) {
            self.count = frame.count;
            log::debug!(
                "showing class '{}' ({} rows) at {}",
                self.selector,
                self.count.map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
                self.surface.current_url().unwrap_or_default()
            );
        }
        Ok(())
    }

    pub fn selector(&self) -> &ClassSelector {
        &self.selector
    }

    /// Present only after the first successful load.
    pub fn last_modified(&self) -> Option<LastModified> {
        self.last_modified
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn class_names(&self) -> Vec<String> {
        self.strategy.class_names()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.surface.current_url()
    }

    /// The displayed image, when it is a local resource.
    pub fn current_image(&self) -> Option<Arc<TableImage>> {
        self.surface.current_url().and_then(|url| self.registry.resolve(url))
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn renderer(&self) -> &TableRenderer {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FetchMode;
    use crate::rendering::OutputFormat;
    use crate::roster::{Roster, Row};
    use crate::store::MemoryStore;
    use crate::strategy::Frame;
    use crate::Error;

    /// In-memory live strategy with a switch to make loads fail.
    struct Fixed {
        roster: Roster,
        loaded: bool,
        fail_load: bool,
    }

    impl FrameStrategy for Fixed {
        fn mode(&self) -> FetchMode {
            FetchMode::Live
        }

        fn load(&mut self) -> Result<LastModified> {
            if self.fail_load {
                return Err(Error::Network("offline".into()));
            }
            self.loaded = true;
            Ok(LastModified(7))
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn frame(&self, selector: &ClassSelector, renderer: &TableRenderer) -> Result<Frame> {
            let rows = self.roster.filter(selector);
            Ok(Frame {
                image: FrameImage::Encoded(renderer.render(rows, selector.is_all())?),
                count: Some(rows.len()),
            })
        }

        fn class_names(&self) -> Vec<String> {
            self.roster.class_names()
        }
    }

    fn session(fail_load: bool, store: MemoryStore) -> Session {
        let roster = Roster::new(vec![
            Row::new("1001", "Alice", "C1"),
            Row::new("1002", "Bob", "C1"),
            Row::new("2001", "Carl", "C2"),
        ])
        .unwrap();
        Session::new(
            Box::new(Fixed {
                roster,
                loaded: false,
                fail_load,
            }),
            TableRenderer::default().with_format(OutputFormat::Png),
            Box::new(store),
        )
    }

    #[test]
    fn load_renders_current_selector() {
        let mut s = session(false, MemoryStore::new());
        assert!(s.last_modified().is_none());
        s.load().unwrap();
        assert_eq!(s.last_modified(), Some(LastModified(7)));
        assert_eq!(s.count(), Some(3));
        assert_eq!(s.current_image().unwrap().width, 310);
    }

    #[test]
    fn reselecting_keeps_one_live_resource() {
        let mut s = session(false, MemoryStore::new());
        s.load().unwrap();
        let first = s.current_url().unwrap().to_string();
        s.select(ClassSelector::parse("C1")).unwrap();
        s.select(ClassSelector::parse("C2")).unwrap();
        assert_eq!(s.registry().live_count(), 1);
        assert!(s.registry().resolve(&first).is_none());
        assert_eq!(s.count(), Some(1));
    }

    #[test]
    fn failed_load_leaves_initial_state() {
        let mut s = session(true, MemoryStore::new());
        assert!(s.load().is_err());
        assert!(s.last_modified().is_none());
        assert!(s.current_url().is_none());
        assert!(s.count().is_none());
        // selecting before a load only records the choice
        s.select(ClassSelector::parse("C2")).unwrap();
        assert!(s.current_url().is_none());
    }

    #[test]
    fn selector_is_restored_and_persisted() {
        let store = MemoryStore::new();
        store.set(SELECTOR_KEY, "C2", SELECTOR_MAX_AGE).unwrap();
        let mut s = session(false, store);
        assert_eq!(s.selector(), &ClassSelector::parse("C2"));
        s.load().unwrap();
        assert_eq!(s.count(), Some(1));
        assert_eq!(s.current_image().unwrap().width, 208);
    }

    #[test]
    fn absent_class_renders_header_only() {
        let mut s = session(false, MemoryStore::new());
        s.load().unwrap();
        s.select(ClassSelector::parse("C9")).unwrap();
        assert_eq!(s.count(), Some(0));
        assert_eq!(s.current_image().unwrap().height, 25);
    }
}
