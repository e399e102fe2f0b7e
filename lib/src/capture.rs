use std::hash::BuildHasherDefault;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHasher;

type Key = (Arc<str>, Arc<str>);

/// Fragments captured while rendering, keyed by tag and page.
///
/// A store lives for one build: [`reset()`](Self::reset) it before rendering
/// the first page. Pages rendered concurrently only ever touch their own
/// keys, so fragments never leak between pages.
#[derive(Debug, Default)]
pub struct CaptureStore {
    buffers: DashMap<Key, Vec<Arc<str>>, BuildHasherDefault<FxHasher>>,
}

impl CaptureStore {
    pub fn new() -> Self {
        CaptureStore::default()
    }

    /// Forgets everything captured so far.
    pub fn reset(&self) {
        self.buffers.clear();
    }

    /// Appends `content` to the `tag` buffer of `page`.
    pub fn capture(&self, tag: &str, page: &str, content: impl Into<Arc<str>>) {
        tracing::trace!(tag, page, "capturing fragment");
        self.buffers.entry((tag.into(), page.into()))
            .or_default()
            .push(content.into());
    }

    /// Removes and returns the fragments `page` captured under `tag`, in the
    /// order they were captured.
    pub fn drain(&self, tag: &str, page: &str) -> Vec<Arc<str>> {
        self.buffers.remove(&(Arc::from(tag), Arc::from(page)))
            .map(|(_, fragments)| fragments)
            .unwrap_or_default()
    }

    /// Drains the `tag` buffer of `page` into a block delimited by
    /// `BEGIN PAGE`/`END PAGE` comments. Returns an empty string when nothing
    /// was captured.
    ///
    /// ```rust
    /// use folio::CaptureStore;
    ///
    /// let store = CaptureStore::new();
    /// store.capture("modal", "index.md", "<div id=\"a\"></div>");
    /// store.capture("modal", "index.md", "<div id=\"b\"></div>\n");
    ///
    /// assert_eq!(store.emit("modal", "index.md"),
    ///     "<!-- BEGIN PAGE MODALS -->\n<div id=\"a\"></div>\n<div id=\"b\"></div>\n<!-- END PAGE MODALS -->");
    ///
    /// assert_eq!(store.emit("modal", "index.md"), "");
    /// ```
    pub fn emit(&self, tag: &str, page: &str) -> String {
        let fragments = self.drain(tag, page);
        if fragments.is_empty() {
            return String::new();
        }

        let label = tag.to_uppercase();
        let body = fragments.join("\n");
        format!("<!-- BEGIN PAGE {label}S -->\n{}\n<!-- END PAGE {label}S -->", body.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
