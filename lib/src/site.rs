use std::sync::Arc;

use derive_more::Debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::capture::CaptureStore;
use crate::config::Settings;
use crate::error::{Chainable, Result};
use crate::taxonomy::{self, Forest, PageRecord, PrevNext, RawPage};
use crate::templating::{Engine, EngineInit, RenderContext};
use crate::util::is_template;
use crate::value::Format;

/// The pages of one documentation site together with everything needed to
/// render them.
#[derive(Debug)]
pub struct Site {
    pub settings: Arc<Settings>,
    pub pages: Vec<PageRecord>,
    #[debug(ignore)]
    pub captures: Arc<CaptureStore>,
}

/// The output of rendering one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub url: Arc<str>,
    pub input_path: Arc<str>,
    pub html: String,
}

impl Site {
    pub fn new(settings: Settings) -> Site {
        Site {
            settings: Arc::new(settings),
            pages: vec![],
            captures: Arc::new(CaptureStore::new()),
        }
    }

    /// Normalizes `raw` with the configured default order and adds it.
    pub fn add_page(&mut self, raw: RawPage) -> &PageRecord {
        let i = self.pages.len();
        self.pages.push(PageRecord::normalize(raw, self.settings.default_order));
        &self.pages[i]
    }

    /// Adds every page in `input`, a sequence of raw pages in the format
    /// `F`. Returns the number of pages added.
    ///
    /// ```rust
    /// use folio::{Settings, Site};
    /// use folio::value::Json;
    ///
    /// let mut site = Site::new(Settings::default());
    /// let n = site.load_pages::<Json>(r#"[
    ///     {"url": "/", "data": {"title": "Home"}},
    ///     {"url": "/guides/", "data": {"title": "Guides"}},
    ///     {"url": "/guides/install/", "data": {"title": "Install", "order": 1}}
    /// ]"#).unwrap();
    ///
    /// assert_eq!(n, 3);
    /// assert_eq!(site.tree()[0].children.len(), 1);
    /// ```
    pub fn load_pages<F: Format>(&mut self, input: &str) -> Result<usize> {
        let raw: Vec<RawPage> = F::read(input).chain("failed to load pages")?;
        let n = raw.len();
        raw.into_iter().for_each(|page| { self.add_page(page); });
        Ok(n)
    }

    /// The navigation forest, in navigation order.
    pub fn tree(&self) -> Forest {
        let mut pages = self.pages.clone();
        taxonomy::sort_pages(&mut pages);
        taxonomy::build_tree(&pages)
    }

    pub fn children(&self, url: &str) -> Vec<&PageRecord> {
        taxonomy::children(&self.pages, url)
    }

    pub fn prev_next(&self, url: &str) -> PrevNext<'_> {
        taxonomy::prev_next(&self.pages, url)
    }

    /// Creates an `E` engine sharing this site's capture store.
    pub fn engine<E: EngineInit>(&self) -> Result<E::Engine> {
        E::init(&self.settings, self.captures.clone())
    }

    /// Renders every page: first its content, if it contains template
    /// syntax, and then `layout` with the rendered content as `content`.
    ///
    /// Captures from previous builds are discarded before any page is
    /// rendered. Pages are rendered in parallel.
    pub fn build<E: Engine>(&self, engine: &E, layout: &str) -> Result<Vec<RenderedPage>> {
        self.captures.reset();
        tracing::debug!(pages = self.pages.len(), "starting build");

        let rendered = crate::time!("build", {
            self.pages.par_iter()
                .map(|page| self.render_page(engine, page, layout))
                .collect::<Result<Vec<_>>>()
        })?;

        tracing::debug!(pages = rendered.len(), "build finished");
        Ok(rendered)
    }

    fn render_page<E: Engine>(&self, engine: &E, page: &PageRecord, layout: &str) -> Result<RenderedPage> {
        let context = RenderContext::new(page, &self.pages);
        let content = match is_template(&page.content) {
            true => engine.render_str(Some(&page.input_path), &page.content, &context)
                .chain_with(|| error!("failed to render page content", "url" => page.url))?,
            false => page.content.to_string(),
        };

        let html = engine.render_str(Some("layout"), layout, &context.with_content(&content))
            .chain_with(|| error!("failed to render layout", "url" => page.url))?;

        Ok(RenderedPage { url: page.url.clone(), input_path: page.input_path.clone(), html })
    }
}
