pub mod minijinja;
mod ext;

use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;

use crate::capture::CaptureStore;
use crate::config::Settings;
use crate::error::Result;
use crate::taxonomy::PageRecord;

pub use self::minijinja::MiniJinjaEngine;

pub trait EngineInit {
    type Engine: Engine + 'static;

    fn init(settings: &Settings, captures: Arc<CaptureStore>) -> Result<Self::Engine>;
}

pub trait Engine: Send + Sync + Debug {
    /// Renders `template_str` against `context`. When `name` is `Some`,
    /// error messages refer to the template by that name.
    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        context: &RenderContext<'_>,
    ) -> Result<String>;
}

/// What a template sees while a page is rendered: the page itself as
/// `page`, every page of the site as `pages` and, when rendering a layout,
/// the page's rendered body as `content`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderContext<'a> {
    pub page: &'a PageRecord,
    pub pages: &'a [PageRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new(page: &'a PageRecord, pages: &'a [PageRecord]) -> Self {
        RenderContext { page, pages, content: None }
    }

    pub fn with_content(self, content: &'a str) -> Self {
        RenderContext { content: Some(content), ..self }
    }
}
