use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Metadata, Order, Title};
use crate::value::{Dict, Value};

/// The order assumed for pages that don't declare one. Such pages sort
/// after every page with an explicit, smaller order.
pub const DEFAULT_ORDER: i64 = 999;

/// A page as the site generator hands it over.
///
/// `title` and `order` may be given directly or inside `data`, which is
/// where front matter usually ends up; direct values win.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    pub url: Arc<str>,
    #[serde(default, alias = "inputPath")]
    pub input_path: Option<Arc<str>>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub order: Option<Value>,
    #[serde(default)]
    pub content: Arc<str>,
    #[serde(default)]
    pub data: Dict,
}

/// The normalized view of a page that navigation is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPage")]
pub struct PageRecord {
    pub url: Arc<str>,
    pub title: Arc<str>,
    pub order: i64,
    pub content: Arc<str>,
    pub input_path: Arc<str>,
    pub data: Metadata,
}

impl PageRecord {
    pub fn new(url: impl Into<Arc<str>>, title: impl Into<Arc<str>>) -> Self {
        let url = url.into();
        PageRecord {
            title: title.into(),
            order: DEFAULT_ORDER,
            content: "".into(),
            input_path: url.clone(),
            data: Metadata::new(),
            url,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_content(mut self, content: impl Into<Arc<str>>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_input_path(mut self, input_path: impl Into<Arc<str>>) -> Self {
        self.input_path = input_path.into();
        self
    }

    /// Projects `raw` into a record, using `default_order` when no usable
    /// order is present.
    ///
    /// ```rust
    /// use folio::{PageRecord, RawPage};
    ///
    /// let raw = RawPage {
    ///     url: "/guides/".into(),
    ///     data: folio::dict!["title" => "Guides", "order" => 2],
    ///     ..Default::default()
    /// };
    ///
    /// let page = PageRecord::normalize(raw, 999);
    /// assert_eq!(&*page.title, "Guides");
    /// assert_eq!(page.order, 2);
    /// assert_eq!(&*page.input_path, "/guides/");
    /// ```
    pub fn normalize(raw: RawPage, default_order: i64) -> PageRecord {
        let data = Metadata::from(raw.data);

        let title = raw.title.and_then(|v| Arc::<str>::try_from(v).ok())
            .or_else(|| data.get(Title).and_then(Result::ok))
            .unwrap_or_else(|| "".into());

        let order = raw.order.and_then(|v| i64::try_from(v).ok())
            .or_else(|| data.get(Order).and_then(Result::ok))
            .unwrap_or(default_order);

        PageRecord {
            input_path: raw.input_path.unwrap_or_else(|| raw.url.clone()),
            url: raw.url,
            title,
            order,
            content: raw.content,
            data,
        }
    }

    pub fn is_root(&self) -> bool {
        &*self.url == "/"
    }
}

impl From<RawPage> for PageRecord {
    fn from(raw: RawPage) -> Self {
        PageRecord::normalize(raw, DEFAULT_ORDER)
    }
}

/// Navigation order: ascending `order`, then ascending title.
#[inline]
pub fn nav_order(a: &PageRecord, b: &PageRecord) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title))
}

/// Sorts `pages` into navigation order. The sort is stable, so pages with
/// equal order and title keep their relative input order.
pub fn sort_pages<P: AsRef<PageRecord>>(pages: &mut [P]) {
    pages.sort_by(|a, b| nav_order(a.as_ref(), b.as_ref()));
}

impl AsRef<PageRecord> for PageRecord {
    fn as_ref(&self) -> &PageRecord {
        self
    }
}
