#![doc = svgbobdoc::transform!(
//! Navigation, outlines, and template helpers for documentation sites.
//!
//! # Overview
//!
//! Folio takes the flat list of pages a site generator produces and derives
//! what documentation templates need to render them: a navigation tree,
//! ordered children and previous/next links for each page, a table of
//! contents built from the page's headings, and per-page buffers that let
//! deeply nested fragments push scripts and modals up to the layout. Nothing
//! here reads or writes files.
//!
//! ```svgbob
//!                     +-------------+
//!   raw pages ------> |  PageRecord | ---- sort_pages ----+
//!                     +------+------+                      |
//!                            |                             v
//!               +------------+------------+        +--------------+
//!               |                         |        |  build_tree  |
//!               v                         v        +------+-------+
//!      +-----------------+       +-----------------+      |
//!      | children        |       | prev_next       |      v
//!      +-----------------+       +-----------------+   Forest
//!
//!   rendered html ----> extract_toc -----> [HeadingEntry]
//!                  \--> add_heading_ids -> html with ids
//! ```
//!
//! ## Pages
//!
//! A page is identified by its URL, an absolute path such as
//! `/guides/install/`. Its place in the tree follows from the URL alone: the
//! parent of `/guides/install/` is `/guides/`. Pages are ordered by their
//! `order` (999 when absent) and then by title.
//!
//! ## Rendering
//!
//! A [`Site`] owns the settings, the pages, and the [`CaptureStore`] for one
//! build. [`Site::build()`] renders every page through an [`Engine`]: the
//! page's content first, when it contains template syntax, and then the
//! layout. The [`MiniJinjaEngine`] exposes everything above to templates as
//! filters and functions:
//!
//! ```text
//! {% for node in pages | tree %}...{% endfor %}
//! {% set nav = pages | prev_next(page) %}
//! {% for h in content | toc %}<a href="#{{ h.id }}">{{ h.text }}</a>{% endfor %}
//! {% filter capture_modal %}<div class="modal">...</div>{% endfilter %}
//! {{ modals() }}
//! ```
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod value;
pub mod url;
pub mod taxonomy;
pub mod markup;
pub mod capture;
pub mod config;
pub mod site;
pub mod templating;

pub use taxonomy::*;
pub use markup::{add_heading_ids, extract_toc, HeadingEntry, TocExtractor};
pub use util::slugify;
pub use capture::CaptureStore;
pub use config::{Settings, TocSettings};
pub use site::{RenderedPage, Site};
pub use templating::{Engine, EngineInit, MiniJinjaEngine, RenderContext};

pub use rayon;
