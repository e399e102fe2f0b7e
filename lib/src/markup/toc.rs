use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markup::heading::{heading_parts, HEADING};
use crate::util::{slugify, strip_tags};

/// One heading in a page's outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

impl HeadingEntry {
    pub fn new(level: u8, text: &str) -> Self {
        let text = strip_tags(text).into_owned();
        HeadingEntry { level, id: slugify(&text), text }
    }
}

/// Collects an outline from rendered HTML.
///
/// Only headings at one of `levels` are collected. Regions wrapped in
/// `<!--MARKER-->` and `<!--/MARKER-->` comments, where `MARKER` is the
/// configured exclusion marker, are skipped entirely.
#[derive(Debug, Clone)]
pub struct TocExtractor {
    levels: Vec<u8>,
    excluded: Option<Regex>,
}

static DEFAULT: Lazy<TocExtractor> = Lazy::new(|| {
    TocExtractor::new(&[2, 3], "EXAMPLE").unwrap()
});

impl TocExtractor {
    /// An extractor for headings at `levels`, skipping regions delimited by
    /// `marker`. An empty marker disables exclusion.
    pub fn new(levels: &[u8], marker: &str) -> Result<Self> {
        let excluded = match marker.is_empty() {
            true => None,
            false => {
                let marker = regex::escape(marker);
                Some(Regex::new(&format!("(?s)<!--{marker}-->.*?<!--/{marker}-->"))?)
            }
        };

        Ok(TocExtractor { levels: levels.to_vec(), excluded })
    }

    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// The outline of `html`, in document order.
    pub fn extract(&self, html: &str) -> Vec<HeadingEntry> {
        let html = match &self.excluded {
            Some(regex) => regex.replace_all(html, ""),
            None => Cow::Borrowed(html),
        };

        HEADING.captures_iter(&html)
            .filter_map(|caps| heading_parts(&caps))
            .filter(|(level, _)| self.levels.contains(level))
            .map(|(level, text)| HeadingEntry::new(level, text))
            .collect()
    }
}

impl Default for TocExtractor {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

/// The `<h2>` and `<h3>` outline of `html`, ignoring `EXAMPLE` regions.
///
/// ```rust
/// use folio::extract_toc;
///
/// let toc = extract_toc("<h2>Intro</h2><p>x</p><h3>Setup</h3>");
/// assert_eq!(toc.len(), 2);
/// assert_eq!((toc[0].level, toc[0].text.as_str(), toc[0].id.as_str()), (2, "Intro", "intro"));
/// assert_eq!((toc[1].level, toc[1].text.as_str(), toc[1].id.as_str()), (3, "Setup", "setup"));
/// ```
pub fn extract_toc(html: &str) -> Vec<HeadingEntry> {
    DEFAULT.extract(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn example_regions_are_excluded() {
        let html = "<h2>Usage</h2>\n\
            <!--EXAMPLE-->\n<h2>Demo</h2>\n<h3>Demo detail</h3>\n<!--/EXAMPLE-->\n\
            <h3>Options</h3>\n\
            <!--EXAMPLE--><h2>Second demo</h2><!--/EXAMPLE-->\n\
            <h2>See also</h2>";

        let texts: Vec<_> = extract_toc(html).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, ["Usage", "Options", "See also"]);
    }

    #[test]
    fn other_levels_and_broken_headings_are_skipped() {
        let html = "<h1>Page</h1><h2>Kept</h2><h4>Deep</h4><h2>Bad</h3><h3 id=\"x\">Attr</h3>";
        assert_eq!(extract_toc(html), vec![HeadingEntry {
            level: 2,
            text: "Kept".into(),
            id: "kept".into(),
        }]);
    }

    #[test]
    fn nothing_to_extract() {
        assert!(extract_toc("").is_empty());
        assert!(extract_toc("<p>No headings here</p>").is_empty());
    }

    #[test]
    fn configured_levels_and_marker() {
        let toc = TocExtractor::new(&[1, 4], "SKIP").unwrap();
        let html = "<h1>One</h1><h2>Two</h2><!--SKIP--><h4>Hidden</h4><!--/SKIP--><h4>4 Four</h4>\
            <!--EXAMPLE--><h1>Shown</h1><!--/EXAMPLE-->";

        let entries = toc.extract(html);
        let ids: Vec<_> = entries.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["one", "h4-four", "shown"]);
    }

    #[test]
    fn markers_are_matched_literally() {
        let toc = TocExtractor::new(&[2], "a.b").unwrap();
        let html = "<!--axb--><h2>Visible</h2><!--/axb-->";
        assert_eq!(toc.extract(html).len(), 1);

        let none = TocExtractor::new(&[2], "").unwrap();
        assert_eq!(none.extract("<!----><h2>A</h2><!--/-->").len(), 1);
    }

    #[test]
    fn entries_serialize_for_templates() {
        let json = serde_json::to_value(extract_toc("<h2>1 Getting Started</h2>")).unwrap();
        assert_eq!(json, serde_json::json!([
            {"level": 2, "text": "1 Getting Started", "id": "h1-getting-started"}
        ]));
    }
}
