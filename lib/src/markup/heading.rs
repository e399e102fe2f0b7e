use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::util::slugify;

/// A plain `<hN>text</hN>` element: no attributes, no nested tags. The
/// closing level is captured separately and checked by callers.
pub(crate) static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<h([1-6])>([^<]+)</h([1-6])>").unwrap()
});

/// The level and inner text of a `HEADING` match, if its tags agree.
pub(crate) fn heading_parts<'h>(caps: &Captures<'h>) -> Option<(u8, &'h str)> {
    let (open, close) = (caps.get(1)?.as_str(), caps.get(3)?.as_str());
    if open != close {
        return None;
    }

    Some((open.parse().ok()?, caps.get(2)?.as_str()))
}

/// Gives every plain heading in `html` an `id` derived from its text.
///
/// Headings that already carry attributes or contain markup are left
/// untouched, as are headings whose closing tag doesn't match.
///
/// ```rust
/// use folio::add_heading_ids;
///
/// let html = add_heading_ids("<h2>Getting Started</h2><p>..</p><h3 class=\"x\">Kept</h3>");
/// assert_eq!(html, "<h2 id=\"getting-started\">Getting Started</h2><p>..</p><h3 class=\"x\">Kept</h3>");
/// ```
pub fn add_heading_ids(html: &str) -> Cow<'_, str> {
    HEADING.replace_all(html, |caps: &Captures<'_>| match heading_parts(caps) {
        Some((level, text)) => format!("<h{level} id=\"{}\">{text}</h{level}>", slugify(text)),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_added_at_every_level() {
        let html = "<h1>Title</h1>\n<h4>4 Details</h4>\n<h6>Small_print</h6>";
        assert_eq!(
            add_heading_ids(html),
            "<h1 id=\"title\">Title</h1>\n<h4 id=\"h4-details\">4 Details</h4>\n<h6 id=\"small_print\">Small_print</h6>"
        );
    }

    #[test]
    fn mismatched_or_nested_headings_are_left_alone() {
        let html = "<h2>Open</h3><h2><code>x</code></h2><h7>No</h7>";
        assert_eq!(add_heading_ids(html), html);
    }

    #[test]
    fn duplicate_texts_share_an_id() {
        let html = add_heading_ids("<h2>Usage</h2><h3>Usage</h3>");
        assert_eq!(html.matches("id=\"usage\"").count(), 2);
    }

    #[test]
    fn html_without_headings_is_borrowed() {
        assert!(matches!(add_heading_ids("<p>plain</p>"), Cow::Borrowed(_)));
    }
}
