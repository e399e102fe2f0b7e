use serde::Serialize;

use crate::taxonomy::{nav_order, PageRecord};
use crate::url;

/// The pages directly below `page_url`, by ascending `order`.
///
/// Pages sharing an order keep the order they have in `pages`. The root,
/// `/`, has the top-level pages as its children.
///
/// ```rust
/// use folio::{children, PageRecord};
///
/// let pages = [
///     PageRecord::new("/guides/", "Guides"),
///     PageRecord::new("/guides/b/", "B").with_order(2),
///     PageRecord::new("/guides/a/", "A").with_order(1),
///     PageRecord::new("/guides/a/deeper/", "Deeper"),
/// ];
///
/// let titles: Vec<_> = children(&pages, "/guides/").iter().map(|p| &*p.title).collect();
/// assert_eq!(titles, ["A", "B"]);
/// ```
pub fn children<'a>(pages: &'a [PageRecord], page_url: &str) -> Vec<&'a PageRecord> {
    let mut children: Vec<_> = pages.iter()
        .filter(|p| url::is_child_of(&p.url, page_url))
        .collect();

    children.sort_by_key(|p| p.order);
    children
}

/// The pages that share a parent with `page_url`, itself included, in
/// navigation order.
pub fn siblings<'a>(pages: &'a [PageRecord], page_url: &str) -> Vec<&'a PageRecord> {
    let mut siblings: Vec<_> = pages.iter()
        .filter(|p| url::same_parent(&p.url, page_url))
        .collect();

    siblings.sort_by(|a, b| nav_order(a, b));
    siblings
}

/// The neighbours of a page among its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PrevNext<'a> {
    pub prev: Option<&'a PageRecord>,
    pub next: Option<&'a PageRecord>,
}

/// Finds the pages before and after `page_url` among its siblings.
///
/// Either side is `None` at the edges of the group; both are `None` when no
/// page has the URL `page_url`.
///
/// ```rust
/// use folio::{prev_next, PageRecord};
///
/// let pages = [
///     PageRecord::new("/guides/a/", "A").with_order(1),
///     PageRecord::new("/guides/b/", "B").with_order(2),
///     PageRecord::new("/guides/c/", "C").with_order(3),
/// ];
///
/// let nav = prev_next(&pages, "/guides/b/");
/// assert_eq!(nav.prev.map(|p| &*p.title), Some("A"));
/// assert_eq!(nav.next.map(|p| &*p.title), Some("C"));
///
/// let nav = prev_next(&pages, "/guides/c/");
/// assert!(nav.next.is_none());
/// ```
pub fn prev_next<'a>(pages: &'a [PageRecord], page_url: &str) -> PrevNext<'a> {
    let siblings = siblings(pages, page_url);
    let Some(i) = siblings.iter().position(|p| &*p.url == page_url) else {
        return PrevNext::default();
    };

    PrevNext {
        prev: i.checked_sub(1).map(|j| siblings[j]),
        next: siblings.get(i + 1).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn titles(pages: &[&PageRecord]) -> Vec<String> {
        pages.iter().map(|p| p.title.to_string()).collect()
    }

    fn title(page: Option<&PageRecord>) -> Option<&str> {
        page.map(|p| &*p.title)
    }

    fn site() -> Vec<PageRecord> {
        vec![
            PageRecord::new("/", "Home"),
            PageRecord::new("/guides/", "Guides").with_order(1),
            PageRecord::new("/guides/install/", "Install").with_order(2),
            PageRecord::new("/guides/intro/", "Intro").with_order(1),
            PageRecord::new("/guides/setup/", "Setup").with_order(2),
            PageRecord::new("/guides/install/step-1/", "Step 1"),
            PageRecord::new("/guides/faq/", "FAQ"),
            PageRecord::new("/api/", "API").with_order(0),
        ]
    }

    #[test]
    fn children_excludes_deeper_descendants() {
        let pages = site();
        let children = children(&pages, "/guides/");
        assert_eq!(titles(&children), ["Intro", "Install", "Setup", "FAQ"]);
        assert!(children.iter().all(|p| url::depth(&p.url) == 2));
    }

    #[test]
    fn children_ties_keep_input_order() {
        let pages = vec![
            PageRecord::new("/g/z/", "Zulu").with_order(1),
            PageRecord::new("/g/a/", "Alpha").with_order(1),
        ];

        assert_eq!(titles(&children(&pages, "/g/")), ["Zulu", "Alpha"]);
    }

    #[test]
    fn children_of_root_are_top_level_pages() {
        let pages = site();
        assert_eq!(titles(&children(&pages, "/")), ["API", "Guides"]);
        assert!(children(&pages, "/guides/faq/").is_empty());
        assert_eq!(titles(&children(&pages, "/guides/install")), ["Step 1"]);
    }

    #[test]
    fn prev_next_walks_siblings_in_navigation_order() {
        let pages = site();

        let nav = prev_next(&pages, "/guides/intro/");
        assert_eq!(title(nav.prev), None);
        assert_eq!(title(nav.next), Some("Install"));

        let nav = prev_next(&pages, "/guides/setup/");
        assert_eq!(title(nav.prev), Some("Install"));
        assert_eq!(title(nav.next), Some("FAQ"));

        let nav = prev_next(&pages, "/guides/faq/");
        assert_eq!(title(nav.prev), Some("Setup"));
        assert_eq!(title(nav.next), None);
    }

    #[test]
    fn prev_next_is_antisymmetric() {
        let pages = site();
        for page in pages.iter().filter(|p| !p.is_root()) {
            let nav = prev_next(&pages, &page.url);
            if let Some(next) = nav.next {
                assert_eq!(prev_next(&pages, &next.url).prev, Some(page));
            }

            if let Some(prev) = nav.prev {
                assert_eq!(prev_next(&pages, &prev.url).next, Some(page));
            }
        }
    }

    #[test]
    fn prev_next_of_top_level_and_unknown_pages() {
        let pages = site();

        let nav = prev_next(&pages, "/api/");
        assert_eq!(title(nav.next), Some("Guides"));

        assert_eq!(prev_next(&pages, "/missing/"), PrevNext::default());
        assert_eq!(prev_next(&pages, "/"), PrevNext::default());

        let nav = prev_next(&pages, "/guides/install/step-1/");
        assert_eq!(nav, PrevNext::default());
    }
}
