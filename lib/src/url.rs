//! Helpers for the slash-separated page URLs sites hand us.
//!
//! Page URLs are absolute paths such as `/`, `/guides/` or
//! `/guides/install/`. Only their non-empty segments matter for structure:
//! `/guides/install/` and `/guides/install` name the same place.

/// The non-empty segments of `url`.
///
/// ```rust
/// use folio::url::segments;
///
/// assert_eq!(segments("/guides/install/").collect::<Vec<_>>(), ["guides", "install"]);
/// assert_eq!(segments("/").count(), 0);
/// ```
pub fn segments(url: &str) -> impl DoubleEndedIterator<Item = &str> + '_ {
    url.split('/').filter(|s| !s.is_empty())
}

/// The number of non-empty segments in `url`.
pub fn depth(url: &str) -> usize {
    segments(url).count()
}

/// The URL of the page directly above `url`, in directory form.
///
/// Returns `None` for the root and for top-level pages, whose parent would
/// be the root.
///
/// ```rust
/// use folio::url::parent;
///
/// assert_eq!(parent("/guides/install/").as_deref(), Some("/guides/"));
/// assert_eq!(parent("/a/b/c.html").as_deref(), Some("/a/b/"));
/// assert_eq!(parent("/guides/"), None);
/// assert_eq!(parent("/"), None);
/// ```
pub fn parent(url: &str) -> Option<String> {
    let segments: Vec<&str> = segments(url).collect();
    match segments.split_last() {
        Some((_, rest)) if !rest.is_empty() => Some(format!("/{}/", rest.join("/"))),
        _ => None,
    }
}

/// Whether `a` and `b` have the same segments except for the last one.
///
/// Both must have at least one segment.
pub(crate) fn same_parent(a: &str, b: &str) -> bool {
    let (mut a, mut b) = (segments(a), segments(b));
    let (Some(_), Some(_)) = (a.next_back(), b.next_back()) else {
        return false;
    };

    a.eq(b)
}

/// Whether `child` sits exactly one level below `url`.
///
/// ```rust
/// use folio::url::is_child_of;
///
/// assert!(is_child_of("/guides/install/", "/guides/"));
/// assert!(is_child_of("/guides/", "/"));
/// assert!(!is_child_of("/guides/install/step-1/", "/guides/"));
/// assert!(!is_child_of("/guides/", "/guides/"));
/// ```
pub fn is_child_of(child: &str, url: &str) -> bool {
    let mut child = segments(child);
    if child.next_back().is_none() {
        return false;
    }

    child.eq(segments(url))
}

/// The relative prefix that leads from the page at `url` back to the site
/// root: `.` at the root, `..` one directory down, `../..` two down, and so
/// on.
///
/// The count is taken from the separators after the leading one, so a
/// directory URL such as `/a/b/` and a file URL such as `/a/b/c.html` both
/// resolve to `../..`.
///
/// ```rust
/// use folio::url::root_prefix;
///
/// assert_eq!(root_prefix("/"), ".");
/// assert_eq!(root_prefix("/about.html"), ".");
/// assert_eq!(root_prefix("/guides/"), "..");
/// assert_eq!(root_prefix("/a/b/"), "../..");
/// assert_eq!(root_prefix("/a/b/c.html"), "../..");
/// ```
pub fn root_prefix(url: &str) -> String {
    let url = url.strip_prefix('/').unwrap_or(url);
    let ups = memchr::memchr_iter(b'/', url.as_bytes()).count();
    if ups == 0 {
        return ".".into();
    }

    let mut prefix = "../".repeat(ups);
    prefix.pop();
    prefix
}

/// Joins `url` onto `base`, making sure exactly one `/` separates them.
///
/// ```rust
/// use folio::url::absolute;
///
/// assert_eq!(absolute("https://docs.example.com", "guides/"), "https://docs.example.com/guides/");
/// assert_eq!(absolute("https://docs.example.com/", "/guides/"), "https://docs.example.com/guides/");
/// assert_eq!(absolute("", "/"), "/");
/// ```
pub fn absolute(base: &str, url: &str) -> String {
    let base = base.trim_end_matches('/');
    match url.starts_with('/') {
        true => format!("{base}{url}"),
        false => format!("{base}/{url}"),
    }
}
