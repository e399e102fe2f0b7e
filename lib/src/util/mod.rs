mod macros;

pub use macros::*;

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Removes every `<...>` tag from `html`, leaving the text between tags.
///
/// ```rust
/// use folio::util::strip_tags;
///
/// assert_eq!(strip_tags("<em>Getting</em> started"), "Getting started");
/// assert_eq!(strip_tags("a < b"), "a < b");
/// ```
pub fn strip_tags(html: &str) -> std::borrow::Cow<'_, str> {
    if memchr::memchr(b'<', html.as_bytes()).is_none() {
        return html.into();
    }

    TAG.replace_all(html, "")
}

/// Derives an HTML id from heading text.
///
/// Tags are stripped, whitespace becomes `-`, anything that isn't an ASCII
/// word character or `-` is dropped, runs of `-` collapse into one, leading
/// and trailing `-` are trimmed, and the result is lowercased. Ids may not
/// begin with a digit, so such slugs are prefixed with `h`.
///
/// Identical texts produce identical ids: no counter is appended.
///
/// ```rust
/// use folio::util::slugify;
///
/// assert_eq!(slugify("1 Getting Started"), "h1-getting-started");
/// assert_eq!(slugify("<code>size</code> &amp; <em>first</em>"), "size-amp-first");
/// ```
pub fn slugify(text: &str) -> String {
    let text = strip_tags(text);
    let mut slug = String::with_capacity(text.len());

    for ch in text.chars() {
        let ch = match ch {
            c if c.is_whitespace() => '-',
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => c.to_ascii_lowercase(),
            _ => continue,
        };

        if ch == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }

        slug.push(ch);
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        slug.insert(0, 'h');
    }

    slug
}

/// Returns `true` if `input` is likely to contain a template.
pub fn is_template(input: &str) -> bool {
    let mut slice = input.as_bytes();
    while let Some(i) = memchr::memchr(b'{', slice) {
        match slice.get(i + 1) {
            Some(b'{') | Some(b'%') => return true,
            Some(_) => slice = &slice[(i + 1)..],
            None => return false,
        }
    }

    false
}
