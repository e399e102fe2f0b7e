use std::sync::Arc;

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, State};

use crate::capture::CaptureStore;
use crate::config::Settings;
use crate::error::Result;
use crate::markup::{add_heading_ids, TocExtractor};
use crate::taxonomy::{self, sort_pages, PageRecord};
use crate::templating::ext::{self, deserialize, page_url};
use crate::templating::{Engine, EngineInit, RenderContext};

#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

fn pages_arg(pages: &Value) -> Result<Vec<PageRecord>, Error> {
    if pages.is_undefined() || pages.is_none() {
        return Ok(vec![]);
    }

    deserialize(pages, "a sequence of pages")
}

/// The identifier captures are filed under for the page being rendered.
fn current_page(state: &State) -> Result<String, Error> {
    let page = state.lookup("page")
        .filter(|v| !v.is_undefined())
        .ok_or_else(|| Error::new(
            ErrorKind::MissingArgument,
            "expected `page` in context but it wasn't found"
        ))?;

    let input_path = page.get_attr("input_path").ok()
        .and_then(|v| v.as_str().map(String::from));

    match input_path {
        Some(path) => Ok(path),
        None => page_url(&page),
    }
}

fn navigation(env: &mut Environment<'static>) {
    env.add_filter("tree", |pages: Value| -> Result<Value, Error> {
        let mut pages = pages_arg(&pages)?;
        sort_pages(&mut pages);
        Ok(Value::from_serializable(&taxonomy::build_tree(&pages)))
    });

    env.add_filter("children", |pages: Value, page: Value| -> Result<Value, Error> {
        let pages = pages_arg(&pages)?;
        let children = taxonomy::children(&pages, &page_url(&page)?);
        Ok(Value::from_serializable(&children))
    });

    env.add_filter("prev_next", |pages: Value, page: Value| -> Result<Value, Error> {
        let pages = pages_arg(&pages)?;
        let nav = taxonomy::prev_next(&pages, &page_url(&page)?);
        Ok(Value::from_serializable(&nav))
    });
}

fn markup(env: &mut Environment<'static>, toc: TocExtractor) {
    env.add_filter("headings_with_ids", |html: &str| {
        Value::from_safe_string(add_heading_ids(html).into_owned())
    });

    env.add_filter("toc", move |html: &str| Value::from_serializable(&toc.extract(html)));
}

fn captures(env: &mut Environment<'static>, tags: &[String], store: &Arc<CaptureStore>) {
    for tag in tags {
        let (filter_store, name) = (store.clone(), tag.clone());
        env.add_filter(format!("capture_{tag}"), move |state: &State, content: String, inline: Option<Value>| {
            if inline.map_or(false, |v| v.is_true()) {
                return Ok(Value::from_safe_string(content));
            }

            filter_store.capture(&name, &current_page(state)?, content);
            Ok::<_, Error>(Value::from(""))
        });

        let (emit_store, name) = (store.clone(), tag.clone());
        env.add_function(format!("{tag}s"), move |state: &State| {
            let page = current_page(state)?;
            Ok::<_, Error>(Value::from_safe_string(emit_store.emit(&name, &page)))
        });
    }
}

fn helpers(env: &mut Environment<'static>, base_url: String) {
    env.add_filter("relative", ext::relative);
    env.add_filter("escape_attribute", ext::escape_attribute);
    env.add_filter("contains", ext::contains);
    env.add_filter("concat_objects", ext::concat_objects);
    env.add_filter("replace_regex", ext::replace_regex);
    env.add_filter("timestamp_to_date", ext::timestamp_to_date);
    env.add_filter("split_to_n", ext::split_to_n);
    env.add_filter("format_number", ext::format_number);
    env.add_filter("first_letters", ext::first_letters);
    env.add_filter("uc_first", ext::uc_first);
    env.add_filter("size", ext::size);
    env.add_filter("first", ext::first);
    env.add_filter("timeago", ext::timeago);
    env.add_filter("milliseconds_to_minutes", ext::milliseconds_to_minutes);
    env.add_filter("miliseconds_to_minutes", ext::milliseconds_to_minutes);
    env.add_filter("remove_href", ext::remove_href);
    env.add_filter("remove_empty_lines", ext::remove_empty_lines);
    env.add_filter("callout", ext::callout);
    env.add_filter("scss_docs", ext::scss_docs);
    env.add_filter("absolute_url", move |url: &str| crate::url::absolute(&base_url, url));
    env.add_function("year", ext::year);
}

impl EngineInit for MiniJinjaEngine {
    type Engine = Self;

    fn init(settings: &Settings, captures: Arc<CaptureStore>) -> Result<Self::Engine> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_global("G", Value::from_serializable(&settings.globals));
        navigation(&mut env);
        markup(&mut env, settings.toc_extractor()?);
        self::captures(&mut env, &settings.capture_tags, &captures);
        helpers(&mut env, settings.base_url.clone());
        Ok(MiniJinjaEngine { env })
    }
}

impl Engine for MiniJinjaEngine {
    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        context: &RenderContext<'_>,
    ) -> Result<String> {
        let context = Value::from_serializable(context);
        let string = match name {
            Some(name) => self.env.render_named_str(name, template_str, context)?,
            None => self.env.render_str(template_str, context)?,
        };

        Ok(string)
    }
}

impl_error_detail_with_std_error!(minijinja::Error);

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn engine(settings: &Settings) -> (MiniJinjaEngine, Arc<CaptureStore>) {
        let store = Arc::new(CaptureStore::new());
        (MiniJinjaEngine::init(settings, store.clone()).unwrap(), store)
    }

    fn pages() -> Vec<PageRecord> {
        vec![
            PageRecord::new("/", "Home").with_input_path("index.md"),
            PageRecord::new("/guides/", "Guides").with_order(1),
            PageRecord::new("/guides/setup/", "Setup").with_order(2),
            PageRecord::new("/guides/intro/", "Intro").with_order(1),
            PageRecord::new("/guides/faq/", "FAQ"),
            PageRecord::new("/guides/intro/deep/", "Deep"),
            PageRecord::new("/api/", "API").with_order(0),
        ]
    }

    fn render(engine: &MiniJinjaEngine, page: &PageRecord, pages: &[PageRecord], tpl: &str) -> String {
        engine.render_str(None, tpl, &RenderContext::new(page, pages)).unwrap()
    }

    #[test]
    fn navigation_filters() {
        let (engine, _) = engine(&Settings::default());
        let pages = pages();

        let tpl = "{% for node in pages | tree %}{{ node.title }}({% for c in node.children %}{{ c.title }} {% endfor %}) {% endfor %}";
        assert_eq!(render(&engine, &pages[0], &pages, tpl), "API() Guides(Intro Setup FAQ ) ");

        let tpl = "{% for c in pages | children(page) %}{{ c.url }};{% endfor %}";
        assert_eq!(render(&engine, &pages[1], &pages, tpl), "/guides/intro/;/guides/setup/;/guides/faq/;");

        let tpl = "{% set nav = pages | prev_next(page) %}\
            {% if nav.prev %}{{ nav.prev.title }}{% else %}-{% endif %}|\
            {% if nav.next %}{{ nav.next.title }}{% else %}-{% endif %}";
        assert_eq!(render(&engine, &pages[2], &pages, tpl), "Intro|FAQ");
        assert_eq!(render(&engine, &pages[3], &pages, tpl), "-|Setup");
        assert_eq!(render(&engine, &pages[0], &pages, tpl), "-|-");

        let tpl = "{{ (pages | children('/guides/intro/'))[0].title }}";
        assert_eq!(render(&engine, &pages[0], &pages, tpl), "Deep");
    }

    #[test]
    fn markup_filters() {
        let (engine, _) = engine(&Settings::default());
        let page = PageRecord::new("/a/", "A")
            .with_content("<h2>Intro</h2><!--EXAMPLE--><h2>Demo</h2><!--/EXAMPLE--><h3>1 Setup</h3>");

        let tpl = "{% for h in page.content | toc %}{{ h.level }}:{{ h.id }} {% endfor %}";
        assert_eq!(render(&engine, &page, &[], tpl), "2:intro 3:h1-setup ");

        let tpl = "{{ '<h2>Getting Started</h2>' | headings_with_ids }}";
        assert_eq!(render(&engine, &page, &[], tpl), "<h2 id=\"getting-started\">Getting Started</h2>");
    }

    #[test]
    fn toc_follows_settings() {
        let settings = Settings::from_toml("[toc]\nlevels = [4]\nexclude_marker = \"\"").unwrap();
        let (engine, _) = engine(&settings);
        let page = PageRecord::new("/a/", "A");

        let tpl = "{{ '<h2>A</h2><!--EXAMPLE--><h4>B</h4><!--/EXAMPLE-->' | toc | map(attribute='text') | join(',') }}";
        assert_eq!(render(&engine, &page, &[], tpl), "B");
    }

    #[test]
    fn captures_are_emitted_per_page() {
        let (engine, store) = engine(&Settings::default());
        let pages = pages();

        let tpl = "{% filter capture_modal %}<div id=\"one\"></div>{% endfilter %}\
            {% filter capture_modal %}<div id=\"two\"></div>{% endfilter %}\
            {% filter capture_modal(true) %}<p>inline</p>{% endfilter %}|{{ modals() }}";

        assert_eq!(
            render(&engine, &pages[0], &pages, tpl),
            "<p>inline</p>|<!-- BEGIN PAGE MODALS -->\n<div id=\"one\"></div>\n<div id=\"two\"></div>\n<!-- END PAGE MODALS -->"
        );

        assert_eq!(render(&engine, &pages[0], &pages, "{{ modals() }}{{ scripts() }}"), "");

        render(&engine, &pages[1], &pages, "{% filter capture_script %}<script></script>{% endfilter %}");
        assert_eq!(store.emit("script", "/guides/"), "<!-- BEGIN PAGE SCRIPTS -->\n<script></script>\n<!-- END PAGE SCRIPTS -->");
        assert!(store.is_empty());
    }

    #[test]
    fn every_capture_tag_gets_a_filter_and_an_emitter() {
        let settings = Settings::from_json(r#"{"capture_tags": ["script", "modal", "style"]}"#).unwrap();
        let (engine, store) = engine(&settings);
        let page = PageRecord::new("/a/", "A");

        let tpl = "{% filter capture_style %}s{% endfilter %}\
            {% filter capture_script %}j{% endfilter %}\
            {% filter capture_modal %}m{% endfilter %}\
            {{ modals() }}|{{ scripts() }}";

        assert_eq!(
            render(&engine, &page, &[], tpl),
            "<!-- BEGIN PAGE MODALS -->\nm\n<!-- END PAGE MODALS -->|\
            <!-- BEGIN PAGE SCRIPTS -->\nj\n<!-- END PAGE SCRIPTS -->"
        );

        assert!(!store.is_empty());
        assert_eq!(render(&engine, &page, &[], "{{ styles() }}"), "<!-- BEGIN PAGE STYLES -->\ns\n<!-- END PAGE STYLES -->");
        assert!(store.is_empty());
    }

    #[test]
    fn output_is_never_escaped() {
        let (engine, _) = engine(&Settings::default());
        let page = PageRecord::new("/a/", "A");
        let context = RenderContext::new(&page, &[]);

        for name in ["guides/index.html", "layout", "notes.md"] {
            let html = engine.render_str(Some(name), "{{ '<b>&</b>' }}", &context).unwrap();
            assert_eq!(html, "<b>&</b>", "template: {name}");
        }
    }

    #[test]
    fn capture_tags_come_from_settings() {
        let settings = Settings::from_json(r#"{"capture_tags": ["style"]}"#).unwrap();
        let (engine, _) = engine(&settings);
        let page = PageRecord::new("/a/", "A");

        let tpl = "{% filter capture_style %}a{} {% endfilter %}{{ styles() }}";
        assert_eq!(render(&engine, &page, &[], tpl), "<!-- BEGIN PAGE STYLES -->\na{}\n<!-- END PAGE STYLES -->");

        let context = RenderContext::new(&page, &[]);
        assert!(engine.render_str(None, "{{ modals() }}", &context).is_err());
    }

    #[test]
    fn helper_filters() {
        let settings = Settings::from_toml("base_url = \"https://docs.example.com/\"\nproduct = \"Acme\"").unwrap();
        let (engine, _) = engine(&settings);
        let page = PageRecord::new("/guides/install/", "Install");

        let cases = [
            ("{{ page | relative }}", "../.."),
            ("{{ page.url | absolute_url }}", "https://docs.example.com/guides/install/"),
            ("{{ 'guides/' | absolute_url }}", "https://docs.example.com/guides/"),
            ("{{ ['a', 'b'] | contains('b') }}", "true"),
            ("{{ 'ab' | contains('b') }}", "false"),
            ("{{ ({'a': 1} | concat_objects({'b': 2})) | size }}", "2"),
            ("{{ [1, 2] | concat_objects({'b': 2}) | size }}", "2"),
            ("{{ {'b': 'x', 'a': 'y'} | first }}", "x"),
            ("{{ {} | first is none }}", "true"),
            ("{{ {'b': 1} | concat_objects({'a': 2, 'b': 3}) | join(',') }}", "b,a"),
            ("{{ {'b': 1} | concat_objects({'a': 2, 'b': 3}) | first }}", "3"),
            ("{{ [] | first is none }}", "true"),
            ("{{ 'hello' | size }}", "5"),
            ("{{ 1234567 | format_number }}", "1,234,567"),
            ("{{ 'open source' | uc_first }}", "Open source"),
            ("{{ 'open source' | first_letters }}", "os"),
            ("{{ 'a1b22' | replace_regex('[0-9]+', '#') }}", "a#b#"),
            ("{{ 225000 | milliseconds_to_minutes }}", "3:45"),
            ("{{ 0 | timestamp_to_date }}", "1970-01-01"),
            ("{{ G.product }}", "Acme"),
        ];

        for (tpl, expected) in cases {
            assert_eq!(render(&engine, &page, &[], tpl), expected, "template: {tpl}");
        }

        let year = render(&engine, &page, &[], "{{ year() }}");
        assert_eq!(year.len(), 4);
    }

    #[test]
    fn template_errors_are_reported() {
        let (engine, _) = engine(&Settings::default());
        let page = PageRecord::new("/a/", "A");
        let context = RenderContext::new(&page, &[]);

        let error = engine.render_str(Some("broken"), "{{ 'x' | replace_regex('(', '') }}", &context).unwrap_err();
        assert!(error.to_string().contains("invalid pattern"));

        assert!(engine.render_str(None, "{% if %}", &context).is_err());
    }
}
