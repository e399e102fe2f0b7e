use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Chainable, Result};
use crate::markup::TocExtractor;
use crate::taxonomy::DEFAULT_ORDER;
use crate::value::{Format, Json, Toml, Value};

/// Site-wide settings.
///
/// Every field has a default. Unknown top-level keys are kept in
/// [`globals`](Settings::globals) and handed to templates as `G`.
///
/// ```rust
/// use folio::Settings;
///
/// let settings = Settings::from_toml(r#"
///     base_url = "https://docs.example.com"
///     capture_tags = ["script"]
///     product = "Acme"
///
///     [toc]
///     levels = [2]
/// "#).unwrap();
///
/// assert_eq!(settings.base_url, "https://docs.example.com");
/// assert_eq!(settings.default_order, 999);
/// assert_eq!(settings.toc.levels, [2]);
/// assert_eq!(settings.toc.exclude_marker, "EXAMPLE");
/// assert!(settings.globals.contains_key("product"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub default_order: i64,
    pub capture_tags: Vec<String>,
    pub toc: TocSettings,
    #[serde(flatten)]
    pub globals: FxHashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocSettings {
    pub levels: Vec<u8>,
    pub exclude_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: String::new(),
            default_order: DEFAULT_ORDER,
            capture_tags: vec!["script".into(), "modal".into()],
            toc: TocSettings::default(),
            globals: FxHashMap::default(),
        }
    }
}

impl Default for TocSettings {
    fn default() -> Self {
        TocSettings { levels: vec![2, 3], exclude_marker: "EXAMPLE".into() }
    }
}

impl Settings {
    pub fn from_toml(input: &str) -> Result<Self> {
        Self::read::<Toml>(input)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Self::read::<Json>(input)
    }

    pub fn read<F: Format>(input: &str) -> Result<Self> {
        let settings: Settings = F::read(input).chain("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if let Some(tag) = self.capture_tags.iter().find(|t| !is_tag_name(t)) {
            return err!("invalid capture tag", "tag" => tag, "expected" => "[a-z0-9_]+");
        }

        if let Some(level) = self.toc.levels.iter().find(|l| !(1..=6).contains(*l)) {
            return err!("invalid toc level", "level" => level, "expected" => "1 to 6");
        }

        Ok(())
    }

    pub fn toc_extractor(&self) -> Result<TocExtractor> {
        TocExtractor::new(&self.toc.levels, &self.toc.exclude_marker)
    }
}

fn is_tag_name(tag: &str) -> bool {
    !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}
