use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::{Dict, Value};

/// A well-known key in a page's data map, along with the type its value is
/// expected to have.
pub trait MetaKey: 'static {
    const KEY: &'static str;

    type Value: TryFrom<Value> + Into<Value> + fmt::Debug;
}

#[macro_export]
macro_rules! define_meta_key {
    ($($v:vis $T:ident : $key:literal => $V:ty),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            $v struct $T;

            impl $crate::MetaKey for $T {
                const KEY: &'static str = $key;
                type Value = $V;
            }
        )+
    }
}

define_meta_key! {
    pub Title : "title" => Arc<str>,
    pub Order : "order" => i64,
}

/// The free-form data attached to a page, typically its front matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    map: Arc<Dict>,
}

impl Metadata {
    #[inline(always)]
    pub fn new() -> Self {
        Metadata::default()
    }

    #[inline(always)]
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    #[inline(always)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Reads `K` from the map. `Some(Err(value))` means the key is present
    /// but holds a value of the wrong type.
    #[inline]
    pub fn get<K: MetaKey>(&self, _: K) -> Option<Result<K::Value, Value>> {
        let value = self.get_raw(K::KEY)?;
        Some(value.clone().try_into().map_err(|_| value.clone()))
    }

    #[inline(always)]
    pub fn contains<K: MetaKey>(&self, _: K) -> bool {
        self.contains_key(K::KEY)
    }

    pub fn as_dict(&self) -> &Dict {
        &self.map
    }
}

impl From<Dict> for Metadata {
    fn from(dict: Dict) -> Self {
        Metadata { map: Arc::new(dict) }
    }
}

impl From<Metadata> for Value {
    fn from(value: Metadata) -> Self {
        Value::Dict(value.map)
    }
}

impl fmt::Display for Metadata {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#?}", self.map)
    }
}
