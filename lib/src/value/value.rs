use std::sync::Arc;
use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

pub type Dict<K = Arc<str>, V = Value> = BTreeMap<K, V>;

/// Represents any valid value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Num(Num),
    Float(f64),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Arc<Dict>),
}

impl Value {
    pub fn to_null(&self) -> Option<()> {
        match self {
            Value::Null => Some(()),
            _ => None
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn to_num(&self) -> Option<Num> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None
        }
    }

    pub fn into_str(self) -> Result<Arc<str>, Value> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(v) => Some(v),
            _ => None
        }
    }

    pub fn into_dict(self) -> Result<Arc<Dict>, Value> {
        match self {
            Value::Dict(v) => Ok(v),
            _ => Err(self)
        }
    }

    /// Looks up `key` when `self` is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Number of entries in a sequence or mapping, characters in a string,
    /// `0` for everything else.
    ///
    /// ```rust
    /// use folio::value::Value;
    ///
    /// let array = Value::from(vec!["a", "b", "c"]);
    /// assert_eq!(array.size(), 3);
    ///
    /// let dict = Value::from(folio::dict!["x" => 1, "y" => 2]);
    /// assert_eq!(dict.size(), 2);
    ///
    /// assert_eq!(Value::from("four").size(), 4);
    /// assert_eq!(Value::Null.size(), 0);
    /// ```
    pub fn size(&self) -> usize {
        match self {
            Value::Array(v) => v.len(),
            Value::Dict(d) => d.len(),
            Value::String(s) => s.chars().count(),
            Value::Null | Value::Bool(_) | Value::Num(_) | Value::Float(_) => 0,
        }
    }

    /// The first element of a sequence, the value of the first key of a
    /// mapping, or the first character of a string.
    ///
    /// Mappings are ordered by key, so "first" is the smallest key.
    ///
    /// ```rust
    /// use folio::value::Value;
    ///
    /// let array = Value::from(vec![3, 1, 2]);
    /// assert_eq!(array.first(), Some(Value::from(3)));
    ///
    /// let dict = Value::from(folio::dict!["b" => "second", "a" => "first"]);
    /// assert_eq!(dict.first(), Some(Value::from("first")));
    ///
    /// assert_eq!(Value::from("xyz").first(), Some(Value::from("x")));
    /// assert_eq!(Value::from(Vec::<Value>::new()).first(), None);
    /// ```
    pub fn first(&self) -> Option<Value> {
        match self {
            Value::Array(v) => v.first().cloned(),
            Value::Dict(d) => d.values().next().cloned(),
            Value::String(s) => s.chars().next().map(|c| Value::from(c.to_string())),
            Value::Null | Value::Bool(_) | Value::Num(_) | Value::Float(_) => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($T:ty),+ => $E:ident::$kind:ident) => {
        $(
            impl From<$T> for $E {
                fn from(value: $T) -> Self {
                    $E::$kind(value.into())
                }
            }
        )+
    };
}

impl_from_primitive!(bool => Value::Bool);
impl_from_primitive!(f32, f64 => Value::Float);
impl_from_primitive!(&str => Value::String);
impl_from_primitive!(std::borrow::Cow<'_, str> => Value::String);
impl_from_primitive!(String => Value::String);
impl_from_primitive!(Arc<str> => Value::String);
impl_from_primitive!(Arc<Vec<Value>> => Value::Array);
impl_from_primitive!(Arc<Dict> => Value::Dict);
impl_from_primitive!(u8, u16, u32, u64, usize => Value::Num);
impl_from_primitive!(i8, i16, i32, i64, isize => Value::Num);

impl From<()> for Value  {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T> From<Option<T>> for Value where Value: From<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Value::from).unwrap_or(Value::Null)
    }
}

impl<T> From<Vec<T>> for Value where Value: From<T> {
    fn from(value: Vec<T>) -> Self {
        value.into_iter()
            .map(Value::from)
            .collect()
    }
}

impl<K, V> From<Dict<K, V>> for Value where Arc<str>: From<K>, Value: From<V> {
    fn from(value: Dict<K, V>) -> Self {
        let dict = value.into_iter()
            .map(|(k, v)| (<Arc::<str>>::from(k), Value::from(v)))
            .collect::<Dict>();

        Value::Dict(Arc::new(dict))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let vec = iter.into_iter().collect::<Vec<Value>>();
        Value::Array(Arc::new(vec))
    }
}

/// A signed or unsigned integer.
///
/// Deserialization picks the first variant that fits, so non-negative
/// numbers land in `U64` and negative ones in `I64`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Num {
    U64(u64),
    I64(i64),
}

impl Num {
    /// The value as an `i64`, if it fits.
    pub fn to_i64(self) -> Option<i64> {
        match self {
            Num::U64(v) => i64::try_from(v).ok(),
            Num::I64(v) => Some(v),
        }
    }

    fn to_i128(self) -> i128 {
        match self {
            Num::U64(v) => v as i128,
            Num::I64(v) => v as i128,
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.to_i128() == other.to_i128()
    }
}

impl Eq for Num { }

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Num {
    /// ```rust
    /// use folio::value::Num;
    ///
    /// assert!(Num::from(-1i8) < Num::from(0u8));
    /// assert!(Num::from(-0i8) == Num::from(0u8));
    /// assert!(Num::from(10i32) == Num::from(10u64));
    /// assert!(Num::from(5u32) > Num::from(-1i64));
    /// ```
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_i128().cmp(&other.to_i128())
    }
}

macro_rules! impl_from_for_num_value {
    ($($T:ty: $V:ident),* $(,)?) => ($(
        impl From<$T> for Num {
            fn from(value: $T) -> Num {
                Num::$V(value.into())
            }
        }
    )*)
}

impl_from_for_num_value! {
    u8: U64, u16: U64, u32: U64, u64: U64,
    i8: I64, i16: I64, i32: I64, i64: I64,
}

impl From<usize> for Num {
    fn from(value: usize) -> Num {
        Num::U64(value as u64)
    }
}

impl From<isize> for Num {
    fn from(value: isize) -> Num {
        Num::I64(value as i64)
    }
}

macro_rules! impl_try_from_value {
    ($($T:ty),+ => | $v:ident | $e:expr) => {
        $(
            impl TryFrom<$crate::value::Value> for $T {
                type Error = Value;

                fn try_from($v: $crate::value::Value) -> Result<Self, Self::Error> {
                    (|| $e)()
                }
            }
        )+
    };
}

impl_try_from_value!(() => |v| v.to_null().ok_or(v));
impl_try_from_value!(bool => |v| v.to_bool().ok_or(v));
impl_try_from_value!(Arc<str> => |v| v.into_str());
impl_try_from_value!(Arc<Dict> => |v| v.into_dict());
impl_try_from_value!(Num => |v| v.to_num().ok_or(v));
impl_try_from_value!(i64 => |v| v.to_num().and_then(Num::to_i64).ok_or(v));
