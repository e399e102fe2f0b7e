use crate::error::{ErrorDetail, Result};

/// A textual data format that can be deserialized with serde.
pub trait Format: Sized {
    /// A short name for the format, used in error messages.
    const NAME: &'static str;

    /// The data format's error type.
    type Error: serde::de::Error + ErrorDetail + 'static;

    /// Parses `string` as the data format `Self` as a `T` or returns an error
    /// if the `string` is an invalid `T`. Not usually called directly; see
    /// [`Format::read()`].
    fn from_str<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    fn read<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
        Self::from_str(input).map_err(|e| error! {
            format!("failed to parse {} input", Self::NAME),
            e,
        })
    }
}

macro_rules! impl_format {
    ($name:ident ($fmt:literal) : $func:expr, $E:ty) => (
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl Format for $name {
            const NAME: &'static str = $fmt;

            type Error = $E;

            fn from_str<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    );
}

impl_format!(Toml("TOML"): toml::from_str, toml::de::Error);
impl_format!(Json("JSON"): serde_json::from_str, serde_json::error::Error);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn json_reads_values() {
        let value: Value = Json::read(r#"{"title": "Intro", "order": 2, "tags": ["a"]}"#).unwrap();
        assert_eq!(value.get("title").and_then(Value::as_str), Some("Intro"));
        assert_eq!(value.get("order").cloned().map(i64::try_from), Some(Ok(2)));
        assert_eq!(value.get("tags").map(Value::size), Some(1));
    }

    #[test]
    fn toml_errors_name_the_format() {
        let error = Toml::read::<Value>("title = ").unwrap_err();
        assert!(error.to_string().starts_with("failed to parse TOML input"));
    }
}
