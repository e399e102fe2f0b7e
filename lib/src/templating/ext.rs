//! General-purpose filters and functions for documentation templates.

use std::fmt::Display;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use minijinja::value::{Value, ValueKind};
use minijinja::{Error, ErrorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::value;

pub(crate) fn invalid(message: impl Display) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.to_string())
}

/// Converts a template value into `T` through its serialized form.
pub(crate) fn deserialize<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, Error> {
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| invalid(format!("expected {what}, found {}: {e}", value.kind())))
}

/// The URL of `page`, which may be a page object or a URL string.
pub(crate) fn page_url(page: &Value) -> Result<String, Error> {
    if let Some(url) = page.as_str() {
        return Ok(url.into());
    }

    page.get_attr("url").ok()
        .and_then(|v| v.as_str().map(String::from))
        .ok_or_else(|| Error::new(
            ErrorKind::MissingArgument,
            format!("expected a page or a url, found {}", page.kind())
        ))
}

pub fn relative(page: Value) -> Result<String, Error> {
    Ok(crate::url::root_prefix(&page_url(&page)?))
}

pub fn escape_attribute(text: &str) -> Value {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                escaped.push_str("&#13;");
            }
            '\r' | '\n' => escaped.push_str("&#13;"),
            c => escaped.push(c),
        }
    }

    Value::from_safe_string(escaped)
}

pub fn contains(items: Value, item: Value) -> Result<bool, Error> {
    if items.kind() != ValueKind::Seq {
        return Ok(false);
    }

    Ok(items.try_iter()?.any(|v| v == item))
}

pub fn concat_objects(object: Value, other: Value) -> Result<Value, Error> {
    if object.kind() != ValueKind::Map || other.kind() != ValueKind::Map {
        return Ok(object);
    }

    // Keys keep their first position; later values win.
    let mut entries = vec![];
    for map in [&object, &other] {
        for key in map.try_iter()? {
            let value = map.get_item(&key)?;
            entries.push((key, value));
        }
    }

    Ok(entries.into_iter().collect())
}

pub fn replace_regex(input: &str, pattern: &str, replacement: &str) -> Result<String, Error> {
    let regex = Regex::new(&format!("(?m){pattern}"))
        .map_err(|e| invalid(format!("invalid pattern {pattern:?}: {e}")))?;

    Ok(regex.replace_all(input, replacement).into_owned())
}

fn parse_datetime(value: &Value) -> Result<DateTime<Utc>, Error> {
    if let Ok(ts) = i64::try_from(value.clone()) {
        return DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| invalid(format!("timestamp {ts} is out of range")));
    }

    let string = value.as_str()
        .ok_or_else(|| invalid(format!("expected a timestamp or a date, found {}", value.kind())))?;

    string.parse::<DateTime<Utc>>()
        .or_else(|_| string.parse::<NaiveDateTime>().map(|dt| dt.and_utc()))
        .or_else(|_| string.parse::<NaiveDate>().map(|d| d.and_time(Default::default()).and_utc()))
        .map_err(|e| invalid(format!("failed to parse {string}: {e}")))
}

/// `1700000000` → `2023-11-14`.
pub fn timestamp_to_date(timestamp: Value) -> Result<String, Error> {
    Ok(parse_datetime(&timestamp)?.format("%Y-%m-%d").to_string())
}

pub fn split_to_n(items: Value, n: usize) -> Result<Value, Error> {
    let items: Vec<Value> = items.try_iter()?.collect();
    let chunk = match n {
        0 => items.len(),
        n => (items.len() as f64 / n as f64).round() as usize,
    };

    Ok(items.chunks(chunk.max(1)).map(|c| Value::from(c.to_vec())).collect())
}

/// Groups the integer digits of `value` in threes: `1234567.5` becomes
/// `1,234,567.5`.
pub fn format_number(value: Value) -> String {
    let string = value.to_string();
    let (sign, rest) = match string.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", &*string),
    };

    let (int, frac) = rest.split_at(rest.find('.').unwrap_or(rest.len()));
    let mut grouped = String::with_capacity(string.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(c);
    }

    format!("{sign}{grouped}{frac}")
}

pub fn first_letters(value: Option<&str>) -> String {
    value.unwrap_or_default()
        .split(' ')
        .filter_map(|word| word.chars().next())
        .collect()
}

pub fn uc_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn size(value: Value) -> Result<usize, Error> {
    if value.is_undefined() {
        return Ok(0);
    }

    Ok(deserialize::<value::Value>(&value, "a value")?.size())
}

/// Mappings keep their insertion order here, so the first key is the one
/// written first rather than the smallest.
pub fn first(value: Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(Value::from(()));
    }

    if value.kind() == ValueKind::Map {
        return match value.try_iter()?.next() {
            Some(key) => value.get_item(&key),
            None => Ok(Value::from(())),
        };
    }

    let first = deserialize::<value::Value>(&value, "a value")?.first();
    Ok(first.map_or(Value::from(()), |v| Value::from_serializable(&v)))
}

/// How long ago `date` was. Numbers are taken to be a number of seconds.
pub fn timeago(date: Value) -> Result<String, Error> {
    let seconds = match date.kind() {
        ValueKind::Number => i64::try_from(date.clone())
            .or_else(|_| f64::try_from(date).map(|f| f.floor() as i64))?,
        _ => (Utc::now() - parse_datetime(&date)?).num_seconds(),
    };

    Ok(ago(seconds))
}

fn ago(seconds: i64) -> String {
    const UNITS: [(&str, i64); 6] = [
        ("year", 31_536_000),
        ("month", 2_592_000),
        ("day", 86_400),
        ("hour", 3_600),
        ("minute", 60),
        ("second", 1),
    ];

    for (unit, length) in UNITS {
        let n = seconds / length;
        if n >= 1 {
            let plural = if n > 1 { "s" } else { "" };
            return format!("{n} {unit}{plural} ago");
        }
    }

    "now".into()
}

/// `225000` → `3:45`.
pub fn milliseconds_to_minutes(ms: f64) -> String {
    let total = (ms / 1000.0).round() as i64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn remove_href(content: &str) -> Value {
    Value::from_safe_string(content.replace("href=\"#\"", "href=\"javascript:void(0)\""))
}

pub fn remove_empty_lines(content: Option<&str>) -> Value {
    let lines: Vec<&str> = content.unwrap_or_default()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    Value::from_safe_string(lines.join("\n"))
}

pub fn callout(content: Option<&str>) -> Value {
    match content {
        Some(content) if !content.is_empty() => {
            Value::from_safe_string(format!("<div class=\"callout\">\n{content}\n</div>"))
        }
        _ => Value::from_safe_string(String::new()),
    }
}

/// The `name` block of an SCSS source, between `// scss-docs-start name`
/// and `// scss-docs-end`, dedented and fenced as a code block.
pub fn scss_docs(source: &str, name: &str) -> Result<Value, Error> {
    static LEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").unwrap());

    let pattern = format!(r"(?s)//\sscss-docs-start\s{}\n(.+?)//\sscss-docs-end", regex::escape(name));
    let regex = Regex::new(&pattern).map_err(invalid)?;
    let Some(block) = regex.captures(source).and_then(|c| c.get(1)) else {
        return Ok(Value::from(""));
    };

    let lines: Vec<&str> = block.as_str().split('\n').collect();
    let indent = lines.iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| LEADING.find(line).map(|m| m.len()))
        .min()
        .unwrap_or(0);

    let body: Vec<&str> = lines.iter()
        .map(|&line| match line.get(..indent) {
            Some(prefix) if prefix.bytes().all(|b| b == b' ') => &line[indent..],
            _ => line,
        })
        .collect();

    let body = body.join("\n");
    Ok(Value::from_safe_string(format!("\n```scss\n{}\n```\n", body.trim_end())))
}

pub fn year() -> String {
    Utc::now().year().to_string()
}
