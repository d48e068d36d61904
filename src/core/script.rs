//! Object-literal writer for values embedded in the generated script.
//!
//! `to_literal` produces a JavaScript object literal: keys that are valid
//! identifiers are written bare and [`ScriptValue::Raw`] is emitted verbatim,
//! so callable values stay code. Plain data such as the language trees goes
//! through `serde_json` and [`escape_script_data`] instead.
//! Strings never contain a raw `<`, so they cannot close or re-open the
//! surrounding `<script>`.

use regex::Regex;
use std::fmt::Write as _;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Array(Vec<ScriptValue>),
    Object(ScriptObject),
    /// JavaScript source, e.g. a function expression.
    Raw(String),
}

/// Insertion-ordered object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptObject {
    entries: Vec<(String, ScriptValue)>,
}

impl ScriptObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ScriptValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Re-inserting a key replaces the value but keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ScriptValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<ScriptObject> for ScriptValue {
    fn from(value: ScriptObject) -> Self {
        ScriptValue::Object(value)
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> Self {
        ScriptValue::Bool(value)
    }
}

impl From<i64> for ScriptValue {
    fn from(value: i64) -> Self {
        ScriptValue::Int(value)
    }
}

impl From<u32> for ScriptValue {
    fn from(value: u32) -> Self {
        ScriptValue::Int(i64::from(value))
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        ScriptValue::Str(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        ScriptValue::Str(value)
    }
}

impl From<Vec<ScriptValue>> for ScriptValue {
    fn from(value: Vec<ScriptValue>) -> Self {
        ScriptValue::Array(value)
    }
}

impl ScriptValue {
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            ScriptValue::Null => out.push_str("null"),
            ScriptValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            ScriptValue::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            ScriptValue::Str(s) => out.push_str(&quote(s)),
            ScriptValue::Raw(code) => out.push_str(code),
            ScriptValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write(out);
                }
                out.push(']');
            }
            ScriptValue::Object(object) => {
                out.push('{');
                for (i, (key, value)) in object.entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if is_identifier(key) {
                        out.push_str(key);
                    } else {
                        out.push_str(&quote(key));
                    }
                    out.push(':');
                    value.write(out);
                }
                out.push('}');
            }
        }
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

pub fn is_identifier(key: &str) -> bool {
    identifier_pattern().is_match(key)
}

/// JSON string literal that is also safe inside an inline `<script>`.
pub fn quote(s: &str) -> String {
    escape_script_data(&serde_json::Value::String(s.to_string()).to_string())
}

/// Makes serialized JSON safe to embed in an inline script.
///
/// `<` only occurs inside JSON strings, where `\u003c` is an equivalent escape.
/// Escaping every `<` covers `</script` in any case as well as `<!--`.
/// U+2028 and U+2029 are valid in JSON strings but not in older JS string literals.
pub fn escape_script_data(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Escapes text for a backtick template literal.
///
/// `<` is written as `\u003c`, which the literal reads back as `<`.
pub fn template_literal(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace('<', "\\u003c");
    format!("`{}`", escaped)
}

/// Member access path, using bracket notation for non-identifier segments.
pub fn property_path(root: &str, segments: &[&str]) -> String {
    let mut path = root.to_string();
    for segment in segments {
        if is_identifier(segment) {
            path.push('.');
            path.push_str(segment);
        } else {
            path.push('[');
            path.push_str(&quote(segment));
            path.push(']');
        }
    }
    path
}
