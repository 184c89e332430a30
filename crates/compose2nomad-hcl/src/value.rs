//! Attribute values and their HCL literal syntax.

use std::fmt::{self, Write as _};

/// An HCL attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A quoted string literal.
    String(String),
    /// An integer literal.
    Number(i64),
    /// `true` or `false`.
    Bool(bool),
    /// A tuple literal written on one line.
    List(Vec<Value>),
    /// An object literal, one `key = value` element per line.
    ///
    /// Keys that are not identifiers are quoted, which object elements
    /// allow and block attributes do not.
    Object(Vec<(String, Value)>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Self::String).collect())
    }
}

impl From<&[String]> for Value {
    fn from(items: &[String]) -> Self {
        Self::List(items.iter().cloned().map(Self::String).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Self::Object(entries) if entries.is_empty() => f.write_str("{}"),
            Self::Object(entries) => {
                f.write_str("{\n")?;
                for (key, value) in entries {
                    writeln!(f, "{} = {value}", attribute_key(key))?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Escapes text for use inside a quoted HCL string.
///
/// Template introducers are doubled (`${` becomes `$${`, `%{` becomes
/// `%%{`) so the value is taken literally.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Returns true if `name` can be written as a bare HCL identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns `name` bare when it is an identifier, quoted otherwise.
///
/// Only object keys may be quoted; block attribute names must pass
/// [`is_identifier`].
#[must_use]
pub fn attribute_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_owned()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_list_renders_on_one_line() {
        let v = Value::from(vec!["--port".to_owned(), "3000".to_owned()]);
        assert_eq!(v.to_string(), r#"["--port", "3000"]"#);
    }

    #[test]
    fn empty_list_renders_as_brackets() {
        assert_eq!(Value::List(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn scalars_render_as_literals() {
        assert_eq!(Value::from(8080_u16).to_string(), "8080");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from("15s").to_string(), "\"15s\"");
    }

    #[test]
    fn object_quotes_non_identifier_keys() {
        let v = Value::Object(vec![
            ("X".into(), Value::from("1")),
            ("spring.profiles.active".into(), Value::from("dev")),
        ]);
        assert_eq!(
            v.to_string(),
            "{\nX = \"1\"\n\"spring.profiles.active\" = \"dev\"\n}"
        );
        assert_eq!(Value::Object(Vec::new()).to_string(), "{}");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(escape_string(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }

    #[test]
    fn template_sequences_are_doubled() {
        assert_eq!(escape_string("${HOME}/%{x}"), "$${HOME}/%%{x}");
        assert_eq!(escape_string("cost: $5 or 10%"), "cost: $5 or 10%");
    }

    #[test]
    fn newlines_are_escaped() {
        assert_eq!(escape_string("a\nb\tc"), "a\\nb\\tc");
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("NGINX_HOST"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("read-only"));
        assert!(!is_identifier("1ST"));
        assert!(!is_identifier("my.var"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn non_identifier_keys_are_quoted() {
        assert_eq!(attribute_key("PATH"), "PATH");
        assert_eq!(attribute_key("spring.profile"), "\"spring.profile\"");
    }
}
