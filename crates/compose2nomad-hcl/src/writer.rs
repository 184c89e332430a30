//! Raw serialization of a [`Body`] to HCL text.
//!
//! The output is structurally complete but unaligned; run it through
//! [`crate::format::format`] for the canonical layout.

use std::fmt::Write as _;

use crate::body::{Body, Item};
use crate::value::{attribute_key, escape_string};

const INDENT: &str = "  ";

/// Serializes a body as a top-level HCL file.
#[must_use]
pub fn write_body(body: &Body) -> String {
    let mut out = String::new();
    write_items(body, 0, &mut out);
    out
}

fn write_items(body: &Body, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for item in body.items() {
        match item {
            Item::Attribute(attr) => {
                let _ = writeln!(out, "{indent}{} = {}", attribute_key(&attr.name), attr.value);
            }
            Item::Block(block) => {
                out.push_str(&indent);
                out.push_str(&block.kind);
                for label in &block.labels {
                    let _ = write!(out, " \"{}\"", escape_string(label));
                }
                out.push_str(" {\n");
                write_items(&block.body, depth + 1, out);
                out.push_str(&indent);
                out.push_str("}\n");
            }
            Item::Comment(text) => {
                let single_line = text.replace(['\r', '\n'], " ");
                let _ = writeln!(out, "{indent}# {single_line}");
            }
            Item::Blank => out.push('\n'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn nested_blocks_are_indented() {
        let mut body = Body::new();
        let _ = body.append_block("job", &["demo"], |job| {
            let _ = job
                .set_attribute("type", "service")
                .append_block("group", &["web"], |group| {
                    let _ = group.set_attribute("count", 2_i64);
                });
        });

        let text = write_body(&body);
        assert_eq!(
            text,
            "job \"demo\" {\n  type = \"service\"\n  group \"web\" {\n    count = 2\n  }\n}\n"
        );
    }

    #[test]
    fn object_attribute_spans_lines() {
        let mut body = Body::new();
        let _ = body.set_attribute(
            "env",
            Value::Object(vec![("a.b".into(), Value::from("1"))]),
        );
        assert_eq!(write_body(&body), "env = {\n\"a.b\" = \"1\"\n}\n");
    }

    #[test]
    fn comments_are_single_line() {
        let mut body = Body::new();
        let _ = body.append_comment("first\nsecond");
        assert_eq!(write_body(&body), "# first second\n");
    }

    #[test]
    fn labels_are_escaped() {
        let mut body = Body::new();
        let _ = body.append_block("port", &["a\"b"], |_| {});
        assert_eq!(write_body(&body), "port \"a\\\"b\" {\n}\n");
    }
}
