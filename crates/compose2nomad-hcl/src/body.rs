//! Mutable HCL document tree.
//!
//! A [`Body`] is an ordered list of items. Attribute writes replace an
//! existing attribute of the same name in place, so a body can be filled
//! incrementally without reordering.

use crate::value::Value;

/// A named attribute (`name = value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name. Written bare when it is an identifier, quoted otherwise.
    pub name: String,
    /// Attribute value.
    pub value: Value,
}

/// A nested block (`kind "label" { ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Block type, such as `job` or `config`.
    pub kind: String,
    /// Quoted labels following the block type.
    pub labels: Vec<String>,
    /// Block contents.
    pub body: Body,
}

/// One entry of a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// An attribute.
    Attribute(Attribute),
    /// A nested block.
    Block(Block),
    /// A `#` line comment.
    Comment(String),
    /// An empty line.
    Blank,
}

/// Ordered contents of a file or block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    items: Vec<Item>,
}

impl Body {
    /// Creates an empty body.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the body's items in order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Sets an attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let existing = self.items.iter_mut().find_map(|item| match item {
            Item::Attribute(attr) if attr.name == name => Some(attr),
            _ => None,
        });
        match existing {
            Some(attr) => attr.value = value,
            None => self.items.push(Item::Attribute(Attribute {
                name: name.to_owned(),
                value,
            })),
        }
        self
    }

    /// Appends a block whose body is filled by `fill`.
    pub fn append_block(
        &mut self,
        kind: &str,
        labels: &[&str],
        fill: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let mut body = Self::new();
        fill(&mut body);
        self.items.push(Item::Block(Block {
            kind: kind.to_owned(),
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            body,
        }));
        self
    }

    /// Appends a `#` comment line.
    pub fn append_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.items.push(Item::Comment(text.into()));
        self
    }

    /// Appends an empty line.
    pub fn append_newline(&mut self) -> &mut Self {
        self.items.push(Item::Blank);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute<'a>(body: &'a Body, name: &str) -> Option<&'a Value> {
        body.items().iter().find_map(|item| match item {
            Item::Attribute(attr) if attr.name == name => Some(&attr.value),
            _ => None,
        })
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut body = Body::new();
        let _ = body.set_attribute("image", "nginx").set_attribute("count", 1_i64);
        let _ = body.set_attribute("image", "redis");
        assert_eq!(body.items().len(), 2);
        assert_eq!(attribute(&body, "image"), Some(&Value::from("redis")));
        assert!(matches!(&body.items()[0], Item::Attribute(a) if a.name == "image"));
    }

    #[test]
    fn append_block_fills_nested_body() {
        let mut body = Body::new();
        let _ = body.append_block("task", &["web"], |task| {
            let _ = task.set_attribute("driver", "docker");
        });
        let Some(Item::Block(task)) = body.items().first() else {
            panic!("expected a task block");
        };
        assert_eq!(task.kind, "task");
        assert_eq!(task.labels, vec!["web"]);
        assert_eq!(attribute(&task.body, "driver"), Some(&Value::from("docker")));
    }

    #[test]
    fn comments_and_blanks_keep_order() {
        let mut body = Body::new();
        let _ = body.append_comment("note").append_newline();
        assert_eq!(
            body.items(),
            &[Item::Comment("note".into()), Item::Blank]
        );
    }
}
