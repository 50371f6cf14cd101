use std::str::FromStr;

use crate::dom::{Document, NodeId};
use crate::error::{WidgetError, WidgetResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub value: Option<String>,
}

/// One compound selector: `tag`, `#id`, `.class` and `[attr]`/`[attr=value]`
/// parts in any combination. Combinators and pseudo-classes are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl Selector {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(WidgetError::InvalidSelector("empty selector".to_owned()));
        }

        let mut selector = Self::default();
        let mut rest = input;

        let tag_len = rest
            .find(|c: char| !is_name_char(c))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let name_len = rest[1..]
                        .find(|c: char| !is_name_char(c))
                        .unwrap_or(rest.len() - 1);
                    if name_len == 0 {
                        return Err(invalid(input));
                    }
                    let name = rest[1..=name_len].to_owned();
                    if first == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &rest[1 + name_len..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(|| invalid(input))?;
                    selector
                        .attributes
                        .push(parse_attribute(&rest[1..close]).ok_or_else(|| invalid(input))?);
                    rest = &rest[close + 1..];
                }
                _ => return Err(invalid(input)),
            }
        }

        Ok(selector)
    }

    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if self
            .tag
            .as_deref()
            .is_some_and(|tag| !doc.tag(node).eq_ignore_ascii_case(tag))
        {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| doc.attribute(node, "id") != Some(id)) {
            return false;
        }
        if !self.classes.iter().all(|class| doc.has_class(node, class)) {
            return false;
        }
        self.attributes.iter().all(|attr| match &attr.value {
            None => doc.has_attribute(node, &attr.name),
            Some(expected) => doc.attribute(node, &attr.name) == Some(expected.as_str()),
        })
    }
}

impl FromStr for Selector {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_attribute(body: &str) -> Option<AttributeMatch> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_owned()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }
    Some(AttributeMatch {
        name: name.to_owned(),
        value,
    })
}

fn invalid(input: &str) -> WidgetError {
    WidgetError::InvalidSelector(input.to_owned())
}
