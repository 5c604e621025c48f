//! Structural Serializer
//!
//! Walks the winning container in document order and turns recognized
//! elements into [`Block`]s: headings, paragraphs, list items, quotes, code
//! and table rows. Recognized elements are consumed whole; anything else is
//! transparent and only its children are visited.

use serde::Serialize;

use crate::dom::{self, Document, NodeRef};
use crate::strategy::Container;

/// One rendered unit of body content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// `index` is the 1-based position among the items of its list.
    ListItem { ordered: bool, index: usize, text: String },
    Quote { text: String },
    /// Verbatim text; only leading and trailing newlines are trimmed.
    Code { text: String },
    TableRow { cells: Vec<String> },
}

impl Block {
    /// Plain-text rendering of the block. Code blocks span several lines.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } => text.clone(),
            Self::ListItem { ordered: false, text, .. } => format!("- {text}"),
            Self::ListItem { ordered: true, index, text } => format!("{index}. {text}"),
            Self::Quote { text } => format!("> {text}"),
            Self::Code { text } => format!("```\n{text}\n```"),
            Self::TableRow { cells } => cells.join(" | "),
        }
    }
}

/// Blocks of a container plus the heading texts met along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Serialized {
    pub blocks: Vec<Block>,
    pub headings: Vec<String>,
}

impl Serialized {
    fn push(&mut self, block: Block) {
        if let Block::Heading { text, .. } = &block {
            self.headings.push(text.clone());
        }
        self.blocks.push(block);
    }
}

/// Serialize a container into blocks, in document order.
#[must_use]
pub fn serialize(container: &Container) -> Serialized {
    let mut out = Serialized::default();
    for root in container.root().nodes() {
        walk(root, &mut out);
    }
    out
}

/// Title of a page: its `<title>`, or the first `<h1>` when that is empty.
#[must_use]
pub fn page_title(doc: &Document) -> String {
    let title = dom::selection_text(&doc.select("title"));
    if !title.is_empty() {
        return title;
    }
    dom::selection_text(&doc.select("h1"))
}

fn walk(node: &NodeRef, out: &mut Serialized) {
    for child in node.children() {
        let Some(tag) = dom::node_tag(&child) else {
            continue;
        };
        match tag.as_str() {
            "h2" | "h3" | "h4" | "h5" => {
                let level = tag[1..].parse().unwrap_or(2);
                let text = dom::normalized_text(&child);
                if !text.is_empty() {
                    out.push(Block::Heading { level, text });
                }
            }
            "p" => {
                let text = dom::normalized_text(&child);
                if !text.is_empty() {
                    out.push(Block::Paragraph { text });
                }
            }
            "ul" | "ol" => list(&child, tag == "ol", out),
            "blockquote" => {
                let text = dom::normalized_text(&child);
                if !text.is_empty() {
                    out.push(Block::Quote { text });
                }
            }
            "pre" | "code" => code(&child, out),
            "table" => table(&child, out),
            _ => walk(&child, out),
        }
    }
}

fn is_list(tag: &str) -> bool {
    tag == "ul" || tag == "ol"
}

fn list(node: &NodeRef, ordered: bool, out: &mut Serialized) {
    let mut index = 0;
    for child in node.children() {
        let Some(tag) = dom::node_tag(&child) else {
            continue;
        };
        if tag == "li" {
            index += 1;
            let text = dom::normalized_text_excluding(&child, is_list);
            if !text.is_empty() {
                out.push(Block::ListItem { ordered, index, text });
            }
            nested_lists(&child, out);
        } else if is_list(&tag) {
            list(&child, tag == "ol", out);
        }
    }
}

/// Serialize lists nested anywhere inside a list item, after the item itself.
fn nested_lists(node: &NodeRef, out: &mut Serialized) {
    for child in node.children() {
        match dom::node_tag(&child).as_deref() {
            Some(tag) if is_list(tag) => list(&child, tag == "ol", out),
            Some(_) => nested_lists(&child, out),
            None => {}
        }
    }
}

fn code(node: &NodeRef, out: &mut Serialized) {
    let raw = node.text();
    let text = raw.trim_matches(|c| c == '\n' || c == '\r');
    if !text.trim().is_empty() {
        out.push(Block::Code { text: text.to_string() });
    }
}

/// Nearest `table` ancestor of a row.
fn owning_table<'a>(row: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut current = row.parent();
    while let Some(parent) = current {
        if dom::node_tag(&parent).as_deref() == Some("table") {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

fn table(node: &NodeRef, out: &mut Serialized) {
    let rows: Vec<NodeRef> = node
        .descendants()
        .into_iter()
        .filter(|n| dom::node_tag(n).as_deref() == Some("tr"))
        .filter(|row| owning_table(row).is_some_and(|t| t.id == node.id))
        .collect();

    for row in rows {
        let cells: Vec<String> = row
            .children()
            .iter()
            .filter(|cell| matches!(dom::node_tag(cell).as_deref(), Some("th" | "td")))
            .map(dom::normalized_text)
            .collect();
        if cells.iter().any(|c| !c.is_empty()) {
            out.push(Block::TableRow { cells });
        }
    }
}
