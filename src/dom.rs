//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by every stage of the
//! pipeline: parsing, cloning, tag and attribute access, and whitespace-aware
//! text collection.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

/// Elements whose boundaries separate words when text is collected.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "ul",
];

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Deep copy of a document. Mutating the copy never touches the original.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

// === Tag/Node Information ===

/// Get tag name (lowercase) of the first node in the selection
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes().first().and_then(node_tag)
}

/// Get tag name (lowercase) of a node, `None` for non-elements
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get all attributes of a node as (name, value) pairs
#[must_use]
pub fn node_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

// === Text Content ===

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

/// Collapse every run of whitespace to one space and trim the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text of a node.
///
/// Block-level element boundaries and `<br>` separate words, so
/// `<td><p>a</p><p>b</p></td>` yields `"a b"` while inline markup such as
/// `foo<b>bar</b>` stays glued together.
#[must_use]
pub fn normalized_text(node: &NodeRef) -> String {
    normalized_text_excluding(node, |_| false)
}

/// Like [`normalized_text`], skipping descendant elements for which `skip`
/// returns true (their whole subtree is ignored).
#[must_use]
pub fn normalized_text_excluding<F>(node: &NodeRef, skip: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::new();
    collect_text(node, &skip, &mut out);
    normalize_whitespace(&out)
}

fn collect_text<F>(node: &NodeRef, skip: &F, out: &mut String)
where
    F: Fn(&str) -> bool,
{
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
            continue;
        }
        let Some(tag) = node_tag(&child) else {
            continue;
        };
        if skip(&tag) {
            continue;
        }
        let is_block = BLOCK_TAGS.contains(&tag.as_str());
        if is_block {
            out.push(' ');
        }
        collect_text(&child, skip, out);
        if is_block {
            out.push(' ');
        }
    }
}

/// Whitespace-normalized text of the first node in a selection.
#[must_use]
pub fn selection_text(sel: &Selection) -> String {
    sel.nodes().first().map(normalized_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_select() {
        let doc = parse(r#"<div id="main" class="container">content</div>"#);
        let div = doc.select("div");

        assert_eq!(get_attribute(&div, "id"), Some("main".to_string()));
        assert_eq!(tag_name(&div), Some("div".to_string()));
    }

    #[test]
    fn test_clone_document_is_independent() {
        let doc = parse(r#"<div id="original"><p>content</p></div>"#);
        let cloned = clone_document(&doc);

        cloned.select("p").remove();

        assert!(doc.select("p").exists());
        assert!(cloned.select("p").is_empty());
    }

    #[test]
    fn test_node_attributes() {
        let doc = parse(r##"<a href="/x" class="link" data-role="nav">Link</a>"##);
        let a = doc.select("a");
        let node = a.nodes().first().unwrap();

        let attrs = node_attributes(node);
        assert_eq!(attrs.len(), 3);
        assert!(attrs.iter().any(|(k, v)| k == "data-role" && v == "nav"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_normalized_text_separates_blocks_only() {
        let doc = parse("<div><p>one</p><p>two</p> and <b>bo</b>ld<br>line</div>");
        let div = doc.select("div");

        assert_eq!(selection_text(&div), "one two and bold line");
    }

    #[test]
    fn test_normalized_text_excluding_lists() {
        let doc = parse("<ul><li>Parent <ul><li>Child</li></ul></li></ul>");
        let li = doc.select("li").first();
        let node = li.nodes().first().unwrap();

        let text = normalized_text_excluding(node, |tag| tag == "ul" || tag == "ol");
        assert_eq!(text, "Parent");
    }

    #[test]
    fn test_operations_on_empty_selection() {
        let doc = parse("<div>content</div>");
        let empty = doc.select("span");

        assert_eq!(tag_name(&empty), None);
        assert_eq!(selection_text(&empty), "");
    }
}
