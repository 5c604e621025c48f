//! Content container rules
//!
//! Predicates that recognize the element holding an article body, checked in
//! priority order. The first element (in document order) matched by the
//! highest-priority rule that carries enough text wins.

use dom_query::Selection;

use crate::dom;

/// Tests whether a selection is a content container.
pub type Rule = fn(&Selection) -> bool;

/// Content rules in priority order.
pub static CONTENT_RULES: &[Rule] = &[
    article_body_rule,
    article_tag_rule,
    story_rule,
    generic_content_rule,
    main_rule,
];

/// Tags a container may have, apart from rule-specific exceptions.
const CONTAINER_TAGS: &[&str] = &["article", "div", "main", "section"];

fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

fn is_container(sel: &Selection) -> bool {
    CONTAINER_TAGS.contains(&tag(sel).as_str())
}

/// `itemprop="articleBody"` and the usual body class names of CMS templates.
#[must_use]
pub fn article_body_rule(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    if attr(sel, "itemprop") == "articleBody" {
        return true;
    }

    let id = attr(sel, "id").to_lowercase();
    let class = attr(sel, "class").to_lowercase();
    const MARKERS: &[&str] = &[
        "articlebody", "article-body", "article_body", "article__body",
        "article-content", "article__content", "articlecontent", "article-text",
        "articletext", "entry-content", "post-content", "post_content",
        "postcontent", "post-body", "post-text", "blog-content", "blogcontent",
        "storybody", "story-body", "body-text", "mw-parser-output", "wysiwyg",
    ];
    MARKERS.iter().any(|m| id.contains(m) || class.contains(m))
        || class == "post"
        || class == "entry"
}

/// `<article>` elements.
#[must_use]
pub fn article_tag_rule(sel: &Selection) -> bool {
    tag(sel) == "article"
}

/// Story markers and `role="article"`.
#[must_use]
pub fn story_rule(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let id = attr(sel, "id").to_lowercase();
    let class = attr(sel, "class").to_lowercase();

    attr(sel, "role") == "article"
        || id == "story"
        || id == "article"
        || class == "story"
        || class == "text"
        || class.starts_with("article")
        || ["story-content", "storycontent", "single-post", "single-content", "fulltext", "field-body"]
            .iter()
            .any(|m| class.contains(m))
}

/// `id="content"`, `class*="main-content"` and similar.
#[must_use]
pub fn generic_content_rule(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let id = attr(sel, "id").to_lowercase();
    let class = attr(sel, "class").to_lowercase();

    id == "content"
        || class == "content"
        || ["main-content", "content-main", "content_main", "content-body", "contentbody", "content__body", "page-content"]
            .iter()
            .any(|m| id.contains(m) || class.contains(m))
}

/// `<main>` and `main*` ids, classes or roles.
#[must_use]
pub fn main_rule(sel: &Selection) -> bool {
    let tag = tag(sel);
    if tag == "main" {
        return true;
    }
    if !matches!(tag.as_str(), "article" | "div" | "section") {
        return false;
    }
    attr(sel, "class").starts_with("main")
        || attr(sel, "id").starts_with("main")
        || attr(sel, "role").starts_with("main")
}

/// Descendants of `root` matching `rule`, in document order.
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| rule(sel))
        .collect()
}

fn text_len(sel: &Selection) -> usize {
    dom::selection_text(sel).chars().count()
}

/// Find the content container under `root`.
///
/// A match with fewer than `min_len` characters is replaced by its parent
/// when the parent holds more than twice the text and reaches `min_len`;
/// otherwise the search moves on.
#[must_use]
pub fn find_content<'a>(root: &Selection<'a>, min_len: usize) -> Option<Selection<'a>> {
    for (priority, rule) in CONTENT_RULES.iter().enumerate() {
        for element in query_all(root, *rule) {
            let len = text_len(&element);
            if len >= min_len {
                tracing::trace!(priority, len, "content rule matched");
                return Some(element);
            }

            let parent = element.parent();
            if parent.is_empty() {
                continue;
            }
            let parent_len = text_len(&parent);
            if parent_len > len * 2 && parent_len >= min_len {
                tracing::trace!(priority, parent_len, "content rule matched thin element, using parent");
                return Some(parent);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn test_article_body_itemprop() {
        let doc = dom::parse(r#"<div itemprop="articleBody">content</div>"#);
        assert!(article_body_rule(&doc.select("div")));
    }

    #[test]
    fn test_article_body_class_case_insensitive() {
        let doc = dom::parse(r#"<section class="ArticleBody js-x">content</section>"#);
        assert!(article_body_rule(&doc.select("section")));
    }

    #[test]
    fn test_rule_rejects_wrong_tag() {
        let doc = dom::parse(r#"<span class="post-content">content</span>"#);
        assert!(!article_body_rule(&doc.select("span")));
    }

    #[test]
    fn test_main_rule() {
        let doc = dom::parse(r#"<main>x</main><div id="main-column">y</div><p class="main">z</p>"#);
        assert!(main_rule(&doc.select("main")));
        assert!(main_rule(&doc.select("div")));
        assert!(!main_rule(&doc.select("p")));
    }

    #[test]
    fn test_find_content_prefers_higher_priority_rule() {
        let html = format!(
            r#"<body><article><p>{}</p></article><div class="entry-content"><p>{}</p></div></body>"#,
            long_text(80),
            long_text(80)
        );
        let doc = dom::parse(&html);
        let found = find_content(&doc.select("body"), 250).unwrap();
        assert_eq!(attr(&found, "class"), "entry-content");
    }

    #[test]
    fn test_find_content_escalates_thin_match_to_parent() {
        let html = format!(
            r#"<body><div id="wrap"><div itemprop="articleBody">Short</div><p>{}</p></div></body>"#,
            long_text(80)
        );
        let doc = dom::parse(&html);
        let found = find_content(&doc.select("body"), 250).unwrap();
        assert_eq!(attr(&found, "id"), "wrap");
    }

    #[test]
    fn test_find_content_skips_thin_matches() {
        let doc = dom::parse(r#"<body><article><p>Too short</p></article></body>"#);
        assert!(find_content(&doc.select("body"), 250).is_none());
    }

    #[test]
    fn test_find_content_falls_through_to_generic_rule() {
        let html = format!(r#"<body><div id="content"><p>{}</p></div></body>"#, long_text(80));
        let doc = dom::parse(&html);
        let found = find_content(&doc.select("body"), 250).unwrap();
        assert_eq!(attr(&found, "id"), "content");
    }
}
