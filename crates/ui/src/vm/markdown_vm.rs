use std::collections::{HashMap, HashSet};

/// Render slide and invitation copy written in Markdown to safe HTML.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "span", "br", "em", "strong", "b", "i", "del", "blockquote", "ul", "ol", "li", "a",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_to_html_keeps_emphasis() {
        let html = markdown_to_html("You are **wonderful**");
        assert!(html.contains("<strong>wonderful</strong>"), "{html}");
    }

    #[test]
    fn markdown_to_html_sanitizes_scripts_and_handlers() {
        let html = markdown_to_html("<script>alert(1)</script>[x](https://example.com)");
        assert!(!html.contains("<script"), "{html}");
        assert!(html.contains("href=\"https://example.com\""), "{html}");
    }

    #[test]
    fn sanitize_drops_images_and_headings() {
        let html = sanitize_html("<h1>Hi</h1><img src=\"x\" onerror=\"y\">");
        assert!(!html.contains("<h1"));
        assert!(!html.contains("<img"));
        assert!(html.contains("Hi"));
    }
}
