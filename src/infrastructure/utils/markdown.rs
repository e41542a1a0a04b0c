use pulldown_cmark::{html, Options, Parser};
use ammonia::{Builder, UrlRelative};

/// Renders challenge requirements (Markdown) to sanitized HTML. The text is
/// user-authored, so the output is cleaned to prevent XSS before it reaches
/// a page.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::all();
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

/// Strips unsafe HTML, keeps relative URLs out, and marks outbound links.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}
