//! HTML emission.
//!
//! Renders a parsed document into a full HTML page. Every link and image is
//! resolved against the repository while rendering; broken targets keep
//! their href but gain the `broken` class and a per-line diagnostic, so a
//! bad link never aborts a page.

use crate::repository::DocRepository;
use crate::resolver::TargetResolver;
use docforge_core::models::{Block, DocError, ErrorKind, Inline, ParsedDocument, plain_text};
use docforge_core::uri::{self, DocTarget, LinkTarget};
use std::collections::HashSet;

const TEMPLATE: &str = include_str!("template.html");

/// A rendered page plus the emission-time diagnostics it produced.
pub struct EmittedPage {
    pub html: String,
    pub errors: Vec<DocError>,
}

/// Renders documents to HTML pages against a repository.
pub struct HtmlEmitter<'a> {
    resolver: TargetResolver<'a>,
}

struct PageContext {
    base_dir: String,
    own_anchors: HashSet<String>,
    errors: Vec<DocError>,
}

impl<'a> HtmlEmitter<'a> {
    pub fn new(repo: &'a dyn DocRepository) -> Self {
        Self {
            resolver: TargetResolver::new(repo),
        }
    }

    /// Emit the full page for a document. The returned diagnostics cover
    /// emission only; parse-time diagnostics live on the document itself.
    pub fn emit(&self, doc_uri: &str, doc: &ParsedDocument, extra_styles: &str) -> EmittedPage {
        let mut ctx = PageContext {
            base_dir: uri::dir_uri(doc_uri),
            own_anchors: docforge_parser::extract_anchors(&doc.body),
            errors: Vec::new(),
        };

        let mut body = String::new();
        self.render_blocks(&doc.body, &mut ctx, &mut body);

        let title = if doc.title.is_empty() {
            uri::base_name(doc_uri).to_string()
        } else {
            doc.title.clone()
        };
        let styles = if extra_styles.is_empty() {
            String::new()
        } else {
            format!(
                "<link rel=\"stylesheet\" href=\"{}\">",
                escape_attr(extra_styles)
            )
        };

        let html = TEMPLATE
            .replace("{{EXTRA_STYLES}}", &styles)
            .replace("{{TITLE}}", &escape_html(&title))
            .replace("{{BODY}}", &body);

        ctx.errors.sort_by_key(|e| e.line);
        EmittedPage {
            html,
            errors: ctx.errors,
        }
    }

    fn render_blocks(&self, blocks: &[Block], ctx: &mut PageContext, out: &mut String) {
        for block in blocks {
            match block {
                Block::Heading {
                    level,
                    text,
                    anchor,
                } => {
                    if anchor.is_empty() {
                        out.push_str(&format!("<h{}>", level));
                    } else {
                        out.push_str(&format!("<h{} id=\"{}\">", level, escape_attr(anchor)));
                    }
                    self.render_inlines(text, ctx, out);
                    out.push_str(&format!("</h{}>\n", level));
                }
                Block::Paragraph(inlines) => {
                    out.push_str("<p>");
                    self.render_inlines(inlines, ctx, out);
                    out.push_str("</p>\n");
                }
                Block::List { ordered, items } => {
                    let tag = if *ordered { "ol" } else { "ul" };
                    out.push_str(&format!("<{}>\n", tag));
                    for item in items {
                        out.push_str("<li>");
                        self.render_blocks(item, ctx, out);
                        out.push_str("</li>\n");
                    }
                    out.push_str(&format!("</{}>\n", tag));
                }
                Block::CodeBlock { language, text } => {
                    match language {
                        Some(lang) => out.push_str(&format!(
                            "<pre><code class=\"language-{}\">",
                            escape_attr(lang)
                        )),
                        None => out.push_str("<pre><code>"),
                    }
                    out.push_str(&escape_html(text));
                    out.push_str("</code></pre>\n");
                }
                Block::BlockQuote(inner) => {
                    out.push_str("<blockquote>\n");
                    self.render_blocks(inner, ctx, out);
                    out.push_str("</blockquote>\n");
                }
                Block::Rule => out.push_str("<hr>\n"),
            }
        }
    }

    fn render_inlines(&self, inlines: &[Inline], ctx: &mut PageContext, out: &mut String) {
        for inline in inlines {
            match inline {
                Inline::Text(t) => out.push_str(&escape_html(t)),
                Inline::Code(t) => {
                    out.push_str("<code>");
                    out.push_str(&escape_html(t));
                    out.push_str("</code>");
                }
                Inline::Emphasis(inner) => {
                    out.push_str("<em>");
                    self.render_inlines(inner, ctx, out);
                    out.push_str("</em>");
                }
                Inline::Strong(inner) => {
                    out.push_str("<strong>");
                    self.render_inlines(inner, ctx, out);
                    out.push_str("</strong>");
                }
                Inline::Link { target, text, line } => {
                    self.render_link(target, text, *line, ctx, out);
                }
                Inline::Image { target, alt, line } => {
                    self.render_image(target, alt, *line, ctx, out);
                }
                Inline::SoftBreak => out.push('\n'),
                Inline::HardBreak => out.push_str("<br>\n"),
            }
        }
    }

    fn render_link(
        &self,
        raw: &str,
        text: &[Inline],
        line: usize,
        ctx: &mut PageContext,
        out: &mut String,
    ) {
        // Empty targets were already diagnosed at parse time; render the
        // text alone rather than a dead anchor.
        if raw.trim().is_empty() {
            self.render_inlines(text, ctx, out);
            return;
        }

        let (href, label, broken) = match uri::classify(&ctx.base_dir, raw) {
            LinkTarget::External(url) => (url, None, false),
            LinkTarget::Doc(target) => {
                let exists = self.resolver.exists(&target, &ctx.own_anchors);
                if !exists {
                    ctx.errors
                        .push(DocError::new(line, ErrorKind::BrokenLink(raw.to_string())));
                }
                let label = if plain_text(text).trim().is_empty() {
                    Some(self.resolver.label(&target))
                } else {
                    None
                };
                (doc_href(&ctx.base_dir, &target), label, !exists)
            }
            LinkTarget::Resource(resource_uri) => {
                let exists = self.resolver.resource_exists(&resource_uri);
                if !exists {
                    ctx.errors.push(DocError::new(
                        line,
                        ErrorKind::BrokenResource(raw.to_string()),
                    ));
                }
                (
                    uri::relative_href(&ctx.base_dir, &resource_uri),
                    None,
                    !exists,
                )
            }
        };

        if broken {
            out.push_str(&format!(
                "<a class=\"broken\" href=\"{}\">",
                escape_attr(&href)
            ));
        } else {
            out.push_str(&format!("<a href=\"{}\">", escape_attr(&href)));
        }
        match label {
            Some(label) => out.push_str(&escape_html(&label)),
            None => self.render_inlines(text, ctx, out),
        }
        out.push_str("</a>");
    }

    fn render_image(
        &self,
        raw: &str,
        alt: &str,
        line: usize,
        ctx: &mut PageContext,
        out: &mut String,
    ) {
        let (src, broken) = match uri::classify(&ctx.base_dir, raw) {
            LinkTarget::External(url) => (url, false),
            LinkTarget::Resource(resource_uri) => {
                let exists = self.resolver.resource_exists(&resource_uri);
                if !exists {
                    ctx.errors.push(DocError::new(
                        line,
                        ErrorKind::BrokenResource(raw.to_string()),
                    ));
                }
                (uri::relative_href(&ctx.base_dir, &resource_uri), !exists)
            }
            // An image must point at a raw file
            LinkTarget::Doc(_) => {
                ctx.errors.push(DocError::new(
                    line,
                    ErrorKind::BrokenResource(raw.to_string()),
                ));
                (raw.to_string(), true)
            }
        };

        if broken {
            out.push_str(&format!(
                "<img class=\"broken\" src=\"{}\" alt=\"{}\">",
                escape_attr(&src),
                escape_attr(alt)
            ));
        } else {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_attr(&src),
                escape_attr(alt)
            ));
        }
    }
}

/// Href for a document target: relative path to its rendered page, with the
/// fragment carried over. Internal fragments stay on the current page.
fn doc_href(base_dir: &str, target: &DocTarget) -> String {
    if target.internal {
        return match &target.frag {
            Some(frag) => format!("#{}", frag),
            None => String::new(),
        };
    }
    let page = format!("{}.html", target.uri);
    let mut href = uri::relative_href(base_dir, &page);
    if let Some(frag) = &target.frag {
        href.push('#');
        href.push_str(frag);
    }
    href
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeRepo {
        anchors: HashMap<String, HashSet<String>>,
        resources: HashSet<String>,
    }

    impl FakeRepo {
        fn new() -> Self {
            let mut anchors = HashMap::new();
            anchors.insert(
                "/guide".to_string(),
                HashSet::from(["setup".to_string()]),
            );
            Self {
                anchors,
                resources: HashSet::from(["/img/logo.png".to_string()]),
            }
        }
    }

    impl DocRepository for FakeRepo {
        fn title(&self, doc_uri: &str) -> String {
            uri::base_name(doc_uri).to_string()
        }
        fn resource_exists(&self, resource_uri: &str) -> bool {
            self.resources.contains(resource_uri)
        }
        fn anchors(&self, doc_uri: &str) -> Option<HashSet<String>> {
            self.anchors.get(doc_uri).cloned()
        }
    }

    fn emit(source: &str) -> EmittedPage {
        let repo = FakeRepo::new();
        let emitter = HtmlEmitter::new(&repo);
        let doc = docforge_parser::parse(source);
        emitter.emit("/home", &doc, "")
    }

    #[test]
    fn test_page_structure_and_title() {
        let page = emit("# Welcome\n\nHello there.\n");
        assert!(page.html.contains("<title>Welcome</title>"));
        assert!(page.html.contains("<h1 id=\"welcome\">Welcome</h1>"));
        assert!(page.html.contains("<p>Hello there.</p>"));
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_valid_document_link() {
        let page = emit("[the guide](/guide)\n");
        assert!(page.html.contains("<a href=\"guide.html\">the guide</a>"));
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_fragment_link_href() {
        let page = emit("[setup](/guide#setup)\n");
        assert!(page.html.contains("href=\"guide.html#setup\""));
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_broken_link_is_flagged_not_dropped() {
        let page = emit("line one\n\n[gone](/missing)\n");
        assert!(page.html.contains("class=\"broken\""));
        assert!(page.html.contains(">gone</a>"));
        assert_eq!(page.errors.len(), 1);
        assert_eq!(page.errors[0].line, 3);
        assert_eq!(
            page.errors[0].kind,
            ErrorKind::BrokenLink("/missing".to_string())
        );
    }

    #[test]
    fn test_broken_fragment_in_existing_document() {
        let page = emit("[nope](/guide#nope)\n");
        assert_eq!(
            page.errors[0].kind,
            ErrorKind::BrokenLink("/guide#nope".to_string())
        );
    }

    #[test]
    fn test_internal_fragment_checked_against_own_anchors() {
        let good = emit("# Intro\n\n[up](#intro)\n");
        assert!(good.html.contains("<a href=\"#intro\">up</a>"));
        assert!(good.errors.is_empty());

        let bad = emit("[up](#nowhere)\n");
        assert!(bad.html.contains("class=\"broken\""));
        assert_eq!(
            bad.errors[0].kind,
            ErrorKind::BrokenLink("#nowhere".to_string())
        );
    }

    #[test]
    fn test_empty_link_text_uses_target_title() {
        let page = emit("[](/guide)\n");
        assert!(page.html.contains(">guide</a>"));
    }

    #[test]
    fn test_image_and_broken_resource() {
        let good = emit("![logo](/img/logo.png)\n");
        assert!(good.html.contains("<img src=\"img/logo.png\" alt=\"logo\">"));
        assert!(good.errors.is_empty());

        let bad = emit("![x](/img/missing.png)\n");
        assert!(bad.html.contains("img class=\"broken\""));
        assert_eq!(
            bad.errors[0].kind,
            ErrorKind::BrokenResource("/img/missing.png".to_string())
        );
    }

    #[test]
    fn test_external_link_passes_through() {
        let page = emit("[site](https://example.com/x)\n");
        assert!(page.html.contains("href=\"https://example.com/x\""));
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_text_is_escaped() {
        let page = emit("a <b> & c\n");
        assert!(page.html.contains("a &lt;b&gt; &amp; c"));
    }

    #[test]
    fn test_extra_styles_injected() {
        let repo = FakeRepo::new();
        let emitter = HtmlEmitter::new(&repo);
        let doc = docforge_parser::parse("hi\n");

        let page = emitter.emit("/home", &doc, "style/site.css");
        assert!(page
            .html
            .contains("<link rel=\"stylesheet\" href=\"style/site.css\">"));

        let plain = emitter.emit("/home", &doc, "");
        assert!(!plain.html.contains("{{EXTRA_STYLES}}"));
        assert!(!plain.html.contains("<link rel=\"stylesheet\""));
    }

    #[test]
    fn test_untitled_page_uses_base_name() {
        let page = emit("no heading\n");
        assert!(page.html.contains("<title>home</title>"));
    }

    #[test]
    fn test_relative_link_from_nested_page() {
        let repo = FakeRepo::new();
        let emitter = HtmlEmitter::new(&repo);
        let doc = docforge_parser::parse("[g](../guide)\n");
        let page = emitter.emit("/a/b", &doc, "");
        assert!(page.html.contains("href=\"../guide.html\""));
    }
}
