//! Markup parsing engine built on pulldown-cmark.
//!
//! The event stream is folded into the [`Block`] tree of a
//! [`ParsedDocument`]. Malformed constructs never abort the parse; they
//! become [`DocError`] entries with 1-based line numbers, computed through a
//! [`LineIndex`] built once per document.

use docforge_core::models::{
    Block, DocError, ErrorKind, Inline, LineIndex, ParsedDocument, plain_text,
};
use docforge_core::uri::leading_scheme;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashSet;

use crate::anchors::slugify;

/// Link schemes rendered without complaint; anything else is flagged.
const KNOWN_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Parse document source text into a [`ParsedDocument`].
///
/// Never returns an error and never panics: malformed markup degrades into
/// diagnostics on the resulting document.
pub fn parse(text: &str) -> ParsedDocument {
    let index = LineIndex::new(text);
    let mut builder = Builder::new(&index);

    let parser = Parser::new_ext(text, Options::empty());
    for (event, range) in parser.into_offset_iter() {
        builder.process(event, range.start);
    }

    builder.finish()
}

/// What an open inline frame will be folded into when it ends.
enum FrameKind {
    Paragraph,
    Heading { level: u8, line: usize },
    Emphasis,
    Strong,
    Link { target: String, line: usize },
    Image { target: String, line: usize },
}

struct InlineFrame {
    kind: FrameKind,
    inlines: Vec<Inline>,
}

struct Builder<'a> {
    index: &'a LineIndex,
    title: String,
    errors: Vec<DocError>,
    seen_anchors: HashSet<String>,
    /// Stack of open block containers; the root body is the first entry,
    /// blockquotes and list items push further entries.
    block_stack: Vec<Vec<Block>>,
    list_stack: Vec<(bool, Vec<Vec<Block>>)>,
    inline_stack: Vec<InlineFrame>,
    /// Open fenced/indented code block: (language, accumulated text)
    code: Option<(Option<String>, String)>,
}

impl<'a> Builder<'a> {
    fn new(index: &'a LineIndex) -> Self {
        Self {
            index,
            title: String::new(),
            errors: Vec::new(),
            seen_anchors: HashSet::new(),
            block_stack: vec![Vec::new()],
            list_stack: Vec::new(),
            inline_stack: Vec::new(),
            code: None,
        }
    }

    fn finish(mut self) -> ParsedDocument {
        // Unbalanced containers cannot come out of pulldown-cmark, but a
        // truncated input leaves open frames; fold them down rather than
        // dropping content.
        while !self.inline_stack.is_empty() {
            self.close_inline_frame();
        }
        while self.block_stack.len() > 1 {
            let blocks = self.block_stack.pop().unwrap_or_default();
            self.push_block(Block::BlockQuote(blocks));
        }

        self.errors.sort_by_key(|e| e.line);
        ParsedDocument {
            title: self.title,
            body: self.block_stack.pop().unwrap_or_default(),
            errors: self.errors,
        }
    }

    fn process(&mut self, event: Event<'_>, offset: usize) {
        let line = self.index.line(offset);
        match event {
            Event::Start(Tag::Paragraph) => self.open_frame(FrameKind::Paragraph),
            Event::End(TagEnd::Paragraph) => self.close_inline_frame(),

            Event::Start(Tag::Heading { level, .. }) => self.open_frame(FrameKind::Heading {
                level: level as u8,
                line,
            }),
            Event::End(TagEnd::Heading(_)) => self.close_inline_frame(),

            Event::Start(Tag::Emphasis) => self.open_frame(FrameKind::Emphasis),
            Event::End(TagEnd::Emphasis) => self.close_inline_frame(),
            Event::Start(Tag::Strong) => self.open_frame(FrameKind::Strong),
            Event::End(TagEnd::Strong) => self.close_inline_frame(),

            Event::Start(Tag::Link { dest_url, .. }) => {
                let target = dest_url.to_string();
                self.check_target(&target, line);
                self.open_frame(FrameKind::Link { target, line });
            }
            Event::End(TagEnd::Link) => self.close_inline_frame(),

            Event::Start(Tag::Image { dest_url, .. }) => {
                let target = dest_url.to_string();
                self.check_target(&target, line);
                self.open_frame(FrameKind::Image { target, line });
            }
            Event::End(TagEnd::Image) => self.close_inline_frame(),

            Event::Start(Tag::BlockQuote(_)) => self.block_stack.push(Vec::new()),
            Event::End(TagEnd::BlockQuote(_)) => {
                let blocks = self.block_stack.pop().unwrap_or_default();
                self.push_block(Block::BlockQuote(blocks));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, text)) = self.code.take() {
                    self.push_block(Block::CodeBlock {
                        language,
                        text: text.trim_end_matches('\n').to_string(),
                    });
                }
            }

            Event::Start(Tag::List(start_number)) => {
                self.list_stack.push((start_number.is_some(), Vec::new()));
            }
            Event::End(TagEnd::List(_)) => {
                if let Some((ordered, items)) = self.list_stack.pop() {
                    self.push_block(Block::List { ordered, items });
                }
            }
            Event::Start(Tag::Item) => self.block_stack.push(Vec::new()),
            Event::End(TagEnd::Item) => {
                let blocks = self.block_stack.pop().unwrap_or_default();
                match self.list_stack.last_mut() {
                    Some((_, items)) => items.push(blocks),
                    None => self.push_block(Block::BlockQuote(blocks)),
                }
            }

            Event::Text(t) => match &mut self.code {
                Some((_, buffer)) => buffer.push_str(&t),
                None => self.push_inline(Inline::Text(t.to_string())),
            },
            Event::Code(t) => self.push_inline(Inline::Code(t.to_string())),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_block(Block::Rule),

            // Raw HTML is not interpreted; it survives as escaped text.
            Event::Html(t) | Event::InlineHtml(t) => {
                self.push_inline(Inline::Text(t.to_string()));
            }

            _ => {}
        }
    }

    fn check_target(&mut self, target: &str, line: usize) {
        if target.trim().is_empty() {
            self.errors.push(DocError::new(line, ErrorKind::EmptyLinkTarget));
        } else if let Some(scheme) = leading_scheme(target)
            && !KNOWN_SCHEMES.contains(&scheme)
        {
            self.errors.push(DocError::new(
                line,
                ErrorKind::UnsupportedScheme(scheme.to_string()),
            ));
        }
    }

    fn open_frame(&mut self, kind: FrameKind) {
        self.inline_stack.push(InlineFrame {
            kind,
            inlines: Vec::new(),
        });
    }

    fn close_inline_frame(&mut self) {
        let Some(frame) = self.inline_stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Paragraph => self.push_block(Block::Paragraph(frame.inlines)),
            FrameKind::Heading { level, line } => {
                let text = plain_text(&frame.inlines);
                let anchor = slugify(&text);
                if !anchor.is_empty() && !self.seen_anchors.insert(anchor.clone()) {
                    self.errors
                        .push(DocError::new(line, ErrorKind::DuplicateAnchor(anchor.clone())));
                }
                if level == 1 && self.title.is_empty() {
                    self.title = text;
                }
                self.push_block(Block::Heading {
                    level,
                    text: frame.inlines,
                    anchor,
                });
            }
            FrameKind::Emphasis => self.push_inline(Inline::Emphasis(frame.inlines)),
            FrameKind::Strong => self.push_inline(Inline::Strong(frame.inlines)),
            FrameKind::Link { target, line } => self.push_inline(Inline::Link {
                target,
                text: frame.inlines,
                line,
            }),
            FrameKind::Image { target, line } => {
                let alt = plain_text(&frame.inlines);
                self.push_inline(Inline::Image { target, alt, line });
            }
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        match self.inline_stack.last_mut() {
            Some(frame) => frame.inlines.push(inline),
            // Inline content outside any frame (truncated input); wrap it
            // so it is not lost.
            None => self.push_block(Block::Paragraph(vec![inline])),
        }
    }

    fn push_block(&mut self, block: Block) {
        if let Some(container) = self.block_stack.last_mut() {
            container.push(block);
        }
    }
}
