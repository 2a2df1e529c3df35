//! Markdown engine: pulldown-cmark events rendered to HTML with the
//! chat-dialect rules layered on top.
//!
//! Differences from a stock renderer: soft breaks become `<br>` (chat
//! messages treat every newline as a visible break), `__…__` renders as
//! underline instead of bold, raw inline HTML passes through untouched
//! (emoji spans are injected upstream as markup), and fenced code goes
//! through the syntax highlighter.

use crate::highlight;
use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};

pub(crate) fn to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer {
        source,
        out: String::with_capacity(source.len() * 2),
        strong_tags: Vec::new(),
        code: None,
        image_alt: None,
        table_aligns: Vec::new(),
        cell_idx: 0,
        in_table_head: false,
    };
    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        renderer.event(event, range);
    }
    renderer.out
}

struct Renderer<'a> {
    source: &'a str,
    out: String,
    // Open Strong delimiters; "u" when the source delimiter was `__`.
    strong_tags: Vec<&'static str>,
    // (fence info, accumulated text) while inside a code block.
    code: Option<(Option<String>, String)>,
    // Alt text accumulator while inside an image.
    image_alt: Option<(String, String, String)>,
    table_aligns: Vec<Alignment>,
    cell_idx: usize,
    in_table_head: bool,
}

impl Renderer<'_> {
    fn event(&mut self, event: Event, range: std::ops::Range<usize>) {
        if let Some((_, buffer)) = self.code.as_mut() {
            match event {
                Event::Text(text) => buffer.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let (info, code) = self.code.take().unwrap_or_default();
                    self.out
                        .push_str(&highlight::render_code_block(info.as_deref(), &code));
                }
                _ => {}
            }
            return;
        }
        if let Some((_, _, alt)) = self.image_alt.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                Event::End(TagEnd::Image) => {
                    let (url, title, alt) = self.image_alt.take().unwrap_or_default();
                    self.out.push_str("<img src=\"");
                    self.out.push_str(&escape_attr(&url));
                    self.out.push_str("\" alt=\"");
                    self.out.push_str(&escape_attr(&alt));
                    self.out.push('"');
                    if !title.is_empty() {
                        self.out.push_str(" title=\"");
                        self.out.push_str(&escape_attr(&title));
                        self.out.push('"');
                    }
                    self.out.push_str(" />");
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.out.push_str(&escape_html(&text)),
            Event::Code(text) => {
                self.out.push_str("<code>");
                self.out.push_str(&escape_html(&text));
                self.out.push_str("</code>");
            }
            Event::Html(html) | Event::InlineHtml(html) => self.out.push_str(&html),
            Event::SoftBreak | Event::HardBreak => self.out.push_str("<br>"),
            Event::Rule => self.out.push_str("<hr />\n"),
            Event::TaskListMarker(checked) => {
                if checked {
                    self.out
                        .push_str("<input disabled=\"\" type=\"checkbox\" checked=\"\" /> ");
                } else {
                    self.out.push_str("<input disabled=\"\" type=\"checkbox\" /> ");
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag, range: std::ops::Range<usize>) {
        match tag {
            Tag::Paragraph => self.out.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.out.push('<');
                self.out.push_str(level_tag(level));
                self.out.push('>');
            }
            Tag::BlockQuote(_) => self.out.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_string())
                    }
                    _ => None,
                };
                self.code = Some((info, String::new()));
            }
            Tag::List(Some(start)) => {
                if start == 1 {
                    self.out.push_str("<ol>\n");
                } else {
                    self.out.push_str(&format!("<ol start=\"{start}\">\n"));
                }
            }
            Tag::List(None) => self.out.push_str("<ul>\n"),
            Tag::Item => self.out.push_str("<li>"),
            Tag::Emphasis => self.out.push_str("<em>"),
            Tag::Strong => {
                // The underline rule wins over built-in strong whenever the
                // source delimiter at this position is a double underscore.
                let tag = if self.source[range.start..].starts_with("__") {
                    "u"
                } else {
                    "strong"
                };
                self.strong_tags.push(tag);
                self.out.push('<');
                self.out.push_str(tag);
                self.out.push('>');
            }
            Tag::Strikethrough => self.out.push_str("<del>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                self.out.push_str("<a href=\"");
                if link_type == LinkType::Email {
                    self.out.push_str("mailto:");
                }
                self.out.push_str(&escape_attr(&dest_url));
                self.out.push('"');
                if !title.is_empty() {
                    self.out.push_str(" title=\"");
                    self.out.push_str(&escape_attr(&title));
                    self.out.push('"');
                }
                self.out.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image_alt = Some((dest_url.to_string(), title.to_string(), String::new()));
            }
            Tag::Table(aligns) => {
                self.table_aligns = aligns;
                self.out.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_idx = 0;
                self.out.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.cell_idx = 0;
                self.out.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                self.out.push('<');
                self.out.push_str(tag);
                match self.table_aligns.get(self.cell_idx) {
                    Some(Alignment::Left) => self.out.push_str(" style=\"text-align: left\""),
                    Some(Alignment::Center) => self.out.push_str(" style=\"text-align: center\""),
                    Some(Alignment::Right) => self.out.push_str(" style=\"text-align: right\""),
                    _ => {}
                }
                self.out.push('>');
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.out.push_str("</p>\n"),
            TagEnd::Heading(level) => {
                self.out.push_str("</");
                self.out.push_str(level_tag(level));
                self.out.push_str(">\n");
            }
            TagEnd::BlockQuote(_) => self.out.push_str("</blockquote>\n"),
            TagEnd::List(true) => self.out.push_str("</ol>\n"),
            TagEnd::List(false) => self.out.push_str("</ul>\n"),
            TagEnd::Item => self.out.push_str("</li>\n"),
            TagEnd::Emphasis => self.out.push_str("</em>"),
            TagEnd::Strong => {
                let tag = self.strong_tags.pop().unwrap_or("strong");
                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push('>');
            }
            TagEnd::Strikethrough => self.out.push_str("</del>"),
            TagEnd::Link => self.out.push_str("</a>"),
            TagEnd::Table => self.out.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.out.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.out.push_str("</tr>"),
            TagEnd::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push('>');
                self.cell_idx += 1;
            }
            _ => {}
        }
    }
}

fn level_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
