//! Ordered textual rewrites applied to the engine's HTML output.
//!
//! The chain restores sentinel markers into real tags and repairs the
//! structural artifacts paragraph wrapping leaves behind. Order matters:
//! later rules assume earlier ones already ran. Each rule is a pure
//! string function; `finalize` is a fixed point on marker-free output.

use crate::engine::{escape_attr, escape_html};
use crate::normalize::{BLANK_LINE, QUOTE_CLOSE, QUOTE_OPEN};
use crate::placeholder::{MENTION_PREFIX, MENTION_SUFFIX, SPOILER_CLOSE, SPOILER_OPEN};

/// Visible stand-in for one preserved blank line.
pub(crate) const BLANK_LINE_MARKER: &str = "<br class=\"blank-line\" />";

pub(crate) fn finalize(html: &str, mentions: &[String]) -> String {
    let html = restore_spoilers(html);
    let html = restore_keyword_mentions(&html);
    let html = restore_mention_placeholders(&html, mentions);
    let html = restore_blockquotes(&html);
    let html = restore_blank_lines(&html);
    let html = strip_quote_adjacent_breaks(&html);
    let html = tidy_marker_breaks(&html);
    let html = drop_empty_paragraphs(&html);
    let html = trim_paragraph_trailing_breaks(&html);
    split_marker_paragraphs(&html)
}

/// Rule 1: spoiler placeholders become initially-hidden spoiler spans.
fn restore_spoilers(html: &str) -> String {
    html.replace(SPOILER_OPEN, "<span class=\"spoiler\" data-hidden=\"true\">")
        .replace(SPOILER_CLOSE, "</span>")
}

/// Rule 2a: literal `@everyone` / `@here` become mention-token spans.
/// Matches only at a word boundary preceded by start-of-text, whitespace
/// or a tag end, and skips text already wrapped in a mention-token span.
fn restore_keyword_mentions(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(rel) = html[pos..].find('@') {
        let at = pos + rel;
        out.push_str(&html[pos..at]);
        let tail = &html[at + 1..];
        let keyword = if tail.starts_with("everyone") {
            Some("everyone")
        } else if tail.starts_with("here") {
            Some("here")
        } else {
            None
        };
        let mut replaced = false;
        if let Some(keyword) = keyword {
            let end = at + 1 + keyword.len();
            let boundary_after = html[end..]
                .chars()
                .next()
                .map_or(true, |ch| !ch.is_ascii_alphanumeric() && ch != '_');
            let prev = html[..at].chars().last();
            let prefix_ok = match prev {
                None => true,
                Some('>') => true,
                Some(ch) => ch.is_whitespace(),
            };
            let inside_mention_span = prev == Some('>')
                && html[..at]
                    .rfind('<')
                    .is_some_and(|lt| html[lt..at].contains("mention-token"));
            if boundary_after && prefix_ok && !inside_mention_span {
                out.push_str("<span class=\"mention-token\" data-mention=\"@");
                out.push_str(keyword);
                out.push_str("\">@");
                out.push_str(keyword);
                out.push_str("</span>");
                pos = end;
                replaced = true;
            }
        }
        if !replaced {
            out.push('@');
            pos = at + 1;
        }
    }
    out.push_str(&html[pos..]);
    out
}

/// Rule 2b: indexed placeholders become mention-token spans carrying the
/// original raw token in `data-mention` for later removal by the editor.
fn restore_mention_placeholders(html: &str, mentions: &[String]) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(idx) = rest.find(MENTION_PREFIX) {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + MENTION_PREFIX.len()..];
        let digits_len = after.bytes().take_while(u8::is_ascii_digit).count();
        let valid = digits_len > 0 && after[digits_len..].starts_with(MENTION_SUFFIX);
        if !valid {
            out.push_str(MENTION_PREFIX);
            rest = after;
            continue;
        }
        let index: usize = after[..digits_len].parse().unwrap_or(usize::MAX);
        let raw = mentions.get(index).map(String::as_str).unwrap_or("");
        out.push_str("<span class=\"mention-token\" data-mention=\"");
        out.push_str(&escape_attr(raw));
        out.push_str("\">");
        out.push_str(&escape_html(raw));
        out.push_str("</span>");
        rest = &after[digits_len + MENTION_SUFFIX.len()..];
    }
    out.push_str(rest);
    out
}

/// Rule 3: blockquote sentinels become real tags, shedding any paragraph
/// wrapper the engine put around a lone sentinel line.
fn restore_blockquotes(html: &str) -> String {
    html.replace(&format!("<p>{QUOTE_OPEN}</p>"), QUOTE_OPEN)
        .replace(&format!("<p>{QUOTE_CLOSE}</p>"), QUOTE_CLOSE)
        .replace(QUOTE_OPEN, "<blockquote>")
        .replace(QUOTE_CLOSE, "</blockquote>")
}

/// Rule 4: blank-line sentinels become visible break markers, one per
/// preserved blank line.
fn restore_blank_lines(html: &str) -> String {
    html.replace(BLANK_LINE, BLANK_LINE_MARKER)
}

/// Rule 5: plain line breaks glued to either side of a blockquote
/// boundary are dropped, as is a blank-line marker sitting directly
/// inside an opening blockquote.
fn strip_quote_adjacent_breaks(html: &str) -> String {
    const OPEN: &str = "<blockquote>";
    const CLOSE: &str = "</blockquote>";

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    loop {
        let open = rest.find(OPEN);
        let close = rest.find(CLOSE);
        let (idx, is_open) = match (open, close) {
            (Some(o), Some(c)) => {
                if o < c {
                    (o, true)
                } else {
                    (c, false)
                }
            }
            (Some(o), None) => (o, true),
            (None, Some(c)) => (c, false),
            (None, None) => break,
        };
        out.push_str(&rest[..idx]);
        if is_open {
            trim_trailing_plain_break(&mut out);
            out.push_str(OPEN);
            rest = &rest[idx + OPEN.len()..];
            rest = skip_plain_breaks(rest);
            if let Some(after_marker) = skip_prefix_ignoring_space(rest, BLANK_LINE_MARKER) {
                rest = skip_plain_breaks(after_marker);
            }
        } else {
            while trim_trailing_plain_break(&mut out) {}
            out.push_str(CLOSE);
            rest = &rest[idx + CLOSE.len()..];
            rest = skip_plain_breaks(rest);
        }
    }
    out.push_str(rest);
    out
}

/// Rule 6: plain breaks glued directly before or after a blank-line
/// marker are dropped so consecutive markers stay adjacent and countable.
fn tidy_marker_breaks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(idx) = rest.find(BLANK_LINE_MARKER) {
        out.push_str(&rest[..idx]);
        while trim_trailing_plain_break(&mut out) {}
        out.push_str(BLANK_LINE_MARKER);
        rest = skip_plain_breaks(&rest[idx + BLANK_LINE_MARKER.len()..]);
    }
    out.push_str(rest);
    out
}

/// Rule 7: empty paragraphs left behind by evacuated sentinel lines.
fn drop_empty_paragraphs(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(idx) = rest.find("<p>") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 3..];
        match skip_prefix_ignoring_space(after, "</p>") {
            Some(remainder) => rest = remainder,
            None => {
                out.push_str("<p>");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Rule 8: a plain break directly before a paragraph close is dropped.
fn trim_paragraph_trailing_breaks(html: &str) -> String {
    html.replace("<br></p>", "</p>")
}

/// Rule 9: paragraphs that contain blank-line markers split into one
/// paragraph per content run, markers left between them untouched.
fn split_marker_paragraphs(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(idx) = rest.find("<p>") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 3..];
        let Some(end) = after.find("</p>") else {
            out.push_str("<p>");
            rest = after;
            continue;
        };
        let inner = &after[..end];
        if inner.contains(BLANK_LINE_MARKER) {
            split_paragraph_inner(&mut out, inner);
        } else {
            out.push_str("<p>");
            out.push_str(inner);
            out.push_str("</p>");
        }
        rest = &after[end + "</p>".len()..];
    }
    out.push_str(rest);
    out
}

fn split_paragraph_inner(out: &mut String, inner: &str) {
    let mut rest = inner;
    loop {
        match rest.find(BLANK_LINE_MARKER) {
            Some(idx) => {
                push_paragraph_piece(out, &rest[..idx]);
                out.push_str(BLANK_LINE_MARKER);
                rest = &rest[idx + BLANK_LINE_MARKER.len()..];
                while let Some(next) = rest.strip_prefix(BLANK_LINE_MARKER) {
                    out.push_str(BLANK_LINE_MARKER);
                    rest = next;
                }
            }
            None => {
                push_paragraph_piece(out, rest);
                break;
            }
        }
    }
}

fn push_paragraph_piece(out: &mut String, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push_str("<p>");
        out.push_str(trimmed);
        out.push_str("</p>");
    }
}

const PLAIN_BREAKS: [&str; 3] = ["<br>", "<br/>", "<br />"];

/// Removes one trailing plain `<br>` (and the whitespace after it) from
/// `out`. Marker breaks carry a class and never match.
fn trim_trailing_plain_break(out: &mut String) -> bool {
    let kept = out.trim_end().len();
    for pattern in PLAIN_BREAKS {
        if out[..kept].ends_with(pattern) {
            out.truncate(kept - pattern.len());
            return true;
        }
    }
    false
}

/// Skips leading whitespace-separated plain `<br>`s, leaving whitespace
/// intact when no break follows it.
fn skip_plain_breaks(mut rest: &str) -> &str {
    loop {
        let ahead = rest.trim_start();
        let mut stripped = None;
        for pattern in PLAIN_BREAKS {
            if let Some(after) = ahead.strip_prefix(pattern) {
                stripped = Some(after);
                break;
            }
        }
        match stripped {
            Some(after) => rest = after,
            None => return rest,
        }
    }
}

/// Strips `prefix` from `rest`, tolerating leading whitespace; the
/// whitespace is consumed only on a match.
fn skip_prefix_ignoring_space<'a>(rest: &'a str, prefix: &str) -> Option<&'a str> {
    rest.trim_start().strip_prefix(prefix)
}
