//! Emoji shortcode lexer.
//!
//! An explicit state machine over byte positions rather than chained
//! substitutions, so the recovery rule stays auditable. The scan
//! guarantees forward progress: every iteration either consumes a
//! resolved token or exactly one character.

use crate::catalog::EmojiCatalog;

/// Bounds the close-candidate collection on pathological inputs.
const MAX_CANDIDATES: usize = 25;

/// Applies shortcode substitution to a sentinel stream, leaving
/// fence-delimited lines untouched so code keeps literal shortcodes.
pub(crate) fn substitute_outside_fences(
    text: &str,
    catalog: &EmojiCatalog,
    tone: u8,
) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;
    for line in text.split('\n') {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            out.push(line.to_string());
            continue;
        }
        if in_fence {
            out.push(line.to_string());
        } else {
            out.push(substitute(line, catalog, tone));
        }
    }
    out.join("\n")
}

/// Substitutes every resolvable `:name:` token in `text` with an emoji
/// span; unresolved tokens are preserved verbatim. Never fails — the
/// worst case is zero substitutions.
pub(crate) fn substitute(text: &str, catalog: &EmojiCatalog, tone: u8) -> String {
    let scanned = scan(text, catalog, tone);
    finishing_pass(&scanned, catalog, tone)
}

enum TokenMatch {
    /// `:name:` resolved; `close` is the byte index of the closing colon.
    Resolved {
        close: usize,
        primary: String,
        alias: String,
    },
    /// The first valid token did not resolve, but reusing its closing
    /// colon as an opening colon produced a token that did.
    Recovered {
        shared_colon: usize,
        close: usize,
        primary: String,
        alias: String,
    },
    None,
}

fn scan(text: &str, catalog: &EmojiCatalog, tone: u8) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let Some(rel) = text[pos..].find(':') else {
            out.push_str(&text[pos..]);
            break;
        };
        let open = pos + rel;
        out.push_str(&text[pos..open]);
        match match_token(text, open, catalog) {
            TokenMatch::Resolved {
                close,
                primary,
                alias,
            } => {
                emit_span(&mut out, catalog, &primary, &alias, tone);
                pos = close + 1;
            }
            TokenMatch::Recovered {
                shared_colon,
                close,
                primary,
                alias,
            } => {
                // The unresolved token stays verbatim, its closing colon
                // doing double duty as the next token's opener.
                out.push_str(&text[open..=shared_colon]);
                emit_span(&mut out, catalog, &primary, &alias, tone);
                pos = close + 1;
            }
            TokenMatch::None => {
                out.push(':');
                pos = open + 1;
            }
        }
    }
    out
}

fn match_token(text: &str, open: usize, catalog: &EmojiCatalog) -> TokenMatch {
    let mut first_valid_unresolved = None;
    for close in candidate_closes(text, open) {
        let inner = &text[open + 1..close];
        if !is_shortcode(inner) {
            continue;
        }
        if let Some(primary) = catalog.resolve(inner) {
            return TokenMatch::Resolved {
                close,
                primary,
                alias: inner.to_string(),
            };
        }
        if first_valid_unresolved.is_none() {
            first_valid_unresolved = Some(close);
        }
    }

    // One-step recovery: reinterpret the closing colon of the first
    // valid-but-unresolved token as an opening colon and retry once.
    if let Some(shared_colon) = first_valid_unresolved {
        for close in candidate_closes(text, shared_colon) {
            let inner = &text[shared_colon + 1..close];
            if !is_shortcode(inner) {
                continue;
            }
            if let Some(primary) = catalog.resolve(inner) {
                return TokenMatch::Recovered {
                    shared_colon,
                    close,
                    primary,
                    alias: inner.to_string(),
                };
            }
            break;
        }
    }
    TokenMatch::None
}

fn candidate_closes(text: &str, open: usize) -> impl Iterator<Item = usize> + '_ {
    text[open + 1..]
        .match_indices(':')
        .take(MAX_CANDIDATES)
        .map(move |(idx, _)| open + 1 + idx)
}

/// Shortcode grammar: letters, digits, underscore, plus, hyphen, at
/// least two characters.
fn is_shortcode(inner: &str) -> bool {
    inner.len() >= 2
        && inner
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'+' | b'-'))
}

fn emit_span(out: &mut String, catalog: &EmojiCatalog, primary: &str, alias: &str, tone: u8) {
    let glyph = catalog
        .tone_glyph(primary, tone)
        .or_else(|| catalog.glyph_of(alias))
        .or_else(|| catalog.glyph_of(primary));
    match glyph {
        Some(glyph) => {
            out.push_str("<span class=\"d-emoji\" data-name=\"");
            out.push_str(primary);
            out.push_str("\">");
            out.push_str(&glyph);
            out.push_str("</span>");
        }
        None => {
            // Resolver without a glyph for the name; keep the token.
            out.push(':');
            out.push_str(alias);
            out.push(':');
        }
    }
}

/// Straightforward `:name:` sweep over the accumulated output, catching
/// tokens the bounded forward scan under-matched.
fn finishing_pass(text: &str, catalog: &EmojiCatalog, tone: u8) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let Some(rel) = text[pos..].find(':') else {
            out.push_str(&text[pos..]);
            break;
        };
        let open = pos + rel;
        out.push_str(&text[pos..open]);
        let close = text[open + 1..].find(':').map(|idx| open + 1 + idx);
        let mut replaced = false;
        if let Some(close) = close {
            let inner = &text[open + 1..close];
            if is_shortcode(inner) {
                if let Some(primary) = catalog.resolve(inner) {
                    emit_span(&mut out, catalog, &primary, inner, tone);
                    pos = close + 1;
                    replaced = true;
                }
            }
        }
        if !replaced {
            out.push(':');
            pos = open + 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    fn run(input: &str) -> String {
        let catalog = catalog();
        catalog.ensure_loaded();
        substitute(input, catalog, 0)
    }

    #[test]
    fn resolves_known_shortcode_into_span() {
        let out = run("Status :green_circle: listo");
        assert!(out.contains("<span class=\"d-emoji\" data-name=\"green_circle\">\u{1F7E2}</span>"));
        assert!(out.starts_with("Status "));
    }

    #[test]
    fn unknown_shortcode_stays_verbatim() {
        let out = run("Texto :emoji_inventado: test");
        assert!(out.contains(":emoji_inventado:"));
        assert!(!out.contains("d-emoji"));
    }

    #[test]
    fn recovers_valid_token_after_ambiguous_sequence() {
        let out = run(":innocent::innocent:1:green_circle:");
        assert!(out.contains("data-name=\"green_circle\""));
        assert!(out.contains("data-name=\"innocent\""));
    }

    #[test]
    fn invalid_token_keeps_colon_shared_with_next_valid_token() {
        let out = run(":invalid_emoji:heart:");
        assert!(out.contains(":invalid_emoji:"));
        assert!(out.contains("data-name=\"heart\""));
    }

    #[test]
    fn captures_last_valid_token_after_unrelated_text() {
        let out = run(":bad:unrelated::smile:");
        assert!(out.contains("data-name=\"smile\""));
    }

    #[test]
    fn no_stray_colon_after_final_valid_token() {
        let out = run(":heart::nvalid_emoji::heart:");
        assert_eq!(out.matches("data-name=\"heart\"").count(), 2);
        assert!(!out.ends_with(':'));
    }

    #[test]
    fn single_character_name_is_not_a_shortcode() {
        let out = run("ratio 1:2 y 3:4");
        assert_eq!(out, "ratio 1:2 y 3:4");
    }

    #[test]
    fn tone_variant_glyph_is_used_when_available() {
        let catalog = catalog();
        catalog.ensure_loaded();
        let out = substitute("hola :wave:", catalog, 3);
        assert!(out.contains("data-name=\"wave\""));
        assert!(out.contains("\u{1F44B}\u{1F3FD}"));
    }

    #[test]
    fn tone_without_variant_falls_back_to_base_glyph() {
        let catalog = catalog();
        catalog.ensure_loaded();
        let out = substitute(":heart:", catalog, 3);
        assert!(out.contains("\u{2764}\u{FE0F}"));
    }

    #[test]
    fn fence_interior_is_skipped() {
        let catalog = catalog();
        catalog.ensure_loaded();
        let out = substitute_outside_fences("```\n:smile:\n```", catalog, 0);
        assert_eq!(out, "```\n:smile:\n```");
    }
}
