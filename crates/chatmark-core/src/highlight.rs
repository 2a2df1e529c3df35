//! Fenced-code rendering with syntax highlighting.
//!
//! The fence info tag goes through a fixed alias table first (chat users
//! type `js`, `yml`, `ps1`, …), then syntect lookup by token, then
//! first-line auto-detection. Highlighting failure degrades to escaped
//! plain text; this path never errors out.

use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Short fence tags mapped to the canonical grammar token.
const LANG_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("cs", "csharp"),
    ("csharp", "csharp"),
    ("sh", "bash"),
    ("zsh", "bash"),
    ("bash", "bash"),
    ("ps", "powershell"),
    ("ps1", "powershell"),
    ("html", "xml"),
    ("xml", "xml"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("md", "markdown"),
    ("json", "json"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("php", "php"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("kotlin", "kotlin"),
    ("swift", "swift"),
];

/// Renders one fenced code block. `info` is the raw fence info string, of
/// which only the first whitespace-separated token matters.
pub(crate) fn render_code_block(info: Option<&str>, code: &str) -> String {
    let key = info
        .unwrap_or("")
        .trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    let mapped = LANG_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key.as_str());

    let (body, used) = highlight(mapped, code);

    let mut class = String::from("code-inner hljs");
    if !used.is_empty() {
        class.push_str(" lang-");
        class.push_str(&used);
    }
    format!("<pre class=\"code-block\"><code class=\"{class}\">{body}</code></pre>\n")
}

/// Returns the highlighted HTML body and the language token actually
/// used, empty when the block ends up unhighlighted.
fn highlight(token: &str, code: &str) -> (String, String) {
    let syntax_set = &*SYNTAX_SET;

    let by_token = if token.is_empty() {
        None
    } else {
        syntax_set
            .find_syntax_by_token(token)
            .map(|syntax| (syntax, token.to_string()))
    };
    let chosen = by_token.or_else(|| {
        let first_line = code.lines().next().unwrap_or("");
        syntax_set
            .find_syntax_by_first_line(first_line)
            .map(|syntax| (syntax, slug(&syntax.name)))
    });

    match chosen {
        Some((syntax, used)) => match classed_html(syntax, syntax_set, code) {
            Some(html) => (html, used),
            None => (escape_html(code), String::new()),
        },
        None => (escape_html(code), String::new()),
    }
}

fn classed_html(
    syntax: &SyntaxReference,
    syntax_set: &SyntaxSet,
    code: &str,
) -> Option<String> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
            log::debug!("syntax highlighting failed, falling back to plain text: {err}");
            return None;
        }
    }
    Some(generator.finalize())
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn escape_html(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_short_tag_to_canonical_language() {
        let html = render_code_block(Some("js"), "console.log(\"hola\");\n");
        assert!(html.contains("lang-javascript"));
        assert!(html.contains("<pre class=\"code-block\">"));
        assert!(html.contains("<span class="));
    }

    #[test]
    fn unknown_language_degrades_to_escaped_text() {
        let html = render_code_block(Some("nosuchlang"), "a < b\n");
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("class=\"code-inner hljs\""));
    }

    #[test]
    fn shebang_line_drives_auto_detection() {
        let html = render_code_block(None, "#!/usr/bin/env python\nprint(1)\n");
        assert!(html.contains("lang-"));
    }

    #[test]
    fn no_language_and_no_hint_stays_plain() {
        let html = render_code_block(None, "plain words\n");
        assert!(html.contains("plain words"));
    }
}
