//! Line-level pre-pass that protects chat-dialect structure from the
//! generic markdown engine.
//!
//! The engine collapses runs of blank lines into a single paragraph break
//! and treats `>` prefixes as markdown quotes with lazy continuation; this
//! dialect wants every blank line visible and quote runs joined literally,
//! line by line. Each physical line is therefore classified exactly once
//! and rewritten into a sentinel stream the post-processor can restore.

/// Opens a block-quote run. Always paired with [`QUOTE_CLOSE`].
pub(crate) const QUOTE_OPEN: &str = "@@BQ_OPEN@@";
/// Closes a block-quote run.
pub(crate) const QUOTE_CLOSE: &str = "@@BQ_CLOSE@@";
/// Stands in for one blank line outside fences and quote runs.
pub(crate) const BLANK_LINE: &str = "@@EMPTY_LINE@@";

/// Keeps an emptied quote line from being dropped as whitespace-only.
const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Rewrites `text` into the sentinel stream.
///
/// Only fully empty lines at the very start and end of the input are
/// trimmed; interior blank lines become [`BLANK_LINE`] sentinels. Quote
/// runs are bracketed by open/close sentinels and their `> ` prefixes
/// stripped. Fence-delimited lines pass through untouched.
pub(crate) fn normalize(text: &str) -> String {
    let trimmed = text.trim_matches(|ch| ch == '\n' || ch == '\r');
    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;
    let mut in_quote_run = false;

    for raw_line in trimmed.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        // The fence line itself is emitted as-is below.
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
        }

        let quote_rest = if in_fence { None } else { quote_content(line) };

        if let Some(rest) = quote_rest {
            if !in_quote_run {
                out.push(QUOTE_OPEN.to_string());
                in_quote_run = true;
            }
            if rest.trim().is_empty() {
                out.push(ZERO_WIDTH_SPACE.to_string());
            } else {
                out.push(rest.to_string());
            }
            continue;
        }

        // A quote run ends at the first non-quote line, blank included.
        if in_quote_run {
            out.push(QUOTE_CLOSE.to_string());
            in_quote_run = false;
        }

        if !in_fence && line.trim().is_empty() {
            out.push(BLANK_LINE.to_string());
            continue;
        }

        out.push(line.to_string());
    }

    if in_quote_run {
        out.push(QUOTE_CLOSE.to_string());
    }

    out.join("\n")
}

/// Matches the `>` quote prefix with at most one following space or tab
/// and returns the remainder of the line.
fn quote_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}
