use chatmark_core::{render, RenderOptions};

fn render_plain(input: &str) -> String {
    let options = RenderOptions {
        emoji_enabled: false,
        skin_tone: 0,
    };
    render(input, &options)
}

#[test]
fn underline_and_bold_are_distinct() {
    let html = render_plain("__subrayado__ y **negrita**");
    assert!(html.contains("<u>subrayado</u>"), "html: {html}");
    assert!(html.contains("<strong>negrita</strong>"), "html: {html}");
}

#[test]
fn underline_allows_nested_inline_formatting() {
    let html = render_plain("__sub *it* **bold**__");
    assert!(
        html.contains("<u>sub <em>it</em> <strong>bold</strong></u>"),
        "html: {html}"
    );
}

#[test]
fn empty_underline_stays_literal() {
    let html = render_plain("____");
    assert!(!html.contains("<u>"), "html: {html}");
}

#[test]
fn spoiler_renders_hidden_span() {
    let html = render_plain("un ||secreto|| aqui");
    assert!(
        html.contains("<span class=\"spoiler\" data-hidden=\"true\">secreto</span>"),
        "html: {html}"
    );
}

#[test]
fn spoiler_spans_multiple_lines() {
    let html = render_plain("||uno\ndos||");
    assert!(
        html.contains("<span class=\"spoiler\" data-hidden=\"true\">uno<br>dos</span>"),
        "html: {html}"
    );
}

#[test]
fn spoiler_pipes_do_not_break_tables() {
    let html = render_plain("| a | b |\n| - | - |\n| 1 | 2 |");
    assert!(html.contains("<table>"), "html: {html}");
    assert!(html.contains("<td>1</td>"), "html: {html}");
}

#[test]
fn strikethrough_is_supported() {
    let html = render_plain("~~tachado~~");
    assert!(html.contains("<del>tachado</del>"), "html: {html}");
}

#[test]
fn soft_line_breaks_are_visible() {
    let html = render_plain("uno\ndos");
    assert!(html.contains("uno<br>dos"), "html: {html}");
}

#[test]
fn quote_lines_join_into_one_blockquote() {
    let html = render_plain("texto\n> cita uno\n> cita dos\nsigue");
    assert_eq!(html.matches("<blockquote>").count(), 1, "html: {html}");
    assert!(html.contains("cita uno<br>cita dos"), "html: {html}");
}

#[test]
fn quote_markers_inside_fences_are_literal() {
    let html = render_plain("```\n> no es cita\n```");
    assert!(!html.contains("<blockquote>"), "html: {html}");
    assert!(html.contains("no es cita"), "html: {html}");
}

#[test]
fn fenced_code_is_not_parsed_as_markdown() {
    let html = render_plain("```\n**crudo**\n```");
    assert!(!html.contains("<strong>"), "html: {html}");
}
