use chatmark_core::{catalog, render, RenderOptions};

fn render_with_emoji(input: &str) -> String {
    catalog().ensure_loaded();
    render(input, &RenderOptions::default())
}

#[test]
fn known_shortcode_becomes_emoji_span() {
    let html = render_with_emoji("Status :green_circle: listo");
    assert!(
        html.contains("<span class=\"d-emoji\" data-name=\"green_circle\">\u{1F7E2}</span>"),
        "html: {html}"
    );
    assert!(html.contains("Status "), "html: {html}");
}

#[test]
fn unknown_shortcode_is_preserved_verbatim() {
    let html = render_with_emoji("Texto :emoji_inventado: test");
    assert!(html.contains(":emoji_inventado:"), "html: {html}");
    assert!(!html.contains("d-emoji"), "html: {html}");
}

#[test]
fn backtracking_recovers_trailing_valid_token() {
    let html = render_with_emoji(":innocent::innocent:1:green_circle:");
    assert!(html.contains("data-name=\"green_circle\""), "html: {html}");
}

#[test]
fn invalid_token_is_kept_and_following_valid_token_resolves() {
    let html = render_with_emoji(":invalid_emoji:heart:");
    assert!(html.contains(":invalid_emoji:"), "html: {html}");
    assert!(html.contains("data-name=\"heart\""), "html: {html}");
}

#[test]
fn disabled_emoji_leaves_colon_sequences_untouched() {
    let options = RenderOptions {
        emoji_enabled: false,
        skin_tone: 0,
    };
    let html = render(":green_circle: y :smile:", &options);
    assert!(!html.contains("d-emoji"), "html: {html}");
    assert!(html.contains(":green_circle: y :smile:"), "html: {html}");
}

#[test]
fn glyph_is_not_reinterpreted_as_markdown() {
    let html = render_with_emoji("a :heart: b");
    assert!(
        html.contains("<span class=\"d-emoji\" data-name=\"heart\">\u{2764}\u{FE0F}</span>"),
        "html: {html}"
    );
}

#[test]
fn shortcodes_inside_fences_stay_literal() {
    let html = render_with_emoji("```\n:smile:\n```");
    assert!(!html.contains("d-emoji"), "html: {html}");
    assert!(html.contains(":smile:"), "html: {html}");
}

#[test]
fn alias_resolves_to_primary_name() {
    let html = render_with_emoji("bien :+1:");
    assert!(html.contains("data-name=\"thumbsup\""), "html: {html}");
}

#[test]
fn skin_tone_selects_variant_glyph() {
    catalog().ensure_loaded();
    let options = RenderOptions {
        emoji_enabled: true,
        skin_tone: 5,
    };
    let html = render("hola :wave:", &options);
    assert!(html.contains("data-name=\"wave\""), "html: {html}");
    assert!(html.contains("\u{1F44B}\u{1F3FF}"), "html: {html}");
}

#[test]
fn emoji_inside_spoiler_keeps_both_wrappers() {
    let html = render_with_emoji("||:fire:||");
    assert!(html.contains("class=\"spoiler\""), "html: {html}");
    assert!(html.contains("data-name=\"fire\""), "html: {html}");
}
