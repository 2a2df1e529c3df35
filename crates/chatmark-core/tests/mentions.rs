use chatmark_core::{render, RenderOptions};

fn render_plain(input: &str) -> String {
    let options = RenderOptions {
        emoji_enabled: false,
        skin_tone: 0,
    };
    render(input, &options)
}

#[test]
fn all_five_mention_forms_are_wrapped() {
    let html = render_plain("Hola <@123> rol <@&456> canal <#789> @everyone @here");
    assert_eq!(
        html.matches("<span class=\"mention-token\"").count(),
        5,
        "html: {html}"
    );
}

#[test]
fn mention_span_carries_raw_token() {
    let html = render_plain("ping <@123>");
    assert!(html.contains("data-mention=\"&lt;@123&gt;\""), "html: {html}");
}

#[test]
fn nickname_mention_form_is_recognized() {
    let html = render_plain("hola <@!42>");
    assert!(html.contains("data-mention=\"&lt;@!42&gt;\""), "html: {html}");
}

#[test]
fn keyword_mention_requires_word_boundary() {
    let html = render_plain("correo@here.example y @hereafter");
    assert!(!html.contains("mention-token"), "html: {html}");
}

#[test]
fn malformed_angle_tokens_pass_through_escaped() {
    let html = render_plain("<@abc> <#> <@>");
    assert!(!html.contains("mention-token"), "html: {html}");
}

#[test]
fn keyword_mention_at_start_of_message_is_wrapped_once() {
    let html = render_plain("@everyone");
    assert_eq!(
        html.matches("<span class=\"mention-token\"").count(),
        1,
        "html: {html}"
    );
}
