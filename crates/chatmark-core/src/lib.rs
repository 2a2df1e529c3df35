//! chatmark-core: chat-dialect markdown rendering.
//!
//! A pure text-to-HTML pipeline for a chat platform's formatting dialect:
//! emphasis, underline, spoilers, literal block quotes, fenced code with
//! syntax highlighting, mention tokens, exact blank-line preservation and
//! emoji shortcode substitution. [`render`] is total — for any input
//! string it returns a string and never panics; a formatting preview must
//! not crash its caller on arbitrary typed text.

mod catalog;
mod engine;
mod highlight;
mod normalize;
mod placeholder;
mod postprocess;
mod sanitize;
mod shortcode;
pub mod twemoji;

pub use catalog::{catalog, Category, Dataset, DatasetError, EmojiCatalog, EmojiEntry, ToneVariant};

/// Options for one render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// When false, colon sequences pass through with no emoji spans.
    pub emoji_enabled: bool,
    /// Active skin-tone selection, 0 = none, 1–5 per the tone scale.
    pub skin_tone: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            emoji_enabled: true,
            skin_tone: 0,
        }
    }
}

/// Renders chat-dialect markdown to an HTML fragment.
///
/// Pipeline: edge trim → line normalization (sentinel tagging) → emoji
/// substitution (before markdown tokenization, so a resolved glyph is
/// never reinterpreted as syntax) → mention/spoiler placeholders →
/// markdown engine → ordered post-processing.
pub fn render(text: &str, options: &RenderOptions) -> String {
    let normalized = normalize::normalize(text);
    let with_emoji = if options.emoji_enabled {
        let catalog = catalog::catalog();
        catalog.request_load();
        shortcode::substitute_outside_fences(&normalized, catalog, options.skin_tone)
    } else {
        normalized
    };
    let (masked, mentions) = placeholder::mask_mentions(&with_emoji);
    let masked = placeholder::mask_spoilers(&masked);
    let html = engine::to_html(&masked);
    postprocess::finalize(&html, &mentions)
}

/// [`render`] followed by an allow-list sanitation pass restricted to
/// the vocabulary this renderer emits. For hosts that do not want the
/// engine's raw-HTML passthrough.
pub fn render_sanitized(text: &str, options: &RenderOptions) -> String {
    sanitize::clean(&render(text, options))
}
