//! Wasm bindings for chatmark: rendering for a JS host and the
//! DOM-facing emoji image enhancer.

use chatmark_core::RenderOptions;
use lru::LruCache;
use serde::Deserialize;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsRenderOptions {
    emoji_enabled: Option<bool>,
    skin_tone: Option<u8>,
}

#[wasm_bindgen]
pub fn render_html(source: &str) -> String {
    chatmark_core::render(source, &RenderOptions::default())
}

#[wasm_bindgen]
pub fn render_html_with_options(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options = options_from_js(options)?;
    Ok(chatmark_core::render(source, &options))
}

#[wasm_bindgen]
pub fn render_html_sanitized(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options = options_from_js(options)?;
    Ok(chatmark_core::render_sanitized(source, &options))
}

/// Blocks until the emoji dataset is available; hosts doing batch
/// rendering call this once up front.
#[wasm_bindgen]
pub fn ensure_emoji_loaded() {
    chatmark_core::catalog().ensure_loaded();
}

fn options_from_js(value: JsValue) -> Result<RenderOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(RenderOptions::default());
    }
    let parsed: JsRenderOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = RenderOptions::default();
    if let Some(emoji_enabled) = parsed.emoji_enabled {
        out.emoji_enabled = emoji_enabled;
    }
    if let Some(skin_tone) = parsed.skin_tone {
        out.skin_tone = skin_tone;
    }
    Ok(out)
}

thread_local! {
    // Glyph -> image markup. Bounded; repeated enhance passes over the
    // same conversation reuse entries instead of re-deriving codepoints.
    static MARKUP_CACHE: RefCell<LruCache<String, String>> =
        RefCell::new(LruCache::new(NonZeroUsize::new(256).expect("cache capacity")));
}

/// Replaces the glyph text of every not-yet-enhanced emoji span inside
/// `container` with image-backed markup and marks it enhanced. Spans
/// already carrying the marker are left untouched, so repeat calls on
/// the same node are no-ops. No spans found is not an error.
#[wasm_bindgen]
pub fn enhance_emoji(container: &web_sys::Element) {
    let spans = match container.query_selector_all("span.d-emoji:not([data-enhanced])") {
        Ok(spans) => spans,
        Err(_) => return,
    };
    for idx in 0..spans.length() {
        let Some(node) = spans.item(idx) else {
            continue;
        };
        let Ok(span) = node.dyn_into::<web_sys::Element>() else {
            continue;
        };
        let glyph = span.text_content().unwrap_or_default();
        if !glyph.is_empty() {
            span.set_inner_html(&cached_markup(&glyph));
        }
        let _ = span.set_attribute("data-enhanced", "true");
    }
}

fn cached_markup(glyph: &str) -> String {
    MARKUP_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(markup) = cache.get(glyph) {
            return markup.clone();
        }
        let markup = chatmark_core::twemoji::image_markup(glyph);
        cache.put(glyph.to_string(), markup.clone());
        markup
    })
}
