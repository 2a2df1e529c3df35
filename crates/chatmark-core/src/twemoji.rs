//! Glyph-to-image mapping for the DOM enhancer.
//!
//! Pure helpers only; the actual node mutation lives in the wasm crate.

pub const TWEMOJI_BASE: &str = "https://cdn.jsdelivr.net/gh/jdecked/twemoji@latest/assets/";

/// Hyphen-joined lowercase hex code points of a glyph, variation
/// selectors included, matching the CDN's file naming.
pub fn glyph_codepoints(glyph: &str) -> String {
    glyph
        .chars()
        .map(|ch| format!("{:x}", ch as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// CDN URL of the SVG image for a glyph.
pub fn image_url(glyph: &str) -> String {
    format!("{TWEMOJI_BASE}svg/{}.svg", glyph_codepoints(glyph))
}

/// `<img>` fragment that replaces a glyph text node inside an emoji span.
pub fn image_markup(glyph: &str) -> String {
    format!(
        "<img class=\"twemoji\" draggable=\"false\" alt=\"{glyph}\" src=\"{}\" />",
        image_url(glyph)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_codepoint_glyph() {
        assert_eq!(glyph_codepoints("\u{1F7E2}"), "1f7e2");
    }

    #[test]
    fn variation_selector_is_kept() {
        assert_eq!(glyph_codepoints("\u{2764}\u{FE0F}"), "2764-fe0f");
    }

    #[test]
    fn markup_carries_url_and_alt() {
        let markup = image_markup("\u{1F7E2}");
        assert!(markup.contains("alt=\"\u{1F7E2}\""));
        assert!(markup.contains("svg/1f7e2.svg"));
    }
}
