//! Allow-list sanitation for hosts that do not trust the raw-HTML
//! passthrough of the engine.

use ammonia::Builder;
use std::collections::{HashMap, HashSet};

/// Cleans rendered HTML down to the vocabulary this renderer emits.
pub(crate) fn clean(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a",
        "blockquote",
        "br",
        "code",
        "del",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "img",
        "input",
        "li",
        "ol",
        "p",
        "pre",
        "span",
        "strong",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "u",
        "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut tag_attributes: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
    tag_attributes.insert("a", ["href", "title"].iter().copied().collect());
    tag_attributes.insert("br", ["class"].iter().copied().collect());
    tag_attributes.insert("code", ["class"].iter().copied().collect());
    tag_attributes.insert("pre", ["class"].iter().copied().collect());
    tag_attributes.insert("ol", ["start"].iter().copied().collect());
    tag_attributes.insert(
        "img",
        ["alt", "class", "draggable", "src"].iter().copied().collect(),
    );
    tag_attributes.insert(
        "input",
        ["checked", "disabled", "type"].iter().copied().collect(),
    );
    tag_attributes.insert(
        "span",
        [
            "class",
            "data-enhanced",
            "data-hidden",
            "data-mention",
            "data-name",
        ]
        .iter()
        .copied()
        .collect(),
    );
    tag_attributes.insert("td", ["style"].iter().copied().collect());
    tag_attributes.insert("th", ["style"].iter().copied().collect());

    let mut generic_attribute_prefixes = HashSet::new();
    generic_attribute_prefixes.insert("data-");

    Builder::new()
        .tags(tags)
        .tag_attributes(tag_attributes)
        .generic_attribute_prefixes(generic_attribute_prefixes)
        .clean(html)
        .to_string()
}
