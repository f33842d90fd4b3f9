//! Markup removal for feed item bodies.
//!
//! Feed bodies are lightly marked up (links, bold, line breaks), so a single
//! tag-stripping pass is enough. This is not an HTML parser: entities are left
//! alone and a stray `<` without a closing `>` is kept as text.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Remove every `<...>` tag from `text`.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}
