//! HTML to plain text conversion for thread bodies and XML documents

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|h[1-6]|blockquote)\s*>").expect("valid regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Convert rich text to plain text
///
/// Script and style blocks are dropped, block-level closers become line
/// breaks, remaining tags are removed and entities are decoded. Runs of
/// spaces collapse and blank lines are removed.
pub fn html_to_text(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, "");
    let with_breaks = LINE_BREAK.replace_all(&without_code, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);

    decoded
        .lines()
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten an XML document body to a single line of text
///
/// Every tag becomes a space and whitespace runs collapse to one space.
pub fn xml_to_text(xml: &str) -> String {
    let spaced = TAG.replace_all(xml, " ");
    let decoded = decode_entities(&spaced);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Decode named and numeric character references
///
/// Unknown entities are left untouched.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "euro" => "€",
        "pound" => "£",
        _ => return None,
    };
    Some(decoded.to_string())
}
