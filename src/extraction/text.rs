//! Shared text heuristics for the extraction strategies.

use regex::Regex;
use scraper::{Html, Node};
use std::sync::LazyLock;

/// Time-of-day token with locale-tolerant separator: `18:00` or `18.00`.
pub(crate) static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[:.]\d{2}").expect("time token regex"));

/// Real schedule lines are short phrases; markup and boilerplate tend to be
/// very short or very long.
pub(crate) const MIN_LINE_LEN: usize = 10;
pub(crate) const MAX_LINE_LEN: usize = 200;

/// Price-ish lines can run longer than schedule lines.
pub(crate) const MAX_PRICE_LINE_LEN: usize = 300;

pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A line qualifies as schedule-like iff it carries a time token and its
/// length sits inside the `[MIN_LINE_LEN, MAX_LINE_LEN]` band.
pub(crate) fn is_schedule_like(line: &str) -> bool {
    let len = line.chars().count();
    (MIN_LINE_LEN..=MAX_LINE_LEN).contains(&len) && TIME_TOKEN.is_match(line)
}

/// Lines that carry price markers — a currency sign or pricing vocabulary.
pub(crate) fn is_price_like(line: &str) -> bool {
    let len = line.chars().count();
    if !(MIN_LINE_LEN..=MAX_PRICE_LINE_LEN).contains(&len) {
        return false;
    }
    let lower = line.to_lowercase();
    lower.contains('₽')
        || lower.contains("руб")
        || lower.contains("цена")
        || lower.contains("стоимость")
        || lower.contains("абонемент")
}

/// Crude filter for lines that leaked out of inline scripts or markup.
pub(crate) fn looks_like_markup(line: &str) -> bool {
    line.contains('<')
        || line.contains('{')
        || line.contains('}')
        || line.contains("function")
        || line.contains("var ")
        || line.contains("=>")
}

/// Visible text of the document: every text node that is not inside
/// `<script>`, `<style>`, `<noscript>` or `<template>`, one per line.
pub(crate) fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut out = String::new();
    for node in doc.tree.root().descendants() {
        if let Node::Text(t) = node.value() {
            let hidden = node.ancestors().any(|a| match a.value() {
                Node::Element(el) => {
                    matches!(el.name(), "script" | "style" | "noscript" | "template")
                }
                _ => false,
            });
            if !hidden && !t.trim().is_empty() {
                out.push_str(t.trim());
                out.push('\n');
            }
        }
    }
    out
}
