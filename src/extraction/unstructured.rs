//! Visible-text line scanning — the unstructured strategy of last resort.
//!
//! Splits the document's visible text into lines, discards markup residue
//! and length outliers, and attributes schedule-like lines to branches via
//! the alias resolver.

use super::text::{
    collapse_ws, is_price_like, is_schedule_like, looks_like_markup, visible_text, MIN_LINE_LEN,
};
use super::{push_entry, Extraction};
use crate::branches::BranchSet;
use crate::snapshot::Section;
use anyhow::Result;

/// Raw cap per branch; the client view applies its own, tighter cap later.
const MAX_RAW_ENTRIES_PER_BRANCH: usize = 15;

/// Cap for the single bucket of price-like lines.
const MAX_PRICE_LINES: usize = 20;

/// Category name for price lines found by bare text scanning.
const DISCOVERED_PRICES: &str = "Обнаруженные цены";

pub fn schedule(html: &str, branches: &BranchSet) -> Result<Extraction> {
    let text = visible_text(html);
    let mut sections: Vec<Section> = Vec::new();

    for raw in text.lines() {
        let line = collapse_ws(raw);
        if line.chars().count() < MIN_LINE_LEN || looks_like_markup(&line) {
            continue;
        }
        let Some(branch) = branches.resolve(&line) else {
            continue;
        };
        if !is_schedule_like(&line) {
            continue;
        }
        let full = sections
            .iter()
            .find(|s| s.name == branch.name)
            .is_some_and(|s| s.entries.len() >= MAX_RAW_ENTRIES_PER_BRANCH);
        if !full {
            push_entry(&mut sections, &branch.name, line);
        }
    }
    Ok(Extraction::from_sections(sections))
}

/// Last-resort price scan: collect price-like lines into one bucket.
pub fn prices(html: &str) -> Result<Extraction> {
    let text = visible_text(html);
    let mut sections: Vec<Section> = Vec::new();

    for raw in text.lines() {
        let line = collapse_ws(raw);
        if looks_like_markup(&line) || !is_price_like(&line) {
            continue;
        }
        let full = sections
            .first()
            .is_some_and(|s| s.entries.len() >= MAX_PRICE_LINES);
        if !full {
            push_entry(&mut sections, DISCOVERED_PRICES, line);
        }
    }
    Ok(Extraction::from_sections(sections))
}
