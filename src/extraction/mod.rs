//! Cascading extraction strategies.
//!
//! Three independent algorithms turn raw page content into sections:
//! structured (table rows), semi-structured (repeated container blocks) and
//! unstructured (visible-text line scanning). The cascade tries them in that
//! fixed order and accepts the first non-empty result. A failing strategy is
//! treated as empty output — one strategy's failure never aborts the whole
//! acquisition.

pub mod semi_structured;
pub mod structured;
mod text;
pub mod unstructured;

use crate::branches::BranchSet;
use crate::snapshot::{Section, StrategyKind};
use anyhow::Result;
use tracing::{debug, warn};

/// Outcome of one strategy run. "No result" is an explicit value, not an
/// exception.
#[derive(Debug)]
pub enum Extraction {
    Empty,
    Entries(Vec<Section>),
}

impl Extraction {
    /// Wrap collected sections, dropping empty ones. All-empty input
    /// collapses to [`Extraction::Empty`].
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let sections: Vec<Section> = sections
            .into_iter()
            .filter(|s| !s.entries.is_empty())
            .collect();
        if sections.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Entries(sections)
        }
    }
}

/// Append an entry to the named section, creating the section on first use.
/// Duplicate entries within a section are dropped; insertion order is kept.
pub(crate) fn push_entry(sections: &mut Vec<Section>, name: &str, entry: String) {
    let section = match sections.iter_mut().find(|s| s.name == name) {
        Some(s) => s,
        None => {
            sections.push(Section::new(name));
            sections.last_mut().expect("just pushed")
        }
    };
    if !section.entries.contains(&entry) {
        section.entries.push(entry);
    }
}

/// Run the schedule cascade: structured → semi-structured → unstructured.
pub fn schedule_cascade(html: &str, branches: &BranchSet) -> Option<(Vec<Section>, StrategyKind)> {
    let s1 = |h: &str| structured::schedule(h, branches);
    let s2 = |h: &str| semi_structured::schedule(h, branches);
    let s3 = |h: &str| unstructured::schedule(h, branches);
    let strategies: [(StrategyKind, &dyn Fn(&str) -> Result<Extraction>); 3] = [
        (StrategyKind::Structured, &s1),
        (StrategyKind::SemiStructured, &s2),
        (StrategyKind::Unstructured, &s3),
    ];
    run(html, &strategies)
}

/// Run the price cascade, keyed by category heading instead of branch.
pub fn price_cascade(html: &str) -> Option<(Vec<Section>, StrategyKind)> {
    let s1 = |h: &str| structured::prices(h);
    let s2 = |h: &str| semi_structured::prices(h);
    let s3 = |h: &str| unstructured::prices(h);
    let strategies: [(StrategyKind, &dyn Fn(&str) -> Result<Extraction>); 3] = [
        (StrategyKind::Structured, &s1),
        (StrategyKind::SemiStructured, &s2),
        (StrategyKind::Unstructured, &s3),
    ];
    run(html, &strategies)
}

fn run(
    html: &str,
    strategies: &[(StrategyKind, &dyn Fn(&str) -> Result<Extraction>)],
) -> Option<(Vec<Section>, StrategyKind)> {
    for (kind, strategy) in strategies {
        match strategy(html) {
            Ok(Extraction::Entries(sections)) => {
                debug!(strategy = ?kind, sections = sections.len(), "strategy accepted");
                return Some((sections, *kind));
            }
            Ok(Extraction::Empty) => {
                debug!(strategy = ?kind, "strategy yielded nothing, trying next");
            }
            Err(e) => {
                warn!(strategy = ?kind, "strategy failed, trying next: {e}");
            }
        }
    }
    None
}
