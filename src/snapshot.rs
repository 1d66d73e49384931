//! Snapshot types shared by the schedule and price pipelines.
//!
//! A snapshot is the full extracted view of one source page: an ordered list
//! of sections (branch-keyed for schedules, category-keyed for prices) plus
//! provenance metadata so consumers can tell live data from fallback data.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a snapshot's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Freshly fetched and extracted from the source site.
    Live,
    /// Hand-curated substitute served when acquisition failed.
    Fallback,
}

/// Which extraction strategy produced a live snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Structured,
    SemiStructured,
    Unstructured,
}

/// Provenance metadata attached to every snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMeta {
    /// Source URL, or `"fallback"` for curated data.
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
}

/// One branch (schedule) or category (prices) with its extracted entries.
///
/// Entry order is insertion order from the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries<I, S>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full extracted mapping plus metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub sections: Vec<Section>,
    pub meta: SnapshotMeta,
}

impl Snapshot {
    /// Build a live snapshot from a successful fetch + extraction cycle.
    pub fn live(source: &str, strategy: StrategyKind, sections: Vec<Section>) -> Self {
        Self {
            sections,
            meta: SnapshotMeta {
                source: source.to_string(),
                fetched_at: Utc::now(),
                origin: Origin::Live,
                strategy: Some(strategy),
            },
        }
    }

    /// Build a fallback snapshot from curated data.
    pub fn fallback(sections: Vec<Section>) -> Self {
        Self {
            sections,
            meta: SnapshotMeta {
                source: "fallback".to_string(),
                fetched_at: Utc::now(),
                origin: Origin::Fallback,
                strategy: None,
            },
        }
    }

    /// True when no section carries any entry.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.entries.is_empty())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_sections_have_no_entries() {
        let snap = Snapshot::live(
            "https://example.com",
            StrategyKind::Structured,
            vec![Section::new("Дыбенко")],
        );
        assert!(snap.is_empty());
        assert_eq!(snap.entry_count(), 0);
    }

    #[test]
    fn fallback_is_marked() {
        let snap = Snapshot::fallback(vec![Section::with_entries("Озерки", ["K-Pop Сб 13:00"])]);
        assert_eq!(snap.meta.origin, Origin::Fallback);
        assert_eq!(snap.meta.source, "fallback");
        assert!(snap.meta.strategy.is_none());
        assert!(!snap.is_empty());
    }
}
