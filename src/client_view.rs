//! Consumer-facing projection of snapshots.
//!
//! Raw extracted entries carry internal annotations (age markers, level
//! parentheticals, redundant time ranges) and advanced/team groups that
//! should never reach a customer chat. The filter is idempotent: running it
//! over its own output changes nothing.

use crate::branches::{normalize, BranchSet};
use crate::snapshot::{Section, Snapshot};
use regex::Regex;

/// Entries longer than this are truncated in price views.
const MAX_PRICE_ENTRY_CHARS: usize = 300;

pub struct ClientView {
    /// Normalized keywords marking advanced/team/audition entries.
    exclusion: Vec<String>,
    max_entries: usize,
    /// Fixed sequence of substitutions stripping internal annotations.
    scrub: Vec<Regex>,
}

impl ClientView {
    pub fn new(exclusion_keywords: &[String], max_entries: usize) -> Self {
        let patterns = [
            // Age markers: "12+", "18 +"
            r"\s*\d+\s*\+",
            // Age-range parentheticals: "(12-14 лет)"
            r"\s*\(\d+[^)]*\)",
            // Level parentheticals: "(продолжающие)", "(pro)"
            r"(?i)\s*\([^)]*(?:продолж|pro)[^)]*\)",
            // Time ranges redundant with display context: "18:00-19:00"
            r"\d{1,2}[:.]\d{2}\s*[-—–]\s*\d{1,2}[:.]\d{2}",
        ];
        let scrub = patterns
            .iter()
            .map(|p| Regex::new(p).expect("scrub regex"))
            .collect();
        Self {
            exclusion: exclusion_keywords.iter().map(|k| normalize(k)).collect(),
            max_entries,
            scrub,
        }
    }

    /// Derive the client view of a schedule snapshot.
    ///
    /// Steps, in order: restrict to the resolved branch filter (unknown
    /// branch gives an empty result, never an error), drop excluded entries,
    /// strip annotations, cap per branch. The exclusion test runs again on
    /// the stripped text: removing an embedded annotation can splice the
    /// surrounding characters into a keyword that was not there before.
    pub fn schedule(
        &self,
        snapshot: &Snapshot,
        branches: &BranchSet,
        branch_filter: Option<&str>,
    ) -> Snapshot {
        let wanted = match branch_filter {
            Some(text) => match branches.resolve(text) {
                Some(branch) => Some(branch.name.clone()),
                // Unknown branch: empty view, not an error.
                None => {
                    return Snapshot {
                        sections: Vec::new(),
                        meta: snapshot.meta.clone(),
                    }
                }
            },
            None => None,
        };

        let sections = snapshot
            .sections
            .iter()
            .filter(|s| wanted.as_deref().map_or(true, |w| s.name == w))
            .filter_map(|s| {
                let entries: Vec<String> = s
                    .entries
                    .iter()
                    .filter(|e| !self.is_excluded(e))
                    .map(|e| self.scrub_entry(e))
                    .filter(|e| !e.is_empty() && !self.is_excluded(e))
                    .take(self.max_entries)
                    .collect();
                (!entries.is_empty()).then(|| Section {
                    name: s.name.clone(),
                    entries,
                })
            })
            .collect();

        Snapshot {
            sections,
            meta: snapshot.meta.clone(),
        }
    }

    /// Price views only get capping and truncation; category text is shown
    /// as found.
    pub fn prices(&self, snapshot: &Snapshot) -> Snapshot {
        let sections = snapshot
            .sections
            .iter()
            .filter_map(|s| {
                let entries: Vec<String> = s
                    .entries
                    .iter()
                    .map(|e| truncate_chars(e, MAX_PRICE_ENTRY_CHARS))
                    .take(self.max_entries)
                    .collect();
                (!entries.is_empty()).then(|| Section {
                    name: s.name.clone(),
                    entries,
                })
            })
            .collect();

        Snapshot {
            sections,
            meta: snapshot.meta.clone(),
        }
    }

    fn is_excluded(&self, entry: &str) -> bool {
        let haystack = normalize(entry);
        self.exclusion.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Run the substitution sequence to fixpoint: one removal can expose a
    /// fresh match spanning the joined text.
    fn scrub_entry(&self, entry: &str) -> String {
        let mut text = collapse_ws(entry);
        loop {
            let mut next = text.clone();
            for re in &self.scrub {
                next = re.replace_all(&next, "").into_owned();
            }
            let next = collapse_ws(&next);
            if next == text {
                return text;
            }
            text = next;
        }
    }
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut out: String = text.chars().take(max - 1).collect();
        out.push('…');
        out
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::snapshot::StrategyKind;

    fn view() -> ClientView {
        let config = EngineConfig::default();
        ClientView::new(&config.exclusion_keywords, config.max_entries_per_branch)
    }

    fn branches() -> BranchSet {
        BranchSet::new(EngineConfig::default().branches)
    }

    fn snapshot(sections: Vec<Section>) -> Snapshot {
        Snapshot::live("https://example.com", StrategyKind::Unstructured, sections)
    }

    #[test]
    fn team_entries_are_excluded_case_insensitively() {
        let snap = snapshot(vec![Section::with_entries(
            "Дыбенко",
            [
                "Hip-Hop Пн 18:00",
                "КОМАНДА по Hip-Hop, отбор Вт 19:00",
                "Jazz Funk Ср 19:00 команда",
            ],
        )]);
        let out = view().schedule(&snap, &branches(), None);
        let entries = &out.sections[0].entries;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("Hip-Hop"));
    }

    #[test]
    fn annotations_are_stripped_but_line_retained() {
        let snap = snapshot(vec![Section::with_entries(
            "Дыбенко",
            ["Пн, Ср: 18:00-19:00 - Hip-Hop 12+ (новички)"],
        )]);
        let out = view().schedule(&snap, &branches(), None);
        let entry = &out.sections[0].entries[0];
        assert!(!entry.contains("12+"), "age marker must be stripped: {entry}");
        assert!(!entry.contains("18:00-19:00"));
        assert!(entry.contains("Hip-Hop"), "line must be retained: {entry}");
        assert!(entry.contains("(новички)"), "beginner note stays: {entry}");
    }

    #[test]
    fn scrubbing_cannot_splice_an_excluded_keyword_into_view() {
        // Stripping the embedded time range glues the surrounding characters
        // into "команда"; the entry must still be hidden.
        let snap = snapshot(vec![Section::with_entries(
            "Дыбенко",
            ["коман18:00-19:00да Hip-Hop Вт 20:00", "Hip-Hop Пн 18:00"],
        )]);
        let out = view().schedule(&snap, &branches(), None);
        assert_eq!(out.sections[0].entries, vec!["Hip-Hop Пн 18:00"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let snap = snapshot(vec![
            Section::with_entries(
                "Звёздная",
                [
                    "High Heels 18+ Пн 19:00",
                    "Twerk (продолжающие) Вт 18:00",
                    "Zumba (для всех) Вс 12:00",
                    "коман18:00-19:00да Jazz Funk Вт 20:00",
                ],
            ),
            Section::with_entries("Озерки", ["K-Pop 10:00-11:00 Сб (8-12 лет)"]),
        ]);
        let v = view();
        let b = branches();
        for filter in [None, Some("звездная"), Some("неизвестный")] {
            let once = v.schedule(&snap, &b, filter);
            let twice = v.schedule(&once, &b, filter);
            assert_eq!(once.sections, twice.sections, "filter {filter:?}");
        }
    }

    #[test]
    fn branch_filter_restricts_to_one_branch() {
        let snap = snapshot(vec![
            Section::with_entries("Дыбенко", ["Hip-Hop Пн 18:00"]),
            Section::with_entries("Купчино", ["Shuffle Вт 18:00"]),
        ]);
        let out = view().schedule(&snap, &branches(), Some("КУПЧИНО"));
        assert_eq!(out.sections.len(), 1);
        assert_eq!(out.sections[0].name, "Купчино");
    }

    #[test]
    fn unknown_branch_filter_gives_empty_result() {
        let snap = snapshot(vec![Section::with_entries("Дыбенко", ["Hip-Hop Пн 18:00"])]);
        let out = view().schedule(&snap, &branches(), Some("Марс"));
        assert!(out.sections.is_empty());
    }

    #[test]
    fn per_branch_cap_applies() {
        let entries: Vec<String> = (0..20).map(|i| format!("Группа {i} Пн 18:00")).collect();
        let snap = snapshot(vec![Section::with_entries("Озерки", entries)]);
        let out = view().schedule(&snap, &branches(), None);
        assert_eq!(out.sections[0].entries.len(), 8);
    }

    #[test]
    fn price_entries_are_truncated_stably() {
        let long = "ц".repeat(400);
        let snap = snapshot(vec![Section::with_entries("Абонементы", [long])]);
        let v = view();
        let once = v.prices(&snap);
        assert_eq!(once.sections[0].entries[0].chars().count(), 300);
        let twice = v.prices(&once);
        assert_eq!(once.sections, twice.sections);
    }
}
