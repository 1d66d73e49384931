//! Repeated container blocks — the semi-structured strategy.
//!
//! Many studio site builds render the schedule as repeated `<div>` blocks
//! with sub-fields for day, time and group name instead of a table. Selector
//! lists below cover the class names observed across site revisions.

use super::text::{collapse_ws, is_schedule_like};
use super::{push_entry, Extraction};
use crate::branches::BranchSet;
use crate::snapshot::Section;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

const CONTAINER_SEL: &str = "div[class*=\"schedule\"], div[class*=\"raspisanie\"], .raspisanie-block, .schedule-container";
const ITEM_SEL: &str = ".schedule-item, .group-item, .lesson";
const DAY_SEL: &str = ".day, .weekday";
const TIME_SEL: &str = ".time, .schedule-time";
const NAME_SEL: &str = ".name, .group-name, .title";

/// How many sibling elements after a price heading are harvested.
const PRICE_CONTENT_SPAN: usize = 5;

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("bad selector `{s}`: {e}"))
}

fn first_text(scope: ElementRef, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(|el| collapse_ws(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

pub fn schedule(html: &str, branches: &BranchSet) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let container_sel = selector(CONTAINER_SEL)?;
    let item_sel = selector(ITEM_SEL)?;
    let day_sel = selector(DAY_SEL)?;
    let time_sel = selector(TIME_SEL)?;
    let name_sel = selector(NAME_SEL)?;

    let mut sections: Vec<Section> = Vec::new();
    for container in doc.select(&container_sel) {
        let aggregate: String = container.text().collect();
        let Some(branch) = branches.resolve(&aggregate) else {
            continue;
        };
        for item in container.select(&item_sel) {
            // Concatenate whichever sub-fields are present.
            let parts: Vec<String> = [
                first_text(item, &day_sel),
                first_text(item, &time_sel),
                first_text(item, &name_sel),
            ]
            .into_iter()
            .flatten()
            .collect();
            if parts.is_empty() {
                continue;
            }
            let entry = collapse_ws(&parts.join(" "));
            if is_schedule_like(&entry) {
                push_entry(&mut sections, &branch.name, entry);
            }
        }
    }
    Ok(Extraction::from_sections(sections))
}

/// Price blocks: headings or emphasized text naming a price category, with
/// the following few sibling elements harvested as that category's content.
pub fn prices(html: &str) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let heading_sel = selector("h1, h2, h3, h4, h5, h6, strong, b")?;

    let mut sections: Vec<Section> = Vec::new();
    for heading in doc.select(&heading_sel) {
        let title = collapse_ws(&heading.text().collect::<String>());
        let lower = title.to_lowercase();
        if !(lower.contains("цена") || lower.contains("стоимость") || lower.contains("абонемент")) {
            continue;
        }
        let category: String = title.chars().take(80).collect();

        for sibling in heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take(PRICE_CONTENT_SPAN)
        {
            // The next heading ends this category's content.
            if matches!(
                sibling.value().name(),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ) {
                break;
            }
            let text = collapse_ws(&sibling.text().collect::<String>());
            if text.chars().count() > 10 {
                push_entry(&mut sections, &category, text);
            }
        }
    }
    Ok(Extraction::from_sections(sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn branches() -> BranchSet {
        BranchSet::new(EngineConfig::default().branches)
    }

    #[test]
    fn items_concatenate_present_subfields() {
        let html = r#"
            <div class="schedule-block">
              <h3>Филиал Звёздная</h3>
              <div class="schedule-item">
                <span class="day">Пн, Чт</span>
                <span class="time">19:00</span>
                <span class="name">High Heels</span>
              </div>
              <div class="schedule-item">
                <span class="time">18:00</span>
                <span class="name">Twerk начальный</span>
              </div>
            </div>
        "#;
        let Extraction::Entries(sections) = schedule(html, &branches()).unwrap() else {
            panic!("expected entries");
        };
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Звёздная");
        assert_eq!(
            sections[0].entries,
            vec!["Пн, Чт 19:00 High Heels", "18:00 Twerk начальный"]
        );
    }

    #[test]
    fn containers_without_branch_are_ignored() {
        let html = r#"
            <div class="schedule-block">
              <div class="schedule-item"><span class="time">19:00</span>
              <span class="name">High Heels</span></div>
            </div>
        "#;
        assert!(matches!(
            schedule(html, &branches()).unwrap(),
            Extraction::Empty
        ));
    }

    #[test]
    fn price_headings_capture_following_content() {
        let html = r#"
            <h2>Стоимость абонементов</h2>
            <p>4 занятия — 3500 рублей в месяц</p>
            <p>8 занятий — 6000 рублей в месяц</p>
            <h2>Новости студии</h2>
            <p>Открыта запись на осенний сезон в новые группы</p>
        "#;
        let Extraction::Entries(sections) = prices(html).unwrap() else {
            panic!("expected entries");
        };
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Стоимость абонементов");
        assert_eq!(sections[0].entries.len(), 2);
    }
}
