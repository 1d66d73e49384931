//! Table extraction — the structured strategy.
//!
//! Looks for table-like repeating structures. Each row with at least two
//! cell-like fragments becomes one entry (time/descriptor + group name).
//! Rows are attributed to a branch through the table's nearest preceding
//! heading, falling back to the table's aggregate text.

use super::text::{collapse_ws, is_schedule_like};
use super::{push_entry, Extraction};
use crate::branches::BranchSet;
use crate::snapshot::Section;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Row cap per price table, to keep noise tables from flooding a category.
const MAX_PRICE_ROWS: usize = 20;

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("bad selector `{s}`: {e}"))
}

/// Nearest heading element before the table, if any.
fn preceding_heading(table: ElementRef) -> Option<String> {
    for sibling in table.prev_siblings() {
        if let Some(el) = ElementRef::wrap(sibling) {
            if matches!(
                el.value().name(),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ) {
                return Some(collapse_ws(&el.text().collect::<String>()));
            }
        }
    }
    None
}

pub fn schedule(html: &str, branches: &BranchSet) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td, th")?;

    let mut sections: Vec<Section> = Vec::new();
    for table in doc.select(&table_sel) {
        let heading = preceding_heading(table);
        let aggregate: String = table.text().collect();
        let branch = heading
            .as_deref()
            .and_then(|h| branches.resolve(h))
            .or_else(|| branches.resolve(&aggregate));
        let Some(branch) = branch else { continue };

        for row in table.select(&row_sel) {
            let cells: Vec<String> = row
                .select(&cell_sel)
                .map(|c| collapse_ws(&c.text().collect::<String>()))
                .filter(|t| !t.is_empty())
                .collect();
            if cells.len() < 2 {
                continue;
            }
            let entry = collapse_ws(&format!("{} {}", cells[0], cells[1]));
            if is_schedule_like(&entry) {
                push_entry(&mut sections, &branch.name, entry);
            }
        }
    }
    Ok(Extraction::from_sections(sections))
}

/// Price tables: any table whose text mentions pricing vocabulary becomes a
/// category, keyed by its preceding heading (or a numbered placeholder).
pub fn prices(html: &str) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;

    let mut sections: Vec<Section> = Vec::new();
    for (idx, table) in doc.select(&table_sel).enumerate() {
        let aggregate: String = table.text().collect::<String>().to_lowercase();
        if !(aggregate.contains("цена")
            || aggregate.contains("стоимость")
            || aggregate.contains("абонемент")
            || aggregate.contains("руб")
            || aggregate.contains('₽'))
        {
            continue;
        }
        let category =
            preceding_heading(table).unwrap_or_else(|| format!("Таблица цен {}", idx + 1));

        for row in table.select(&row_sel).take(MAX_PRICE_ROWS) {
            let text = collapse_ws(&row.text().collect::<String>());
            if text.chars().count() > 5 {
                push_entry(&mut sections, &category, text);
            }
        }
    }
    Ok(Extraction::from_sections(sections))
}
