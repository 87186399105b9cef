//! Render model of the controller state
//!
//! `Screen` resolves every label into the active language so front-ends
//! only lay text out. Its `Display` impl is the terminal layout.

use crate::app::Controller;
use crate::messages::Catalog;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub title: String,
    pub subtitle: String,
    /// Label of the language switch: names the *other* language
    pub lang_toggle: String,
    pub from_label: String,
    pub from_value: String,
    pub to_label: String,
    pub to_value: String,
    /// "Find Bus", or "Searching..." while loading
    pub submit_label: String,
    pub submit_enabled: bool,
    pub result: Option<ResultView>,
    pub recent_label: String,
    pub history: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub from: String,
    pub to: String,
    /// `(label, value)` for fare, time and distance, in that order
    pub facts: Vec<(String, String)>,
    pub summary: String,
    pub buses: Vec<BusRow>,
    /// Shown instead of bus rows when the provider listed none
    pub empty_message: Option<String>,
    pub tips: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusRow {
    pub name: String,
    /// "Route Details" when collapsed, "Hide" when expanded
    pub toggle_label: String,
    pub expanded: bool,
    pub starts_label: String,
    pub start_point: String,
    pub ends_label: String,
    pub end_point: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub from: String,
    pub to: String,
    pub date: String,
}

impl Screen {
    pub fn build(controller: &Controller) -> Screen {
        let language = controller.language();
        let label = |key: &str| controller.label(key);

        let result = controller.suggestion().map(|suggestion| {
            let buses: Vec<BusRow> = suggestion
                .suggested_buses
                .iter()
                .enumerate()
                .map(|(index, bus)| {
                    let expanded = controller.expanded_row() == Some(index);
                    BusRow {
                        name: bus.name.clone(),
                        toggle_label: label(if expanded { "hide" } else { "route-range" }),
                        expanded,
                        starts_label: label("route-starts"),
                        start_point: bus.start_point.clone(),
                        ends_label: label("route-ends"),
                        end_point: bus.end_point.clone(),
                    }
                })
                .collect();

            ResultView {
                from: suggestion.from.clone(),
                to: suggestion.to.clone(),
                facts: vec![
                    (label("fare"), suggestion.estimated_fare.clone()),
                    (label("time"), suggestion.travel_time.clone()),
                    (label("distance"), suggestion.distance.clone()),
                ],
                summary: controller.catalog().localize(
                    language,
                    "buses-found",
                    &[Catalog::format_number(language, buses.len())],
                ),
                empty_message: buses.is_empty().then(|| label("no-routes")),
                buses,
                tips: suggestion.tips.clone(),
            }
        });

        let history = controller
            .history()
            .entries()
            .iter()
            .map(|entry| HistoryRow {
                from: entry.from.clone(),
                to: entry.to.clone(),
                date: Catalog::format_timestamp(language, entry.timestamp),
            })
            .collect();

        Screen {
            title: label("title"),
            subtitle: label("subtitle"),
            lang_toggle: label("lang-toggle"),
            from_label: label("from-placeholder"),
            from_value: controller.from().to_string(),
            to_label: label("to-placeholder"),
            to_value: controller.to().to_string(),
            submit_label: label(if controller.is_loading() {
                "searching"
            } else {
                "find-bus"
            }),
            submit_enabled: !controller.is_loading(),
            result,
            recent_label: label("recent-searches"),
            history,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} · {}    [/lang: {}]", self.title, self.subtitle, self.lang_toggle)?;
        writeln!(f, "  {} {}", self.from_label, self.from_value)?;
        writeln!(f, "  {} {}", self.to_label, self.to_value)?;
        writeln!(f, "  [{}]", self.submit_label)?;

        if let Some(result) = &self.result {
            writeln!(f)?;
            writeln!(f, "{} → {}", result.from, result.to)?;
            let facts: Vec<String> = result
                .facts
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            writeln!(f, "  {}", facts.join(" | "))?;

            match &result.empty_message {
                Some(message) => writeln!(f, "  {}", message)?,
                None => {
                    writeln!(f, "  {}", result.summary)?;
                    for (i, bus) in result.buses.iter().enumerate() {
                        writeln!(f, "  {}. {}  [{}]", i + 1, bus.name, bus.toggle_label)?;
                        if bus.expanded {
                            writeln!(f, "       {} {}", bus.starts_label, bus.start_point)?;
                            writeln!(f, "       {} {}", bus.ends_label, bus.end_point)?;
                        }
                    }
                }
            }
            if !result.tips.is_empty() {
                writeln!(f, "  \"{}\"", result.tips)?;
            }
        }

        if !self.history.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.recent_label)?;
            for (i, row) in self.history.iter().enumerate() {
                writeln!(f, "  {}. {} → {}  ({})", i + 1, row.from, row.to, row.date)?;
            }
        }
        Ok(())
    }
}
