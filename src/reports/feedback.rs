/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::currency::flags::FlagIcons;
use crate::currency::table::CurrencyTable;
use crate::engine::aggregator::{Outcome, Report};
use crate::engine::suggestion;
use crate::reports::table::Table;
use anyhow::Error;
use serde::Serialize;

pub const NO_CURRENCY_MESSAGE: &str = "No currency found.";

/// One displayable entry, shaped like an Alfred script-filter item.
#[derive(Debug, Default, Serialize)]
pub struct Item {
	pub title: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub subtitle: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub arg: Option<String>,
	pub valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub autocomplete: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<Icon>,
}

#[derive(Debug, Serialize)]
pub struct Icon {
	pub path: String,
}

impl Item {
	/// A plain informational line.
	pub fn message(title: &str, subtitle: &str) -> Self {
		Self {
			title: title.to_string(),
			subtitle: subtitle.to_string(),
			..Default::default()
		}
	}
}

/// Collects the items to show the user, then renders them as a table or
/// as script-filter JSON.
#[derive(Debug, Default, Serialize)]
pub struct Feedback {
	items: Vec<Item>,
}

impl Feedback {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn add_item(&mut self, item: Item) {
		self.items.push(item);
	}

	pub fn add_message(&mut self, title: &str, subtitle: &str) {
		self.add_item(Item::message(title, subtitle));
	}

	/// Adds one item per conversion or failure, and the suggested
	/// currencies for every ambiguous sub-query.
	pub fn add_report(
		&mut self,
		report: &Report,
		table: &CurrencyTable,
		icons: &FlagIcons,
	) {
		for outcome in &report.outcomes {
			match outcome {
				Outcome::Converted(result) => self.add_item(Item {
					title: result.title.clone(),
					subtitle: result.subtitle.clone(),
					arg: Some(result.raw_value.to_string()),
					valid: true,
					autocomplete: None,
					icon: Some(Icon {
						path: icons.icon_path(&result.icon).display().to_string(),
					}),
				}),
				Outcome::Failed(message) => self.add_message(message, ""),
				Outcome::Suggest(request) => {
					let suggestions = suggestion::suggest(request, table);
					if suggestions.is_empty() {
						self.add_message(NO_CURRENCY_MESSAGE, "");
					}

					for s in suggestions {
						self.add_item(Item {
							title: s.currency.name.clone(),
							subtitle: s.currency.code.clone(),
							arg: None,
							valid: false,
							autocomplete: Some(s.autocomplete),
							icon: Some(Icon {
								path: icons
									.icon_path(&s.currency.flag)
									.display()
									.to_string(),
							}),
						});
					}
				},
			}
		}
	}

	/// One row per item: title, then subtitle and autocomplete when
	/// present.
	pub fn render_text(&self) -> String {
		let mut table = Table::new(3);
		for item in &self.items {
			let mut row = vec![item.title.as_str()];
			if !item.subtitle.is_empty() {
				row.push(item.subtitle.as_str());
			}
			if let Some(autocomplete) = &item.autocomplete {
				row.push(autocomplete.as_str());
			}
			table.add_row(row);
		}
		table.render()
	}

	pub fn render_json(&self) -> Result<String, Error> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}
