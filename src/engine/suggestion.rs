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
use crate::currency::table::{Currency, CurrencyTable};
use crate::engine::aggregator::SuggestionRequest;
use crate::engine::interpreter::{looks_numeric, INVERT_MARKER};
use std::collections::BTreeSet;

/// A currency offered in place of an ambiguous sub-query.
#[derive(Debug, PartialEq, Eq)]
pub struct Suggestion<'a> {
	pub currency: &'a Currency,
	/// The query with the search words replaced by this currency's code.
	pub autocomplete: String,
}

/// Lists the currencies that match the search words of an ambiguous
/// sub-query. Search words are tokens that are neither numbers nor known
/// currency codes; without any, every currency matches.
pub fn suggest<'a>(
	request: &SuggestionRequest,
	table: &'a CurrencyTable,
) -> Vec<Suggestion<'a>> {
	let words = search_words(&request.tokens, table);

	let mut kept = request.tokens.clone();
	for word in &words {
		if let Some(pos) = kept.iter().position(|t| t == word) {
			kept.remove(pos);
		}
	}

	let needles: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

	table
		.iter()
		.filter(|currency| {
			let haystack =
				format!("{} {}", currency.name, currency.code).to_lowercase();
			needles.iter().all(|n| haystack.contains(n.as_str()))
		})
		.map(|currency| {
			let mut autocomplete = kept.clone();
			autocomplete.push(currency.code.clone());
			Suggestion {
				currency,
				autocomplete: autocomplete.join(" "),
			}
		})
		.collect()
}

fn search_words<'t>(tokens: &'t [String], table: &CurrencyTable) -> Vec<&'t str> {
	let codes: BTreeSet<&str> = table.codes().collect();

	tokens
		.iter()
		.map(String::as_str)
		.filter(|token| !looks_numeric(token))
		.filter(|token| {
			let code = token.replace(INVERT_MARKER, "").to_uppercase();
			!codes.contains(code.as_str())
		})
		.collect()
}
