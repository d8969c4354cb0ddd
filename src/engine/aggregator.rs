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
use crate::engine::formatter::{self, Separator};
use crate::engine::interpreter::{self, ConversionRequest, Interpretation};
use crate::engine::precision;
use crate::engine::resolver;
use crate::engine::tokenizer::Tokenizer;
use crate::rates::provider::RateProvider;
use rust_decimal::Decimal;
use tracing::{debug, warn};

pub const DEFAULT_CURRENCY: &str = "USD";

pub const NO_RATE_MESSAGE: &str =
	"No exchange rate found for the specified currencies...";

pub const TOO_LARGE_MESSAGE: &str = "Converted amount is too large";

/// Settings that shape how queries are read and results are rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
	pub default_currency: String,
	pub separator: Separator,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			default_currency: DEFAULT_CURRENCY.to_string(),
			separator: Separator::default(),
		}
	}
}

/// A successful conversion, ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
	pub title: String,
	pub subtitle: String,
	/// The converted amount, unrounded.
	pub raw_value: Decimal,
	/// Flag id of the destination currency.
	pub icon: String,
}

/// A sub-query that did not resolve to a conversion, carrying its tokens
/// so the caller can offer suggestions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionRequest {
	pub tokens: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	Converted(ConversionResult),
	Suggest(SuggestionRequest),
	Failed(String),
}

impl Outcome {
	pub fn status(&self) -> Status {
		match self {
			Outcome::Converted(_) => Status::Success,
			Outcome::Suggest(_) => Status::NeedsSuggestion,
			Outcome::Failed(_) => Status::NoRate,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
	Success,
	NoRate,
	NeedsSuggestion,
}

impl Status {
	pub fn code(self) -> i32 {
		match self {
			Status::Success => 0,
			Status::NoRate => 1,
			Status::NeedsSuggestion => 100,
		}
	}
}

/// Everything one query produced: one outcome per sub-query, in query
/// order, and the first non-success status among them.
#[derive(Debug)]
pub struct Report {
	pub outcomes: Vec<Outcome>,
	pub status: Status,
}

pub struct Engine<'a> {
	tokenizer: Tokenizer,
	table: &'a CurrencyTable,
	provider: &'a dyn RateProvider,
	config: EngineConfig,
}

impl<'a> Engine<'a> {
	pub fn new(
		table: &'a CurrencyTable,
		provider: &'a dyn RateProvider,
		config: EngineConfig,
	) -> Self {
		Self {
			tokenizer: Tokenizer::new(),
			table,
			provider,
			config,
		}
	}

	/// Runs every sub-query of `raw` independently; a failing sub-query
	/// never prevents the others from producing results.
	pub fn run(&self, raw: &str) -> Report {
		let outcomes: Vec<Outcome> = self
			.tokenizer
			.split(raw)
			.into_iter()
			.map(|sub_query| self.run_one(sub_query.tokens))
			.collect();

		let status = outcomes
			.iter()
			.map(Outcome::status)
			.find(|s| *s != Status::Success)
			.unwrap_or(Status::Success);

		Report { outcomes, status }
	}

	fn run_one(&self, tokens: Vec<String>) -> Outcome {
		match interpreter::interpret(
			&tokens,
			&self.config.default_currency,
			self.table,
		) {
			Interpretation::Request(request) => self.convert(&request, tokens),
			Interpretation::Ambiguous => {
				debug!(?tokens, "query is ambiguous");
				Outcome::Suggest(SuggestionRequest { tokens })
			},
			Interpretation::AmountOutOfRange => {
				Outcome::Failed(TOO_LARGE_MESSAGE.to_string())
			},
		}
	}

	fn convert(&self, request: &ConversionRequest, tokens: Vec<String>) -> Outcome {
		let (Some(source), Some(dest)) = (
			self.table.lookup(&request.source),
			self.table.lookup(&request.dest),
		) else {
			return Outcome::Suggest(SuggestionRequest { tokens });
		};

		let rate = match resolver::resolve(&source.code, &dest.code, self.provider)
		{
			Ok(Some(rate)) => rate,
			Ok(None) => return Outcome::Failed(NO_RATE_MESSAGE.to_string()),
			Err(e) => {
				warn!(
					source = %source.code,
					dest = %dest.code,
					error = %e,
					"rate lookup failed"
				);
				return Outcome::Failed(format!(
					"Failed to fetch the exchange rate: {}",
					e
				));
			},
		};

		debug!(
			source = %source.code,
			dest = %dest.code,
			rate = %rate.value,
			inverted = rate.was_inverted,
			"resolved rate"
		);

		let amount = request.amount.unwrap_or(Decimal::ONE);
		let Some(converted) = amount.checked_mul(rate.value) else {
			return Outcome::Failed(TOO_LARGE_MESSAGE.to_string());
		};

		Outcome::Converted(self.describe(source, dest, converted, rate.value))
	}

	fn describe(
		&self,
		source: &Currency,
		dest: &Currency,
		converted: Decimal,
		rate: Decimal,
	) -> ConversionResult {
		let separator = self.config.separator;
		let value = formatter::format(
			converted,
			precision::decimal_places(rate),
			separator,
		);
		let rate_str = formatter::format(
			rate,
			precision::rate_decimal_places(rate),
			separator,
		);

		ConversionResult {
			title: format!("{} {}", dest.symbol, value),
			subtitle: format!(
				"{} ({}) -> {} ({}) with rate {}",
				source.code, source.name, dest.code, dest.name, rate_str
			),
			raw_value: converted,
			icon: dest.flag.clone(),
		}
	}
}
