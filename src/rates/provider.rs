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
use anyhow::{anyhow, bail, Error};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Source of raw exchange rates for an ordered currency pair.
///
/// `Ok(None)` means the pair cannot be quoted; `Err` is reserved for hard
/// failures such as transport errors.
pub trait RateProvider {
	fn raw_rate(&self, base: &str, quote: &str) -> Result<Option<Decimal>, Error>;
}

/// Shape of an offline rates file:
///
/// ```toml
/// [rates]
/// "BRL/CLP" = "142.5"
/// ```
#[derive(Debug, Default, Deserialize)]
struct RatesFile {
	#[serde(default)]
	rates: BTreeMap<String, Decimal>,
}

/// A fixed table of rates, e.g. for offline use. Pairs are directional;
/// nothing is inferred for the inverse pair.
#[derive(Debug, Default)]
pub struct FixedRates {
	rates: BTreeMap<(String, String), Decimal>,
}

impl FixedRates {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn with_rate(mut self, base: &str, quote: &str, rate: Decimal) -> Self {
		self.insert(base, quote, rate);
		self
	}

	pub fn insert(&mut self, base: &str, quote: &str, rate: Decimal) {
		self.rates
			.insert((base.to_uppercase(), quote.to_uppercase()), rate);
	}

	pub fn from_path(path: &Path) -> Result<Self, Error> {
		let content = fs::read_to_string(path).map_err(|e| {
			anyhow!("failed to read rates {}: {}", path.display(), e)
		})?;
		Self::from_toml(&content)
	}

	pub fn from_toml(content: &str) -> Result<Self, Error> {
		let file: RatesFile = toml::from_str(content)
			.map_err(|e| anyhow!("failed to parse rates: {}", e))?;

		let mut out = Self::new();
		for (pair, rate) in file.rates {
			let Some((base, quote)) = pair.split_once('/') else {
				bail!("Invalid currency pair '{}', expected BASE/QUOTE", pair);
			};
			if rate <= Decimal::ZERO {
				bail!("Rate for {} must be positive", pair);
			}
			out = out.with_rate(base.trim(), quote.trim(), rate);
		}

		Ok(out)
	}
}

impl RateProvider for FixedRates {
	fn raw_rate(&self, base: &str, quote: &str) -> Result<Option<Decimal>, Error> {
		if base.eq_ignore_ascii_case(quote) {
			return Ok(Some(Decimal::ONE));
		}

		Ok(self
			.rates
			.get(&(base.to_uppercase(), quote.to_uppercase()))
			.copied())
	}
}
