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
use crate::engine::aggregator::{EngineConfig, DEFAULT_CURRENCY};
use crate::engine::formatter::Separator;
use crate::rates::cache::DEFAULT_TTL_SECS;
use crate::rates::http::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
	/// Currency that one- and two-token queries convert from or into.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_currency: Option<String>,

	/// Decimal point used when rendering numbers ("." or ",").
	#[serde(skip_serializing_if = "Option::is_none")]
	pub separator: Option<Separator>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub provider: Option<Provider>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub assets: Option<Assets>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Provider {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_url: Option<String>,

	/// Seconds a fetched rate stays in the cache.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cache_ttl: Option<u64>,

	/// If set, rates come from this TOML file instead of the network.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rates_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Assets {
	/// CSV dataset replacing the bundled currency list.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currencies: Option<String>,

	/// Directory holding flag images.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub flags: Option<String>,
}

impl Config {
	pub fn engine_config(&self) -> EngineConfig {
		EngineConfig {
			default_currency: self
				.default_currency
				.clone()
				.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
			separator: self.separator.unwrap_or_default(),
		}
	}

	pub fn api_url(&self) -> &str {
		self.provider
			.as_ref()
			.and_then(|p| p.api_url.as_deref())
			.unwrap_or(DEFAULT_API_URL)
	}

	pub fn cache_ttl(&self) -> u64 {
		self.provider
			.as_ref()
			.and_then(|p| p.cache_ttl)
			.unwrap_or(DEFAULT_TTL_SECS)
	}

	pub fn rates_file(&self) -> Option<&str> {
		self.provider.as_ref().and_then(|p| p.rates_file.as_deref())
	}

	pub fn currencies_file(&self) -> Option<&str> {
		self.assets.as_ref().and_then(|a| a.currencies.as_deref())
	}

	pub fn flags_dir(&self) -> Option<&str> {
		self.assets.as_ref().and_then(|a| a.flags.as_deref())
	}
}
