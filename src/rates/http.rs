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
use crate::rates::provider::RateProvider;
use anyhow::{bail, Error};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.frankfurter.app";

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LatestResponse {
	rates: BTreeMap<String, Decimal>,
}

/// Fetches live rates from a Frankfurter-style API:
/// `GET {base_url}/latest?from=BRL&to=CLP`.
pub struct HttpRateProvider {
	client: reqwest::blocking::Client,
	base_url: String,
}

impl HttpRateProvider {
	pub fn new(base_url: &str) -> Result<Self, Error> {
		let client = reqwest::blocking::Client::builder()
			.timeout(TIMEOUT)
			.build()?;

		Ok(HttpRateProvider {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}
}

impl RateProvider for HttpRateProvider {
	fn raw_rate(&self, base: &str, quote: &str) -> Result<Option<Decimal>, Error> {
		if base == quote {
			return Ok(Some(Decimal::ONE));
		}

		let url = format!("{}/latest", self.base_url);

		debug!(%url, base, quote, "sending rate request");
		let response = self
			.client
			.get(&url)
			.query(&[("from", base), ("to", quote)])
			.send()?;

		// unknown currencies are reported with these
		match response.status() {
			StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
				return Ok(None)
			},
			status if !status.is_success() => {
				bail!("Request failed with status: {}", status)
			},
			_ => {},
		}

		let body: LatestResponse = response.json()?;
		Ok(body.rates.get(quote).copied())
	}
}
