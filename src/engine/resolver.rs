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
use anyhow::Error;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Smallest rate providers report; true rates below it come back floored
/// to exactly this value.
pub const QUANTUM: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Significant digits kept from a reciprocal, about what a double carries.
/// Non-terminating reciprocals otherwise fill all 28 digits of a `Decimal`.
const RECIPROCAL_DIGITS: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRate {
	pub value: Decimal,
	/// The value is the reciprocal of the inverse pair's rate.
	pub was_inverted: bool,
}

/// Fetches the rate for `source -> dest`. A rate floored to [`QUANTUM`] is
/// replaced by the reciprocal of the inverse pair's rate, if that pair
/// quotes something usable. At most two provider calls are made.
///
/// Returns `Ok(None)` when the pair cannot be quoted.
pub fn resolve(
	source: &str,
	dest: &str,
	provider: &dyn RateProvider,
) -> Result<Option<ResolvedRate>, Error> {
	let Some(rate) = provider.raw_rate(source, dest)? else {
		return Ok(None);
	};

	let direct = ResolvedRate {
		value: rate,
		was_inverted: false,
	};

	if rate != QUANTUM {
		return Ok(Some(direct));
	}

	debug!(source, dest, "rate at quantization floor, trying inverse pair");

	let inverse = match provider.raw_rate(dest, source) {
		Ok(Some(inverse)) => inverse,
		Ok(None) => return Ok(Some(direct)),
		Err(e) => {
			warn!(source, dest, error = %e, "inverse rate lookup failed");
			return Ok(Some(direct));
		},
	};

	if inverse <= Decimal::ZERO || inverse == QUANTUM {
		return Ok(Some(direct));
	}

	let reciprocal = Decimal::ONE
		.checked_div(inverse)
		.and_then(|value| value.round_sf(RECIPROCAL_DIGITS))
		.map(|value| value.normalize());

	Ok(Some(reciprocal.map_or(direct, |value| ResolvedRate {
		value,
		was_inverted: true,
	})))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rates::provider::FixedRates;
	use anyhow::bail;
	use rust_decimal_macros::dec;
	use std::cell::RefCell;

	/// Records every pair requested from the wrapped provider.
	struct Recording {
		inner: FixedRates,
		calls: RefCell<Vec<(String, String)>>,
	}

	impl Recording {
		fn new(inner: FixedRates) -> Self {
			Self {
				inner,
				calls: RefCell::new(Vec::new()),
			}
		}
	}

	impl RateProvider for Recording {
		fn raw_rate(
			&self,
			base: &str,
			quote: &str,
		) -> Result<Option<Decimal>, Error> {
			self.calls
				.borrow_mut()
				.push((base.to_string(), quote.to_string()));
			self.inner.raw_rate(base, quote)
		}
	}

	struct Failing;

	impl RateProvider for Failing {
		fn raw_rate(&self, _: &str, _: &str) -> Result<Option<Decimal>, Error> {
			bail!("connection refused")
		}
	}

	#[test]
	fn test_direct_rate() {
		let provider =
			Recording::new(FixedRates::new().with_rate("BRL", "CLP", dec!(142.5)));

		let rate = resolve("BRL", "CLP", &provider).unwrap().unwrap();
		assert_eq!(rate.value, dec!(142.5));
		assert!(!rate.was_inverted);
		assert_eq!(provider.calls.borrow().len(), 1);
	}

	#[test]
	fn test_no_rate() {
		let provider = Recording::new(FixedRates::new());
		assert_eq!(resolve("BRL", "CLP", &provider).unwrap(), None);
		assert_eq!(provider.calls.borrow().len(), 1);
	}

	#[test]
	fn test_floored_rate_is_corrected() {
		let provider = Recording::new(
			FixedRates::new()
				.with_rate("IDR", "USD", dec!(0.0001))
				.with_rate("USD", "IDR", dec!(142857.0)),
		);

		let rate = resolve("IDR", "USD", &provider).unwrap().unwrap();
		assert_eq!(rate.value, dec!(0.000007000007000007));
		assert_ne!(rate.value, QUANTUM);
		assert!(rate.was_inverted);
		assert_eq!(*provider.calls.borrow(), vec![
			("IDR".to_string(), "USD".to_string()),
			("USD".to_string(), "IDR".to_string()),
		]);
	}

	#[test]
	fn test_reciprocal_keeps_fifteen_digits() {
		let provider = FixedRates::new()
			.with_rate("AAA", "BBB", dec!(0.0001))
			.with_rate("BBB", "AAA", dec!(3));

		let rate = resolve("AAA", "BBB", &provider).unwrap().unwrap();
		assert_eq!(rate.value, dec!(0.333333333333333));
		assert_eq!(rate.value.scale(), 15);

		let provider = FixedRates::new()
			.with_rate("AAA", "BBB", dec!(0.0001))
			.with_rate("BBB", "AAA", dec!(15625));

		let rate = resolve("AAA", "BBB", &provider).unwrap().unwrap();
		assert_eq!(rate.value, dec!(0.000064));
		assert_eq!(rate.value.scale(), 6);
	}

	#[test]
	fn test_floored_rate_kept_without_inverse() {
		let provider =
			Recording::new(FixedRates::new().with_rate("IDR", "USD", dec!(0.0001)));

		let rate = resolve("IDR", "USD", &provider).unwrap().unwrap();
		assert_eq!(rate.value, QUANTUM);
		assert!(!rate.was_inverted);
		assert_eq!(provider.calls.borrow().len(), 2);
	}

	#[test]
	fn test_floored_both_ways_is_accepted() {
		let provider = Recording::new(
			FixedRates::new()
				.with_rate("AAA", "BBB", dec!(0.0001))
				.with_rate("BBB", "AAA", dec!(0.00010)),
		);

		let rate = resolve("AAA", "BBB", &provider).unwrap().unwrap();
		assert_eq!(rate.value, QUANTUM);
		assert!(!rate.was_inverted);
		assert_eq!(provider.calls.borrow().len(), 2);
	}

	#[test]
	fn test_provider_failure_propagates() {
		assert!(resolve("BRL", "CLP", &Failing).is_err());
	}

	#[test]
	fn test_quantum_value() {
		assert_eq!(QUANTUM, dec!(0.0001));
	}
}
