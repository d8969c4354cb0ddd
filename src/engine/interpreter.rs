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
use crate::currency::table::CurrencyTable;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Prefix or suffix on a lone currency code that flips the conversion to
/// go from that currency into the default one.
pub const INVERT_MARKER: char = '!';

/// A fully resolved conversion. Both codes are uppercase and known to the
/// currency table. An absent amount means the rate itself is wanted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
	pub source: String,
	pub dest: String,
	pub amount: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interpretation {
	Request(ConversionRequest),
	/// The tokens do not describe exactly one conversion; the caller
	/// should offer suggestions instead.
	Ambiguous,
	/// A well-formed conversion whose amount is a number `Decimal` cannot
	/// hold, such as `1e30`.
	AmountOutOfRange,
}

/// An amount token: a usable value, or a number beyond `Decimal`'s range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Amount {
	Value(Decimal),
	OutOfRange,
}

/// Parses a token as a decimal number, accepting scientific notation as
/// produced by evaluated arithmetic.
pub fn parse_number(token: &str) -> Option<Decimal> {
	Decimal::from_str(token)
		.or_else(|_| Decimal::from_scientific(token))
		.ok()
}

fn is_number(token: &str) -> bool {
	parse_number(token).is_some()
}

fn parse_amount(token: &str) -> Option<Amount> {
	if let Some(value) = parse_number(token) {
		return Some(Amount::Value(value));
	}

	// `inf` and `NaN` parse as floats but are words here
	let numeric = token.chars().any(|c| c.is_ascii_digit())
		&& token.parse::<f64>().is_ok();
	numeric.then_some(Amount::OutOfRange)
}

/// Works out source, destination and amount from a tokenized sub-query.
///
/// - one token: a currency, converted from the default currency, or into
///   it when marked with `!`
/// - two tokens: an amount and a currency, in either order; the amount's
///   position decides the direction relative to the default currency
/// - three tokens: amount, source, destination
pub fn interpret(
	tokens: &[String],
	default_currency: &str,
	table: &CurrencyTable,
) -> Interpretation {
	let (source, dest, amount) = match tokens {
		[token] => {
			let inverted = token.starts_with(INVERT_MARKER)
				|| token.ends_with(INVERT_MARKER);
			let code = token.replace(INVERT_MARKER, "");

			if inverted {
				(code, default_currency.to_string(), None)
			} else {
				(default_currency.to_string(), code, None)
			}
		},
		[first, second] => match (parse_amount(first), parse_amount(second)) {
			(Some(amount), None) => {
				(default_currency.to_string(), second.clone(), Some(amount))
			},
			(None, Some(amount)) => {
				(first.clone(), default_currency.to_string(), Some(amount))
			},
			_ => return Interpretation::Ambiguous,
		},
		[amount, source, dest] => match parse_amount(amount) {
			Some(amount) => (source.clone(), dest.clone(), Some(amount)),
			None => return Interpretation::Ambiguous,
		},
		_ => return Interpretation::Ambiguous,
	};

	let source = source.to_uppercase();
	let dest = dest.to_uppercase();

	if !table.contains(&source) || !table.contains(&dest) {
		return Interpretation::Ambiguous;
	}

	let amount = match amount {
		None => None,
		Some(Amount::Value(value)) => Some(value),
		Some(Amount::OutOfRange) => return Interpretation::AmountOutOfRange,
	};

	Interpretation::Request(ConversionRequest {
		source,
		dest,
		amount,
	})
}

/// Whether a token reads as a number rather than a currency or search word.
pub fn looks_numeric(token: &str) -> bool {
	is_number(token) || token.starts_with(|c: char| c.is_ascii_digit())
}
