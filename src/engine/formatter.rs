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
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The character rendered as the decimal point. The other of `.` and `,`
/// groups thousands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Separator {
	#[default]
	#[serde(rename = ".")]
	Dot,
	#[serde(rename = ",")]
	Comma,
}

impl Separator {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"." => Some(Separator::Dot),
			"," => Some(Separator::Comma),
			_ => None,
		}
	}

	pub fn decimal_point(self) -> char {
		match self {
			Separator::Dot => '.',
			Separator::Comma => ',',
		}
	}

	pub fn grouping(self) -> char {
		match self {
			Separator::Dot => ',',
			Separator::Comma => '.',
		}
	}
}

impl fmt::Display for Separator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.decimal_point())
	}
}

/// Renders `value` with exactly `decimal_places` fractional digits and
/// grouped thousands, using `separator` as the decimal point. Rounds half
/// to even. With zero decimal places the plain integer is returned.
pub fn format(value: Decimal, decimal_places: u32, separator: Separator) -> String {
	let rounded = value.round_dp_with_strategy(
		decimal_places,
		RoundingStrategy::MidpointNearestEven,
	);

	if decimal_places == 0 {
		return rounded.trunc().to_string();
	}

	let canonical =
		group_thousands(&format!("{:.*}", decimal_places as usize, rounded));
	localize(&canonical, separator)
}

/// Inserts `,` between groups of three integer digits of a rendering
/// that uses `.` as its decimal point.
fn group_thousands(rendered: &str) -> String {
	let (sign, digits) = match rendered.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", rendered),
	};
	let (int_part, fraction) = match digits.split_once('.') {
		Some((i, f)) => (i, Some(f)),
		None => (digits, None),
	};

	let mut int_str = int_part.to_string();
	let mut i = int_str.len() as isize - 3;
	while i > 0 {
		int_str.insert(i as usize, ',');
		i -= 3;
	}

	match fraction {
		Some(f) => format!("{}{}.{}", sign, int_str, f),
		None => format!("{}{}", sign, int_str),
	}
}

/// Swaps the canonical `.`/`,` roles when the user prefers a decimal
/// comma. Renderings without a decimal point are returned as they are.
fn localize(canonical: &str, separator: Separator) -> String {
	if separator == Separator::Dot || !canonical.contains('.') {
		return canonical.to_string();
	}

	canonical
		.chars()
		.map(|c| match c {
			'.' => separator.decimal_point(),
			',' => separator.grouping(),
			other => other,
		})
		.collect()
}
