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
use rust_decimal::Decimal;

/// Fewest fractional digits rendered for a converted amount or a rate.
pub const MIN_DECIMAL_PLACES: u32 = 4;

/// Fractional digits rendered for a rate with no fractional part.
pub const INTEGRAL_RATE_PLACES: u32 = 2;

/// Number of fractional digits worth showing for values derived from
/// `rate`: its significant fractional digits, but never fewer than
/// [`MIN_DECIMAL_PLACES`]. Tiny rates such as 0.000007 need more than four
/// digits to show up at all.
pub fn decimal_places(rate: Decimal) -> u32 {
	significant_fraction_digits(rate).max(MIN_DECIMAL_PLACES)
}

/// Like [`decimal_places`], but for rendering the rate itself, where an
/// integral rate only gets [`INTEGRAL_RATE_PLACES`].
pub fn rate_decimal_places(rate: Decimal) -> u32 {
	if rate.fract().is_zero() {
		INTEGRAL_RATE_PLACES
	} else {
		decimal_places(rate)
	}
}

fn significant_fraction_digits(rate: Decimal) -> u32 {
	rate.fract().normalize().scale()
}
