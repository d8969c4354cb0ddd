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
use anyhow::{bail, Error};
use std::fmt;

/// The value of an evaluated arithmetic token. Integer operands stay
/// integral through `+`, `-` and `*`; a decimal operand or any division
/// switches to IEEE double arithmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
	Int(i64),
	Float(f64),
}

impl Number {
	fn as_f64(self) -> f64 {
		match self {
			Number::Int(i) => i as f64,
			Number::Float(f) => f,
		}
	}

	fn add(self, rhs: Self) -> Self {
		match (self, rhs) {
			(Number::Int(a), Number::Int(b)) => a
				.checked_add(b)
				.map_or(Number::Float(a as f64 + b as f64), Number::Int),
			_ => Number::Float(self.as_f64() + rhs.as_f64()),
		}
	}

	fn sub(self, rhs: Self) -> Self {
		match (self, rhs) {
			(Number::Int(a), Number::Int(b)) => a
				.checked_sub(b)
				.map_or(Number::Float(a as f64 - b as f64), Number::Int),
			_ => Number::Float(self.as_f64() - rhs.as_f64()),
		}
	}

	fn mul(self, rhs: Self) -> Self {
		match (self, rhs) {
			(Number::Int(a), Number::Int(b)) => a
				.checked_mul(b)
				.map_or(Number::Float(a as f64 * b as f64), Number::Int),
			_ => Number::Float(self.as_f64() * rhs.as_f64()),
		}
	}

	fn div(self, rhs: Self) -> Result<Self, Error> {
		if rhs.as_f64() == 0.0 {
			bail!("division by zero");
		}
		Ok(Number::Float(self.as_f64() / rhs.as_f64()))
	}

	fn neg(self) -> Self {
		match self {
			Number::Int(i) => {
				i.checked_neg().map_or(Number::Float(-(i as f64)), Number::Int)
			},
			Number::Float(f) => Number::Float(-f),
		}
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Number::Int(i) => write!(f, "{}", i),
			// Debug gives the shortest round-trip form and keeps the
			// trailing ".0" on integral floats
			Number::Float(v) => write!(f, "{:?}", v),
		}
	}
}

/// Evaluates a basic arithmetic expression made of decimal literals and
/// `+ - * /`, with the usual precedence and unary signs. Anything else,
/// including a division by zero or a non-finite result, is an error.
pub fn evaluate(expression: &str) -> Result<Number, Error> {
	let mut parser = Parser {
		input: expression.as_bytes(),
		pos: 0,
	};

	let value = parser.expression()?;
	if parser.pos != parser.input.len() {
		bail!("unexpected input at position {}", parser.pos);
	}

	if let Number::Float(f) = value {
		if !f.is_finite() {
			bail!("expression does not evaluate to a finite number");
		}
	}

	Ok(value)
}

struct Parser<'a> {
	input: &'a [u8],
	pos: usize,
}

impl Parser<'_> {
	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	fn expression(&mut self) -> Result<Number, Error> {
		let mut acc = self.term()?;
		while let Some(op @ (b'+' | b'-')) = self.peek() {
			self.pos += 1;
			let rhs = self.term()?;
			acc = if op == b'+' { acc.add(rhs) } else { acc.sub(rhs) };
		}
		Ok(acc)
	}

	fn term(&mut self) -> Result<Number, Error> {
		let mut acc = self.factor()?;
		while let Some(op @ (b'*' | b'/')) = self.peek() {
			self.pos += 1;
			let rhs = self.factor()?;
			acc = if op == b'*' { acc.mul(rhs) } else { acc.div(rhs)? };
		}
		Ok(acc)
	}

	fn factor(&mut self) -> Result<Number, Error> {
		match self.peek() {
			Some(b'-') => {
				self.pos += 1;
				Ok(self.factor()?.neg())
			},
			Some(b'+') => {
				self.pos += 1;
				self.factor()
			},
			Some(b'0'..=b'9' | b'.') => self.literal(),
			Some(c) => {
				bail!("unexpected '{}' at position {}", c as char, self.pos)
			},
			None => bail!("unexpected end of expression"),
		}
	}

	fn literal(&mut self) -> Result<Number, Error> {
		let start = self.pos;
		while matches!(self.peek(), Some(b'0'..=b'9' | b'.')) {
			self.pos += 1;
		}

		let text = std::str::from_utf8(&self.input[start..self.pos])?;
		if text.contains('.') {
			return Ok(Number::Float(text.parse::<f64>()?));
		}

		// integers too large for i64 degrade to floats
		match text.parse::<i64>() {
			Ok(i) => Ok(Number::Int(i)),
			Err(_) => Ok(Number::Float(text.parse::<f64>()?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_integer_arithmetic_stays_integral() {
		assert_eq!(evaluate("100*3").unwrap(), Number::Int(300));
		assert_eq!(evaluate("100*3").unwrap().to_string(), "300");
		assert_eq!(evaluate("7-10").unwrap(), Number::Int(-3));
	}

	#[test]
	fn test_division_is_always_float() {
		assert_eq!(evaluate("123/2").unwrap().to_string(), "61.5");
		assert_eq!(evaluate("4/2").unwrap().to_string(), "2.0");
	}

	#[test]
	fn test_decimal_operand_is_float() {
		assert_eq!(evaluate("61.5*50").unwrap().to_string(), "3075.0");
		assert_eq!(evaluate("0.1+0.2").unwrap().to_string(), "0.30000000000000004");
	}

	#[test]
	fn test_precedence() {
		assert_eq!(evaluate("2+3*4").unwrap(), Number::Int(14));
		assert_eq!(evaluate("10-4/2").unwrap(), Number::Float(8.0));
		assert_eq!(evaluate("2*3-4*5").unwrap(), Number::Int(-14));
	}

	#[test]
	fn test_unary_signs() {
		assert_eq!(evaluate("-5").unwrap(), Number::Int(-5));
		assert_eq!(evaluate("2--3").unwrap(), Number::Int(5));
		assert_eq!(evaluate("+4*2").unwrap(), Number::Int(8));
	}

	#[test]
	fn test_integer_overflow_promotes() {
		let result = evaluate("9223372036854775807+1").unwrap();
		assert!(matches!(result, Number::Float(_)));
	}

	#[test]
	fn test_malformed_expressions() {
		assert!(evaluate("10/0").is_err());
		assert!(evaluate("1.2.3+1").is_err());
		assert!(evaluate("2**3").is_err());
		assert!(evaluate("5+").is_err());
		assert!(evaluate(".+1").is_err());
		assert!(evaluate("").is_err());
	}
}
