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
use crate::engine::expression;
use regex::Regex;
use tracing::debug;

/// Separates independent conversions within one raw query.
pub const QUERY_SEPARATOR: char = ';';

/// Maximum number of tokens a single conversion can carry; anything past
/// this fans out into one conversion per extra destination.
const MAX_TOKENS: usize = 3;

/// One independently resolvable piece of a query, already split into
/// tokens with any arithmetic evaluated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubQuery {
	pub tokens: Vec<String>,
}

impl SubQuery {
	pub fn new(tokens: Vec<String>) -> Self {
		Self { tokens }
	}
}

pub struct Tokenizer {
	expression_regex: Regex,
}

impl Tokenizer {
	pub fn new() -> Self {
		let re = Regex::new(r"^[0-9.+\-*/]*[0-9]$")
			.expect("expression pattern is valid");
		Self {
			expression_regex: re,
		}
	}

	/// Splits a raw query on `;` and whitespace. Empty pieces are kept as
	/// empty sub-queries, and pieces with more than three tokens are
	/// expanded so that `1 GBP USD CAD` becomes `1 GBP USD` and `1 GBP CAD`.
	pub fn split(&self, raw: &str) -> Vec<SubQuery> {
		let mut out = Vec::new();

		for part in raw.split(QUERY_SEPARATOR) {
			let words: Vec<&str> = part.split_whitespace().collect();
			let tokens = self.evaluate_math(&words);

			if tokens.len() <= MAX_TOKENS {
				out.push(SubQuery::new(tokens));
				continue;
			}

			let (head, destinations) = tokens.split_at(MAX_TOKENS - 1);
			for destination in destinations {
				let mut expanded = head.to_vec();
				expanded.push(destination.clone());
				out.push(SubQuery::new(expanded));
			}
		}

		out
	}

	/// Replaces every arithmetic-looking token with its evaluated value.
	/// Tokens that look like arithmetic but fail to evaluate are left as
	/// they are.
	pub fn evaluate_math<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
		tokens
			.iter()
			.map(|token| {
				let token = token.as_ref();
				if !self.is_expression(token) {
					return token.to_string();
				}

				match expression::evaluate(token) {
					Ok(value) => value.to_string(),
					Err(e) => {
						debug!(token, error = %e, "leaving token unevaluated");
						token.to_string()
					},
				}
			})
			.collect()
	}

	fn is_expression(&self, token: &str) -> bool {
		self.expression_regex.is_match(token)
			&& token.contains(['+', '-', '*', '/'])
	}
}
