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
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reference dataset compiled into the binary, used unless the user
/// points at their own file.
const BUNDLED_CURRENCIES: &str = include_str!("../../data/currencies.csv");

/// A currency and the metadata needed to display it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Currency {
	pub code: String,
	pub name: String,
	pub symbol: String,
	pub flag: String,
}

/// Shape of one row of the CSV dataset. Columns the table does not use
/// (e.g. Country) are ignored.
#[derive(Debug, Deserialize)]
struct CurrencyRow {
	#[serde(rename = "Code")]
	code: String,
	#[serde(rename = "Name")]
	name: String,
	#[serde(rename = "Symbol")]
	symbol: String,
	#[serde(rename = "Flag", default)]
	flag: String,
}

/// Read-only lookup of every known currency, keyed by uppercase code.
#[derive(Debug, Default)]
pub struct CurrencyTable {
	currencies: BTreeMap<String, Currency>,
}

impl CurrencyTable {
	pub fn bundled() -> Result<Self, Error> {
		Self::from_reader(BUNDLED_CURRENCIES.as_bytes())
	}

	pub fn from_path(path: &Path) -> Result<Self, Error> {
		let file = File::open(path).map_err(|e| {
			anyhow!("failed to open currencies {}: {}", path.display(), e)
		})?;
		Self::from_reader(file)
	}

	/// Parses a CSV dataset with a `Code,Name,Symbol,...,Flag` header,
	/// validating every row.
	pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(true)
			.trim(csv::Trim::All)
			.from_reader(reader);

		let mut currencies = BTreeMap::new();

		for (i, result) in rdr.deserialize().enumerate() {
			// header is line 1
			let line = i + 2;
			let row: CurrencyRow =
				result.map_err(|e| anyhow!("{} (line {})", e, line))?;

			let currency = Self::validate(row, line)?;
			if currencies.contains_key(&currency.code) {
				bail!("Duplicate currency {} (line {})", currency.code, line);
			}
			currencies.insert(currency.code.clone(), currency);
		}

		let table = Self { currencies };
		if table.is_empty() {
			bail!("Currency table has no entries");
		}

		Ok(table)
	}

	fn validate(row: CurrencyRow, line: usize) -> Result<Currency, Error> {
		if row.code.len() != 3
			|| !row.code.chars().all(|c| c.is_ascii_alphabetic())
		{
			bail!("Invalid currency code '{}' (line {})", row.code, line);
		}
		if row.name.is_empty() {
			bail!("Currency {} has no name (line {})", row.code, line);
		}
		if row.symbol.is_empty() {
			bail!("Currency {} has no symbol (line {})", row.code, line);
		}

		Ok(Currency {
			code: row.code.to_ascii_uppercase(),
			name: row.name,
			symbol: row.symbol,
			flag: row.flag,
		})
	}

	/// Case-insensitive lookup by code.
	pub fn lookup(&self, code: &str) -> Option<&Currency> {
		self.currencies.get(&code.to_uppercase())
	}

	pub fn contains(&self, code: &str) -> bool {
		self.lookup(code).is_some()
	}

	/// All known codes, in order.
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.currencies.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Currency> {
		self.currencies.values()
	}

	pub fn len(&self) -> usize {
		self.currencies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.currencies.is_empty()
	}
}
