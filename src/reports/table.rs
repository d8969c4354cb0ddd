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

/// Borderless table of single-line rows. Columns are padded to their
/// widest cell; rows may have fewer cells than the table has columns.
pub struct Table {
	column_count: usize,
	rows: Vec<Vec<String>>,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
		}
	}

	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows.push(
			row.into_iter()
				.take(self.column_count)
				.map(|s| s.to_string())
				.collect(),
		);
	}

	pub fn render(&self) -> String {
		let mut max_widths = vec![0; self.column_count];

		for row in &self.rows {
			for (i, value) in row.iter().enumerate() {
				max_widths[i] = max_widths[i].max(value.chars().count());
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			let mut line = String::new();
			for (i, value) in row.iter().enumerate() {
				if i > 0 {
					line.push_str("   ");
				}
				line.push_str(&format!("{:<width$}", value, width = max_widths[i]));
			}
			out.push_str(line.trim_end());
			out.push('\n');
		}

		out
	}
}
