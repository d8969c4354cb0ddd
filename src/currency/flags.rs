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
use std::path::{Path, PathBuf};

/// Icon used for currencies whose flag image is missing.
pub const NO_FLAG: &str = "_no_flag.png";

/// Resolves flag identifiers to image files in a flags directory.
#[derive(Debug, Clone)]
pub struct FlagIcons {
	dir: PathBuf,
}

impl FlagIcons {
	pub fn new(dir: &Path) -> Self {
		Self {
			dir: dir.to_path_buf(),
		}
	}

	/// Path to the flag image, or to the placeholder when the image does
	/// not exist.
	pub fn icon_path(&self, flag: &str) -> PathBuf {
		if !flag.is_empty() {
			let path = self.dir.join(flag);
			if path.is_file() {
				return path;
			}
		}
		self.dir.join(NO_FLAG)
	}
}
