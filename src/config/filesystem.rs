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
use crate::config::config_file::Config;
use anyhow::{anyhow, Error};
use dirs::{cache_dir, data_dir, home_dir};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rates";

/// Knows where the config, cache and assets live on disk.
pub struct Filesystem {
	config_path: PathBuf,
	create_missing: bool, // only for the default location
}

impl Filesystem {
	/// Uses the given config path, or `~/.config/rates/config.toml`.
	pub fn new(custom_config_path: Option<&String>) -> Result<Self, Error> {
		let config_path = match custom_config_path {
			None => home_dir()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?
				.join(".config")
				.join(APP_DIR)
				.join("config.toml"),
			Some(p) => PathBuf::from(p),
		};

		Ok(Self::at(config_path, custom_config_path.is_none()))
	}

	fn at(config_path: PathBuf, create_missing: bool) -> Self {
		Self {
			config_path,
			create_missing,
		}
	}

	pub fn config_path(&self) -> &Path {
		&self.config_path
	}

	/// Reads the config. A missing file is an empty config; at the default
	/// location it is also created empty.
	pub fn get_config(&self) -> Result<Config, Error> {
		if !self.config_path.exists() {
			if self.create_missing {
				if let Some(parent) = self.config_path.parent() {
					fs::create_dir_all(parent)?;
				}
				File::create(&self.config_path)?;
			}
			return Ok(Config::default());
		}

		let content = fs::read_to_string(&self.config_path)?;
		toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))
	}

	/// Writes the config back, creating its directory if needed.
	pub fn save_config(&self, config: &Config) -> Result<(), Error> {
		if let Some(parent) = self.config_path.parent() {
			fs::create_dir_all(parent)?;
		}

		let content = toml::to_string(config)
			.map_err(|e| anyhow!("failed to serialize config: {}", e))?;
		fs::write(&self.config_path, content)?;
		Ok(())
	}

	/// Location of the rate cache, under the user cache directory.
	pub fn cache_path(&self) -> Result<PathBuf, Error> {
		let dir = cache_dir()
			.ok_or_else(|| anyhow!("Unable to determine cache directory"))?;
		Ok(dir.join(APP_DIR).join("rates.json"))
	}

	/// The configured flags directory, or `flags` under the user data
	/// directory.
	pub fn flags_dir(&self, config: &Config) -> PathBuf {
		match config.flags_dir() {
			Some(dir) => PathBuf::from(dir),
			None => data_dir()
				.unwrap_or_default()
				.join(APP_DIR)
				.join("flags"),
		}
	}
}
