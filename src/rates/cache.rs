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
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How long a fetched rate is reused, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Longer TTLs are clamped to this (about ten years).
const MAX_TTL_SECS: u64 = 315_360_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
	/// `None` records that the pair could not be quoted.
	rate: Option<Decimal>,
	fetched_at: DateTime<Utc>,
}

/// Wraps a provider with a JSON file cache keyed by ordered pair, so
/// repeated queries within the TTL do not hit the network.
pub struct CachedRateProvider<P: RateProvider> {
	inner: P,
	path: PathBuf,
	ttl: Duration,
	entries: RefCell<BTreeMap<String, CacheEntry>>,
}

impl<P: RateProvider> CachedRateProvider<P> {
	/// Loads any existing cache at `path`. An unreadable cache is
	/// discarded.
	pub fn new(inner: P, path: &Path, ttl_secs: u64) -> Self {
		let entries = match fs::read_to_string(path) {
			Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
				warn!(path = %path.display(), error = %e, "discarding unreadable rate cache");
				BTreeMap::new()
			}),
			Err(_) => BTreeMap::new(),
		};

		Self {
			inner,
			path: path.to_path_buf(),
			ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
			entries: RefCell::new(entries),
		}
	}

	fn key(base: &str, quote: &str) -> String {
		format!("{}{}", base, quote)
	}

	fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
		now.signed_duration_since(entry.fetched_at) < self.ttl
	}

	/// Writes the cache back without its expired entries.
	fn persist(&self) -> Result<(), Error> {
		let now = Utc::now();
		self.entries
			.borrow_mut()
			.retain(|_, entry| self.is_fresh(entry, now));

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let content = serde_json::to_string_pretty(&*self.entries.borrow())?;
		fs::write(&self.path, content)?;
		Ok(())
	}
}

/// Deletes the cache file, if any.
pub fn clear(path: &Path) -> Result<(), Error> {
	if path.exists() {
		fs::remove_file(path)?;
	}
	Ok(())
}

impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
	fn raw_rate(&self, base: &str, quote: &str) -> Result<Option<Decimal>, Error> {
		let key = Self::key(base, quote);

		if let Some(entry) = self.entries.borrow().get(&key) {
			if self.is_fresh(entry, Utc::now()) {
				debug!(pair = %key, "cache hit");
				return Ok(entry.rate);
			}
			debug!(pair = %key, "cache entry expired");
		}

		let rate = self.inner.raw_rate(base, quote)?;
		self.entries.borrow_mut().insert(key, CacheEntry {
			rate,
			fetched_at: Utc::now(),
		});

		if let Err(e) = self.persist() {
			warn!(path = %self.path.display(), error = %e, "failed to write rate cache");
		}

		Ok(rate)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rates::provider::FixedRates;
	use rust_decimal_macros::dec;
	use std::cell::Cell;

	struct Counting {
		inner: FixedRates,
		calls: Cell<usize>,
	}

	impl RateProvider for Counting {
		fn raw_rate(
			&self,
			base: &str,
			quote: &str,
		) -> Result<Option<Decimal>, Error> {
			self.calls.set(self.calls.get() + 1);
			self.inner.raw_rate(base, quote)
		}
	}

	fn counting() -> Counting {
		Counting {
			inner: FixedRates::new().with_rate("BRL", "CLP", dec!(142.5)),
			calls: Cell::new(0),
		}
	}

	#[test]
	fn test_reuses_fresh_entries() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		let cached = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);

		assert_eq!(cached.raw_rate("BRL", "CLP").unwrap(), Some(dec!(142.5)));
		assert_eq!(cached.raw_rate("BRL", "CLP").unwrap(), Some(dec!(142.5)));
		assert_eq!(cached.inner.calls.get(), 1);
	}

	#[test]
	fn test_caches_missing_pairs() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		let cached = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);

		assert_eq!(cached.raw_rate("CLP", "BRL").unwrap(), None);
		assert_eq!(cached.raw_rate("CLP", "BRL").unwrap(), None);
		assert_eq!(cached.inner.calls.get(), 1);
	}

	#[test]
	fn test_expired_entries_are_refetched() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		let cached = CachedRateProvider::new(counting(), &path, 0);

		cached.raw_rate("BRL", "CLP").unwrap();
		cached.raw_rate("BRL", "CLP").unwrap();
		assert_eq!(cached.inner.calls.get(), 2);
	}

	#[test]
	fn test_persists_across_instances() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("rates.json");

		let first = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);
		first.raw_rate("BRL", "CLP").unwrap();
		assert!(path.exists());

		let second = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);
		assert_eq!(second.raw_rate("BRL", "CLP").unwrap(), Some(dec!(142.5)));
		assert_eq!(second.inner.calls.get(), 0);
	}

	#[test]
	fn test_expired_pairs_are_dropped_on_write() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		fs::write(
			&path,
			r#"{"USDJPY": {"rate": "150", "fetched_at": "2000-01-01T00:00:00Z"}}"#,
		)
		.unwrap();

		let cached = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);
		cached.raw_rate("BRL", "CLP").unwrap();

		let content = fs::read_to_string(&path).unwrap();
		assert!(content.contains("BRLCLP"));
		assert!(!content.contains("USDJPY"));
	}

	#[test]
	fn test_clear() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		fs::write(&path, "{}").unwrap();

		clear(&path).unwrap();
		assert!(!path.exists());
		assert!(clear(&path).is_ok());
	}

	#[test]
	fn test_corrupt_cache_is_discarded() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.json");
		fs::write(&path, "not json").unwrap();

		let cached = CachedRateProvider::new(counting(), &path, DEFAULT_TTL_SECS);
		assert_eq!(cached.raw_rate("BRL", "CLP").unwrap(), Some(dec!(142.5)));
	}
}
