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
use crate::config::filesystem::Filesystem;
use crate::currency::flags::FlagIcons;
use crate::currency::table::CurrencyTable;
use crate::engine::aggregator::Engine;
use crate::engine::formatter::Separator;
use crate::rates::cache::{self, CachedRateProvider};
use crate::rates::http::HttpRateProvider;
use crate::rates::provider::{FixedRates, RateProvider};
use crate::reports::feedback::Feedback;
use anyhow::{bail, Error};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod config;
mod currency;
mod engine;
mod rates;
mod reports;

#[derive(Parser)]
#[command(
	name = "rates",
	version,
	about = "Convert between currencies from free-form queries",
	allow_negative_numbers = true
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The query, e.g. `100 BRL CLP`, `GBP!` or `100 BRL CLP; 100 USD BRL`
	query: Vec<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/rates/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// CSV file to use instead of the bundled currency list
	#[arg(long)]
	currencies: Option<String>,

	/// TOML file of fixed rates to use instead of the network
	#[arg(long)]
	rates: Option<String>,

	/// Output script-filter JSON instead of a table
	#[arg(long)]
	json: bool,

	// --------------
	// -- SETTINGS --
	// --------------
	/// Sets the currency that short queries convert from or into
	#[arg(long, value_name = "CODE")]
	set_default_currency: Option<String>,

	/// Shows the default currency
	#[arg(long)]
	get_default_currency: bool,

	/// Sets the decimal point used in results, '.' or ','
	#[arg(long, value_name = "DIVISOR")]
	set_default_divisor: Option<String>,

	/// Shows the decimal point used in results
	#[arg(long)]
	get_default_divisor: bool,

	/// Clears cached exchange rates
	#[arg(long)]
	clear: bool,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		let commands = [
			self.set_default_currency.is_some(),
			self.get_default_currency,
			self.set_default_divisor.is_some(),
			self.get_default_divisor,
			self.clear,
		]
		.iter()
		.filter(|c| **c)
		.count();

		if commands > 1 {
			bail!("Only one settings command may be given at a time");
		}
		if commands == 1 && !self.query.is_empty() {
			bail!("Settings commands do not take a query");
		}

		Ok(())
	}
}

fn main() -> Result<(), Error> {
	init_tracing();

	let args = Cli::parse();
	args.validate()?;

	let fs = Filesystem::new(args.config.as_ref())?;
	let mut config = fs.get_config()?;
	let currencies = load_currencies(&args, &config)?;
	debug!(
		config = %fs.config_path().display(),
		currencies = currencies.len(),
		"loaded settings"
	);

	let mut feedback = Feedback::new();

	let status = if let Some(code) = &args.set_default_currency {
		set_default_currency(code, &currencies, &fs, &mut config, &mut feedback)?
	} else if args.get_default_currency {
		get_default_currency(&config, &mut feedback)
	} else if let Some(divisor) = &args.set_default_divisor {
		set_default_divisor(divisor, &fs, &mut config, &mut feedback)?
	} else if args.get_default_divisor {
		get_default_divisor(&config, &mut feedback)
	} else if args.clear {
		cache::clear(&fs.cache_path()?)?;
		feedback.add_message("Caches cleared!", "");
		0
	} else {
		convert(&args, &config, &fs, &currencies, &mut feedback)?
	};

	if args.json {
		println!("{}", feedback.render_json()?);
	} else {
		print!("{}", feedback.render_text());
	}

	if status != 0 {
		std::io::stdout().flush()?;
		std::process::exit(status);
	}

	Ok(())
}

/// Logs go to stderr so stdout only ever carries results.
fn init_tracing() {
	let filter = EnvFilter::try_from_env("RATES_LOG")
		.unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn load_currencies(args: &Cli, config: &Config) -> Result<CurrencyTable, Error> {
	match args.currencies.as_deref().or(config.currencies_file()) {
		Some(path) => CurrencyTable::from_path(Path::new(path)),
		None => CurrencyTable::bundled(),
	}
}

fn rate_provider(
	args: &Cli,
	config: &Config,
	fs: &Filesystem,
) -> Result<Box<dyn RateProvider>, Error> {
	if let Some(path) = args.rates.as_deref().or(config.rates_file()) {
		return Ok(Box::new(FixedRates::from_path(Path::new(path))?));
	}

	let http = HttpRateProvider::new(config.api_url())?;
	Ok(Box::new(CachedRateProvider::new(
		http,
		&fs.cache_path()?,
		config.cache_ttl(),
	)))
}

fn convert(
	args: &Cli,
	config: &Config,
	fs: &Filesystem,
	currencies: &CurrencyTable,
	feedback: &mut Feedback,
) -> Result<i32, Error> {
	let provider = rate_provider(args, config, fs)?;
	let engine = Engine::new(currencies, provider.as_ref(), config.engine_config());

	let report = engine.run(&args.query.join(" "));

	let icons = FlagIcons::new(&fs.flags_dir(config));
	feedback.add_report(&report, currencies, &icons);

	Ok(report.status.code())
}

fn set_default_currency(
	code: &str,
	currencies: &CurrencyTable,
	fs: &Filesystem,
	config: &mut Config,
	feedback: &mut Feedback,
) -> Result<i32, Error> {
	let Some(currency) = currencies.lookup(code) else {
		feedback.add_message("You entered an invalid currency...", "");
		return Ok(1);
	};

	config.default_currency = Some(currency.code.clone());
	fs.save_config(config)?;

	feedback.add_message(
		&format!("Default currency updated to: {}", currency.code),
		"",
	);
	Ok(0)
}

fn get_default_currency(config: &Config, feedback: &mut Feedback) -> i32 {
	match &config.default_currency {
		Some(code) => feedback
			.add_message(&format!("Your default currency is: {}", code), ""),
		None => feedback.add_message(
			"No default currency.",
			"Please, use --set-default-currency to set the default currency first",
		),
	}
	0
}

fn set_default_divisor(
	divisor: &str,
	fs: &Filesystem,
	config: &mut Config,
	feedback: &mut Feedback,
) -> Result<i32, Error> {
	let Some(separator) = Separator::parse(divisor) else {
		feedback.add_message("Wrong divisor, please specify '.' or ','.", "");
		return Ok(1);
	};

	config.separator = Some(separator);
	fs.save_config(config)?;

	feedback.add_message(
		&format!("Default divisor updated to: '{}'", separator),
		"",
	);
	Ok(0)
}

fn get_default_divisor(config: &Config, feedback: &mut Feedback) -> i32 {
	match config.separator {
		Some(separator) => feedback
			.add_message(&format!("The number divisor is: '{}'", separator), ""),
		None => feedback.add_message(
			"No number divisor set, using the default '.'",
			"Please, use --set-default-divisor to set the default number divisor",
		),
	}
	0
}
