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
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const RATES: &str = "tests/test_data/rates.toml";

/// Dynamically collects test cases from a given directory.
fn collect_test_cases(subfolder: &str) -> Vec<(String, String)> {
	let dir_path = format!("tests/test_data/{}", subfolder);

	let mut test_cases = vec![];

	if let Ok(entries) = fs::read_dir(&dir_path) {
		let mut inputs = vec![];
		let mut outputs = vec![];

		for entry in entries.flatten() {
			let file_name =
				entry.file_name().into_string().unwrap_or_default();
			if file_name.ends_with("_in.txt") {
				inputs.push(file_name);
			} else if file_name.ends_with("_out.txt") {
				outputs.push(file_name);
			}
		}

		inputs.sort();
		outputs.sort();

		// Pair inputs with corresponding outputs
		for input_file in inputs {
			let output_file = input_file.replace("_in.txt", "_out.txt");
			if outputs.contains(&output_file) {
				test_cases.push((input_file, output_file));
			}
		}
	}

	assert!(!test_cases.is_empty(), "no test cases in {}", dir_path);
	test_cases
}

/// Runs the binary against the fixed test rates, with a config file that
/// lives in `home`.
fn rates(home: &Path, args: &[&str]) -> Output {
	let config = home.join("config.toml");

	Command::new(env!("CARGO_BIN_EXE_rates"))
		.arg("--config")
		.arg(&config)
		.args(["--rates", RATES])
		.args(args)
		.env_remove("RATES_LOG")
		.output()
		.expect("Failed to execute process")
}

fn stdout(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> Value {
	serde_json::from_slice(&output.stdout).expect("output is not valid JSON")
}

#[test]
fn test_integration_conversions() {
	let test_cases = collect_test_cases("conversions");
	execute("conversions", test_cases, 0);
}

#[test]
fn test_integration_suggestions() {
	let test_cases = collect_test_cases("suggestions");
	execute("suggestions", test_cases, 100);
}

#[test]
fn test_integration_failures() {
	let test_cases = collect_test_cases("failures");
	execute("failures", test_cases, 1);
}

#[test]
fn test_integration_json_items() {
	let home = TempDir::new().unwrap();
	let flags = home.path().join("flags");
	fs::create_dir(&flags).unwrap();
	fs::write(flags.join("cl.png"), b"").unwrap();
	fs::write(
		home.path().join("config.toml"),
		format!("[assets]\nflags = {:?}\n", flags.display().to_string()),
	)
	.unwrap();

	let output = rates(home.path(), &["--json", "100", "BRL", "CLP"]);
	assert!(output.status.success());

	let items = json(&output)["items"].as_array().unwrap().clone();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["title"], "$ 14,250.0000");
	assert_eq!(items[0]["valid"], true);
	assert!(items[0]["icon"]["path"]
		.as_str()
		.unwrap()
		.ends_with("cl.png"));
}

#[test]
fn test_integration_suggestion_autocomplete() {
	let home = TempDir::new().unwrap();

	let output = rates(home.path(), &["--json", "100", "rupiah"]);
	assert_eq!(output.status.code(), Some(100));

	let items = json(&output)["items"].as_array().unwrap().clone();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["title"], "Indonesian rupiah");
	assert_eq!(items[0]["autocomplete"], "100 IDR");
	assert_eq!(items[0]["valid"], false);
}

#[test]
fn test_integration_empty_query_lists_currencies() {
	let home = TempDir::new().unwrap();

	let output = rates(home.path(), &["--json"]);
	assert_eq!(output.status.code(), Some(100));

	let items = json(&output)["items"].as_array().unwrap().clone();
	assert_eq!(items.len(), 40);
	assert!(items.iter().any(|item| item["subtitle"] == "BRL"));
}

#[test]
fn test_integration_default_currency() {
	let home = TempDir::new().unwrap();

	let output = rates(home.path(), &["--get-default-currency"]);
	assert!(stdout(&output).starts_with("No default currency."));

	let output = rates(home.path(), &["--set-default-currency", "brl"]);
	assert!(output.status.success());
	assert_eq!(stdout(&output).trim(), "Default currency updated to: BRL");

	let output = rates(home.path(), &["--get-default-currency"]);
	assert_eq!(stdout(&output).trim(), "Your default currency is: BRL");

	let output = rates(home.path(), &["100", "CLP"]);
	assert!(output.status.success());
	assert!(stdout(&output).starts_with(
		"$ 14,250.0000   BRL (Brazilian real) -> CLP (Chilean peso)"
	));
}

#[test]
fn test_integration_invalid_default_currency() {
	let home = TempDir::new().unwrap();

	let output = rates(home.path(), &["--set-default-currency", "XYZ"]);
	assert_eq!(output.status.code(), Some(1));
	assert_eq!(stdout(&output).trim(), "You entered an invalid currency...");
	assert!(!home.path().join("config.toml").exists());
}

#[test]
fn test_integration_default_divisor() {
	let home = TempDir::new().unwrap();

	let output = rates(home.path(), &["--get-default-divisor"]);
	assert!(stdout(&output)
		.starts_with("No number divisor set, using the default '.'"));

	let output = rates(home.path(), &["--set-default-divisor", ","]);
	assert!(output.status.success());
	assert_eq!(stdout(&output).trim(), "Default divisor updated to: ','");

	let output = rates(home.path(), &["--get-default-divisor"]);
	assert_eq!(stdout(&output).trim(), "The number divisor is: ','");

	let output = rates(home.path(), &["100", "BRL", "CLP"]);
	assert_eq!(
		stdout(&output).trim(),
		"$ 14.250,0000   BRL (Brazilian real) -> CLP (Chilean peso) with rate 142,5000"
	);

	let output = rates(home.path(), &["--set-default-divisor", ";"]);
	assert_eq!(output.status.code(), Some(1));
	assert_eq!(
		stdout(&output).trim(),
		"Wrong divisor, please specify '.' or ','."
	);
}

#[test]
fn test_integration_conflicting_commands() {
	let home = TempDir::new().unwrap();

	let output = rates(
		home.path(),
		&["--get-default-currency", "--get-default-divisor"],
	);
	assert!(!output.status.success());

	let output = rates(home.path(), &["--get-default-currency", "100", "BRL"]);
	assert!(!output.status.success());
}

fn execute(
	subfolder: &str,
	test_cases: Vec<(String, String)>,
	expected_code: i32,
) {
	for (input_file, expected_output_file) in test_cases {
		println!("running for {}...", input_file);

		let loc = format!("{}/{}/{}", "tests/test_data", subfolder, input_file);
		let query =
			fs::read_to_string(&loc).expect("Failed to read input file");
		let args: Vec<&str> = query.split_whitespace().collect();

		let home = TempDir::new().unwrap();
		let output = rates(home.path(), &args);

		assert_eq!(
			output.status.code(),
			Some(expected_code),
			"{} exited unexpectedly: {}",
			input_file,
			String::from_utf8_lossy(&output.stderr)
		);

		let stdout = stdout(&output);

		let expected_output = fs::read_to_string(format!(
			"{}/{}/{}",
			"tests/test_data", subfolder, expected_output_file
		))
		.expect("Failed to read expected output file");

		assert_eq!(
			stdout.trim(),
			expected_output.trim(),
			"Output did not match for {}; expected:\n{}\ngot:\n{}",
			input_file,
			expected_output.trim(),
			stdout.trim()
		);
	}
}
