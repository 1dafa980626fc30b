use std::path::Path;
use std::process;

// this cannot be crate::ScenarioSuite because of how Cargo works,
// since cargo/rust treats lib.rs and main.rs as separate crates
use crate::load_suite;
use crate::ReferenceDownlink;
use crate::ScenarioSuite;
use crate::SuiteReport;

pub struct Config {
    pub report: SuiteReport,
}

impl Config {
    pub fn run(args: &[String]) -> Result<Config, Box<dyn std::error::Error>> {
        if args.len() < 2 {
            return Err("not enough arguments".into());
        }

        if args.len() > 2 {
            return Err(
                "too many arguments, expecting only 2, such as `mcslineup filepath`".into(),
            );
        }

        // Check for special flags
        let (suite, html_path) = match args[1].as_str() {
            "--version" | "-v" => {
                print_version();
                process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--reference" | "-r" => (ScenarioSuite::reference()?, None),
            file_path => {
                let cwd = std::env::current_dir()?;
                // cargo run arg[1], such as cargo run tests/files/reference_suite.toml
                // mcslineup arg[1], such as mcslineup tests/files/reference_suite.toml
                println!("Config Path: {}", file_path);
                let full_path_to_config = cwd.join(file_path);
                println!("Full Path: {}", full_path_to_config.display());
                let suite = load_suite(&full_path_to_config.display().to_string())?;
                (suite, Some(html_path_for(&full_path_to_config)))
            }
        };

        let report = suite.run_all(&mut ReferenceDownlink::default())?;
        print_report(&report);

        if let Some(output_html_path) = html_path {
            write_html_report(&report, &output_html_path);
        }

        Ok(Config { report })
    }
}

#[cfg(feature = "report")]
fn write_html_report(report: &SuiteReport, output_html_path: &str) {
    println!("Generating HTML report at: {}", output_html_path);
    if let Err(e) = crate::report::generate_html_report(report, output_html_path) {
        eprintln!("Error generating HTML report: {}", e);
    }
}

#[cfg(not(feature = "report"))]
fn write_html_report(_report: &SuiteReport, _output_html_path: &str) {}

// basename.toml -> basename.html, next to the source file
fn html_path_for(config_path: &Path) -> String {
    let mut html_path = config_path.with_extension("html").display().to_string();
    // Remove the UNC prefix on Windows if present
    if cfg!(target_os = "windows") && html_path.starts_with(r"\\?\") {
        html_path = html_path[4..].to_string();
    }
    html_path
}

fn version_line() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn print_version() {
    println!("{}", version_line());
}

pub fn print_error(error: &str) {
    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";
    println!("{}Problem running scenarios: {error}{}", RED, RESET);
}

pub fn print_help() {
    // ANSI color codes
    const BOLD: &str = "\x1b[1m";
    const CYAN: &str = "\x1b[36m";
    const GREEN: &str = "\x1b[32m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    println!(
        "📡 Link budget to MCS scenario checker - https://github.com/iancleary/mcslineup{}",
        RESET
    );
    println!();
    println!("{}{}VERSION:{}", BOLD, YELLOW, RESET);
    println!("    {}{}{}", GREEN, env!("CARGO_PKG_VERSION"), RESET);
    println!();
    println!("{}{}USAGE:{}", BOLD, YELLOW, RESET);
    println!("    {} mcslineup <FILE_PATH>{}", GREEN, RESET);
    println!();
    println!("     FILE_PATH: path to a toml scenario suite");
    println!();
    println!("     Every scenario is run against the reference downlink and an html");
    println!("     report is written next to the source file.");
    println!();
    println!("{}{}OPTIONS:{}", BOLD, YELLOW, RESET);
    println!(
        "    {}  -r, --reference{}{}  Run the built-in 100/500/1500 m suite",
        GREEN, RESET, RESET
    );
    println!(
        "    {}  -v, --version{}{}    Print version information",
        GREEN, RESET, RESET
    );
    println!(
        "    {}  -h, --help{}{}       Print help information",
        GREEN, RESET, RESET
    );
    println!();
    println!("{}{}EXAMPLES:{}", BOLD, YELLOW, RESET);
    println!("    {} # Single file (Relative path){}", CYAN, RESET);
    println!("    {} mcslineup files/suite.toml{}", GREEN, RESET);
    println!();
}

pub fn print_report(report: &SuiteReport) {
    println!();
    for (i, result) in report.results.iter().enumerate() {
        println!("\nScenario {}: {}", i, result.name);
        println!("Distance:\t\t{:>10.2} m", result.distance_m);
        println!("Path Loss:\t\t{:>10.6} dB", result.path_loss_db);
        println!("Expected SINR:\t\t{:>10.6} dB", result.expected_sinr_db);
        println!("Reference SINR:\t\t{:>10.6} dB", result.reference_sinr_db);
        match result.observed_sinr_db {
            Some(observed) => println!("Observed SINR:\t\t{:>10.6} dB", observed),
            None => println!("Observed SINR:\t\t{:>10}", "-"),
        }
        println!("Reference MCS:\t\t{:>10}", result.reference_mcs_index);
        for line in &result.trace {
            println!("  {}", line);
        }
        println!(
            "Result:\t\t\t{:>10}",
            if result.passed { "PASS" } else { "FAIL" }
        );
        if !result.passed {
            println!("  {}", result.diagnostic);
        }
    }
    println!();
    println!("Suite Summary:");
    println!("--------------");
    println!("{}", report.summary());
}
