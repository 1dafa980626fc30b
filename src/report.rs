use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::suite::SuiteReport;

pub fn generate_html_report(report: &SuiteReport, output_path_str: &str) -> Result<(), std::io::Error> {
    let path = Path::new(output_path_str);
    let mut file = File::create(path)?;

    writeln!(file, "<!DOCTYPE html>")?;
    writeln!(file, "<html>")?;
    writeln!(file, "<head>")?;
    writeln!(file, "<title>{}</title>", escape(&report.suite))?;
    writeln!(file, "<style>")?;
    writeln!(file, "table {{ border-collapse: collapse; }}")?;
    writeln!(file, ".results {{ width: 100%; }}")?;
    writeln!(file, ".summary {{ width: auto; }}")?;
    writeln!(file, ".summary td:nth-child(2) {{ text-align: right; }}")?;
    writeln!(
        file,
        "th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}"
    )?;
    writeln!(file, "th {{ background-color: #f2f2f2; }}")?;
    writeln!(file, "tr:nth-child(even) {{ background-color: #f9f9f9; }}")?;
    writeln!(file, ".pass {{ color: #1a7f37; font-weight: bold; }}")?;
    writeln!(file, ".fail {{ color: #cf222e; font-weight: bold; }}")?;
    writeln!(file, "</style>")?;
    writeln!(file, "</head>")?;
    writeln!(file, "<body>")?;
    writeln!(file, "<h1>{}</h1>", escape(&report.suite))?;

    writeln!(file, "<h2>Summary</h2>")?;
    writeln!(file, "<table class=\"summary\">")?;
    for (label, value) in [
        ("Scenarios", report.results.len()),
        ("Passed", report.passed()),
        ("Failed", report.failed()),
    ] {
        writeln!(file, "<tr>")?;
        writeln!(file, "<td>{}</td>", label)?;
        writeln!(file, "<td>{}</td>", value)?;
        writeln!(file, "</tr>")?;
    }
    writeln!(file, "</table>")?;
    writeln!(file, "<br>")?;

    writeln!(file, "<h2>Scenarios</h2>")?;
    writeln!(file, "<table class=\"results\">")?;
    writeln!(file, "<tr>")?;
    writeln!(file, "<th>#</th>")?;
    writeln!(file, "<th>Name</th>")?;
    writeln!(file, "<th>Distance (m)</th>")?;
    writeln!(file, "<th>Path Loss (dB)</th>")?;
    writeln!(file, "<th>Reference SINR (dB)</th>")?;
    writeln!(file, "<th>Observed SINR (dB)</th>")?;
    writeln!(file, "<th>Reference MCS</th>")?;
    writeln!(file, "<th>Observed MCS</th>")?;
    writeln!(file, "<th>Result</th>")?;
    writeln!(file, "<th>Diagnostic</th>")?;
    writeln!(file, "</tr>")?;

    for (i, result) in report.results.iter().enumerate() {
        writeln!(file, "<tr>")?;
        writeln!(file, "<td>{}</td>", i)?;
        writeln!(file, "<td>{}</td>", escape(&result.name))?;
        writeln!(file, "<td>{:.1}</td>", result.distance_m)?;
        writeln!(file, "<td>{:.6}</td>", result.path_loss_db)?;
        writeln!(file, "<td>{:.6}</td>", result.reference_sinr_db)?;
        if let Some(observed) = result.observed_sinr_db {
            writeln!(file, "<td>{:.6}</td>", observed)?;
        } else {
            writeln!(file, "<td>-</td>")?;
        }
        writeln!(file, "<td>{}</td>", result.reference_mcs_index)?;
        if result.observed_mcs.is_empty() {
            writeln!(file, "<td>-</td>")?;
        } else {
            let observed = result
                .observed_mcs
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(file, "<td>{}</td>", observed)?;
        }
        if result.passed {
            writeln!(file, "<td class=\"pass\">PASS</td>")?;
        } else {
            writeln!(file, "<td class=\"fail\">FAIL</td>")?;
        }
        writeln!(file, "<td>{}</td>", escape(&result.diagnostic))?;
        writeln!(file, "</tr>")?;
    }

    writeln!(file, "</table>")?;
    writeln!(file, "</body>")?;
    writeln!(file, "</html>")?;

    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
