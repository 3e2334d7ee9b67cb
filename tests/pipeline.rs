use std::fs;

use conductivity_mc::app::pipeline::run_analysis;
use conductivity_mc::domain::AnalysisConfig;
use conductivity_mc::io::{read_report_json, write_report_json, write_substances_csv};
use conductivity_mc::plot::{render_ascii_plot, write_svg_chart};
use conductivity_mc::report::format_results;
use tempfile::tempdir;

fn small_config() -> AnalysisConfig {
    AnalysisConfig {
        sample_count: 300,
        ..AnalysisConfig::default()
    }
}

#[test]
fn measurement_csv_gives_same_result_as_builtin_data() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("lab.csv");
    fs::write(
        &data,
        "# NaCl in four solvents\n\
         substance,kappa,molar_conductivity,dielectric\n\
         butanol,7.56e-4,0.13,17.10\n\
         ethanol,236.3e-4,0.66,24.30\n\
         methanol,0.95,1.6,32.63\n\
         water,24.03,3.2,78.54\n",
    )
    .unwrap();

    let builtin = run_analysis(&small_config()).unwrap().report;
    let from_file = run_analysis(&AnalysisConfig {
        data_path: Some(data),
        ..small_config()
    })
    .unwrap()
    .report;

    assert_eq!(from_file.substances.len(), 4);
    assert_eq!(from_file.fit.slope, builtin.fit.slope);
    assert_eq!(from_file.radius.interval, builtin.radius.interval);
    assert_eq!(format_results(&from_file), format_results(&builtin));
}

#[test]
fn missing_data_file_is_an_input_error() {
    let dir = tempdir().unwrap();
    let err = run_analysis(&AnalysisConfig {
        data_path: Some(dir.path().join("nope.csv")),
        ..small_config()
    })
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn report_json_round_trip_replots_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let report = run_analysis(&small_config()).unwrap().report;

    write_report_json(&path, &report).unwrap();
    let back = read_report_json(&path).unwrap();

    assert_eq!(back.tool, "cond");
    assert_eq!(back.generated_at, report.generated_at);
    assert_eq!(back.seed, report.seed);
    assert_eq!(back.distribution, report.distribution);
    assert_eq!(back.substances.len(), report.substances.len());
    assert!((back.fit.slope - report.fit.slope).abs() < 1e-6);
    assert!((back.radius.value - report.radius.value).abs() < 1e-12);
    assert_eq!(format_results(&back), format_results(&report));
    assert_eq!(render_ascii_plot(&back, 60, 16), render_ascii_plot(&report, 60, 16));
}

#[test]
fn invalid_report_json_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"tool\": \"cond\"").unwrap();
    let err = read_report_json(&path).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.message().contains("Invalid report JSON"));
}

#[test]
fn substance_csv_has_one_row_per_substance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("substances.csv");
    let report = run_analysis(&small_config()).unwrap().report;

    write_substances_csv(&path, &report).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "name");
    assert!(headers.iter().any(|h| h == "concentration"));
    assert!(headers.iter().any(|h| h == "dg0_sigma"));

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[3][0], "water");
}

#[test]
fn svg_chart_is_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    let report = run_analysis(&small_config()).unwrap().report;

    write_svg_chart(&path, &report, (640, 480)).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("kJ/mol"));
}
