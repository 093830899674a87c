use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use datalens::data::cleaning::clean;
use datalens::data::loader::load_file;
use datalens::processing::analysis::analyze;
use datalens::processing::method_advisor::CorrelationMethod;
use datalens::report::{json, terminal};
use datalens::state::config::{AdvisorConfig, ReportFormat, VERSION};

#[derive(Debug, Parser)]
#[command(name = "datalens", version = VERSION)]
#[command(about = "Statistical decision rules and data-quality advice for tabular files")]
struct CliArgs {
    /// Data file (csv, txt, tsv, xlsx, xls, xlsm, ods, json)
    file: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Correlation matrix method: pearson, spearman or kendall
    #[arg(long, value_parser = parse_method)]
    method: Option<CorrelationMethod>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save the effective configuration to this path
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn parse_method(s: &str) -> Result<CorrelationMethod, String> {
    s.parse()
}

fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AdvisorConfig::load(path)?,
        None => AdvisorConfig::default(),
    };
    if let Some(method) = args.method {
        config.correlation.method = Some(method);
    }
    if args.json {
        config.report.format = ReportFormat::Json;
    }
    if let Some(path) = &args.save_config {
        config.save(path)?;
    }

    let loaded = load_file(&args.file)?;
    let dataset = clean(&loaded, &config.cleaning)?;
    let report = analyze(&dataset, &config.analysis_options());

    let rendered = match config.report.format {
        ReportFormat::Text => terminal::render(&report),
        ReportFormat::Json => json::to_json(&report)?,
    };
    match &args.output {
        Some(path) => json::write_report(path, &rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_parsed() {
        let args = CliArgs::try_parse_from([
            "datalens", "data.csv", "--method", "kendall", "--json", "--output", "out.json",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("data.csv"));
        assert_eq!(args.method, Some(CorrelationMethod::KendallTau));
        assert!(args.json);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.config, None);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(CliArgs::try_parse_from(["datalens"]).is_err());
        assert!(CliArgs::try_parse_from(["datalens", "a.csv", "b.csv"]).is_err());
        assert!(CliArgs::try_parse_from(["datalens", "a.csv", "--method"]).is_err());
        assert!(CliArgs::try_parse_from(["datalens", "a.csv", "--method", "cosine"]).is_err());
        assert!(CliArgs::try_parse_from(["datalens", "a.csv", "--verbose"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
