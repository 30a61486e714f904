use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bldc_table_gen::{generate, render, OutputFormat, TableConfig};

const USAGE: &str = "\
usage: bldc-table-gen [--header] [--no-phase] [--no-sentinel] [--pwm-delay] [-o PATH]

  --header       emit a C header instead of the plain report
  --no-phase     skip the phase compensation table set
  --no-sentinel  emit the bucket frequency table without the trailing 0
  --pwm-delay    add half a PWM period of phase lead
  -o PATH        write to PATH instead of stdout";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    format: OutputFormat,
    output: Option<PathBuf>,
    no_phase: bool,
    no_sentinel: bool,
    pwm_delay: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--header" => options.format = OutputFormat::Header,
            "--no-phase" => options.no_phase = true,
            "--no-sentinel" => options.no_sentinel = true,
            "--pwm-delay" => options.pwm_delay = true,
            "-o" | "--output" => {
                let path = args.next().context("-o requires a path")?;
                options.output = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument: {}\n{}", other, USAGE),
        }
    }
    Ok(Some(options))
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the tables
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bldc_table_gen=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = TableConfig {
        emit_phase_tables: !options.no_phase,
        append_f0_sentinel: !options.no_sentinel,
        compensate_pwm_delay: options.pwm_delay,
        ..TableConfig::default()
    };

    let tables = generate(&config).context("Table generation failed")?;
    let text = render(&tables, options.format);

    match &options.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
