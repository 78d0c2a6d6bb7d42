use anyhow::{Context, Result};
use clap::Parser;
use guascope::cli::{Cli, OutputFormat};
use guascope::config::GuascopeConfig;
use guascope::csv_output::CsvOutput;
use guascope::html_output::HtmlOutput;
use guascope::json_output::JsonOutput;
use guascope::{analysis, discovery, svg_output, text_output};
use std::fs;
use tracing_subscriber::EnvFilter;

/// Report file written by `--format html`
const HTML_REPORT: &str = "report.html";

/// Initialize tracing subscriber; warnings are always shown
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration and apply command-line overrides
fn load_config(args: &Cli) -> Result<GuascopeConfig> {
    let mut config = match &args.config {
        Some(path) => GuascopeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GuascopeConfig::default(),
    };

    if let Some(dir) = &args.dir {
        config.discovery.dir = dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.discovery.prefix = prefix.clone();
    }
    if let Some(extension) = &args.extension {
        config.discovery.extension = extension.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.render.output_dir = output_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;

    let sources = discovery::discover(&config.discovery)?;
    let analysis = analysis::analyze(&sources, &config.discovery.pattern())?;
    let render = &config.render;

    match args.format {
        OutputFormat::Text => {
            print!("{}", text_output::render_summary(&analysis, render));
        }
        OutputFormat::Json => {
            println!("{}", JsonOutput::from_analysis(&analysis, render).to_json()?);
        }
        OutputFormat::Csv => {
            print!("{}", CsvOutput::new(&analysis, render).to_csv());
        }
        OutputFormat::Svg => {
            let written = svg_output::write_charts(&analysis, render, &render.output_dir)
                .with_context(|| {
                    format!("Failed to write charts to {}", render.output_dir.display())
                })?;
            println!("✓ saved plots to {}/", render.output_dir.display());
            for path in written {
                if let Some(name) = path.file_name() {
                    println!("  {}", name.to_string_lossy());
                }
            }
        }
        OutputFormat::Html => {
            fs::create_dir_all(&render.output_dir)?;
            let path = render.output_dir.join(HTML_REPORT);
            fs::write(&path, HtmlOutput::new(&analysis, render).to_html())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ saved report to {}", path.display());
        }
    }

    Ok(())
}
