use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use cypress_harness::docker::DockerCliRuntime;
use cypress_harness::{CypressConfig, CypressContainer, TestResults};

#[derive(Parser)]
#[command(name = "cypress-harness")]
#[command(version)]
#[command(about = "Run Cypress end-to-end tests in a container", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Cypress tests and wait for the results
    Run {
        /// Host directory holding the cypress project (where cypress.json lives)
        #[arg(short, long, default_value = "e2e")]
        project: PathBuf,

        /// Base URL of the application under test
        #[arg(short, long)]
        base_url: Option<String>,

        /// Port of a server on host.testcontainers.internal to test against
        #[arg(long, conflicts_with = "base_url")]
        port: Option<i32>,

        /// Browser to run the tests with (chrome, firefox, electron, ...)
        #[arg(long)]
        browser: Option<String>,

        /// Spec file or glob to run instead of all tests
        #[arg(long)]
        spec: Option<String>,

        /// Record the run to the Cypress dashboard
        #[arg(long)]
        record: bool,

        /// Record key for the Cypress dashboard (implies --record)
        #[arg(long)]
        record_key: Option<String>,

        /// Extra arguments appended to npm install
        #[arg(long)]
        npm_install_args: Option<String>,

        /// Container image to run
        #[arg(long)]
        image: Option<String>,

        /// Host directory the mochawesome reports are written to
        /// (defaults to <project>/cypress/reports/mochawesome)
        #[arg(long)]
        reports: Option<PathBuf>,

        /// Maximum total test duration in seconds
        #[arg(long, default_value = "600")]
        timeout: u64,

        /// Keep reports from previous runs instead of cleaning them
        #[arg(long)]
        keep_reports: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            project,
            base_url,
            port,
            browser,
            spec,
            record,
            record_key,
            npm_install_args,
            image,
            reports,
            timeout,
            keep_reports,
        } => {
            let mut config = CypressConfig::new()
                .with_project_path(&project)
                .with_auto_clean_reports(!keep_reports)
                .with_max_total_test_duration(Duration::from_secs(timeout));

            if let Some(reports) = reports {
                config = config.with_mochawesome_reports_at(reports);
            } else {
                config = config.with_mochawesome_reports_at(
                    project.join("cypress").join("reports").join("mochawesome"),
                );
            }
            if let Some(base_url) = base_url {
                config = config.with_base_url(base_url)?;
            }
            if let Some(port) = port {
                config = config.with_local_server_port(port)?;
            }
            if let Some(browser) = browser {
                config = config.with_browser(browser)?;
            }
            if let Some(spec) = spec {
                config = config.with_spec(spec)?;
            }
            if record {
                config = config.with_record();
            }
            if let Some(key) = record_key {
                config = config.with_record_key(key)?;
            }
            if let Some(args) = npm_install_args {
                config = config.with_npm_install_args(args)?;
            }
            if let Some(image) = image {
                config = config.with_image(image)?;
            }

            let mut container =
                CypressContainer::new(config, Box::new(DockerCliRuntime::new()));

            println!("{} Starting Cypress container...", "▶".green());
            container.start().await?;

            let results = container.test_results().await;
            container.stop().await.ok();

            let results = results?;
            print_summary(&results);

            if results.failures > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn print_summary(results: &TestResults) {
    println!("\n{} Cypress run finished", "■".blue().bold());
    println!("  Tests run: {}", results.tests);
    println!(
        "  {} passing, {} failing",
        results.passes.to_string().green(),
        results.failures.to_string().red()
    );

    for suite in &results.suites {
        println!("\n  {} {}", "→".blue(), suite.title.white().bold());
        for test in &suite.tests {
            if test.success {
                println!("    {} {}", "✓".green(), test.description);
            } else {
                println!("    {} {}", "✗".red(), test.description);
                if let Some(message) = &test.error_message {
                    println!("      {}", message.red());
                }
            }
        }
    }
}
