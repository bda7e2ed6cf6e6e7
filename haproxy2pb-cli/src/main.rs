use std::path::Path;

use clap::Parser;

use haproxy2pb_cli::cli::{Cli, Commands, ConfigArgs};
use haproxy2pb_cli::commands;
use haproxy2pb_cli::error::CliError;
use haproxy2pb_cli::logging;
use haproxy2pb_cli::output::OutputWriter;
use haproxy2pb_core::config::GeneralConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    // config 명령은 설정 파일 자체를 검사하므로 로딩 없이 실행합니다.
    let result = match cli.command {
        Commands::Config(args) => run_config(args, &cli.config, cli.log_level, &writer).await,
        command => run(command, &cli.config, cli.log_level.as_deref(), &writer).await,
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run_config(
    args: ConfigArgs,
    config_path: &Path,
    log_level: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    logging::init_tracing(&GeneralConfig {
        log_level: log_level.unwrap_or_else(|| "warn".to_owned()),
        ..GeneralConfig::default()
    })?;
    commands::config::execute(args, config_path, writer).await
}

async fn run(
    command: Commands,
    config_path: &Path,
    log_level: Option<&str>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = commands::load_config(config_path, log_level).await?;
    logging::init_tracing(&config.general)?;
    haproxy2pb_core::metrics::describe_all();

    tracing::debug!(config = %config_path.display(), "haproxy2pb starting");

    match command {
        Commands::Encode(args) => commands::encode::execute(args, &config, writer).await,
        Commands::Stats(args) => commands::stats::execute(args, &config, writer).await,
        Commands::Inspect(args) => commands::inspect::execute(args, &config, writer).await,
        Commands::Decode(args) => commands::decode::execute(args, writer).await,
        Commands::Config(args) => commands::config::execute(args, config_path, writer).await,
    }
}
