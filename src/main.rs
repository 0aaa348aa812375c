use clap::Parser;
use sso_intake::cli::commands::{
    cmd_clear, cmd_export_progress, cmd_export_report, cmd_import_progress, cmd_set, cmd_status,
    open_session,
};
use sso_intake::cli::config::{
    Cli, Commands, build_session_options, load_config, resolve_output_dir, resolve_store_dir,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    let store_dir = resolve_store_dir(cli.store_dir.as_deref(), &config);
    let mut session = open_session(store_dir, build_session_options(&config))?;

    let output = match &cli.command {
        Commands::Status { format } => cmd_status(&mut session, format)?,
        Commands::Set { field, value } => cmd_set(&mut session, field, value)?,
        Commands::ExportProgress { output_dir } => {
            let dir = resolve_output_dir(output_dir.as_deref(), &config);
            cmd_export_progress(&mut session, dir)?
        }
        Commands::ImportProgress { file } => cmd_import_progress(&mut session, file)?,
        Commands::ExportReport { output_dir } => {
            let dir = resolve_output_dir(output_dir.as_deref(), &config);
            cmd_export_report(&mut session, dir)?
        }
        Commands::Clear { yes } => cmd_clear(&mut session, *yes)?,
    };

    print!("{}", output);
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
