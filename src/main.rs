use anyhow::Result;
use clap::Parser;
use scoutcheck::cli::{Cli, Commands};
use scoutcheck::commands::{self, ValidateConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Validate {
            matches,
            scouting,
            catalog,
            event,
            config,
            preset,
            format,
            output,
            jobs,
            no_parallel,
            quiet,
        } => commands::validate_event_files(ValidateConfig {
            matches,
            scouting,
            catalog,
            event,
            config,
            preset,
            format,
            output,
            jobs,
            no_parallel,
            quiet,
        }),
        Commands::Init { force } => commands::init_config(force),
        Commands::SortKeys { keys } => {
            commands::print_sorted_keys(&keys);
            Ok(())
        }
    }
}

/// warn by default, `-v` info, `-vv` debug. `RUST_LOG` takes precedence.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
