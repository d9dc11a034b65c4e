//! Cairn CLI entry point.

use std::process::ExitCode;

use cairn::cli::{Cli, Commands, CoordinateArgs};
use cairn::registry::{ModuleCoordinate, ModuleRegistry};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cairn=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cairn=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Cairn starting with args: {:?}", cli);

    let registry = ModuleRegistry::new(cli.settings());

    match run(&cli, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli, registry: &ModuleRegistry) -> cairn::Result<()> {
    match &cli.command {
        Commands::Providers => print_json(&registry.providers()?),

        Commands::Modules(args) => {
            print_json(&registry.modules_for_provider(&args.provider, args.enrich)?)
        }

        Commands::Resolve(args) => {
            let coord = coordinate(args);
            match registry.resolve(&coord)? {
                Some(location) => print_json(&location),
                None => not_found(&coord),
            }
        }

        Commands::Versions(args) => {
            let coord = coordinate(args);
            match registry.versions(&coord)? {
                Some(versions) => print_json(&versions),
                None => not_found(&coord),
            }
        }

        Commands::Search(args) => {
            print_json(&registry.search(&args.query, args.provider.as_deref())?)
        }

        Commands::Fetch(args) => {
            let coord = coordinate(&args.coordinate);
            match registry.source_archive(&coord, &args.version)? {
                Some(bytes) => {
                    let output = args.output.clone().unwrap_or_else(|| {
                        format!("{}-{}-{}.zip", coord.name, coord.provider, args.version).into()
                    });
                    std::fs::write(&output, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), output.display());
                    Ok(())
                }
                None => not_found(&coord),
            }
        }

        Commands::Warmup => {
            cairn::warmup::spawn(registry.clone())
                .join()
                .map_err(|_| anyhow::anyhow!("warmup thread panicked"))?;
            Ok(())
        }
    }
}

fn coordinate(args: &CoordinateArgs) -> ModuleCoordinate {
    ModuleCoordinate::new(&args.namespace, &args.name, &args.provider)
}

fn not_found(coord: &ModuleCoordinate) -> cairn::Result<()> {
    Err(anyhow::anyhow!("module {} not found", coord).into())
}

fn print_json<T: serde::Serialize>(value: &T) -> cairn::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}
