use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gridmap_api::management::{response_docs, schemas_yaml, seed_test_data};
use gridmap_api::{logging, server, AppState, GridmapConfig, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("gridmap")
        .version(gridmap_api::VERSION)
        .about("Grid world REST API with plain and Mason representations")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .global(true)
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address, overrides the configuration"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .global(true)
                .help("API prefix, overrides the configuration"),
        )
        .arg(
            Arg::new("cache-capacity")
                .long("cache-capacity")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Maximum number of cached response bodies"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("serve").about("Start the HTTP server"))
        .subcommand(
            Command::new("testgen")
                .about("Seed a store with the test map")
                .arg(
                    Arg::new("serve")
                        .long("serve")
                        .action(ArgAction::SetTrue)
                        .help("Keep serving the seeded store"),
                ),
        )
        .subcommand(Command::new("schemas").about("Print entity schemas as YAML"))
        .subcommand(
            Command::new("get-docs")
                .about("Render GET response examples for the test map as YAML")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write <out>/<endpoint>/get.yml instead of printing"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<GridmapConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GridmapConfig::load(path)?,
        None => GridmapConfig::default(),
    };
    if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
        config = config.with_bind(*bind);
    }
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        config = config.with_api_prefix(prefix.clone());
    }
    if let Some(capacity) = matches.get_one::<u64>("cache-capacity") {
        config = config.with_cache_capacity(*capacity);
    }
    if matches.get_flag("json-logs") {
        config = config.with_json_logs(true);
    }
    Ok(config)
}

async fn seeded_router(config: &GridmapConfig) -> anyhow::Result<Router> {
    let state = AppState::in_memory(config)?;
    seed_test_data(state.store.as_ref())
        .await
        .context("cannot seed test data")?;
    Ok(Router::new(Arc::new(state)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    logging::init(&config)?;

    match matches.subcommand() {
        Some(("serve", _)) => {
            let router = Router::new(Arc::new(AppState::in_memory(&config)?));
            server::serve(router, config.bind).await?;
        }
        Some(("testgen", args)) => {
            let router = seeded_router(&config).await?;
            if args.get_flag("serve") {
                server::serve(router, config.bind).await?;
            } else {
                tracing::warn!("the store is in-process; pass --serve to keep the seeded data");
            }
        }
        Some(("schemas", _)) => {
            print!("{}", schemas_yaml()?);
        }
        Some(("get-docs", args)) => {
            let router = seeded_router(&config).await?;
            let docs = response_docs(&router).await?;
            match args.get_one::<PathBuf>("out") {
                Some(root) => {
                    for (endpoint, yaml) in &docs {
                        let dir = root.join(endpoint);
                        std::fs::create_dir_all(&dir)
                            .with_context(|| format!("cannot create {}", dir.display()))?;
                        std::fs::write(dir.join("get.yml"), yaml)?;
                    }
                }
                None => {
                    for (endpoint, yaml) in &docs {
                        println!("# {endpoint}\n{yaml}");
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn flags_override_configuration() {
        let matches = cli()
            .try_get_matches_from([
                "gridmap",
                "serve",
                "--bind",
                "0.0.0.0:9000",
                "--prefix",
                "/v1",
                "--json-logs",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.api_prefix, "/v1");
        assert!(config.json_logs);
        assert_eq!(config.cache_capacity, 10_000);
    }
}
