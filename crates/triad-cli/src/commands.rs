use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use triad_gate::{Classification, Method};
use triad_server::{ServerConfig, TriadServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
        Command::CheckPath(args) => cmd_check_path(args, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} triad server on {} ({} restricted, {} read-only prefixes)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.access.restricted.len(),
        config.access.read_only.len(),
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(TriadServer::new(config).serve())?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_check_path(args: CheckPathArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let rules = config.access.rules()?;
    let method = Method::parse(&args.method);
    let class = rules.classify_path(&args.path);
    let admitted = class.admits(&method);

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "method": method.as_str(),
                "path": args.path,
                "classification": class,
                "admitted": admitted,
            })
        ),
        OutputFormat::Text => {
            let class_label = match class {
                Classification::Unrestricted => class.to_string().green(),
                Classification::ReadOnly => class.to_string().yellow(),
                Classification::Restricted => class.to_string().red(),
            };
            let verdict = if admitted {
                "admitted".green().bold()
            } else {
                "rejected".red().bold()
            };
            println!("{} {}: {} ({})", method, args.path.bold(), verdict, class_label);
        }
    }
    Ok(())
}
