use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "triad",
    about = "triad: namespaced JSON item access server",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
    /// Report how the path table treats a request
    CheckPath(CheckPathArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckPathArgs {
    /// Request method, e.g. GET or DELETE
    pub method: String,
    /// Request path, e.g. /core/user/ada
    pub path: String,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["triad", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.bind.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "triad", "serve", "--config", "triad.toml", "--bind", "0.0.0.0:9000",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("triad.toml")));
            assert_eq!(args.bind.map(|a| a.port()), Some(9000));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bad_bind_address() {
        assert!(Cli::try_parse_from(["triad", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["triad", "config", "-c", "x.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { config: Some(_) })));
    }

    #[test]
    fn parse_check_path() {
        let cli = Cli::try_parse_from(["triad", "check-path", "DELETE", "/core/user/ada"]).unwrap();
        if let Command::CheckPath(args) = cli.command {
            assert_eq!(args.method, "DELETE");
            assert_eq!(args.path, "/core/user/ada");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["triad", "config", "--verbose", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
