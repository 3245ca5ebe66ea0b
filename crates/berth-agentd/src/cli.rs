use std::path::PathBuf;

use clap::{Parser, Subcommand};

use berth_observe::{LoggerFormat, LoggerLevel};

use crate::config::{AgentConfig, BackendKind};

#[derive(Debug, Parser)]
#[command(name = "berthctl", version, about = "Drive container instances through a berth engine")]
pub struct Cli {
    #[arg(short, long, value_name = "FILE", help = "Path to JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Engine backend (overrides config)")]
    pub backend: Option<BackendKind>,

    #[arg(long, value_name = "ADDRESS", help = "Docker daemon address (overrides config)")]
    pub docker_host: Option<String>,

    #[arg(long, value_name = "MS", help = "Per-call deadline in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_name = "FILTER", help = "Log filter, e.g. berth_engine=debug,info")]
    pub log_level: Option<LoggerLevel>,

    #[arg(long, value_name = "FORMAT", help = "Log format: text|json|journald")]
    pub log_format: Option<LoggerFormat>,

    #[arg(long, help = "Print Prometheus metrics to stderr when the command finishes")]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a stopped instance and print its id.
    Create {
        name: String,
        #[arg(long)]
        image: String,
        #[arg(long = "entrypoint", allow_hyphen_values = true)]
        entrypoint: Vec<String>,
        #[arg(long = "cmd", allow_hyphen_values = true)]
        command: Vec<String>,
        #[arg(short = 'l', long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },
    /// Start an instance.
    Start { id: String },
    /// List instances matching all label filters.
    List {
        #[arg(short = 'l', long = "label", value_name = "KEY[=VALUE]")]
        filters: Vec<String>,
        #[arg(short, long, help = "Include stopped instances")]
        all: bool,
        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },
    /// Stop an instance with the runtime's default grace period.
    Stop { id: String },
    /// Remove a stopped instance.
    Remove { id: String },
    /// Run create / start / stop / remove end to end and check each step.
    Demo {
        #[arg(long, default_value = "alpine:latest")]
        image: String,
    },
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    pub fn resolve_config(&self) -> anyhow::Result<AgentConfig> {
        let mut cfg = match &self.config {
            Some(path) => AgentConfig::from_path(path)?,
            None => AgentConfig::default(),
        };

        if let Some(backend) = self.backend {
            cfg.engine.backend = backend;
        }
        if let Some(addr) = &self.docker_host {
            cfg.engine.docker.address = Some(addr.clone());
        }
        if let Some(ms) = self.timeout_ms {
            anyhow::ensure!(ms > 0, "--timeout-ms cannot be zero");
            cfg.engine.timeout_ms = Some(ms);
        }
        if let Some(level) = &self.log_level {
            cfg.logger.level = level.clone();
        }
        if let Some(format) = self.log_format {
            cfg.logger.format = format;
        }
        Ok(cfg)
    }
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("invalid label {s:?}: expected KEY=VALUE")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_collects_repeated_args() {
        let cli = Cli::parse_from([
            "berthctl", "create", "svc1", "--image", "alpine:latest", "--cmd", "sleep", "--cmd",
            "30", "-l", "app=x", "--label", "tier=web",
        ]);
        match cli.command {
            Command::Create {
                name,
                image,
                entrypoint,
                command,
                labels,
            } => {
                assert_eq!(name, "svc1");
                assert_eq!(image, "alpine:latest");
                assert!(entrypoint.is_empty());
                assert_eq!(command, vec!["sleep", "30"]);
                let expected: Vec<(String, String)> =
                    vec![("app".into(), "x".into()), ("tier".into(), "web".into())];
                assert_eq!(labels, expected);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn bad_label_is_rejected() {
        let res = Cli::try_parse_from(["berthctl", "create", "svc", "--image", "a", "-l", "novalue"]);
        assert!(res.is_err());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let cli = Cli::parse_from([
            "berthctl",
            "--backend",
            "memory",
            "--docker-host",
            "tcp://10.0.0.1:2375",
            "--timeout-ms",
            "2500",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "list",
            "--all",
        ]);
        let cfg = cli.resolve_config().unwrap();

        assert_eq!(cfg.engine.backend, BackendKind::Memory);
        assert_eq!(cfg.engine.docker.address.as_deref(), Some("tcp://10.0.0.1:2375"));
        assert_eq!(cfg.engine.timeout_ms, Some(2500));
        assert_eq!(cfg.logger.level.as_str(), "debug");
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
        assert!(matches!(cli.command, Command::List { all: true, .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = Cli::parse_from(["berthctl", "--timeout-ms", "0", "start", "abc"]);
        assert!(cli.resolve_config().is_err());
    }
}
