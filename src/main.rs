use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use ingress_healthcheck::{
    annotations::healthcheck,
    config::Configuration,
    ingress::{Ingress, Service},
    logger::{setup_logger, LogFormat},
    resolver::StaticResolver,
    HealthCheckConfig, IngressAnnotation,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Ingress manifest file, YAML, one or more `---` separated documents
    #[arg(short, long)]
    ingress: PathBuf,
    /// Global configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// YAML list of backend Services available to the resolver
    #[arg(short, long)]
    services: Option<PathBuf>,
    /// Cluster name, overrides CLUSTER_NAME and the configuration file
    #[arg(long)]
    cluster_name: Option<String>,
    /// Log level
    #[arg(
        short,
        long,
        default_value = "info",
        env = "LOG_LEVEL",
        help = "Log Levels: info, debug, warning, error, trace, critical"
    )]
    log_level: String,
    /// Log format: json or text
    #[arg(long, default_value = "json")]
    log_format: LogFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Effective<'a> {
    namespace: &'a str,
    name: &'a str,
    health_check: HealthCheckConfig,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = setup_logger(args.log_level.clone(), args.log_format);
    let log = slog_scope::logger();

    slog::info!(log, "Starting";
        "ingress" => args.ingress.display().to_string(),
    );

    match run(args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(skipped) => {
            slog::warn!(log, "Some ingresses were skipped"; "skipped" => skipped);
            ExitCode::FAILURE
        }
        Err(e) => {
            slog::error!(log, "Failed"; "err" => format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

// Returns the number of skipped ingresses.
fn run(args: Args) -> Result<usize> {
    let log = slog_scope::logger();

    let mut cfg = Configuration::load(args.config.as_deref())?;
    cfg.override_cluster_name(args.cluster_name);
    cfg.check()?;

    let resolver: StaticResolver = match &args.services {
        Some(path) => load_services(path)?.into_iter().collect(),
        None => StaticResolver::new(),
    };
    slog::debug!(log, "Loaded backend services"; "count" => resolver.len());

    let ingresses = load_ingresses(&args.ingress)?;
    let parser = healthcheck::Parser::new(&resolver).with_prefix(cfg.annotation_prefix.clone());
    let target = cfg.default_health_check();

    let mut skipped = 0;
    for ing in &ingresses {
        let effective = parser
            .parse(ing)
            .and_then(|source| healthcheck::merge(Some(&source), Some(&target), Some(&cfg)));

        match effective {
            Ok(health_check) => {
                let line = serde_json::to_string(&Effective {
                    namespace: ing.namespace(),
                    name: ing.name(),
                    health_check,
                })?;
                println!("{}", line);
            }
            Err(e) => {
                slog::error!(log, "Skipping ingress";
                    "ingress" => format!("{}/{}", ing.namespace(), ing.name()),
                    "err" => e.to_string(),
                );
                skipped += 1;
            }
        }
    }

    Ok(skipped)
}

fn load_ingresses(path: &Path) -> Result<Vec<Ingress>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    serde_yaml::Deserializer::from_str(&content)
        .map(|doc| {
            Ingress::deserialize(doc)
                .with_context(|| format!("failed to parse ingress in {}", path.display()))
        })
        .collect()
}

fn load_services(path: &Path) -> Result<Vec<Service>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse services in {}", path.display()))
}
