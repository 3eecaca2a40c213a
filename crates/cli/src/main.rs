//! API Doc Aggregator CLI
//!
//! Composes permission-filtered OpenAPI documents from a directory of service
//! fragments and a YAML role policy.

use anyhow::{bail, Context, Result};
use apidoc_aggregator_assembler::{
    AggregatorService, DirectoryRegistry, DocRequest, DocResponse, DocumentAssembler,
    PolicyAuthorizer,
};
use apidoc_aggregator_common::{AccessProfile, RoleId, Settings};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidoc-aggregator")]
#[command(version, about = "Compose per-role OpenAPI documents from service fragments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the whole-system or a single-service document
    #[command(after_help = "EXAMPLES:\n  \
        # Unfiltered document for every service\n  \
        apidoc-aggregator compose --fragments ./fragments --admin\n\n  \
        # Document as seen by role 3\n  \
        apidoc-aggregator compose \\\n    \
        --fragments ./fragments \\\n    \
        --policy policy.yaml \\\n    \
        --role 3 \\\n    \
        --output api.json\n\n  \
        # Single service\n  \
        apidoc-aggregator compose --fragments ./fragments --admin --service db")]
    Compose {
        #[command(flatten)]
        source: SourceArgs,

        /// Compose a single-service document for this service
        #[arg(short, long)]
        service: Option<String>,

        /// Re-read every fragment instead of using memoized copies
        #[arg(long)]
        refresh: bool,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the services visible to a caller
    #[command(after_help = "EXAMPLES:\n  \
        # Services role 3 can see\n  \
        apidoc-aggregator list --fragments ./fragments --policy policy.yaml --role 3\n\n  \
        # Resource paths role 3 may address on the aggregator itself\n  \
        apidoc-aggregator list --fragments ./fragments --policy policy.yaml --role 3 --access-list")]
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Print addressable resource paths instead of service entries
        #[arg(long)]
        access_list: bool,
    },
}

/// Where fragments, policy and settings come from, and who is asking
#[derive(Args)]
struct SourceArgs {
    /// Directory of service fragment files (.json, .yaml, .yml)
    #[arg(short, long)]
    fragments: PathBuf,

    /// YAML role policy
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compose as an administrator
    #[arg(long, conflicts_with = "role")]
    admin: bool,

    /// Compose as this role
    #[arg(long)]
    role: Option<RoleId>,

    /// Also expose the aggregator itself as a service under this name
    #[arg(long)]
    self_service: Option<String>,
}

impl SourceArgs {
    fn profile(&self) -> AccessProfile {
        match (self.admin, self.role) {
            (true, _) => AccessProfile::administrator(),
            (false, Some(role_id)) => AccessProfile::role(role_id),
            (false, None) => AccessProfile::anonymous(),
        }
    }

    fn assembler(&self) -> Result<DocumentAssembler<DirectoryRegistry, PolicyAuthorizer>> {
        tracing::debug!(
            fragments = %self.fragments.display(),
            policy = ?self.policy,
            config = ?self.config,
            "Loading aggregator sources"
        );

        let settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let policy = match &self.policy {
            Some(path) => PolicyAuthorizer::load(path)
                .with_context(|| format!("Failed to load policy from {}", path.display()))?,
            None => PolicyAuthorizer::default(),
        };

        let mut registry = DirectoryRegistry::scan(&self.fragments).with_context(|| {
            format!("Failed to scan fragments in {}", self.fragments.display())
        })?;

        if let Some(name) = &self.self_service {
            if !registry.register(Arc::new(AggregatorService::new(name))) {
                bail!("Service name '{}' is already used by a fragment file", name);
            }
        }

        eprintln!(
            "{} Found {} services in {}",
            "→".cyan(),
            registry.len().to_string().yellow(),
            self.fragments.display()
        );

        Ok(DocumentAssembler::new(registry, policy, settings))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compose {
            source,
            service,
            refresh,
            output,
        } => {
            compose_command(
                &source,
                service.as_deref(),
                refresh,
                output.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::List {
            source,
            access_list,
        } => {
            list_command(&source, access_list)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn compose_command(
    source: &SourceArgs,
    service: Option<&str>,
    refresh: bool,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let assembler = source.assembler()?;
    let profile = source.profile();

    if verbose {
        eprintln!("  Caller: {}", describe(&profile));
        eprintln!("  Service: {}", service.unwrap_or("(whole system)"));
        eprintln!("  Refresh: {}", refresh);
    }

    let request = DocRequest {
        service: service.map(String::from),
        force_refresh: refresh,
        ..DocRequest::default()
    };

    tracing::info!(caller = %describe(&profile), service = ?service, refresh, "Composing API document");
    eprintln!("{} Composing document...", "→".cyan());
    let response = assembler
        .handle(&profile, &request)
        .context("Failed to compose API document")?;

    let DocResponse::Document(document) = response else {
        bail!("Expected a composed document");
    };

    let rendered =
        serde_json::to_string_pretty(document.as_ref()).context("Failed to serialize document")?;
    write_output(&rendered, output)?;

    eprintln!("\n{}", "✓ Composition complete!".green().bold());
    eprintln!("  Paths: {}", document.paths.len());
    eprintln!("  Tags: {}", document.tags.len());
    if verbose {
        for tag in &document.tags {
            eprintln!("  • {}", tag.name.cyan());
        }
    }

    Ok(())
}

fn list_command(source: &SourceArgs, access_list: bool) -> Result<()> {
    let assembler = source.assembler()?;
    let profile = source.profile();

    let request = DocRequest {
        as_resources: !access_list,
        as_access_list: access_list,
        ..DocRequest::default()
    };

    let response = assembler
        .handle(&profile, &request)
        .context("Failed to list services")?;

    let DocResponse::Listing(listing) = response else {
        bail!("Expected a service listing");
    };

    let rendered =
        serde_json::to_string_pretty(&listing).context("Failed to serialize listing")?;
    write_output(&rendered, None)
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn describe(profile: &AccessProfile) -> String {
    match (profile.is_administrator, profile.role_id) {
        (true, _) => "administrator".to_string(),
        (false, Some(role_id)) => format!("role {}", role_id),
        (false, None) => "anonymous".to_string(),
    }
}
