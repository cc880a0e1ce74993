//! tabsync command-line tool.
//!
//! Generates and validates configuration, checks Tableau credentials, runs
//! a full identity-graph sync, and grants or revokes group membership.

mod style;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tabsync_core::config::AppConfig;
use tabsync_core::connector::{ResourceProvisioner, ResourceSyncer, Syncer};
use tabsync_core::models::{Grant, IdentityGraph, Resource, ResourceId, ResourceType};
use tabsync_core::projection::{self, MEMBER_ENTITLEMENT};
use tabsync_core::sync_engine::SyncStats;
use tabsync_core::{SyncEngine, TableauConnector};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Sync Tableau users, groups and site roles into an identity graph.
#[derive(Parser, Debug)]
#[command(name = "tabsync", version, about = "Tableau identity-graph sync")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "./tabsync.toml")]
    config: PathBuf,

    /// Log filter, e.g. "debug" or "tabsync_core=trace". Overrides the config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./tabsync.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file without contacting Tableau.
    Validate,

    /// Sign in and confirm the session can read the current user.
    Check,

    /// Run one full sync cycle and emit the identity graph as JSON.
    Sync {
        /// Write the graph to this path instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add a user to a group.
    Grant {
        /// Tableau group id.
        #[arg(long)]
        group: String,

        /// Tableau user id.
        #[arg(long)]
        user: String,
    },

    /// Remove a user from a group.
    Revoke {
        /// Tableau group id.
        #[arg(long)]
        group: String,

        /// Tableau user id.
        #[arg(long)]
        user: String,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(&cli)))
        .with_target(false)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// `--log-level` wins, then `[logging].level` from a readable config, then "warn".
fn log_filter(cli: &Cli) -> String {
    if let Some(level) = &cli.log_level {
        return level.clone();
    }
    AppConfig::load_from_file(&cli.config)
        .map(|config| config.logging.level)
        .unwrap_or_else(|_| "warn".to_string())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
        Commands::Check => {
            let connector = connect(&cli.config).await?;
            cmd_check(&connector).await
        }
        Commands::Sync { output } => {
            let connector = connect(&cli.config).await?;
            cmd_sync(&connector, output.as_deref()).await
        }
        Commands::Grant { group, user } => {
            let connector = connect(&cli.config).await?;
            cmd_grant(&connector, &group, &user).await
        }
        Commands::Revoke { group, user } => {
            let connector = connect(&cli.config).await?;
            cmd_revoke(&connector, &group, &user).await
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

async fn connect(path: &Path) -> Result<TableauConnector> {
    let config = AppConfig::load_and_resolve(path).context("failed to load configuration")?;
    TableauConnector::connect(&config.tableau)
        .await
        .context("failed to sign in to Tableau")
}

fn syncer(connector: &TableauConnector, resource_type: ResourceType) -> Result<Syncer> {
    connector
        .resource_syncers()
        .into_iter()
        .find(|s| s.resource_type() == resource_type)
        .with_context(|| format!("no syncer for resource type {}", resource_type))
}

/// Find one resource of the given type under the session's site.
async fn find_resource(
    connector: &TableauConnector,
    resource_type: ResourceType,
    id: &str,
) -> Result<Resource> {
    let site = ResourceId::new(
        ResourceType::Site,
        connector.client().session().site_id.clone(),
    );
    let page = syncer(connector, resource_type)?
        .list(Some(&site), None)
        .await?;
    debug!(resource_type = %resource_type, count = page.items.len(), "searched resources");
    page.items
        .into_iter()
        .find(|r| r.id.resource == id)
        .with_context(|| format!("{} {} not found on site", resource_type.display_name(), id))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# tabsync configuration

[tableau]
server_path = "https://tableau.example.com"
api_version = "3.19"
# Empty selects the default site.
content_url = ""
access_token_name = "tabsync"
access_token_secret_env = "TABLEAU_ACCESS_TOKEN_SECRET"

[logging]
level = "info"
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("{}", style::success(&format!("Default configuration written to {}", output.display())));
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file with your Tableau server and token name");
    println!("  2. Export the token secret in TABLEAU_ACCESS_TOKEN_SECRET");
    println!("  3. Validate with: tabsync validate --config {}", output.display());
    println!("  4. Check sign-in with: tabsync check --config {}", output.display());

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  {}", style::success("TOML structure is valid"));

    config
        .resolve_env_vars()
        .context("failed to resolve environment variables")?;
    println!("  {}", style::success("Environment variable references processed"));

    if let Err(e) = config.validate() {
        println!("  {}", style::error(&format!("Validation error: {}", e)));
        anyhow::bail!("configuration validation failed");
    }
    println!("  {}", style::success("All required fields are valid"));

    let tableau = &config.tableau;
    println!();
    println!("{}", style::header("Configuration summary"));
    println!("  API base URL : {}", tableau.api_base_url());
    println!(
        "  Site         : {}",
        if tableau.content_url.is_empty() {
            style::dim("(default site)")
        } else {
            tableau.content_url.clone()
        }
    );
    println!("  Token name   : {}", tableau.access_token_name);
    println!("  Token secret : {}", style::presence(tableau.access_token_secret.is_some()));
    println!("  Log level    : {}", config.logging.level);
    println!();
    println!("Configuration is valid.");

    Ok(())
}

async fn cmd_check(connector: &TableauConnector) -> Result<()> {
    connector.validate().await?;

    let session = connector.client().session();
    println!("{}", style::success(&format!("Signed in to {}", connector.metadata().display_name)));
    println!("  Site id : {}", session.site_id);
    println!("  User id : {}", session.current_user_id);
    println!();
    println!("{}", resource_types_table(connector.resource_types()));
    Ok(())
}

fn resource_types_table(types: &[ResourceType]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Resource type", "Display name", "Traits"]);
    for resource_type in types {
        let traits: Vec<&str> = resource_type.traits().iter().map(|t| t.id()).collect();
        table.add_row(vec![
            Cell::new(resource_type.id()),
            Cell::new(resource_type.display_name()),
            Cell::new(if traits.is_empty() {
                "-".to_string()
            } else {
                traits.join(", ")
            }),
        ]);
    }
    table
}

async fn cmd_sync(connector: &TableauConnector, output: Option<&Path>) -> Result<()> {
    let engine = SyncEngine::new(connector);
    let (graph, stats) = engine.run_sync_cycle().await?;
    let summary = render_stats(&stats);

    match output {
        Some(path) => {
            println!("{}", summary);
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_graph(&graph, &mut file)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{}", style::success(&format!("Identity graph written to {}", path.display())));
        }
        None => {
            // stdout carries only the graph JSON.
            eprintln!("{}", summary);
            write_graph(&graph, &mut std::io::stdout().lock())?;
        }
    }
    Ok(())
}

fn write_graph<W: Write>(graph: &IdentityGraph, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, graph).context("failed to serialize graph")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn render_stats(stats: &SyncStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Count"]);
    table.add_row(vec![Cell::new("Resources"), Cell::new(stats.resources)]);
    table.add_row(vec![Cell::new("Entitlements"), Cell::new(stats.entitlements)]);
    table.add_row(vec![Cell::new("Grants"), Cell::new(stats.grants)]);

    let mut lines = vec![style::header("Sync complete"), table.to_string()];
    if stats.unresolved_grants > 0 {
        lines.push(style::warn(&format!(
            "{} grant(s) carry an unknown site role",
            stats.unresolved_grants
        )));
    }
    lines.push(style::dim(&format!(
        "started {} / finished {}",
        stats.started_at,
        stats.completed_at.as_deref().unwrap_or("-")
    )));
    lines.join("\n")
}

async fn cmd_grant(connector: &TableauConnector, group_id: &str, user_id: &str) -> Result<()> {
    let group = find_resource(connector, ResourceType::Group, group_id).await?;
    let user = find_resource(connector, ResourceType::User, user_id).await?;
    let entitlement = projection::member_entitlement(&group);

    let groups = syncer(connector, ResourceType::Group)?;
    let provisioner = groups
        .provisioner()
        .context("group syncer cannot provision")?;
    provisioner.grant(&user, &entitlement).await?;

    println!(
        "{}",
        style::success(&format!(
            "{} added to {}",
            user.display_name, entitlement.display_name
        ))
    );
    Ok(())
}

async fn cmd_revoke(connector: &TableauConnector, group_id: &str, user_id: &str) -> Result<()> {
    let group = find_resource(connector, ResourceType::Group, group_id).await?;
    let grant = Grant::new(
        &group,
        MEMBER_ENTITLEMENT,
        ResourceId::new(ResourceType::User, user_id),
    );

    let groups = syncer(connector, ResourceType::Group)?;
    let provisioner = groups
        .provisioner()
        .context("group syncer cannot provision")?;
    provisioner.revoke(&grant).await?;

    println!(
        "{}",
        style::success(&format!("{} removed from {}", user_id, group.display_name))
    );
    Ok(())
}
