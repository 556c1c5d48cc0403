//! TF Contract Registry CLI
//!
//! Command-line interface for registering and looking up deployed contract
//! addresses in a registry file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tfreg_api::{ApiConfig, ApiServer};
use tfreg_core::constants::MAX_EVENT_PAGE_SIZE;
use tfreg_core::types::{Address, Entry, LoggedEvent, NetworkId, RegistryEvent, ResourceHash, Role};
use tfreg_crypto::{parse_checksummed, resource_hash, to_checksum_address};
use tfreg_registry::{ContractRegistry, FileRegistry, RoleManager};

/// TF Contract Registry - role-gated registry of deployed contract addresses
#[derive(Parser)]
#[command(name = "tfreg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Registry file
    #[arg(
        short,
        long,
        global = true,
        env = "TFREG_REGISTRY_FILE",
        default_value = "registry.tfcr"
    )]
    registry: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new registry file
    Init {
        /// Account granted admin and registrar
        #[arg(long, env = "TFREG_DEPLOYER", value_parser = parse_address)]
        deployer: Address,
    },

    /// Register a contract address for a resource on a network
    Register {
        /// Account performing the registration
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        /// Resource URI
        uri: String,
        /// Network id
        network_id: NetworkId,
        /// Contract address
        #[arg(value_parser = parse_address)]
        address: Address,
    },

    /// Look up the address of a resource on a network
    Get {
        /// Resource URI
        uri: String,
        /// Network id
        network_id: NetworkId,
    },

    /// Look up by resource hash
    GetByHash {
        /// Resource hash (hex)
        #[arg(value_parser = parse_hash)]
        hash: ResourceHash,
        /// Network id
        network_id: NetworkId,
    },

    /// List all entries of a resource
    List {
        /// Resource URI
        uri: String,
    },

    /// List all entries of a resource hash
    ListByHash {
        /// Resource hash (hex)
        #[arg(value_parser = parse_hash)]
        hash: ResourceHash,
    },

    /// Grant a role (caller must be admin)
    Grant {
        /// Account performing the grant
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        /// Role: admin or registrar
        #[arg(value_parser = parse_role)]
        role: Role,
        /// Account receiving the role
        #[arg(value_parser = parse_address)]
        account: Address,
    },

    /// Revoke a role (caller must be admin)
    Revoke {
        /// Account performing the revocation
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        /// Role: admin or registrar
        #[arg(value_parser = parse_role)]
        role: Role,
        /// Account losing the role
        #[arg(value_parser = parse_address)]
        account: Address,
    },

    /// Check whether an account holds a role
    HasRole {
        /// Role: admin or registrar
        #[arg(value_parser = parse_role)]
        role: Role,
        /// Account to check
        #[arg(value_parser = parse_address)]
        account: Address,
    },

    /// List the holders of a role
    Members {
        /// Role: admin or registrar
        #[arg(value_parser = parse_role)]
        role: Role,
    },

    /// Print the resource hash of a URI
    Hash {
        /// Resource URI
        uri: String,
    },

    /// Print the event log
    Events {
        /// First sequence number
        #[arg(long, default_value = "0")]
        from: u64,
        /// Maximum number of events
        #[arg(long, default_value_t = MAX_EVENT_PAGE_SIZE)]
        limit: usize,
    },

    /// Run the API server over the registry file
    Serve {
        /// Bind address
        #[arg(short, long, env = "TFREG_BIND", default_value = "0.0.0.0:3001")]
        bind: SocketAddr,
    },
}

fn parse_address(s: &str) -> std::result::Result<Address, String> {
    parse_checksummed(s).map_err(|e| e.to_string())
}

fn parse_hash(s: &str) -> std::result::Result<ResourceHash, String> {
    ResourceHash::from_hex(s).map_err(|e| e.to_string())
}

fn parse_role(s: &str) -> std::result::Result<Role, String> {
    s.parse().map_err(|e: tfreg_core::RegistryError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tfreg=debug,info"
    } else {
        "tfreg=info,warn"
    };

    let (json_layer, text_layer) = if cli.json_logs {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(json_layer)
        .with(text_layer)
        .init();

    let path = cli.registry.as_path();
    match cli.command {
        Commands::Init { deployer } => cmd_init(path, deployer).await,
        Commands::Register {
            caller,
            uri,
            network_id,
            address,
        } => cmd_register(path, caller, &uri, network_id, address).await,
        Commands::Get { uri, network_id } => cmd_get(path, &uri, network_id).await,
        Commands::GetByHash { hash, network_id } => cmd_get_by_hash(path, hash, network_id).await,
        Commands::List { uri } => cmd_list(path, &uri).await,
        Commands::ListByHash { hash } => cmd_list_by_hash(path, hash).await,
        Commands::Grant {
            caller,
            role,
            account,
        } => cmd_grant(path, caller, role, account).await,
        Commands::Revoke {
            caller,
            role,
            account,
        } => cmd_revoke(path, caller, role, account).await,
        Commands::HasRole { role, account } => cmd_has_role(path, role, account).await,
        Commands::Members { role } => cmd_members(path, role).await,
        Commands::Hash { uri } => cmd_hash(&uri),
        Commands::Events { from, limit } => cmd_events(path, from, limit).await,
        Commands::Serve { bind } => cmd_serve(path, bind).await,
    }
}

async fn open_registry(path: &Path) -> Result<FileRegistry> {
    debug!(path = %path.display(), "Opening registry");
    FileRegistry::open(path).await.with_context(|| {
        format!(
            "Failed to open registry {} (run `tfreg init` first; a running `tfreg serve` holds it locked)",
            path.display()
        )
    })
}

fn print_entries(hash: ResourceHash, entries: &[Entry]) {
    println!("{} {}", "Resource hash:".dimmed(), hash);
    if entries.is_empty() {
        println!("{}", "No contracts registered.".yellow());
        return;
    }
    for entry in entries {
        println!(
            "   {} {:>10}  {}",
            "network".dimmed(),
            entry.network_id,
            to_checksum_address(&entry.contract_address).green()
        );
    }
}

/// Create a registry file
async fn cmd_init(path: &Path, deployer: Address) -> Result<()> {
    FileRegistry::create(path, deployer)
        .await
        .with_context(|| format!("Failed to create registry {}", path.display()))?;

    println!("{} {}", "✅ Registry created:".green().bold(), path.display());
    println!(
        "   {} {}",
        "Admin and registrar:".dimmed(),
        to_checksum_address(&deployer)
    );
    Ok(())
}

/// Register a contract
async fn cmd_register(
    path: &Path,
    caller: Address,
    uri: &str,
    network_id: NetworkId,
    address: Address,
) -> Result<()> {
    let registry = open_registry(path).await?;
    registry
        .register_contract(caller, uri, network_id, address)
        .await
        .context("Registration rejected")?;

    println!("{}", "✅ Contract registered".green().bold());
    println!("   {} {}", "URI:".dimmed(), uri);
    println!("   {} {}", "Resource hash:".dimmed(), resource_hash(uri));
    println!("   {} {}", "Network:".dimmed(), network_id);
    println!("   {} {}", "Address:".yellow(), to_checksum_address(&address));
    Ok(())
}

/// Look up one entry by URI
async fn cmd_get(path: &Path, uri: &str, network_id: NetworkId) -> Result<()> {
    let registry = open_registry(path).await?;
    let address = registry.get_contract(uri, network_id).await;

    println!("{}", to_checksum_address(&address));
    if address.is_zero() {
        eprintln!("{}", "(zero address: nothing registered or explicitly zeroed)".dimmed());
    }
    Ok(())
}

/// Look up one entry by hash
async fn cmd_get_by_hash(path: &Path, hash: ResourceHash, network_id: NetworkId) -> Result<()> {
    let registry = open_registry(path).await?;
    let address = registry.get_contract_by_hash(hash, network_id).await;

    println!("{}", to_checksum_address(&address));
    Ok(())
}

/// List entries by URI
async fn cmd_list(path: &Path, uri: &str) -> Result<()> {
    let registry = open_registry(path).await?;
    let entries = registry.get_contracts(uri).await;

    print_entries(resource_hash(uri), &entries);
    Ok(())
}

/// List entries by hash
async fn cmd_list_by_hash(path: &Path, hash: ResourceHash) -> Result<()> {
    let registry = open_registry(path).await?;
    let entries = registry.get_contracts_by_hash(hash).await;

    print_entries(hash, &entries);
    Ok(())
}

/// Grant a role
async fn cmd_grant(path: &Path, caller: Address, role: Role, account: Address) -> Result<()> {
    let registry = open_registry(path).await?;
    registry
        .grant_role(caller, role, account)
        .await
        .context("Grant rejected")?;

    println!(
        "{} {} {} {}",
        "✅ Granted".green().bold(),
        role,
        "to".dimmed(),
        to_checksum_address(&account)
    );
    Ok(())
}

/// Revoke a role
async fn cmd_revoke(path: &Path, caller: Address, role: Role, account: Address) -> Result<()> {
    let registry = open_registry(path).await?;
    registry
        .revoke_role(caller, role, account)
        .await
        .context("Revoke rejected")?;

    println!(
        "{} {} {} {}",
        "✅ Revoked".green().bold(),
        role,
        "from".dimmed(),
        to_checksum_address(&account)
    );
    Ok(())
}

/// Check role membership
async fn cmd_has_role(path: &Path, role: Role, account: Address) -> Result<()> {
    let registry = open_registry(path).await?;
    let held = registry.has_role(role, account).await;

    println!("{}", held);
    Ok(())
}

/// List role holders
async fn cmd_members(path: &Path, role: Role) -> Result<()> {
    let registry = open_registry(path).await?;
    let members = registry.role_members(role).await;

    println!(
        "{} {} ({} {})",
        "Role:".dimmed(),
        role,
        "managed by".dimmed(),
        registry.get_role_admin(role)
    );
    if members.is_empty() {
        println!("{}", "No holders.".yellow());
    }
    for member in &members {
        println!("   {}", to_checksum_address(member));
    }
    Ok(())
}

/// Print a resource hash
fn cmd_hash(uri: &str) -> Result<()> {
    println!("{}", resource_hash(uri));
    Ok(())
}

fn describe_event(logged: &LoggedEvent) -> String {
    match &logged.event {
        RegistryEvent::ContractRegistered {
            registrar,
            resource_hash,
            network_id,
            contract_address,
        } => format!(
            "ContractRegistered registrar={} hash={} network={} address={}",
            to_checksum_address(registrar),
            resource_hash,
            network_id,
            to_checksum_address(contract_address)
        ),
        RegistryEvent::RoleGranted {
            role,
            account,
            sender,
        } => format!(
            "RoleGranted role={} account={} sender={}",
            role,
            to_checksum_address(account),
            to_checksum_address(sender)
        ),
        RegistryEvent::RoleRevoked {
            role,
            account,
            sender,
        } => format!(
            "RoleRevoked role={} account={} sender={}",
            role,
            to_checksum_address(account),
            to_checksum_address(sender)
        ),
    }
}

/// Print the event log
async fn cmd_events(path: &Path, from: u64, limit: usize) -> Result<()> {
    let registry = open_registry(path).await?;
    let events = registry.events(from, limit).await;

    if events.is_empty() {
        println!("{}", "No events.".yellow());
    }
    for logged in &events {
        println!("{:>6}  {}", logged.sequence.to_string().dimmed(), describe_event(logged));
    }
    Ok(())
}

/// Run API server
async fn cmd_serve(path: &Path, bind: SocketAddr) -> Result<()> {
    println!("{}", "🚀 Starting contract registry API server...".cyan().bold());
    println!("   {} http://{}", "Listening on:".green(), bind);
    println!("   {} http://{}/health", "Health check:".dimmed(), bind);
    println!("   {} {}", "Registry:".dimmed(), path.display());
    println!("\n   Press Ctrl+C to stop.\n");

    let mut config = ApiConfig::from_env().context("Invalid API configuration")?;
    config.registry_file = Some(path.to_path_buf());
    config.bind = bind;

    let server = ApiServer::from_config(config)
        .await
        .context("Failed to open registry")?;
    server.run(bind).await?;

    Ok(())
}
