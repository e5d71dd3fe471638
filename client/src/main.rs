//! `jfrogctl` — CLI over the platform client.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jfrog_client::models::{BundleSpec, TokenRequest};
use jfrog_client::sync::ReplicationCredentials;
use jfrog_client::{access, repository, support, sync, system, transfer};
use jfrog_client::{Capabilities, Instance, RepositoryType};

#[derive(Parser)]
#[command(name = "jfrogctl", version, about = "JFrog Platform admin and migration client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Credentials for a single instance.
#[derive(Args)]
struct InstanceArgs {
    /// Base URL of the platform (trailing /artifactory etc. is stripped)
    #[arg(long, env = "JFROG_URL")]
    url: String,
    /// Access or identity token of an admin account
    #[arg(long, env = "JFROG_TOKEN", hide_env_values = true)]
    token: String,
}

impl InstanceArgs {
    fn instance(&self) -> anyhow::Result<Instance> {
        Ok(Instance::new(&self.url, &self.token)?)
    }
}

/// Credentials for a source/target migration pair.
#[derive(Args)]
struct PairArgs {
    #[arg(long, env = "JFROG_SOURCE_URL")]
    source_url: String,
    #[arg(long, env = "JFROG_SOURCE_TOKEN", hide_env_values = true)]
    source_token: String,
    #[arg(long, env = "JFROG_TARGET_URL")]
    target_url: String,
    #[arg(long, env = "JFROG_TARGET_TOKEN", hide_env_values = true)]
    target_token: String,
}

impl PairArgs {
    fn instances(&self) -> anyhow::Result<(Instance, Instance)> {
        Ok((
            Instance::new(&self.source_url, &self.source_token)?,
            Instance::new(&self.target_url, &self.target_token)?,
        ))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Check platform health
    Ping(InstanceArgs),
    /// Show the running platform version
    Version(InstanceArgs),
    /// Show license details
    License(InstanceArgs),
    /// Show HA cluster licenses and node count
    Licenses(InstanceArgs),
    /// Show the storage summary
    StorageInfo(InstanceArgs),
    /// Count repositories of one class
    RepoCount {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long, value_enum, default_value_t = RepositoryType::Local)]
        rtype: RepositoryType,
    },
    /// Create a repository from a minimal definition
    CreateRepo {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        key: String,
        #[arg(long)]
        package_type: String,
        #[arg(long, value_enum, default_value_t = RepositoryType::Local)]
        rtype: RepositoryType,
    },
    /// Count users, optionally by realm (internal|saml|scim)
    Users {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        realm: Option<String>,
    },
    /// List access tokens
    Tokens {
        #[command(flatten)]
        instance: InstanceArgs,
        /// Also write the table to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Create an access token
    CreateToken {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        description: String,
        #[arg(long)]
        scope: Option<String>,
        /// Expiry in seconds; omit for the platform default
        #[arg(long)]
        expires_in: Option<u64>,
        #[arg(long)]
        refreshable: bool,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        project_key: Option<String>,
    },
    /// Show or set the default token expiry in seconds
    TokenExpiry {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        set: Option<u64>,
    },
    /// Create a support bundle and print its id
    BundleCreate {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Download a support bundle archive to <id>.zip
    BundleDownload {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        id: String,
        /// Destination directory
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
    /// Mirror local repositories from source to target, with replication
    SyncLocal {
        #[command(flatten)]
        pair: PairArgs,
        /// Account used for the push-replication jobs on the source
        #[arg(long, env = "JFROG_REPLICATION_USER")]
        replication_user: String,
        #[arg(long, env = "JFROG_REPLICATION_PASSWORD", hide_env_values = true)]
        replication_password: String,
    },
    /// Mirror remote repositories from source to target
    SyncRemote {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Mirror permission targets from source to target
    SyncPermissions {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Compare repository listings without writing anything
    CheckRepos {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long, value_enum, default_value_t = RepositoryType::Local)]
        rtype: RepositoryType,
    },
    /// Server-side copy of all content from one repository to another
    CopyContent {
        #[command(flatten)]
        instance: InstanceArgs,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ping(args) => {
            let instance = args.instance()?;
            let healthy = system::ping(&instance).await;
            println!("{}", if healthy { "OK" } else { "UNHEALTHY" });
        }
        Command::Version(args) => {
            let info = system::get_version(&args.instance()?).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::License(args) => {
            let license = system::get_license(&args.instance()?).await?;
            println!("{}", serde_json::to_string_pretty(&license)?);
        }
        Command::Licenses(args) => {
            let instance = args.instance()?;
            let licenses = system::get_licenses(&instance).await?;
            println!("{}", serde_json::to_string_pretty(&licenses)?);
            println!("nodes: {}", licenses.len());
        }
        Command::StorageInfo(args) => {
            let info = system::get_storage_info(&args.instance()?).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::RepoCount { instance, rtype } => {
            let count = repository::repo_count(&instance.instance()?, rtype).await?;
            println!("{count}");
        }
        Command::CreateRepo { instance, key, package_type, rtype } => {
            let body =
                repository::create_repository(&instance.instance()?, &key, &package_type, rtype)
                    .await?;
            println!("{body}");
        }
        Command::Users { instance, realm } => {
            let instance = instance.instance()?;
            let caps = Capabilities::resolve(&instance).await?;
            let count = access::count_users(&instance, &caps, realm.as_deref()).await?;
            println!("{count}");
        }
        Command::Tokens { instance, export } => {
            let instance = instance.instance()?;
            let caps = Capabilities::resolve(&instance).await?;
            let tokens = access::list_tokens(&instance, &caps).await?;
            let table = access::render_token_table(&tokens);
            println!("\n{table}\n");
            if let Some(path) = export {
                std::fs::write(&path, &table)
                    .with_context(|| format!("could not write {}", path.display()))?;
                println!("exported to {}", path.display());
            }
        }
        Command::CreateToken {
            instance,
            description,
            scope,
            expires_in,
            refreshable,
            username,
            project_key,
        } => {
            let instance = instance.instance()?;
            let caps = Capabilities::resolve(&instance).await?;
            let request = TokenRequest {
                description: Some(description),
                scope,
                expires_in,
                refreshable,
                username,
                project_key,
                include_reference_token: true,
            };
            let token = access::create_token(&instance, &caps, &request).await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::TokenExpiry { instance, set } => {
            let instance = instance.instance()?;
            let caps = Capabilities::resolve(&instance).await?;
            match set {
                Some(expiry) => {
                    access::set_default_token_expiry(&instance, &caps, expiry).await?;
                    println!("default expiry set to {expiry}s");
                }
                None => {
                    let expiry = access::default_token_expiry(&instance, &caps).await?;
                    println!("{expiry}");
                }
            }
        }
        Command::BundleCreate { instance, name, description } => {
            let id =
                support::create_support_bundle(&instance.instance()?, &BundleSpec::new(name, description))
                    .await?;
            println!("{id}");
        }
        Command::BundleDownload { instance, id, dest } => {
            let path = support::download_support_bundle(&instance.instance()?, &id, &dest).await?;
            println!("{}", path.display());
        }
        Command::SyncLocal { pair, replication_user, replication_password } => {
            let (source, target) = pair.instances()?;
            let credentials = ReplicationCredentials {
                username: replication_user,
                password: replication_password,
            };
            let report = sync::sync_local_repositories(&source, &target, &credentials).await?;
            print_sync_report(&report);
        }
        Command::SyncRemote { pair } => {
            let (source, target) = pair.instances()?;
            let report = sync::sync_remote_repositories(&source, &target).await?;
            print_sync_report(&report);
        }
        Command::SyncPermissions { pair } => {
            let (source, target) = pair.instances()?;
            let report = sync::sync_permissions(&source, &target).await?;
            print_sync_report(&report);
        }
        Command::CheckRepos { pair, rtype } => {
            let (source, target) = pair.instances()?;
            let diff = sync::compare_repositories(&source, &target, rtype).await?;
            println!(
                "{}: source={} target={}",
                diff.rtype, diff.source_count, diff.target_count
            );
            for key in &diff.missing_in_target {
                println!("missing in target: {key}");
            }
        }
        Command::CopyContent { instance, from, to } => {
            let report = transfer::copy_repo_content(&instance.instance()?, &from, &to).await?;
            println!("copied {} file(s), {} failed", report.copied.len(), report.failed.len());
            for (path, err) in &report.failed {
                println!("failed {path}: {err}");
            }
        }
    }
    Ok(())
}

fn print_sync_report(report: &jfrog_client::SyncReport) {
    println!(
        "synced {}, skipped {}, failed {}",
        report.synced.len(),
        report.skipped_offline.len(),
        report.failed.len()
    );
    for (name, err) in &report.failed {
        println!("failed {name}: {err}");
    }
}
