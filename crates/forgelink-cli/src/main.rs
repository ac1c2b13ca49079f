//! forgelink CLI - MCP adapter servers for Bitbucket and JIRA.

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use forgelink_bitbucket::BitbucketClient;
use forgelink_core::Config;
use forgelink_jira::JiraClient;
use forgelink_mcp::{BitbucketTools, JiraTools, McpServer, ToolSet};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forgelink")]
#[command(author, version, about = "MCP servers for Bitbucket and JIRA", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Bitbucket,
    Jira,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an MCP server on stdio
    Serve {
        /// Which provider to serve
        #[arg(value_enum)]
        provider: Provider,
    },

    /// List the tools a provider's server exposes
    Tools {
        /// Which provider to inspect
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Configure credentials
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Configure Bitbucket credentials
    Bitbucket {
        /// Bitbucket username
        #[arg(long)]
        username: Option<String>,

        /// Bitbucket app password
        #[arg(long)]
        app_password: Option<String>,
    },

    /// Configure JIRA credentials
    Jira {
        /// JIRA instance URL
        #[arg(long)]
        url: Option<String>,

        /// Account email
        #[arg(long)]
        email: Option<String>,

        /// API token
        #[arg(long)]
        api_token: Option<String>,
    },

    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout belongs to the MCP transport.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Serve { provider }) => {
            let config = Config::load()?;
            let tools = build_tools(provider, &config)?;
            let mut server = McpServer::new(tools);
            server.run().await?;
        }
        Some(Commands::Tools { provider }) => {
            let config = Config::load().unwrap_or_default();
            let tools = build_tools_unchecked(provider, &config);
            for def in tools.tool_definitions() {
                println!("{:<24} {}", def.name, def.description);
            }
        }
        Some(Commands::Config { command }) => {
            handle_config(command)?;
        }
        None => {
            println!("forgelink - MCP servers for Bitbucket and JIRA");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

/// Build the tool set for a provider, requiring credentials.
fn build_tools(provider: Provider, config: &Config) -> anyhow::Result<Arc<dyn ToolSet>> {
    match provider {
        Provider::Bitbucket => {
            let creds = config.bitbucket()?;
            let client = BitbucketClient::new(creds.username.clone(), creds.app_password.clone());
            Ok(Arc::new(BitbucketTools::new(client)))
        }
        Provider::Jira => {
            let creds = config.jira()?;
            let client = JiraClient::new(
                creds.url.clone(),
                creds.email.clone(),
                creds.api_token.clone(),
            );
            Ok(Arc::new(JiraTools::new(client)))
        }
    }
}

/// Build a tool set with whatever credentials are present.
///
/// Listing tools needs no credentials, so missing ones are fine here.
fn build_tools_unchecked(provider: Provider, config: &Config) -> Arc<dyn ToolSet> {
    match provider {
        Provider::Bitbucket => {
            let creds = config.bitbucket.clone().unwrap_or_default();
            let client = BitbucketClient::new(creds.username, creds.app_password);
            Arc::new(BitbucketTools::new(client))
        }
        Provider::Jira => {
            let creds = config.jira.clone().unwrap_or_default();
            let client = JiraClient::new(creds.url, creds.email, creds.api_token);
            Arc::new(JiraTools::new(client))
        }
    }
}

/// Apply config subcommands against the config file.
fn handle_config(command: ConfigCommands) -> anyhow::Result<()> {
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;

    match command {
        ConfigCommands::Bitbucket {
            username,
            app_password,
        } => {
            let bb = config.bitbucket.get_or_insert_with(Default::default);
            if let Some(username) = username {
                bb.username = username;
            }
            if let Some(app_password) = app_password {
                bb.app_password = app_password;
            }
            config.save_to(&path)?;
            println!("Bitbucket configuration saved to {}", path.display());
        }
        ConfigCommands::Jira {
            url,
            email,
            api_token,
        } => {
            let jira = config.jira.get_or_insert_with(Default::default);
            if let Some(url) = url {
                jira.url = url;
            }
            if let Some(email) = email {
                jira.email = email;
            }
            if let Some(api_token) = api_token {
                jira.api_token = api_token;
            }
            config.save_to(&path)?;
            println!("JIRA configuration saved to {}", path.display());
        }
        ConfigCommands::Show => {
            println!("Config file: {}", path.display());
            match &config.bitbucket {
                Some(bb) => println!("Bitbucket: username={}", bb.username),
                None => println!("Bitbucket: not configured"),
            }
            match &config.jira {
                Some(jira) => println!("JIRA: url={} email={}", jira.url, jira.email),
                None => println!("JIRA: not configured"),
            }
        }
    }

    Ok(())
}
