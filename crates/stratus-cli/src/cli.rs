//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use stratus_api::ServiceKind;
use stratus_auth::{CloudOptions, Verify};

/// Stratus CLI - cloud API client with version negotiation.
#[derive(Parser, Debug, Clone)]
#[command(name = "stratus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Identity service URL.
    #[arg(long, env = "OS_AUTH_URL")]
    pub os_auth_url: Option<String>,

    /// User name for password authentication.
    #[arg(long, env = "OS_USERNAME")]
    pub os_username: Option<String>,

    /// Password for password authentication.
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    /// Project to scope the token to.
    #[arg(long, env = "OS_PROJECT_NAME")]
    pub os_project_name: Option<String>,

    /// Pre-acquired token.
    #[arg(long, env = "OS_TOKEN", hide_env_values = true)]
    pub os_token: Option<String>,

    /// Fixed service endpoint, used with --os-token to bypass the
    /// service catalog.
    #[arg(long, env = "OS_URL")]
    pub os_url: Option<String>,

    /// CA certificate bundle for TLS verification.
    #[arg(long, env = "OS_CACERT")]
    pub os_cacert: Option<PathBuf>,

    /// Skip TLS certificate verification.
    #[arg(long)]
    pub insecure: bool,

    /// Identity API version to request.
    #[arg(long, env = "OS_IDENTITY_API_VERSION")]
    pub os_identity_api_version: Option<String>,

    /// Compute API version to request.
    #[arg(long, env = "OS_COMPUTE_API_VERSION")]
    pub os_compute_api_version: Option<String>,

    /// Image API version to request.
    #[arg(long, env = "OS_IMAGE_API_VERSION")]
    pub os_image_api_version: Option<String>,

    /// Network API version to request.
    #[arg(long, env = "OS_NETWORK_API_VERSION")]
    pub os_network_api_version: Option<String>,

    /// Object-store API version to request.
    #[arg(long, env = "OS_OBJECT_API_VERSION")]
    pub os_object_api_version: Option<String>,

    /// Volume API version to request.
    #[arg(long, env = "OS_VOLUME_API_VERSION")]
    pub os_volume_api_version: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The cloud options these flags describe.
    #[must_use]
    pub fn cloud_options(&self) -> CloudOptions {
        let verify = if self.insecure {
            Verify::Disabled
        } else if let Some(path) = &self.os_cacert {
            Verify::CaBundle(path.clone())
        } else {
            Verify::Enabled
        };

        let mut options = CloudOptions {
            auth_url: self.os_auth_url.clone(),
            username: self.os_username.clone(),
            password: self.os_password.clone(),
            project_name: self.os_project_name.clone(),
            token: self.os_token.clone(),
            service_url: self.os_url.clone(),
            verify,
            ..CloudOptions::default()
        };
        let requested = [
            (ServiceKind::Identity, &self.os_identity_api_version),
            (ServiceKind::Compute, &self.os_compute_api_version),
            (ServiceKind::Image, &self.os_image_api_version),
            (ServiceKind::Network, &self.os_network_api_version),
            (ServiceKind::ObjectStore, &self.os_object_api_version),
            (ServiceKind::Volume, &self.os_volume_api_version),
        ];
        for (service, version) in requested {
            if let Some(version) = version {
                options.version_overrides.insert(service, version.clone());
            }
        }
        options
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// API version inspection and negotiation.
    Api {
        /// API subcommand to execute.
        #[command(subcommand)]
        command: ApiCommands,
    },

    /// Compute server commands.
    Server {
        /// Server subcommand to execute.
        #[command(subcommand)]
        command: ServerCommands,
    },

    /// Identity project commands.
    Project {
        /// Project subcommand to execute.
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Image commands.
    Image {
        /// Image subcommand to execute.
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Network commands.
    Network {
        /// Network subcommand to execute.
        #[command(subcommand)]
        command: NetworkCommands,
    },

    /// Volume commands.
    Volume {
        /// Volume subcommand to execute.
        #[command(subcommand)]
        command: VolumeCommands,
    },

    /// Object-store container commands.
    Container {
        /// Container subcommand to execute.
        #[command(subcommand)]
        command: ContainerCommands,
    },

    /// Object-store object commands.
    Object {
        /// Object subcommand to execute.
        #[command(subcommand)]
        command: ObjectCommands,
    },
}

/// API subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ApiCommands {
    /// Show the API versions each configured service advertises.
    List {
        /// Show the client-supported version table instead; no
        /// credentials or network access required.
        #[arg(long)]
        supported: bool,
    },

    /// Negotiate an API version with a service and show the result.
    Match {
        /// Service to negotiate with (for example `compute`).
        service: String,
    },
}

/// Server subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ServerCommands {
    /// List servers.
    List {
        /// Ask the service for expanded records.
        #[arg(long)]
        long: bool,
    },

    /// Show one server by name or ID.
    Show {
        /// Server name or ID.
        name: String,
    },
}

/// Project subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommands {
    /// List projects.
    List,
}

/// Image subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ImageCommands {
    /// List images.
    List,
}

/// Network subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NetworkCommands {
    /// List networks.
    List,

    /// Show one network by name or ID.
    Show {
        /// Network name or ID.
        name: String,
    },
}

/// Volume subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum VolumeCommands {
    /// List volumes.
    List {
        /// Ask the service for expanded records.
        #[arg(long)]
        long: bool,
    },
}

/// Container subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ContainerCommands {
    /// List containers in the account.
    List(ListingArgs),
}

/// Object subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ObjectCommands {
    /// List objects in a container.
    List {
        /// Container to list.
        container: String,

        /// Group names at this character.
        #[arg(long)]
        delimiter: Option<String>,

        /// Shared listing controls.
        #[command(flatten)]
        listing: ListingArgs,
    },
}

/// Listing controls shared by object-store commands.
#[derive(Parser, Debug, Clone)]
pub struct ListingArgs {
    /// Start the listing after this name.
    #[arg(long)]
    pub marker: Option<String>,

    /// Stop the listing before this name.
    #[arg(long)]
    pub end_marker: Option<String>,

    /// Cap the number of items per request.
    #[arg(long)]
    pub limit: Option<u64>,

    /// Only items whose name starts with this prefix.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Follow markers until the listing is exhausted.
    #[arg(long)]
    pub all: bool,
}
