//! API version inspection and negotiation commands.

use std::io::Write;
use std::str::FromStr;

use serde_json::json;
use tracing::warn;

use stratus_api::{Discovery, ServiceKind, Transport};
use stratus_client::{services, ClientRegistry};

use crate::cli::ApiCommands;
use crate::error::CliError;
use crate::output::{Listing, Negotiation, OutputFormat, VersionSupport, VersionSupportList};

/// API command executor.
pub struct ApiCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ApiCommand<'a> {
    /// Create a new API command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute an API subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or negotiation fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ApiCommands,
    ) -> Result<(), CliError> {
        match command {
            ApiCommands::List { supported: true } => {
                format.write(writer, &supported_versions())?;
            }
            ApiCommands::List { supported: false } => {
                let listing = self.advertised_versions().await?;
                format.write(writer, &listing)?;
            }
            ApiCommands::Match { service } => {
                let service = ServiceKind::from_str(service)
                    .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
                let client = self.registry.client(service).await?;
                let report = Negotiation {
                    service: service.to_string(),
                    server_version: client.server_version.id.clone(),
                    client_version: client.client_version.id.clone(),
                    endpoint: client
                        .api
                        .gateway()
                        .endpoint()
                        .unwrap_or_default()
                        .to_string(),
                };
                format.write(writer, &report)?;
            }
        }
        Ok(())
    }

    /// Probe every service with a known endpoint and collect the
    /// versions its root advertises. Unreachable services are skipped
    /// with a warning rather than failing the listing.
    async fn advertised_versions(&mut self) -> Result<Listing, CliError> {
        self.registry.ensure_authenticated().await?;
        let session = self.registry.session();
        let discovery = Discovery::new(session.http().clone()).with_url_host_hack(true);

        let mut rows = Vec::new();
        for service in ServiceKind::ALL {
            let Some(endpoint) = session.endpoint_for(service) else {
                continue;
            };
            match discovery.probe_root(service, &endpoint, false).await {
                Ok(versions) => {
                    for version in versions {
                        rows.push(json!({
                            "service": service.to_string(),
                            "id": version.id,
                            "status": version.status,
                        }));
                    }
                }
                Err(err) => warn!(%service, %err, "skipping unreachable service"),
            }
        }
        Ok(Listing::new(&["service", "id", "status"], rows))
    }
}

/// The versions this client can speak, per service. Purely
/// client-side: no network access and no credentials.
#[must_use]
pub fn supported_versions() -> VersionSupportList {
    let services = ServiceKind::ALL
        .into_iter()
        .map(|service| VersionSupport {
            service: service.to_string(),
            supported: services::supported_versions(service)
                .iter()
                .map(ToString::to_string)
                .collect(),
            default: services::default_version(service).to_string(),
        })
        .collect();
    VersionSupportList { services }
}
