//! Network commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::network;
use stratus_client::ClientRegistry;

use crate::cli::NetworkCommands;
use crate::error::CliError;
use crate::output::{Detail, Listing, OutputFormat};

/// Network command executor.
pub struct NetworkCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> NetworkCommand<'a> {
    /// Create a new network command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute a network subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the network is not
    /// found.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &NetworkCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::Network).await?;
        match command {
            NetworkCommands::List => {
                let networks = network::network_list(&client, Vec::new()).await?;
                format.write(writer, &Listing::new(&["id", "name", "status"], networks))?;
            }
            NetworkCommands::Show { name } => {
                let net = network::network_find(&client, name).await?;
                format.write(writer, &Detail { item: net })?;
            }
        }
        Ok(())
    }
}
