//! Compute server commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::compute;
use stratus_client::ClientRegistry;

use crate::cli::ServerCommands;
use crate::error::CliError;
use crate::output::{Detail, Listing, OutputFormat};

/// Server command executor.
pub struct ServerCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ServerCommand<'a> {
    /// Create a new server command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute a server subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ServerCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::Compute).await?;
        match command {
            ServerCommands::List { long } => {
                let servers = compute::server_list(&client, *long, Vec::new()).await?;
                format.write(writer, &Listing::new(&["id", "name", "status"], servers))?;
            }
            ServerCommands::Show { name } => {
                let server = compute::server_find(&client, name).await?;
                format.write(writer, &Detail { item: server })?;
            }
        }
        Ok(())
    }
}
