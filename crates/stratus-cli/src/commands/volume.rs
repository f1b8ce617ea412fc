//! Volume commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::volume;
use stratus_client::ClientRegistry;

use crate::cli::VolumeCommands;
use crate::error::CliError;
use crate::output::{Listing, OutputFormat};

/// Volume command executor.
pub struct VolumeCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> VolumeCommand<'a> {
    /// Create a new volume command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute a volume subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &VolumeCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::Volume).await?;
        match command {
            VolumeCommands::List { long } => {
                let volumes = volume::volume_list(&client, *long).await?;
                format.write(
                    writer,
                    &Listing::new(&["id", "display_name", "status", "size"], volumes),
                )?;
            }
        }
        Ok(())
    }
}
