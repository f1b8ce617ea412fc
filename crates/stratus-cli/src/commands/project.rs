//! Identity project commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::identity;
use stratus_client::ClientRegistry;

use crate::cli::ProjectCommands;
use crate::error::CliError;
use crate::output::{Listing, OutputFormat};

/// Project command executor.
pub struct ProjectCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ProjectCommand<'a> {
    /// Create a new project command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute a project subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ProjectCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::Identity).await?;
        match command {
            ProjectCommands::List => {
                let projects = identity::project_list(&client).await?;
                format.write(writer, &Listing::new(&["id", "name", "enabled"], projects))?;
            }
        }
        Ok(())
    }
}
