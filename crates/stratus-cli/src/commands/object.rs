//! Object-store object commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::object_store;
use stratus_client::ClientRegistry;

use crate::cli::ObjectCommands;
use crate::commands::container::list_opts;
use crate::error::CliError;
use crate::output::{Listing, OutputFormat};

/// Object command executor.
pub struct ObjectCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ObjectCommand<'a> {
    /// Create a new object command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute an object subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ObjectCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::ObjectStore).await?;
        match command {
            ObjectCommands::List {
                container,
                delimiter,
                listing,
            } => {
                if container.is_empty() {
                    return Err(CliError::InvalidArgument(
                        "container name cannot be empty".into(),
                    ));
                }
                let opts = list_opts(listing, delimiter.as_ref());
                let objects = object_store::object_list(&client, container, &opts).await?;
                format.write(
                    writer,
                    &Listing::new(&["name", "bytes", "content_type", "subdir"], objects),
                )?;
            }
        }
        Ok(())
    }
}
