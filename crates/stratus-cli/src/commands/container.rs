//! Object-store container commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::object_store::{self, ListOpts};
use stratus_client::ClientRegistry;

use crate::cli::{ContainerCommands, ListingArgs};
use crate::error::CliError;
use crate::output::{Listing, OutputFormat};

/// Container command executor.
pub struct ContainerCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ContainerCommand<'a> {
    /// Create a new container command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute a container subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ContainerCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::ObjectStore).await?;
        match command {
            ContainerCommands::List(args) => {
                let opts = list_opts(args, None);
                let containers = object_store::container_list(&client, &opts).await?;
                format.write(
                    writer,
                    &Listing::new(&["name", "count", "bytes"], containers),
                )?;
            }
        }
        Ok(())
    }
}

/// Listing controls from the shared CLI arguments.
pub(crate) fn list_opts(args: &ListingArgs, delimiter: Option<&String>) -> ListOpts {
    ListOpts {
        marker: args.marker.clone(),
        end_marker: args.end_marker.clone(),
        limit: args.limit,
        prefix: args.prefix.clone(),
        delimiter: delimiter.cloned(),
        all: args.all,
    }
}
