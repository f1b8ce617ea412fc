//! Image commands.

use std::io::Write;

use stratus_api::ServiceKind;
use stratus_client::services::image;
use stratus_client::ClientRegistry;

use crate::cli::ImageCommands;
use crate::error::CliError;
use crate::output::{Listing, OutputFormat};

/// Image command executor.
pub struct ImageCommand<'a> {
    registry: &'a mut ClientRegistry,
}

impl<'a> ImageCommand<'a> {
    /// Create a new image command.
    #[must_use]
    pub fn new(registry: &'a mut ClientRegistry) -> Self {
        Self { registry }
    }

    /// Execute an image subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &mut self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ImageCommands,
    ) -> Result<(), CliError> {
        let client = self.registry.client(ServiceKind::Image).await?;
        match command {
            ImageCommands::List => {
                let images = image::image_list(&client, Vec::new()).await?;
                format.write(writer, &Listing::new(&["id", "name", "status"], images))?;
            }
        }
        Ok(())
    }
}
