//! Serve command - expose the question endpoint over HTTP

use clap::Args;

use btca_core::Registry;

/// Serve the question endpoint over HTTP
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to bind (defaults to the configured port)
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command; runs until interrupted
    pub async fn execute(&self, registry: Registry) -> anyhow::Result<()> {
        let port = self.port.unwrap_or(registry.config().port);

        println!("Serving btca on http://127.0.0.1:{port}");
        btca_server::serve(registry, port).await?;

        Ok(())
    }
}
