//! akbo serve command

use akbo_adapter::controller::http::HttpServer;
use clap::Args;
use shared::AppConfig;
use tracing::info;

#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Listen address after applying command-line overrides
    pub fn bind_address(&self, config: &AppConfig) -> String {
        let mut server = config.server.clone();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        server.bind_address()
    }

    pub fn run(&self, config: &AppConfig) -> anyhow::Result<()> {
        let addr = self.bind_address(config);
        let runtime = tokio::runtime::Runtime::new()?;

        runtime.block_on(async {
            let server = HttpServer::bind(&addr).await?;
            server
                .serve_until(async {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Received Ctrl-C");
                    }
                })
                .await?;
            Ok::<_, anyhow::Error>(())
        })
    }
}
