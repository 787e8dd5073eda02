pub mod api;
pub mod auth;

use crate::agent::ChainHandle;
use crate::cli::Args;
use self::api::AppState;
use self::auth::ApiKeyGuard;

use axum_server::tls_rustls::RustlsConfig;
use log::{ error, info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct Server {
    addr: String,
    chain: Arc<ChainHandle>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, chain: Arc<ChainHandle>, args: Args) -> Self {
        Self { addr, chain, args }
    }

    fn tls_paths(&self) -> Result<Option<(&str, &str)>, Box<dyn Error + Send + Sync>> {
        if !self.args.enable_tls {
            info!("TLS not enabled. Running plain HTTP server.");
            return Ok(None);
        }
        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => Ok(Some((cert_path.as_str(), key_path.as_str()))),
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                Err("Missing TLS certificate or key path".into())
            }
            (None, None) => {
                error!("--enable-tls was set but no certificate/key paths provided.");
                Err("TLS enabled without cert/key".into())
            }
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let guard = ApiKeyGuard::new(self.args.server_api_key.clone());
        if guard.is_enabled() {
            info!("Server configured with API Key authentication.");
        } else {
            warn!("Server configured WITHOUT API Key authentication. Requests are open.");
        }

        let app = api::router(AppState { chain: Arc::clone(&self.chain) }, guard);

        if let Some((cert_path, key_path)) = self.tls_paths()? {
            info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls_config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
            let addr = self.addr.parse::<SocketAddr>()?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service()).await?;
        } else {
            let listener = tokio::net::TcpListener::bind(&self.addr).await.map_err(|e| {
                format!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e)
            })?;
            info!("HTTP server listening on: http://{}", listener.local_addr()?);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal()).await?;
        }

        info!("Server stopped.");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
