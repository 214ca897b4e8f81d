//! TCP and TLS connector.

use crate::bridge::error::BridgeError;
use async_trait::async_trait;
use chatbridge_application::{BoxedStream, Connector};
use chatbridge_domain::Endpoint;
use rustls::pki_types::ServerName;
use std::io;
use std::sync::{Arc, OnceLock};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Opens plain TCP streams, wrapped in TLS when the endpoint asks for it.
#[derive(Default)]
pub struct TcpConnector {
    tls: OnceLock<Arc<rustls::ClientConfig>>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn tls_config(&self) -> Result<Arc<rustls::ClientConfig>, BridgeError> {
        if let Some(config) = self.tls.get() {
            return Ok(Arc::clone(config));
        }
        let config = Arc::new(build_tls_config()?);
        Ok(Arc::clone(self.tls.get_or_init(|| config)))
    }
}

/// Client TLS configuration trusting the bundled web PKI roots.
pub fn build_tls_config() -> Result<rustls::ClientConfig, BridgeError> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| BridgeError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<BoxedStream> {
        debug!("Connecting to {}", endpoint);
        let stream = TcpStream::connect(endpoint.address()).await?;
        stream.set_nodelay(true)?;

        if !endpoint.tls {
            return Ok(Box::new(stream));
        }

        let config = self.tls_config().map_err(io::Error::other)?;
        let server_name = ServerName::try_from(endpoint.host.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let stream = TlsConnector::from(config)
            .connect(server_name, stream)
            .await?;
        debug!("TLS established with {}", endpoint.host);
        Ok(Box::new(stream))
    }
}
