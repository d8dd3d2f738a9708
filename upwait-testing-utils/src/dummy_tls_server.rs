use crate::pem::{SERVER_CERTIFICATE_PEM, SERVER_KEY_PEM};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tokio_rustls::{TlsAcceptor, rustls};
use tracing::debug;

/// HTTPS server presenting a certificate issued by the test CA.
///
/// Answers each connection with a single bodiless response and closes it.
pub struct DummyTlsServer {
    handle: Option<JoinHandle<()>>,
    address: SocketAddr,
}

impl DummyTlsServer {
    pub async fn new(status: u16) -> Self {
        let acceptor = TlsAcceptor::from(Arc::new(server_config()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("tcp listener should bind");
        let address = listener
            .local_addr()
            .expect("tcp listener should have an address");

        let handle = Some(tokio::spawn(async move {
            loop {
                let Ok((stream, peer)) = listener.accept().await else {
                    continue;
                };

                let acceptor = acceptor.clone();
                let _ = tokio::spawn(async move {
                    if let Err(e) = respond(acceptor, stream, status).await {
                        debug!("Connection from {peer} failed: {e}");
                    }
                });
            }
        }));

        Self { handle, address }
    }

    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    pub fn url(&self) -> String {
        format!("https://{}/", self.address)
    }
}

fn server_config() -> rustls::ServerConfig {
    let certs = rustls_pemfile::certs(&mut SERVER_CERTIFICATE_PEM.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .expect("server certificate should parse");

    let key = rustls_pemfile::private_key(&mut SERVER_KEY_PEM.as_bytes())
        .expect("server key should parse")
        .expect("server key should be present");

    rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .expect("protocol versions should be supported")
    .with_no_client_auth()
    .with_single_cert(certs, key)
    .expect("server certificate and key should match")
}

async fn respond(acceptor: TlsAcceptor, stream: TcpStream, status: u16) -> std::io::Result<()> {
    let mut stream = acceptor.accept(stream).await?;

    // Read the request head, the body of a GET is empty
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let response =
        format!("HTTP/1.1 {status} Dummy\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
