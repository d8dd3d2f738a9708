use crate::error::{TrustError, TrustResult};
use rustls::{
    ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme,
    client::{
        WebPkiServerVerifier,
        danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    },
    crypto::CryptoProvider,
    pki_types::{CertificateDer, ServerName, UnixTime},
};
use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, info, warn};

/// Trust anchors used to judge the certificates presented by the polled host.
///
/// Built once at startup. Each fetch attempt derives its own TLS configuration
/// from it via [`TrustRoots::client_config`].
pub(crate) struct TrustRoots {
    provider: Arc<CryptoProvider>,
    verifier: Arc<WebPkiServerVerifier>,
}

impl TrustRoots {
    /// Load the baseline roots, extended with the certificates in `bundle`.
    ///
    /// An unreadable bundle is an error. A readable bundle that yields no
    /// usable certificates only produces a warning.
    pub(crate) fn load(bundle: Option<&Path>) -> TrustResult<Self> {
        let mut roots: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

        if let Some(path) = bundle {
            match add_bundle(&mut roots, path)? {
                0 => warn!(
                    "No certs appended from {}, using system certs only",
                    path.display()
                ),
                added => info!("Appended {added} certs from {}", path.display()),
            }
        }

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier =
            WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider.clone())
                .build()?;

        Ok(Self { provider, verifier })
    }

    /// TLS configuration for one fetch attempt.
    ///
    /// Certificates that fail verification are accepted, the failure is
    /// recorded in the returned [`TrustObservation`] instead.
    pub(crate) fn client_config(&self) -> TrustResult<(ClientConfig, TrustObservation)> {
        let observation = TrustObservation::default();

        let verifier = ObservingVerifier {
            inner: self.verifier.clone(),
            observation: observation.clone(),
        };

        let config = ClientConfig::builder_with_provider(self.provider.clone())
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();

        Ok((config, observation))
    }
}

fn add_bundle(roots: &mut RootCertStore, path: &Path) -> TrustResult<usize> {
    let pem = std::fs::read(path).map_err(|source| TrustError::ReadBundle {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = pem.as_slice();
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .filter_map(Result::ok)
        .collect();

    let (added, ignored) = roots.add_parsable_certificates(certs);
    if ignored > 0 {
        debug!("Ignored {ignored} unusable certs in {}", path.display());
    }

    Ok(added)
}

/// Verdict on the certificates seen during one fetch attempt.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrustObservation(Arc<Mutex<Option<String>>>);

impl TrustObservation {
    fn record(&self, err: rustls::Error) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(err.to_string());
    }

    /// Reason the certificate was not trusted, if it was not.
    pub(crate) fn untrusted(&self) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Runs full WebPKI verification but never fails the handshake.
#[derive(Debug)]
struct ObservingVerifier {
    inner: Arc<WebPkiServerVerifier>,
    observation: TrustObservation,
}

impl ServerCertVerifier for ObservingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        if let Err(err) = self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        ) {
            debug!("Certificate for {server_name:?} is not trusted: {err}");
            self.observation.record(err);
        }

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
