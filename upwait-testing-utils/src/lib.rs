mod cargo;
mod dummy_http_server;
mod dummy_tls_server;
mod pem;

pub use self::{
    cargo::CargoBinaryRunner,
    dummy_http_server::DummyHttpServer,
    dummy_tls_server::DummyTlsServer,
    pem::{CA_CERTIFICATE_PEM, SERVER_CERTIFICATE_PEM, SERVER_KEY_PEM, temp_pem_file},
};
