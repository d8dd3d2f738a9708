use std::io::Write;
use tempfile::NamedTempFile;

/// Private CA that issued [`SERVER_CERTIFICATE_PEM`].
pub const CA_CERTIFICATE_PEM: &str = include_str!("../data/ca.pem");

/// Leaf certificate for `localhost` and `127.0.0.1`.
pub const SERVER_CERTIFICATE_PEM: &str = include_str!("../data/server.pem");

/// PKCS#8 key for [`SERVER_CERTIFICATE_PEM`].
pub const SERVER_KEY_PEM: &str = include_str!("../data/server.key");

pub fn temp_pem_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary file should be created");
    file.write_all(contents.as_bytes())
        .expect("temporary file should be written");
    file
}
