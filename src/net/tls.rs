//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::interfaces::TransportError;

/// Load TLS configuration from certificate and key files.
///
/// Both files must exist and contain PEM data: at least one certificate and
/// exactly one private key.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TransportError> {
    let (cert, key) = (cert_path.to_path_buf(), key_path.to_path_buf());
    tokio::task::spawn_blocking(move || check_pem(&cert, &key))
        .await
        .map_err(|e| TransportError::Task(e.to_string()))??;

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| TransportError::Tls(format!("{}: {}", cert_path.display(), e)))
}

fn check_pem(cert_path: &Path, key_path: &Path) -> Result<(), TransportError> {
    let mut certs = open(cert_path, "Certificate")?;
    let cert_count = rustls_pemfile::certs(&mut certs)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TransportError::Tls(format!("unreadable certificate {:?}: {}", cert_path, e)))?
        .len();
    if cert_count == 0 {
        return Err(TransportError::Tls(format!(
            "no certificate found in {:?}",
            cert_path
        )));
    }

    let mut key = open(key_path, "Private key")?;
    match rustls_pemfile::private_key(&mut key) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(TransportError::Tls(format!(
            "no private key found in {:?}",
            key_path
        ))),
        Err(e) => Err(TransportError::Tls(format!(
            "unreadable private key {:?}: {}",
            key_path, e
        ))),
    }
}

fn open(path: &Path, what: &str) -> Result<BufReader<File>, TransportError> {
    if !path.exists() {
        return Err(TransportError::Tls(format!("{} file not found: {:?}", what, path)));
    }
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| TransportError::Tls(format!("{} file {:?}: {}", what, path, e)))
}
