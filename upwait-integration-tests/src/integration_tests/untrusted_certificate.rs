use super::EXIT_TIMEOUT;
use upwait_testing_utils::{CA_CERTIFICATE_PEM, CargoBinaryRunner, DummyTlsServer, temp_pem_file};

#[tokio::test]
async fn untrusted_certificate_is_reported_not_rejected() {
    let mut server = DummyTlsServer::new(200).await;
    let url = server.url();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &["--url", &url, "--delay", "100ms", "--count", "2"],
    );

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(0));

    let stdout = upwait.stdout();
    assert_eq!(stdout.len(), 3);
    for line in &stdout[..2] {
        assert!(
            line.contains("HTTP Response Code: 200, untrusted SSL certificate: "),
            "{line}"
        );
        assert!(line.ends_with(&format!(" for {url}")));
    }

    server.stop().await;
}

#[tokio::test]
async fn cert_bundle_extends_trust() {
    let mut server = DummyTlsServer::new(200).await;
    let url = server.url();
    let bundle = temp_pem_file(CA_CERTIFICATE_PEM);
    let bundle_path = bundle.path().display().to_string();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &[
            "--url",
            &url,
            "--delay",
            "100ms",
            "--count",
            "1",
            "--cert",
            &bundle_path,
        ],
    );

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(0));

    let stdout = upwait.stdout();
    assert_eq!(stdout.len(), 2);
    assert!(stdout[0].ends_with(&format!("HTTP Response Code: 200 for {url}")));
    assert_eq!(stdout[1], "Exiting after 1 successful fetches.");

    server.stop().await;
}

#[tokio::test]
async fn bundle_without_certs_is_not_fatal() {
    let mut server = DummyTlsServer::new(200).await;
    let url = server.url();
    let bundle = temp_pem_file("no certificates in here\n");
    let bundle_path = bundle.path().display().to_string();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &[
            "--url",
            &url,
            "--delay",
            "100ms",
            "--count",
            "1",
            "--cert",
            &bundle_path,
        ],
    );

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(0));
    assert!(upwait.stdout()[0].contains("untrusted SSL certificate"));

    server.stop().await;
}
