use super::EXIT_TIMEOUT;
use upwait_testing_utils::{CargoBinaryRunner, DummyHttpServer};

#[tokio::test]
async fn missing_url() {
    let mut upwait = CargoBinaryRunner::new("upwait", &["--delay", "100ms"]);

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(upwait.stdout().is_empty());
}

#[tokio::test]
async fn empty_url() {
    let mut upwait = CargoBinaryRunner::new("upwait", &["--url", "", "--delay", "100ms"]);

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(upwait.stdout().is_empty());
}

#[tokio::test]
async fn unreadable_cert_file() {
    let mut server = DummyHttpServer::new(vec![200]).await;
    let url = server.url();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &[
            "--url",
            &url,
            "--delay",
            "100ms",
            "--cert",
            "/nonexistent/upwait/ca.pem",
        ],
    );

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(upwait.stdout().is_empty());
    assert_eq!(server.hits(), 0);

    server.stop().await;
}
