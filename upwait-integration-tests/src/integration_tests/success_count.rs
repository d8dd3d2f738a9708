use super::EXIT_TIMEOUT;
use std::time::Duration;
use upwait_testing_utils::{CargoBinaryRunner, DummyHttpServer};

#[tokio::test]
async fn exits_after_count_successes() {
    let mut server = DummyHttpServer::new(vec![500, 200, 404, 200, 503, 503, 200]).await;
    let url = server.url();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &["--url", &url, "--delay", "100ms", "--count", "3"],
    );

    let status = upwait.wait(EXIT_TIMEOUT).await.unwrap();
    assert_eq!(status.code(), Some(0));

    // Exits on the third success, no further attempts are made
    assert_eq!(server.hits(), 7);

    let stdout = upwait.stdout();
    assert_eq!(stdout.len(), 8);
    assert_eq!(
        stdout
            .iter()
            .filter(|l| l.contains("HTTP Response Code: 200 for "))
            .count(),
        3
    );
    assert!(stdout[0].contains("HTTP Response Code: 500 for "));
    assert!(stdout[0].contains(" remaining) "));
    assert_eq!(stdout[7], "Exiting after 3 successful fetches.");

    server.stop().await;
}

#[tokio::test]
async fn forever_keeps_running() {
    let mut server = DummyHttpServer::new(vec![200]).await;
    let url = server.url();

    let mut upwait = CargoBinaryRunner::new(
        "upwait",
        &[
            "--url", &url, "--delay", "100ms", "--count", "2", "--forever",
        ],
    );

    // Wait for well past the success count
    tokio::time::timeout(EXIT_TIMEOUT, async {
        while server.hits() < 5 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await
    .expect("upwait should keep fetching");

    assert!(upwait.is_running());
    assert!(!upwait.stdout().iter().any(|l| l.starts_with("Exiting")));

    upwait.stop();
    let status = upwait.wait(Duration::from_secs(10)).await.unwrap();
    assert!(!status.success());

    server.stop().await;
}

#[tokio::test]
async fn transport_errors_are_not_fatal() {
    let address = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let url = format!("http://{address}/");

    let mut upwait = CargoBinaryRunner::new("upwait", &["--url", &url, "--delay", "100ms"]);

    tokio::time::timeout(EXIT_TIMEOUT, async {
        while upwait.stdout().len() < 3 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await
    .expect("upwait should keep reporting errors");

    assert!(upwait.is_running());
    assert!(
        upwait
            .stdout()
            .iter()
            .all(|l| l.contains(") Error: ") && l.ends_with(&format!(" for {url}")))
    );

    upwait.stop();
    let _ = upwait.wait(Duration::from_secs(10)).await;
}
