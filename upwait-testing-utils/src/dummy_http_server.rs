use axum::{Router, extract::State, http::StatusCode};
use std::{
    collections::VecDeque,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::debug;

#[derive(Clone)]
struct Script {
    responses: Arc<Mutex<VecDeque<StatusCode>>>,
    delay: Duration,
    hits: Arc<AtomicUsize>,
}

impl Script {
    /// Next scripted status. The last one repeats once the script runs out.
    fn next(&self) -> StatusCode {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().copied().unwrap_or(StatusCode::OK)
        }
    }
}

/// HTTP server answering every request with the next status from a script.
pub struct DummyHttpServer {
    handle: Option<JoinHandle<()>>,
    address: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl DummyHttpServer {
    pub async fn new(responses: Vec<u16>) -> Self {
        Self::with_delay(responses, Duration::ZERO).await
    }

    pub async fn with_delay(responses: Vec<u16>, delay: Duration) -> Self {
        let responses = responses
            .into_iter()
            .map(|code| StatusCode::from_u16(code).expect("status code should be valid"))
            .collect();

        let script = Script {
            responses: Arc::new(Mutex::new(responses)),
            delay,
            hits: Arc::default(),
        };
        let hits = script.hits.clone();

        let app = Router::new().fallback(handler).with_state(script);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("tcp listener should bind");
        let address = listener
            .local_addr()
            .expect("tcp listener should have an address");

        let handle = Some(tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        }));

        Self {
            handle,
            address,
            hits,
        }
    }

    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.address)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn handler(State(script): State<Script>) -> StatusCode {
    let _ = script.hits.fetch_add(1, Ordering::SeqCst);

    if !script.delay.is_zero() {
        tokio::time::sleep(script.delay).await;
    }

    let status = script.next();
    debug!("Responding with {status}");
    status
}
