use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tabshell::services::star_sync::{
    stars_endpoint, StarTransport, SyncQueue, SyncRequest, SYNC_MAX_ATTEMPTS,
};
use tabshell::types::errors::SyncError;

#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<(&'static str, String, String)>>,
}

#[async_trait]
impl StarTransport for RecordingTransport {
    async fn star(&self, url: &str, session_id: &str) -> Result<(), SyncError> {
        self.calls
            .lock()
            .unwrap()
            .push(("star", url.to_string(), session_id.to_string()));
        Ok(())
    }

    async fn unstar(&self, url: &str, session_id: &str) -> Result<(), SyncError> {
        self.calls
            .lock()
            .unwrap()
            .push(("unstar", url.to_string(), session_id.to_string()));
        Ok(())
    }
}

/// Fails the first `failures` attempts, then succeeds.
struct FlakyTransport {
    failures: u32,
    attempts: Mutex<u32>,
    delivered: Mutex<Vec<String>>,
}

impl FlakyTransport {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            attempts: Mutex::new(0),
            delivered: Mutex::new(Vec::new()),
        }
    }

    fn attempt(&self, url: &str) -> Result<(), SyncError> {
        let mut attempts = self.attempts.lock().unwrap();
        *attempts += 1;
        if *attempts <= self.failures {
            Err(SyncError::NetworkError("connection reset".to_string()))
        } else {
            self.delivered.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }
}

#[async_trait]
impl StarTransport for FlakyTransport {
    async fn star(&self, url: &str, _session_id: &str) -> Result<(), SyncError> {
        self.attempt(url)
    }

    async fn unstar(&self, url: &str, _session_id: &str) -> Result<(), SyncError> {
        self.attempt(url)
    }
}

#[test]
fn test_stars_endpoint_url_encodes_target() {
    assert_eq!(
        stars_endpoint("https://stars.example", "http://a.com/page?q=1"),
        "https://stars.example/stars/http%3A%2F%2Fa.com%2Fpage%3Fq%3D1"
    );
}

#[test]
fn test_stars_endpoint_trims_trailing_slash() {
    assert_eq!(
        stars_endpoint("https://stars.example/", "http://a.com"),
        "https://stars.example/stars/http%3A%2F%2Fa.com"
    );
}

#[test]
fn test_stars_endpoint_encodes_spaces() {
    assert_eq!(
        stars_endpoint("https://stars.example", "http://a.com/x y"),
        "https://stars.example/stars/http%3A%2F%2Fa.com%2Fx%20y"
    );
}

#[tokio::test]
async fn test_queue_delivers_in_order() {
    let transport = Arc::new(RecordingTransport::default());
    let (queue, worker) = SyncQueue::spawn(transport.clone());

    queue.enqueue(SyncRequest::Star {
        url: "http://a.com".to_string(),
        session_id: "s1".to_string(),
    });
    queue.enqueue(SyncRequest::Unstar {
        url: "http://a.com".to_string(),
        session_id: "s1".to_string(),
    });

    drop(queue);
    worker.await.unwrap();

    let calls = transport.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            ("star", "http://a.com".to_string(), "s1".to_string()),
            ("unstar", "http://a.com".to_string(), "s1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_star_request_never_issues_unstar() {
    let transport = Arc::new(RecordingTransport::default());
    let (queue, worker) = SyncQueue::spawn(transport.clone());

    queue.enqueue(SyncRequest::Star {
        url: "http://a.com".to_string(),
        session_id: "s1".to_string(),
    });
    drop(queue);
    worker.await.unwrap();

    let calls = transport.calls.lock().unwrap();
    assert!(calls.iter().all(|(kind, _, _)| *kind == "star"));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let transport = Arc::new(FlakyTransport::new(2));
    let (queue, worker) = SyncQueue::spawn(transport.clone());

    queue.enqueue(SyncRequest::Star {
        url: "http://a.com".to_string(),
        session_id: "s1".to_string(),
    });
    drop(queue);
    worker.await.unwrap();

    assert_eq!(*transport.attempts.lock().unwrap(), 3);
    assert_eq!(*transport.delivered.lock().unwrap(), vec!["http://a.com"]);
}

#[tokio::test(start_paused = true)]
async fn test_delivery_abandoned_after_max_attempts() {
    let transport = Arc::new(FlakyTransport::new(u32::MAX));
    let (queue, worker) = SyncQueue::spawn(transport.clone());

    queue.enqueue(SyncRequest::Star {
        url: "http://a.com".to_string(),
        session_id: "s1".to_string(),
    });
    // A second request proves the worker survives the abandoned first one.
    queue.enqueue(SyncRequest::Unstar {
        url: "http://b.com".to_string(),
        session_id: "s1".to_string(),
    });
    drop(queue);
    worker.await.unwrap();

    assert_eq!(
        *transport.attempts.lock().unwrap(),
        SYNC_MAX_ATTEMPTS * 2
    );
    assert!(transport.delivered.lock().unwrap().is_empty());
}
