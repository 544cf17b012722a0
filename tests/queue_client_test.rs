//! Queue client round-trips against a real Postgres + pgmq instance.
//!
//! These tests require a database with the pgmq extension installed and are
//! skipped when TEST_DATABASE_URL is not provided.

use std::time::Duration;

use pgmq::PGMQueue;
use uuid::Uuid;

use mlserve_core::messaging::{JobMessage, JobPayload, QueueClient, ReplyMessage};

fn test_database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            println!("Skipping queue client test - no TEST_DATABASE_URL provided");
            None
        }
    }
}

/// Echo responder standing in for a worker: consumes one job off the queue
/// and replies on the job's reply queue with the same correlation token.
async fn respond_once(database_url: String, request_queue: String) {
    let queue = PGMQueue::new(database_url)
        .await
        .expect("Failed to connect responder");

    loop {
        let message: Option<pgmq::types::Message<serde_json::Value>> = queue
            .read(&request_queue, Some(5))
            .await
            .expect("Responder read failed");

        let Some(message) = message else {
            tokio::time::sleep(Duration::from_millis(50)).await;
            continue;
        };

        let job: JobMessage =
            serde_json::from_value(message.message).expect("Malformed job message");

        let reply = ReplyMessage::success(
            job.correlation_id,
            format!("echo: {}", job.payload.text),
            None,
            Some(7),
        );

        queue
            .send(&job.reply_to, &reply)
            .await
            .expect("Responder reply failed");
        queue
            .delete(&request_queue, message.msg_id)
            .await
            .expect("Responder delete failed");
        return;
    }
}

#[tokio::test]
async fn test_request_reply_roundtrip() {
    let Some(database_url) = test_database_url() else {
        return;
    };

    let request_queue = format!("mlserve_test_{}", Uuid::new_v4().simple());
    let client = QueueClient::new(database_url.clone(), request_queue.clone());
    client.connect().await.expect("Failed to connect client");

    let responder = tokio::spawn(respond_once(database_url.clone(), request_queue.clone()));

    let reply = client
        .send_request(JobPayload::new("hello"), Duration::from_secs(10))
        .await
        .expect("Round trip failed");

    assert!(reply.success);
    assert_eq!(reply.output_data.as_deref(), Some("echo: hello"));
    assert_eq!(reply.execution_time_ms, Some(7));

    responder.await.expect("Responder panicked");

    // Teardown: remove the test job queue
    let cleanup = PGMQueue::new(database_url).await.expect("cleanup connect");
    cleanup.destroy(&request_queue).await.expect("cleanup destroy");
    client.close().await;
}

#[tokio::test]
async fn test_timeout_when_no_worker_replies() {
    let Some(database_url) = test_database_url() else {
        return;
    };

    let request_queue = format!("mlserve_test_{}", Uuid::new_v4().simple());
    let client = QueueClient::new(database_url.clone(), request_queue.clone());
    client.connect().await.expect("Failed to connect client");

    let err = client
        .send_request(JobPayload::new("nobody home"), Duration::from_secs(1))
        .await
        .expect_err("Expected a timeout");

    assert!(err.is_timeout(), "expected timeout, got: {err}");

    let cleanup = PGMQueue::new(database_url).await.expect("cleanup connect");
    cleanup.destroy(&request_queue).await.expect("cleanup destroy");
    client.close().await;
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let Some(database_url) = test_database_url() else {
        return;
    };

    let request_queue = format!("mlserve_test_{}", Uuid::new_v4().simple());
    let client = QueueClient::new(database_url.clone(), request_queue.clone());
    client.connect().await.expect("Failed to connect client");

    client.close().await;
    client.close().await; // must not panic or error

    let cleanup = PGMQueue::new(database_url).await.expect("cleanup connect");
    cleanup.destroy(&request_queue).await.expect("cleanup destroy");
}
