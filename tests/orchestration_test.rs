//! Orchestrator behavior against scripted store/queue collaborators.
//!
//! Covers the core guarantees: the record always reaches a terminal state
//! once created (success, failure, and error paths alike), queue errors
//! propagate only after the terminal write, validation and missing-entity
//! failures leave no record behind, and concurrent requests never see each
//! other's replies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use std::str::FromStr;
use uuid::Uuid;

use mlserve_core::messaging::{JobPayload, MessagingError, MessagingResult, ReplyMessage, RequestQueue};
use mlserve_core::models::{
    MlModel, ModelInputType, ModelOutputType, NewPredictionRequest, PredictionRequest,
    RequestStats, RequestType,
};
use mlserve_core::orchestration::{OrchestrationError, PredictionInput, PredictionOrchestrator};
use mlserve_core::services::{ModelCatalog, RequestStore, StoreError};
use mlserve_core::state_machine::{determine_target_state, RequestEvent, RequestStatus};

// ---------------------------------------------------------------------------
// Scripted collaborators
// ---------------------------------------------------------------------------

/// In-memory record store enforcing the same transition rules as the
/// Postgres implementation.
struct MockStore {
    records: Mutex<HashMap<i64, PredictionRequest>>,
    known_users: Vec<i64>,
    next_id: AtomicI64,
    create_calls: AtomicUsize,
}

impl MockStore {
    fn new(known_users: Vec<i64>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            known_users,
            next_id: AtomicI64::new(1),
            create_calls: AtomicUsize::new(0),
        }
    }

    fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn transition(
        &self,
        id: i64,
        event: RequestEvent,
        apply: impl FnOnce(&mut PredictionRequest),
    ) -> Result<PredictionRequest, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "request", id })?;

        let target = determine_target_state(record.status, &event)?;
        record.status = target;
        apply(record);
        record.updated_at = Utc::now();

        Ok(record.clone())
    }
}

#[async_trait]
impl RequestStore for MockStore {
    async fn create(&self, draft: NewPredictionRequest) -> Result<PredictionRequest, StoreError> {
        if !self.known_users.contains(&draft.user_id) {
            return Err(StoreError::NotFound {
                entity: "user",
                id: draft.user_id,
            });
        }

        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let record = PredictionRequest {
            id,
            user_id: draft.user_id,
            model_id: draft.model_id,
            request_type: draft.request_type,
            input_data: draft.input_data,
            output_data: None,
            output_metrics: None,
            cost: BigDecimal::from(0),
            execution_time_ms: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        self.records.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<PredictionRequest>, StoreError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn complete_request(
        &self,
        id: i64,
        output_data: String,
        metrics: Option<String>,
        execution_time_ms: Option<i64>,
        cost: BigDecimal,
    ) -> Result<PredictionRequest, StoreError> {
        self.transition(id, RequestEvent::Complete, |record| {
            record.output_data = Some(output_data);
            record.output_metrics = metrics;
            record.execution_time_ms = execution_time_ms;
            record.cost = cost;
        })
    }

    async fn fail_request(
        &self,
        id: i64,
        error_message: String,
        execution_time_ms: Option<i64>,
    ) -> Result<PredictionRequest, StoreError> {
        self.transition(
            id,
            RequestEvent::fail_with_error(error_message.clone()),
            |record| {
                record.output_metrics = Some(error_message);
                if execution_time_ms.is_some() {
                    record.execution_time_ms = execution_time_ms;
                }
            },
        )
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        _limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn list_by_model(
        &self,
        model_id: i64,
        _limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.model_id == model_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn list_pending(&self, _limit: i64) -> Result<Vec<PredictionRequest>, StoreError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn user_stats(&self, user_id: i64) -> Result<RequestStats, StoreError> {
        let records = self.records.lock().unwrap();
        let mine: Vec<_> = records.values().filter(|r| r.user_id == user_id).collect();
        let completed: Vec<_> = mine
            .iter()
            .filter(|r| r.status == RequestStatus::Completed)
            .collect();

        Ok(RequestStats {
            total_requests: mine.len() as i64,
            completed_requests: completed.len() as i64,
            failed_requests: (mine.len() - completed.len()) as i64,
            total_cost: completed.iter().map(|r| r.cost.clone()).sum(),
            avg_execution_time_ms: BigDecimal::from(0),
        })
    }
}

struct MockCatalog {
    models: HashMap<i64, MlModel>,
}

impl MockCatalog {
    fn with_model(model: MlModel) -> Self {
        let mut models = HashMap::new();
        models.insert(model.id, model);
        Self { models }
    }
}

#[async_trait]
impl ModelCatalog for MockCatalog {
    async fn find_model(&self, model_id: i64) -> Result<Option<MlModel>, StoreError> {
        Ok(self.models.get(&model_id).cloned())
    }
}

/// Queue stand-in with one scripted behavior for every call.
enum QueueScript {
    Reply {
        output_data: Option<String>,
        error: Option<String>,
        execution_time_ms: Option<i64>,
        metrics: Option<serde_json::Value>,
        success: bool,
    },
    Timeout,
    ConnectionError,
    /// Replies with a transformation of the submitted payload, proving each
    /// call only ever sees its own reply.
    Echo,
}

struct ScriptedQueue {
    script: QueueScript,
}

impl ScriptedQueue {
    fn success(output: &str, execution_time_ms: Option<i64>) -> Self {
        Self {
            script: QueueScript::Reply {
                output_data: Some(output.to_string()),
                error: None,
                execution_time_ms,
                metrics: None,
                success: true,
            },
        }
    }

    fn failure(error: Option<&str>, execution_time_ms: Option<i64>) -> Self {
        Self {
            script: QueueScript::Reply {
                output_data: None,
                error: error.map(str::to_string),
                execution_time_ms,
                metrics: None,
                success: false,
            },
        }
    }
}

#[async_trait]
impl RequestQueue for ScriptedQueue {
    async fn send_request(
        &self,
        payload: JobPayload,
        timeout: Duration,
    ) -> MessagingResult<ReplyMessage> {
        match &self.script {
            QueueScript::Reply {
                output_data,
                error,
                execution_time_ms,
                metrics,
                success,
            } => Ok(ReplyMessage {
                correlation_id: Uuid::new_v4(),
                success: *success,
                output_data: output_data.clone(),
                error: error.clone(),
                metrics: metrics.clone(),
                execution_time_ms: *execution_time_ms,
            }),
            QueueScript::Timeout => Err(MessagingError::timeout("send_request", timeout.as_secs())),
            QueueScript::ConnectionError => Err(MessagingError::connection("connection refused")),
            QueueScript::Echo => {
                // Small stagger so concurrent calls genuinely interleave
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(ReplyMessage::success(
                    Uuid::new_v4(),
                    format!("reply to {}", payload.text),
                    None,
                    Some(5),
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn text_model(id: i64, cost: &str) -> MlModel {
    MlModel {
        id,
        name: "sentiment".to_string(),
        version: "1.0.0".to_string(),
        input_type: ModelInputType::Text,
        output_type: ModelOutputType::Classification,
        cost_per_request: BigDecimal::from_str(cost).unwrap(),
        description: None,
        config: serde_json::json!({}),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn harness(queue: ScriptedQueue) -> (Arc<MockStore>, PredictionOrchestrator) {
    let store = Arc::new(MockStore::new(vec![1]));
    let orchestrator = PredictionOrchestrator::new(
        store.clone(),
        Arc::new(MockCatalog::with_model(text_model(1, "0.001"))),
        Arc::new(queue),
        64 * 1024,
    );
    (store, orchestrator)
}

fn input(text: &str, timeout_seconds: u64) -> PredictionInput {
    PredictionInput {
        user_id: 1,
        model_id: 1,
        input_data: text.to_string(),
        request_type: RequestType::Prediction,
        timeout: Duration::from_secs(timeout_seconds),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_reply_completes_record_with_output_and_cost() {
    let (store, orchestrator) = harness(ScriptedQueue::success("hi there", Some(120)));

    let record = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap();

    assert_eq!(record.status, RequestStatus::Completed);
    assert_eq!(record.output_data.as_deref(), Some("hi there"));
    assert_eq!(record.execution_time_ms, Some(120));
    assert_eq!(record.cost, BigDecimal::from_str("0.001").unwrap());
    assert!(record.cost > BigDecimal::from(0));

    // The persisted view agrees with the returned one
    let stored = store.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Completed);
    assert_eq!(stored.output_data, record.output_data);
}

#[tokio::test]
async fn failure_reply_fails_record_with_error_metrics() {
    let (store, orchestrator) = harness(ScriptedQueue::failure(Some("model exploded"), Some(42)));

    let record = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap();

    assert_eq!(record.status, RequestStatus::Failed);
    assert_eq!(record.output_data, None);
    assert_eq!(record.output_metrics.as_deref(), Some("model exploded"));
    assert_eq!(record.execution_time_ms, Some(42));
    // Failure never writes cost
    assert_eq!(record.cost, BigDecimal::from(0));

    let stored = store.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Failed);
}

#[tokio::test]
async fn failure_reply_without_error_text_defaults_to_unknown() {
    let (_store, orchestrator) = harness(ScriptedQueue::failure(None, None));

    let record = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap();

    assert_eq!(record.status, RequestStatus::Failed);
    assert_eq!(record.output_metrics.as_deref(), Some("Unknown error"));
}

#[tokio::test]
async fn timeout_fails_record_and_propagates() {
    let (store, orchestrator) = harness(ScriptedQueue {
        script: QueueScript::Timeout,
    });

    let err = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestrationError::Timeout { timeout_seconds: 30 }
    ));

    // The record was forced to failed before the error propagated
    let stored = store.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Failed);
    assert_eq!(stored.output_data, None);
    assert!(stored
        .output_metrics
        .as_deref()
        .unwrap()
        .contains("timed out"));
}

#[tokio::test]
async fn connection_error_fails_record_and_propagates() {
    let (store, orchestrator) = harness(ScriptedQueue {
        script: QueueScript::ConnectionError,
    });

    let err = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::Connection(_)));

    let stored = store.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Failed);
}

#[tokio::test]
async fn record_is_never_left_pending() {
    for queue in [
        ScriptedQueue::success("ok", None),
        ScriptedQueue::failure(Some("bad"), None),
        ScriptedQueue {
            script: QueueScript::Timeout,
        },
        ScriptedQueue {
            script: QueueScript::ConnectionError,
        },
    ] {
        let (store, orchestrator) = harness(queue);
        let _ = orchestrator.process_prediction_request(input("hello", 30)).await;

        let stored = store.get_by_id(1).await.unwrap().unwrap();
        assert_ne!(stored.status, RequestStatus::Pending);
        assert!(stored.status.is_terminal());
    }
}

#[tokio::test]
async fn empty_input_rejected_before_any_record_exists() {
    let (store, orchestrator) = harness(ScriptedQueue::success("ok", None));

    let err = orchestrator
        .process_prediction_request(input("   ", 30))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::Validation(_)));
    assert_eq!(store.create_count(), 0);
}

#[tokio::test]
async fn out_of_range_timeout_rejected() {
    let (store, orchestrator) = harness(ScriptedQueue::success("ok", None));

    let err = orchestrator
        .process_prediction_request(input("hello", 0))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::Validation(_)));
    assert_eq!(store.create_count(), 0);
}

#[tokio::test]
async fn unknown_model_rejected_before_any_record_exists() {
    let (store, orchestrator) = harness(ScriptedQueue::success("ok", None));

    let mut request = input("hello", 30);
    request.model_id = 999;

    let err = orchestrator
        .process_prediction_request(request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestrationError::NotFound { entity: "model", id: 999 }
    ));
    assert_eq!(store.create_count(), 0);
}

#[tokio::test]
async fn unknown_user_surfaces_store_not_found() {
    let (store, orchestrator) = harness(ScriptedQueue::success("ok", None));

    let mut request = input("hello", 30);
    request.user_id = 42;

    let err = orchestrator
        .process_prediction_request(request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestrationError::NotFound { entity: "user", id: 42 }
    ));
    assert!(store.get_by_id(1).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_requests_each_get_their_own_reply() {
    let store = Arc::new(MockStore::new(vec![1]));
    let orchestrator = Arc::new(PredictionOrchestrator::new(
        store.clone(),
        Arc::new(MockCatalog::with_model(text_model(1, "0.001"))),
        Arc::new(ScriptedQueue {
            script: QueueScript::Echo,
        }),
        64 * 1024,
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orchestrator
                .process_prediction_request(input(&format!("message-{i}"), 30))
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let record = handle.await.unwrap();
        assert_eq!(record.status, RequestStatus::Completed);
        assert_eq!(
            record.output_data.as_deref(),
            Some(format!("reply to {}", record.input_data).as_str()),
            "request {} received someone else's reply",
            record.id
        );
    }
}

#[tokio::test]
async fn reads_after_terminal_write_are_identical() {
    let (store, orchestrator) = harness(ScriptedQueue::success("hi there", Some(120)));

    let record = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap();

    let first = store.get_by_id(record.id).await.unwrap().unwrap();
    let second = store.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn terminal_records_reject_further_transitions() {
    let (store, orchestrator) = harness(ScriptedQueue::success("hi there", None));

    let record = orchestrator
        .process_prediction_request(input("hello", 30))
        .await
        .unwrap();

    let err = store
        .fail_request(record.id, "late failure".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition(_)));

    let err = store
        .complete_request(
            record.id,
            "again".to_string(),
            None,
            None,
            BigDecimal::from(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition(_)));

    // The record is untouched
    let stored = store.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.output_data.as_deref(), Some("hi there"));
    assert_eq!(stored.status, RequestStatus::Completed);
}
