//! Contract tests exercising the storage fakes through the trait objects,
//! the way the orchestrator consumes them.

use std::sync::Arc;

use chrono::Utc;
use pixelsmith_state::fakes::{MemoryCreditLedger, MemoryJobStore, MemoryProgressPublisher};
use pixelsmith_state::{
    ArtifactRecord, CheckpointBlob, CreditLedger, GenerationSummary, JobRecord, JobStatus,
    JobStore, ProgressEvent, ProgressPublisher, TierConfig, ToolLogArchive,
};
use uuid::Uuid;

fn test_tier() -> TierConfig {
    TierConfig {
        canvas_width: 32,
        canvas_height: 32,
        credit_cost: 10,
        tool_budget_soft: 150,
        tool_budget_hard: 200,
        job_timeout_seconds: 300,
        allowed_tools: vec![
            "set_pixel".to_string(),
            "fill_rect".to_string(),
            "seal_canvas".to_string(),
        ],
    }
}

#[tokio::test]
async fn job_lifecycle_pending_to_completed() {
    let store: Arc<dyn JobStore> = Arc::new({
        let s = MemoryJobStore::new();
        s.insert_tier("standard", test_tier());
        s.insert_job(JobRecord::new(Uuid::nil(), Uuid::new_v4(), "standard"));
        s
    });

    let job = store.load_job(Uuid::nil()).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Pending);

    store
        .set_status(Uuid::nil(), JobStatus::ExecutingTools)
        .await
        .unwrap();
    store
        .set_status(Uuid::nil(), JobStatus::Rendering)
        .await
        .unwrap();

    let artifact_id = Uuid::new_v4();
    store.complete_job(Uuid::nil(), artifact_id).await.unwrap();

    let job = store.load_job(Uuid::nil()).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.artifact_id, Some(artifact_id));
    assert!(job.completed_at.is_some());
}

#[tokio::test]
async fn failed_job_keeps_error_message() {
    let store = MemoryJobStore::new();
    let job_id = Uuid::new_v4();
    store.insert_job(JobRecord::new(job_id, Uuid::new_v4(), "free"));

    store
        .set_failed(job_id, "generator timed out after 300s")
        .await
        .unwrap();

    let job = store.job(job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.error_message.as_deref(),
        Some("generator timed out after 300s")
    );
}

#[tokio::test]
async fn checkpoint_slot_holds_latest_consistent_pair() {
    let store = MemoryJobStore::new();
    let job_id = Uuid::new_v4();
    store.insert_job(JobRecord::new(job_id, Uuid::new_v4(), "standard"));

    store
        .save_checkpoint(
            job_id,
            CheckpointBlob {
                canvas_gz: b"snapshot-at-50".to_vec(),
                tool_index: 50,
                saved_at: Utc::now(),
            },
        )
        .await
        .unwrap();

    let checkpoint = store.job(job_id).unwrap().checkpoint.unwrap();
    assert_eq!(checkpoint.canvas_gz, b"snapshot-at-50");
    assert_eq!(checkpoint.tool_index, 50);
}

#[tokio::test]
async fn artifact_rows_append() {
    let store = MemoryJobStore::new();
    let job_id = Uuid::new_v4();
    let artifact_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    store
        .save_artifact(ArtifactRecord {
            artifact_id,
            creator_id: user_id,
            owner_id: user_id,
            tier_name: "free".to_string(),
            canvas_width: 32,
            canvas_height: 32,
            model_name: "ollama".to_string(),
            image_path: format!("/var/art/{artifact_id}.png"),
            thumbnail_path: format!("/var/art/{artifact_id}_thumb.png"),
            content_hash: "00".repeat(32),
            seal_signature: "11".repeat(32),
            seal_key_version: 1,
            tradeable: false,
            created_at: now,
        })
        .await
        .unwrap();
    store
        .save_summary(GenerationSummary {
            job_id,
            artifact_id,
            total_tool_calls: 12,
            tool_call_breakdown: [("set_pixel".to_string(), 11), ("seal_canvas".to_string(), 1)]
                .into_iter()
                .collect(),
            started_at: now,
            finished_at: now,
            duration_ms: 1500,
        })
        .await
        .unwrap();
    store
        .save_archive(ToolLogArchive {
            job_id,
            log_gz: vec![0x1f, 0x8b],
            sequence_hash: "ab".repeat(32),
            created_at: now,
        })
        .await
        .unwrap();

    assert_eq!(store.artifacts().len(), 1);
    assert!(!store.artifacts()[0].tradeable);
    assert_eq!(store.summaries()[0].total_tool_calls, 12);
    assert_eq!(store.archives()[0].job_id, job_id);
}

#[tokio::test]
async fn concurrent_debits_never_overdraw() {
    let user = Uuid::new_v4();
    let ledger = Arc::new(MemoryCreditLedger::new().with_balance(user, 25));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ledger: Arc<dyn CreditLedger> = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.debit_if_sufficient(user, 10, Uuid::new_v4()).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // 25 credits cover exactly two 10-credit debits.
    assert_eq!(successes, 2);
    assert_eq!(ledger.balance(user), Some(5));
}

#[tokio::test]
async fn publisher_preserves_event_order() {
    let publisher = Arc::new(MemoryProgressPublisher::new());
    let as_trait: Arc<dyn ProgressPublisher> = publisher.clone();
    let job_id = Uuid::new_v4();

    for n in 1..=3 {
        as_trait
            .publish(
                job_id,
                ProgressEvent::Progress {
                    commands_executed: n,
                    command_budget: 5,
                    status: JobStatus::ExecutingTools,
                },
            )
            .await
            .unwrap();
    }
    let artifact_id = Uuid::new_v4();
    as_trait
        .publish(job_id, ProgressEvent::Complete { artifact_id })
        .await
        .unwrap();

    let events = publisher.events_for(job_id);
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        ProgressEvent::Progress {
            commands_executed: 1,
            command_budget: 5,
            status: JobStatus::ExecutingTools,
        }
    );
    assert_eq!(events[3], ProgressEvent::Complete { artifact_id });
}
