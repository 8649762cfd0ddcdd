//! Integration tests for the upload batch and key disclosure.

mod helpers;

use cipherdrive_core::ErrorKind;
use cipherdrive_core::config::UploadConfig;
use cipherdrive_core::types::{FolderId, ItemId};
use cipherdrive_entity::upload::{DisclosedKey, UploadFile, UploadReceipt};
use cipherdrive_service::upload::{AssignmentState, JobStatus};
use cipherdrive_service::{UploadSequencer, ViewEvent};

use helpers::{TestApp, folder, png};

#[tokio::test]
async fn test_keys_disclosed_in_submission_order() {
    let app = TestApp::loaded(vec![], vec![]).await;

    let ids = app
        .vm
        .upload_files(vec![png("one"), png("two"), png("three")])
        .await
        .expect("upload");
    assert_eq!(ids.len(), 3);
    assert_eq!(app.repo.count("upload_file"), 3);
    assert_eq!(app.repo.count("fetch_items"), 0);

    let mut shown = Vec::new();
    for expected in &ids {
        let disclosure = app.vm.current_disclosure().await.expect("a key is shown");
        assert_eq!(&disclosure.job_id, expected);
        shown.push(disclosure.file_name.clone());
        let summary = app
            .vm
            .acknowledge_disclosure(disclosure.job_id)
            .await
            .expect("ack");
        assert_eq!(summary.is_some(), expected == ids.last().expect("ids"));
    }

    assert_eq!(shown, vec!["one.png", "two.png", "three.png"]);
    assert!(app.vm.current_disclosure().await.is_none());
    assert_eq!(app.repo.count("fetch_items"), 1);
    assert_eq!(app.item_ids().await.len(), 3);
}

#[test]
fn test_out_of_order_completion_discloses_in_order() {
    let mut seq = UploadSequencer::new(UploadConfig::default());
    let ids = seq
        .submit(vec![png("a"), png("b"), png("c")], None)
        .expect("submit");
    let started: Vec<_> = std::iter::from_fn(|| seq.start_next().map(|(id, _)| id)).collect();
    assert_eq!(started, ids);

    for (index, name) in [(2, "c"), (0, "a"), (1, "b")] {
        let receipt = UploadReceipt {
            item_id: ItemId::new(name),
            key: DisclosedKey::new(format!("({index}, 1, 1, 1, 1)")).expect("key"),
        };
        seq.record_upload(ids[index], Ok(receipt)).expect("record");
    }

    let mut order = Vec::new();
    while let Some(job) = seq.current_disclosure() {
        let id = job.id;
        order.push(job.item_id.clone().expect("item").into_string());
        assert_eq!(
            seq.jobs()
                .iter()
                .filter(|j| j.status == JobStatus::Disclosing)
                .count(),
            1
        );
        seq.acknowledge(id).expect("ack");
    }
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_upload_into_active_folder() {
    let app = TestApp::loaded(vec![], vec![folder("f1", "Holidays", None)]).await;
    app.vm
        .handle(ViewEvent::FolderSelected(Some(FolderId::from("f1"))))
        .await
        .expect("select");
    app.repo.reset_calls();

    app.vm.upload_files(vec![png("beach")]).await.expect("upload");
    assert_eq!(
        app.repo.calls(),
        vec![
            "upload_file:beach.png",
            "move_item:beach_encrypted_preview->f1"
        ]
    );

    let disclosure = app.vm.current_disclosure().await.expect("shown");
    assert_eq!(disclosure.assignment, AssignmentState::Assigned);
    app.vm
        .acknowledge_disclosure(disclosure.job_id)
        .await
        .expect("ack");
    assert_eq!(app.item_ids().await, vec!["beach_encrypted_preview"]);
}

#[tokio::test]
async fn test_failed_assignment_keeps_upload() {
    let app = TestApp::loaded(vec![], vec![folder("f1", "Holidays", None)]).await;
    app.vm
        .handle(ViewEvent::FolderSelected(Some(FolderId::from("f1"))))
        .await
        .expect("select");
    app.repo.server(|s| s.failing_moves = true);

    app.vm.upload_files(vec![png("beach")]).await.expect("upload");
    let disclosure = app.vm.current_disclosure().await.expect("key still shown");
    assert_eq!(disclosure.assignment, AssignmentState::Failed);

    let summary = app
        .vm
        .acknowledge_disclosure(disclosure.job_id)
        .await
        .expect("ack")
        .expect("complete");
    assert_eq!(summary.uploaded, 1);
    assert_eq!(summary.unassigned, vec!["beach.png".to_string()]);
}

#[tokio::test]
async fn test_failed_upload_is_skipped() {
    let app = TestApp::loaded(vec![], vec![]).await;
    app.repo
        .server(|s| s.failing_uploads.insert("bad.png".to_string()));

    app.vm
        .upload_files(vec![png("bad"), png("good")])
        .await
        .expect("upload");

    let disclosure = app.vm.current_disclosure().await.expect("shown");
    assert_eq!(disclosure.file_name, "good.png");
    assert_eq!(disclosure.position, 2);
    assert_eq!(disclosure.batch_size, 2);

    let summary = app
        .vm
        .acknowledge_disclosure(disclosure.job_id)
        .await
        .expect("ack")
        .expect("complete");
    assert_eq!(summary.uploaded, 1);
    assert_eq!(summary.failed(), 1);
    assert!(app.vm.snapshot().await.error.is_some());
}

#[tokio::test]
async fn test_all_rejected_completes_without_refresh() {
    let app = TestApp::loaded(vec![], vec![]).await;

    let ids = app
        .vm
        .submit_uploads(vec![UploadFile::new("notes.txt", b"text".to_vec())])
        .await
        .expect("submit");
    let summary = app
        .vm
        .run_uploads()
        .await
        .expect("run")
        .expect("batch finished");

    assert_eq!(ids.len(), 1);
    assert_eq!(summary.uploaded, 0);
    assert!(app.repo.calls().is_empty());
    assert!(app.vm.snapshot().await.busy.is_empty());
}

#[tokio::test]
async fn test_new_batch_waits_for_disclosures() {
    let app = TestApp::loaded(vec![], vec![]).await;
    app.vm.upload_files(vec![png("one")]).await.expect("upload");

    let err = app.vm.upload_files(vec![png("two")]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(app.vm.snapshot().await.busy.is_empty());
}

#[tokio::test]
async fn test_sign_out_mid_batch_frees_uploads() {
    let app = TestApp::loaded(vec![], vec![]).await;
    app.vm
        .submit_uploads(vec![png("x")])
        .await
        .expect("submit");

    app.vm
        .handle(ViewEvent::CredentialChanged(None))
        .await
        .expect("sign out");
    let err = app.vm.run_uploads().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(app.repo.count("upload_file"), 0);
    assert!(app.vm.snapshot().await.busy.is_empty());

    let credential = cipherdrive_client::Credential::new(helpers::TOKEN).expect("credential");
    app.vm
        .handle(ViewEvent::CredentialChanged(Some(credential)))
        .await
        .expect("sign in");
    let ids = app
        .vm
        .submit_uploads(vec![png("y")])
        .await
        .expect("new batch accepted");
    assert_eq!(ids.len(), 1);
    app.vm.run_uploads().await.expect("run");
    assert_eq!(app.repo.calls().last().map(String::as_str), Some("upload_file:y.png"));
}
