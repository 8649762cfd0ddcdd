//! Integration tests for bulk delete and bulk share.

mod helpers;

use cipherdrive_core::ErrorKind;
use cipherdrive_core::types::ItemId;

use helpers::{TestApp, item};

#[tokio::test]
async fn test_partial_delete_keeps_failed_selected() {
    let app = TestApp::loaded(vec![item("a", None), item("b", None), item("c", None)], vec![]).await;
    app.repo
        .server(|s| s.failing.insert(ItemId::from("b")));
    app.vm.select_all_visible().await;

    let outcome = app.vm.delete_selected().await.expect("delete");

    assert_eq!(outcome.succeeded, vec![ItemId::from("a"), ItemId::from("c")]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, ItemId::from("b"));
    assert_eq!(app.selected().await, vec!["b"]);
    assert_eq!(app.item_ids().await, vec!["b"]);

    assert_eq!(app.repo.count("delete_item"), 3);
    assert_eq!(app.repo.count("fetch_items"), 1);

    let snapshot = app.vm.snapshot().await;
    assert!(snapshot.error.is_some());
    assert!(snapshot.busy.is_empty());
}

#[tokio::test]
async fn test_vanished_items_leave_cache_and_selection() {
    let app = TestApp::loaded(vec![item("a", None), item("b", None)], vec![]).await;
    app.vm.select_all_visible().await;
    app.repo.server(|s| s.items.clear());

    let outcome = app.vm.delete_selected().await.expect("delete");

    assert!(outcome.succeeded.is_empty());
    assert_eq!(outcome.vanished.len(), 2);
    assert!(app.selected().await.is_empty());
    assert!(app.item_ids().await.is_empty());
    assert_eq!(app.repo.count("fetch_items"), 0);
}

#[tokio::test]
async fn test_delete_requires_selection() {
    let app = TestApp::loaded(vec![item("a", None)], vec![]).await;
    let err = app.vm.delete_selected().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.repo.calls().is_empty());
}

#[tokio::test]
async fn test_share_sends_one_request_per_item() {
    let app = TestApp::loaded(vec![item("a", None), item("b", None)], vec![]).await;
    app.vm.select(ItemId::from("a")).await.expect("select a");
    app.vm.select(ItemId::from("b")).await.expect("select b");

    let outcome = app
        .vm
        .share_selected(" friend@example.com ")
        .await
        .expect("share");

    assert!(outcome.is_complete());
    assert_eq!(app.repo.count("share_items"), 2);
    let shares = app.repo.server(|s| s.shares.clone());
    assert_eq!(shares.len(), 2);
    assert!(shares.iter().all(|(email, _)| email == "friend@example.com"));
    assert!(app.selected().await.is_empty());
    assert_eq!(app.item_ids().await, vec!["a", "b"]);
}

#[tokio::test]
async fn test_share_rejects_malformed_email() {
    let app = TestApp::loaded(vec![item("a", None)], vec![]).await;
    app.vm.select(ItemId::from("a")).await.expect("select");

    let err = app.vm.share_selected("not-an-email").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.repo.calls().is_empty());
    assert_eq!(app.selected().await, vec!["a"]);
}

#[tokio::test]
async fn test_select_rejects_invisible_item() {
    let app = TestApp::loaded(vec![item("a", None)], vec![]).await;
    let err = app.vm.select(ItemId::from("zzz")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.vm.toggle_selected(ItemId::from("a")).await.expect("toggle"));
    assert!(!app.vm.toggle_selected(ItemId::from("a")).await.expect("toggle"));
}

#[tokio::test]
async fn test_clear_selection_after_select_all() {
    let app = TestApp::loaded(vec![item("a", None), item("b", None)], vec![]).await;
    assert_eq!(app.vm.select_all_visible().await, 2);
    app.vm.clear_selection().await;
    assert!(app.selected().await.is_empty());
    assert!(!app.vm.deselect(&ItemId::from("a")).await);
}
