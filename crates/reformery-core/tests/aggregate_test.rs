// AggregateLoader behaviour with injected loaders.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reformery_core::{
    AggregateLoader, CoreError, Package, ResourceData, ResourceLoader, ResourceName, StudioClass,
    User, UserRole,
};
use tokio::sync::Notify;

// ── Helpers ─────────────────────────────────────────────────────────

fn user(id: u64, email: &str) -> User {
    User {
        id,
        email: email.into(),
        full_name: None,
        role: UserRole::Client,
        active: true,
        phone: None,
        created_at: None,
    }
}

fn class(id: u64, name: &str) -> StudioClass {
    StudioClass {
        id,
        name: name.into(),
        description: None,
        duration: Some(50),
        max_capacity: Some(10),
        category: None,
        intensity_level: None,
        active: true,
    }
}

/// Resolves to `data` after `delay`.
fn delayed(data: ResourceData, delay: Duration) -> ResourceLoader {
    Box::new(move || {
        let data = data.clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(data)
        })
    })
}

/// Fails with a connection error after `delay`.
fn failing(delay: Duration) -> ResourceLoader {
    Box::new(move || {
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Err(CoreError::ConnectionFailed {
                url: "http://localhost:5000/api/v1".into(),
                reason: "connection refused".into(),
            })
        })
    })
}

// ── Partial failure ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_one_failing_resource_degrades_to_default() {
    let loader = AggregateLoader::new(vec![
        (
            ResourceName::Users,
            delayed(
                ResourceData::Users(vec![user(1, "a@studio.test")]),
                Duration::from_millis(30),
            ),
        ),
        (ResourceName::Packages, failing(Duration::from_millis(10))),
        (
            ResourceName::Classes,
            delayed(
                ResourceData::Classes(vec![class(4, "Reformer")]),
                Duration::from_millis(20),
            ),
        ),
    ]);

    let state = loader.load().await;

    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.is_partial());
    assert_eq!(
        state.get(ResourceName::Packages),
        Some(&ResourceData::Packages(Vec::<Package>::new()))
    );
    assert_eq!(state.get(ResourceName::Users).map(ResourceData::len), Some(1));
    assert_eq!(state.get(ResourceName::Classes).map(ResourceData::len), Some(1));
    assert_eq!(
        state.failures.keys().copied().collect::<Vec<_>>(),
        vec![ResourceName::Packages]
    );
}

#[tokio::test(start_paused = true)]
async fn test_order_is_declaration_order_not_completion_order() {
    let loader = AggregateLoader::new(vec![
        (
            ResourceName::Classes,
            delayed(ResourceData::Classes(Vec::new()), Duration::from_millis(50)),
        ),
        (
            ResourceName::Users,
            delayed(ResourceData::Users(Vec::new()), Duration::from_millis(1)),
        ),
        (ResourceName::Statistics, failing(Duration::from_millis(5))),
    ]);

    let state = loader.load().await;
    assert_eq!(
        state.resources.keys().copied().collect::<Vec<_>>(),
        vec![
            ResourceName::Classes,
            ResourceName::Users,
            ResourceName::Statistics
        ]
    );
}

// ── Systemic failure ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_error_set_only_when_every_resource_fails() {
    let loader = AggregateLoader::new(vec![
        (ResourceName::Users, failing(Duration::from_millis(5))),
        (ResourceName::Packages, failing(Duration::from_millis(1))),
    ]);

    let state = loader.load().await;
    let error = state.error.unwrap();
    assert!(error.message.starts_with("all 2 resources failed to load"));
    assert!(!error.unauthorized);
    assert_eq!(state.resources.len(), 2);
    assert!(state.resources.values().all(ResourceData::is_empty));
}

#[tokio::test]
async fn test_systemic_unauthorized_is_flagged() {
    let unauthorized: ResourceLoader = Box::new(|| Box::pin(async { Err(CoreError::Unauthorized) }));
    let loader = AggregateLoader::new(vec![(ResourceName::Users, unauthorized)]);

    let state = loader.load().await;
    let error = state.error.unwrap();
    assert!(error.unauthorized);
    assert_eq!(error.status, Some(401));
}

#[tokio::test(start_paused = true)]
async fn test_retry_clears_previous_error_while_loading() {
    let loader = AggregateLoader::new(vec![(ResourceName::Users, failing(Duration::from_millis(5)))]);

    let state = loader.load().await;
    assert!(state.error.is_some());

    let retry = loader.refetch();
    let during = loader.state();
    assert!(during.loading);
    assert!(during.error.is_none());
    assert!(during.failures.is_empty());

    let state = retry.await;
    assert!(!state.loading);
    assert!(state.error.is_some());
}

// ── Loading flag ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_loading_clears_once_after_last_settlement() {
    let loader = AggregateLoader::new(vec![
        (
            ResourceName::Users,
            delayed(ResourceData::Users(Vec::new()), Duration::from_millis(10)),
        ),
        (ResourceName::Packages, failing(Duration::from_millis(40))),
        (
            ResourceName::Classes,
            delayed(ResourceData::Classes(Vec::new()), Duration::from_millis(25)),
        ),
    ]);
    let mut rx = loader.subscribe();
    rx.borrow_and_update();

    let load = loader.load();
    assert!(loader.state().loading);

    let observer = async {
        let mut clears = 0;
        while rx.changed().await.is_ok() {
            if !rx.borrow_and_update().loading {
                clears += 1;
                break;
            }
        }
        clears
    };

    let (state, clears) = tokio::join!(load, observer);
    assert_eq!(clears, 1);
    assert!(!state.loading);
    // The clear carries every settlement, including the slowest failure.
    assert_eq!(state.failures.len(), 1);
    assert_eq!(state.resources.len(), 3);
}

// ── Stale settlement guard ──────────────────────────────────────────

#[tokio::test]
async fn test_stale_settlement_is_discarded() {
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let users: ResourceLoader = {
        let calls = Arc::clone(&calls);
        let gate = Arc::clone(&gate);
        Box::new(move || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&gate);
            Box::pin(async move {
                if call == 0 {
                    // First invocation is slow and returns outdated data.
                    gate.notified().await;
                    Ok(ResourceData::Users(vec![user(1, "stale@studio.test")]))
                } else {
                    Ok(ResourceData::Users(vec![user(2, "fresh@studio.test")]))
                }
            })
        })
    };
    let loader = AggregateLoader::new(vec![(ResourceName::Users, users)]);

    let first = loader.load();
    let second = async {
        let state = loader.refetch().await;
        gate.notify_one();
        state
    };
    let (from_first, from_second) = tokio::join!(first, second);

    assert_eq!(from_second.generation, 2);
    // The first call resolves with the newer state instead of its own.
    assert_eq!(from_first, from_second);

    let state = loader.state();
    assert_eq!(state.generation, 2);
    assert!(!state.loading);
    let emails: Vec<_> = state
        .get(ResourceName::Users)
        .and_then(ResourceData::as_users)
        .unwrap()
        .iter()
        .map(|u| u.email.clone())
        .collect();
    assert_eq!(emails, vec!["fresh@studio.test".to_owned()]);
}
