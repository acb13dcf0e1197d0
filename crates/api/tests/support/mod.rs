//! Shared fixtures for HTTP route tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use petnco_api::{router, AppContext};
use petnco_common::MockClock;
use petnco_core::BookingNotifier;
use petnco_domain::{Actor, BookingNotice, Config, PetncoError, Result, UserId, VetId};
use petnco_infra::DbManager;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// Notifier that keeps every notice, optionally failing each delivery
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<BookingNotice>>,
    pub fail: bool,
}

#[async_trait]
impl BookingNotifier for RecordingNotifier {
    async fn notify(&self, notice: &BookingNotice) -> Result<()> {
        self.notices.lock().push(notice.clone());
        if self.fail {
            return Err(PetncoError::Internal("mail relay down".to_string()));
        }
        Ok(())
    }
}

/// Router over a temporary database with a frozen clock
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub clock: MockClock,
    pub notifier: Arc<RecordingNotifier>,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::with_notifier(now, RecordingNotifier::default())
    }

    pub fn with_notifier(now: DateTime<Utc>, notifier: RecordingNotifier) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db = DbManager::new(dir.path().join("petnco.db"), 4, 5000).expect("db manager");
        db.run_migrations().expect("migrations");

        let clock = MockClock::at(now);
        let notifier = Arc::new(notifier);
        let ctx = Arc::new(AppContext::with_parts(
            Config::default(),
            Arc::new(db),
            Arc::new(clock.clone()),
            notifier.clone(),
        ));
        let router = router(Arc::clone(&ctx));

        Self { ctx, clock, notifier, router, _dir: dir }
    }

    /// Send one request and decode the JSON reply (`Null` for empty bodies)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        actor: Option<&Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header("x-user-id", actor.user_id.to_string());
            if let Some(vet_id) = actor.vet_id {
                builder = builder.header("x-vet-id", vet_id.to_string());
            }
            if actor.is_staff {
                builder = builder.header("x-staff", "true");
            }
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    pub async fn get(&self, uri: &str, actor: Option<&Actor>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, actor, None).await
    }

    pub async fn post(&self, uri: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(actor), Some(body)).await
    }

    /// Opt a fresh user in as a vet and return the acting identity
    pub async fn vet(&self, name: &str) -> (Actor, VetId) {
        let user = Actor::client(UserId::new());
        let (status, profile) =
            self.post("/vets", &user, serde_json::json!({ "display_name": name })).await;
        assert_eq!(status, StatusCode::CREATED, "opt-in failed: {profile}");
        let vet_id: VetId = serde_json::from_value(profile["id"].clone()).unwrap();
        (Actor::vet(user.user_id, vet_id), vet_id)
    }

    /// Create a slot and return its id as a string
    pub async fn slot(&self, vet: &Actor, vet_id: VetId, date: &str, start: &str, end: &str) -> String {
        let (status, slot) = self
            .post(
                &format!("/vets/{vet_id}/slots"),
                vet,
                serde_json::json!({ "date": date, "start": start, "end": end }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "slot creation failed: {slot}");
        slot["id"].as_str().unwrap().to_string()
    }
}
