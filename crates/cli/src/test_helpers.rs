// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: a scripted API transport and store doubles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use presently_core::{MemoryStore, Store};
use tokio::time::Instant;

use crate::api::{Api, ApiFuture, ProbeFuture, Reply, TransportError};
use crate::session::{Session, BEARER_KEY};

/// Build an unsigned JWT carrying the given claims JSON.
pub fn make_jwt(claims: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims);
    let signature = URL_SAFE_NO_PAD.encode("fake-signature");
    format!("{}.{}.{}", header, payload, signature)
}

/// A bearer token for a student named Ada.
pub fn student_jwt() -> String {
    make_jwt(r#"{"user_id":"65a1f0c2","name":"Ada Lovelace","role":"student"}"#)
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Status(u16, String),
    NetworkDown,
}

impl MockReply {
    fn into_result(self) -> Result<Reply, TransportError> {
        match self {
            MockReply::Status(status, body) => Ok(Reply::new(status, body.into_bytes())),
            MockReply::NetworkDown => Err(TransportError::Request("mock network down".into())),
        }
    }
}

/// Mock attendance service for testing without sockets.
///
/// Unscripted mark calls behave like the real server: the first submission of
/// a token is accepted (201) and every later one conflicts (409).
#[derive(Default)]
pub struct MockApi {
    mark_script: Mutex<HashMap<String, VecDeque<MockReply>>>,
    recorded: Mutex<HashSet<String>>,
    mark_calls: Mutex<Vec<(String, String)>>,
    session_script: Mutex<VecDeque<MockReply>>,
    session_calls: Mutex<Vec<(Instant, String)>>,
    login_reply: Mutex<Option<MockReply>>,
    mark_delay: Mutex<Option<Duration>>,
    session_delay: Mutex<Option<Duration>>,
    issued: Mutex<u32>,
    offline: Mutex<bool>,
    class_script: Mutex<HashMap<&'static str, VecDeque<MockReply>>>,
    class_calls: Mutex<Vec<(&'static str, String)>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a reply for the next mark call carrying `token`.
    pub fn script_mark(&self, token: &str, reply: MockReply) {
        self.mark_script
            .lock()
            .unwrap()
            .entry(token.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queue a reply for the next attendance-session call.
    pub fn script_session(&self, reply: MockReply) {
        self.session_script.lock().unwrap().push_back(reply);
    }

    pub fn set_login_reply(&self, reply: MockReply) {
        *self.login_reply.lock().unwrap() = Some(reply);
    }

    /// Queue a reply for the next call on a class route: `classes`, `join`,
    /// `leave`, `roster` or `history`.
    pub fn script_route(&self, route: &'static str, reply: MockReply) {
        self.class_script
            .lock()
            .unwrap()
            .entry(route)
            .or_default()
            .push_back(reply);
    }

    /// Arguments passed to a class route, in call order.
    pub fn route_calls(&self, route: &str) -> Vec<String> {
        self.class_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == route)
            .map(|(_, arg)| arg.clone())
            .collect()
    }

    fn route_reply(&self, route: &'static str, arg: &str, default: &str) -> ApiFuture<'static> {
        self.class_calls
            .lock()
            .unwrap()
            .push((route, arg.to_string()));
        let reply = self
            .class_script
            .lock()
            .unwrap()
            .get_mut(route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| MockReply::Status(200, default.to_string()));
        Box::pin(async move { reply.into_result() })
    }

    /// Make probes report the server as unreachable.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Make every attendance-session call take `delay` before replying.
    pub fn set_session_delay(&self, delay: Duration) {
        *self.session_delay.lock().unwrap() = Some(delay);
    }

    /// Make every mark call take `delay` before replying.
    pub fn set_mark_delay(&self, delay: Duration) {
        *self.mark_delay.lock().unwrap() = Some(delay);
    }

    /// Attendance tokens submitted, in call order.
    pub fn mark_calls(&self) -> Vec<String> {
        self.mark_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    /// Bearer tokens presented on mark calls, in call order.
    pub fn mark_bearers(&self) -> Vec<String> {
        self.mark_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(bearer, _)| bearer.clone())
            .collect()
    }

    /// Times of attendance-session calls.
    pub fn session_call_times(&self) -> Vec<Instant> {
        self.session_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }

    /// Class ids of attendance-session calls.
    pub fn session_class_ids(&self) -> Vec<String> {
        self.session_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, class_id)| class_id.clone())
            .collect()
    }
}

impl Api for MockApi {
    fn login<'a>(&'a self, _email: &'a str, _password: &'a str) -> ApiFuture<'a> {
        let reply = self
            .login_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(MockReply::Status(401, r#"{"error":"Invalid credentials"}"#.into()));
        Box::pin(async move { reply.into_result() })
    }

    fn create_attendance_session<'a>(
        &'a self,
        _bearer: &'a str,
        class_id: &'a str,
    ) -> ApiFuture<'a> {
        self.session_calls
            .lock()
            .unwrap()
            .push((Instant::now(), class_id.to_string()));
        let scripted = self.session_script.lock().unwrap().pop_front();
        let reply = scripted.unwrap_or_else(|| {
            let mut issued = self.issued.lock().unwrap();
            *issued += 1;
            MockReply::Status(201, format!(r#"{{"attendanceToken":"tok-{}"}}"#, *issued))
        });
        let delay = *self.session_delay.lock().unwrap();
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            reply.into_result()
        })
    }

    fn mark_attendance<'a>(&'a self, bearer: &'a str, attendance_token: &'a str) -> ApiFuture<'a> {
        self.mark_calls
            .lock()
            .unwrap()
            .push((bearer.to_string(), attendance_token.to_string()));
        let delay = *self.mark_delay.lock().unwrap();
        let scripted = self
            .mark_script
            .lock()
            .unwrap()
            .get_mut(attendance_token)
            .and_then(VecDeque::pop_front);

        let reply = scripted.unwrap_or_else(|| {
            if self
                .recorded
                .lock()
                .unwrap()
                .insert(attendance_token.to_string())
            {
                MockReply::Status(201, r#"{"message":"Attendance marked successfully"}"#.into())
            } else {
                MockReply::Status(409, r#"{"error":"Attendance already marked for this session"}"#.into())
            }
        });

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            reply.into_result()
        })
    }

    fn list_classes<'a>(&'a self, _bearer: &'a str) -> ApiFuture<'a> {
        self.route_reply("classes", "", "[]")
    }

    fn join_class<'a>(&'a self, _bearer: &'a str, code: &'a str) -> ApiFuture<'a> {
        self.route_reply("join", code, r#"{"message":"Successfully joined classroom"}"#)
    }

    fn leave_class<'a>(&'a self, _bearer: &'a str, class_id: &'a str) -> ApiFuture<'a> {
        self.route_reply("leave", class_id, r#"{"message":"Successfully left classroom"}"#)
    }

    fn class_attendance<'a>(&'a self, _bearer: &'a str, class_id: &'a str) -> ApiFuture<'a> {
        self.route_reply("roster", class_id, "[]")
    }

    fn attendance_history<'a>(&'a self, _bearer: &'a str) -> ApiFuture<'a> {
        self.route_reply("history", "", "null")
    }

    fn probe(&self) -> ProbeFuture<'_> {
        let online = !*self.offline.lock().unwrap();
        Box::pin(async move { online })
    }
}

/// Store whose writes can be made to fail.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: Mutex<bool>,
}

impl FailingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }
}

impl Store for FailingStore {
    fn read(&self, key: &str) -> presently_core::Result<Option<Vec<u8>>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> presently_core::Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(presently_core::Error::Io(std::io::Error::other(
                "mock disk full",
            )));
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> presently_core::Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(presently_core::Error::Io(std::io::Error::other(
                "mock disk full",
            )));
        }
        self.inner.remove(key)
    }
}

/// A session restored from a stored student token.
pub fn signed_in_session(store: Arc<dyn Store>, api: Arc<dyn Api>) -> Session {
    store.write(BEARER_KEY, student_jwt().as_bytes()).unwrap();
    let session = Session::new(store, api);
    session.load().unwrap();
    session
}
