//! Shared helpers for store integration tests: record builders and a
//! scripted `DirectoryApi` double with per-response delays.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rdx_api::{
    ApiError, CreatedUser, DirectoryApi, RawUser, UpdatedUser, UserPayload, UsersPage,
};
use rdx_store::{DirectoryStore, UserDraft};

type Scripted<T> = (Duration, Result<T, ApiError>);

/// In-process `DirectoryApi` whose responses are scripted per operation, in
/// call order. An optional delay per response lets tests hold a call in
/// flight while another action runs. Panics when an operation runs out of
/// script — that is a test bug, not a store bug.
#[derive(Default)]
pub struct ScriptedApi {
    pages: Mutex<VecDeque<Scripted<UsersPage>>>,
    users: Mutex<VecDeque<Scripted<RawUser>>>,
    creates: Mutex<VecDeque<Scripted<CreatedUser>>>,
    updates: Mutex<VecDeque<Scripted<UpdatedUser>>>,
    deletes: Mutex<VecDeque<Scripted<()>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, result: Result<UsersPage, ApiError>) {
        self.push_page_delayed(Duration::ZERO, result);
    }

    pub fn push_page_delayed(&self, delay: Duration, result: Result<UsersPage, ApiError>) {
        self.pages.lock().unwrap().push_back((delay, result));
    }

    pub fn push_user(&self, result: Result<RawUser, ApiError>) {
        self.users.lock().unwrap().push_back((Duration::ZERO, result));
    }

    pub fn push_create(&self, result: Result<CreatedUser, ApiError>) {
        self.push_create_delayed(Duration::ZERO, result);
    }

    pub fn push_create_delayed(&self, delay: Duration, result: Result<CreatedUser, ApiError>) {
        self.creates.lock().unwrap().push_back((delay, result));
    }

    pub fn push_update(&self, result: Result<UpdatedUser, ApiError>) {
        self.push_update_delayed(Duration::ZERO, result);
    }

    pub fn push_update_delayed(&self, delay: Duration, result: Result<UpdatedUser, ApiError>) {
        self.updates.lock().unwrap().push_back((delay, result));
    }

    pub fn push_delete(&self, result: Result<(), ApiError>) {
        self.push_delete_delayed(Duration::ZERO, result);
    }

    pub fn push_delete_delayed(&self, delay: Duration, result: Result<(), ApiError>) {
        self.deletes.lock().unwrap().push_back((delay, result));
    }

    /// Operations the store issued, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn take<T>(queue: &Mutex<VecDeque<Scripted<T>>>, op: &str) -> Scripted<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {op}"))
    }

    async fn resolve<T>(scripted: Scripted<T>) -> Result<T, ApiError> {
        let (delay, result) = scripted;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl DirectoryApi for ScriptedApi {
    async fn fetch_users(&self, page: u32, per_page: u32) -> Result<UsersPage, ApiError> {
        self.record(format!("fetch_users page={page} per_page={per_page}"));
        Self::resolve(Self::take(&self.pages, "fetch_users")).await
    }

    async fn fetch_user(&self, id: u32) -> Result<RawUser, ApiError> {
        self.record(format!("fetch_user id={id}"));
        Self::resolve(Self::take(&self.users, "fetch_user")).await
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<CreatedUser, ApiError> {
        self.record(format!("create_user name={}", payload.name));
        Self::resolve(Self::take(&self.creates, "create_user")).await
    }

    async fn update_user(&self, id: u32, payload: &UserPayload) -> Result<UpdatedUser, ApiError> {
        self.record(format!("update_user id={id} name={}", payload.name));
        Self::resolve(Self::take(&self.updates, "update_user")).await
    }

    async fn delete_user(&self, id: u32) -> Result<(), ApiError> {
        self.record(format!("delete_user id={id}"));
        Self::resolve(Self::take(&self.deletes, "delete_user")).await
    }
}

/// A store over a fresh scripted API, page size 6.
pub fn scripted_store() -> (Arc<ScriptedApi>, DirectoryStore) {
    let api = Arc::new(ScriptedApi::new());
    let store = DirectoryStore::new(api.clone(), 6);
    (api, store)
}

pub fn raw_user(id: u32, first: &str, last: &str, email: &str, avatar: &str) -> RawUser {
    RawUser {
        id,
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: avatar.to_string(),
    }
}

pub fn users_page(page: u32, total_pages: u32, total: u32, data: Vec<RawUser>) -> UsersPage {
    UsersPage {
        page,
        per_page: 6,
        total,
        total_pages,
        data,
    }
}

pub fn draft(name: &str, email: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        email: email.to_string(),
        ..UserDraft::default()
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status { status: 500 }
}

/// The two-user page 1 most tests start from.
pub fn page_one() -> UsersPage {
    users_page(
        1,
        1,
        2,
        vec![
            raw_user(7, "Ann", "Lee", "ann@x.com", "https://example.com/a.png"),
            raw_user(8, "Bo", "Ng", "bo@x.com", "https://example.com/b.png"),
        ],
    )
}
