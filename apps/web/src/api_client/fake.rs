//! In-memory `ApplicationsApi` that records every call, for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiError, ApplicationsApi};
use crate::models::application::{JobApplication, NewJobApplication};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(NewJobApplication),
    Update(i64, NewJobApplication),
    Delete(i64),
}

#[derive(Default)]
pub struct FakeApi {
    pub records: Mutex<Vec<JobApplication>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_list: Mutex<bool>,
    pub fail_writes: Mutex<bool>,
}

impl FakeApi {
    pub fn with_records(records: Vec<JobApplication>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }

    fn next_id(records: &[JobApplication]) -> i64 {
        records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1
    }
}

fn to_record(id: i64, application: &NewJobApplication) -> JobApplication {
    JobApplication {
        id: Some(id),
        company_name: application.company_name.clone(),
        role_applied_for: application.role_applied_for.clone(),
        date_applied: application.date_applied.clone(),
        status: application.status.clone(),
        days_since_update: application.days_since_update,
    }
}

#[async_trait]
impl ApplicationsApi for FakeApi {
    async fn list(&self) -> Result<Vec<JobApplication>, ApiError> {
        self.calls.lock().unwrap().push(Call::List);
        if *self.fail_list.lock().unwrap() {
            return Err(Self::unavailable());
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, application: &NewJobApplication) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(application.clone()));
        if *self.fail_writes.lock().unwrap() {
            return Err(Self::unavailable());
        }
        let mut records = self.records.lock().unwrap();
        let id = Self::next_id(&records);
        records.push(to_record(id, application));
        Ok(())
    }

    async fn update(
        &self,
        id: i64,
        application: &NewJobApplication,
    ) -> Result<Option<JobApplication>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id, application.clone()));
        if *self.fail_writes.lock().unwrap() {
            return Err(Self::unavailable());
        }
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .map(|record| {
                *record = to_record(id, application);
                record.clone()
            }))
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call::Delete(id));
        if *self.fail_writes.lock().unwrap() {
            return Err(Self::unavailable());
        }
        self.records.lock().unwrap().retain(|r| r.id != Some(id));
        Ok(())
    }
}
