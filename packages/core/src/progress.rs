// ABOUTME: Derived progress over the collected fields
// ABOUTME: Completion count, full-completion predicate and the collection stage

use serde::{Deserialize, Serialize};

use crate::constants::TOTAL_FIELDS;
use crate::types::{Field, InfoStatus, UserInfo};

/// Where the conversation is in the intake flow. Never moves backwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CollectingCompany,
    CollectingIndustry,
    CollectingRole,
    Complete,
}

/// Read-only view over a session's collected info
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    info: &'a UserInfo,
    status: &'a InfoStatus,
}

impl<'a> Progress<'a> {
    pub fn new(info: &'a UserInfo, status: &'a InfoStatus) -> Self {
        Self { info, status }
    }

    pub fn info(&self) -> &'a UserInfo {
        self.info
    }

    pub fn status(&self) -> &'a InfoStatus {
        self.status
    }

    pub fn completed_count(&self) -> usize {
        Field::ALL
            .iter()
            .filter(|field| self.status.is_done(**field))
            .count()
    }

    pub fn total(&self) -> usize {
        TOTAL_FIELDS
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count() == TOTAL_FIELDS
    }

    /// First field that has not been collected yet
    pub fn next_pending(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| !self.status.is_done(*field))
    }

    pub fn stage(&self) -> Stage {
        match self.next_pending() {
            Some(Field::Company) => Stage::CollectingCompany,
            Some(Field::Industry) => Stage::CollectingIndustry,
            Some(Field::Role) => Stage::CollectingRole,
            None => Stage::Complete,
        }
    }

    /// Serializable snapshot for API responses
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            info: self.info.clone(),
            status: *self.status,
            completed: self.completed_count(),
            total: TOTAL_FIELDS,
            complete: self.is_complete(),
            stage: self.stage(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    pub info: UserInfo,
    pub status: InfoStatus,
    pub completed: usize,
    pub total: usize,
    pub complete: bool,
    pub stage: Stage,
}
