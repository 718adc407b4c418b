//! Roster state container: cached student list, loading/error flags, filters and selection.
//! Every mutation goes through the gateway and is followed by a full refetch; the cache is
//! never patched in place.

use crate::error::StoreError;
use crate::gateway::StudentGateway;
use crate::model::{Course, Filters, FiltersPatch, NewStudent, Student, StudentId, StudentPatch};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle passed to routes and other consumers.
pub type SharedState = Arc<RosterState>;

#[derive(Clone, Debug, Default)]
struct Inner {
    students: Vec<Student>,
    is_loading: bool,
    error: Option<String>,
    filters: Filters,
    selected: Option<StudentId>,
}

/// Owned copy of every state field plus the filtered view.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    pub students: Vec<Student>,
    pub filtered_students: Vec<Student>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filters: Filters,
    pub selected_student: Option<StudentId>,
}

pub struct RosterState {
    gateway: Arc<dyn StudentGateway>,
    default_filters: Filters,
    inner: RwLock<Inner>,
}

/// Sets `is_loading` and clears `error` on creation; clears `is_loading` when dropped,
/// including when the owning future is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a RosterState,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a RosterState) -> Self {
        {
            let mut inner = state.write();
            inner.is_loading = true;
            inner.error = None;
        }
        LoadingGuard { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.write().is_loading = false;
    }
}

impl RosterState {
    pub fn new(gateway: Arc<dyn StudentGateway>) -> Self {
        Self::with_default_filters(gateway, Filters::default())
    }

    /// `default_filters` is both the initial filter state and what `reset_filters` restores.
    pub fn with_default_filters(gateway: Arc<dyn StudentGateway>, default_filters: Filters) -> Self {
        RosterState {
            gateway,
            inner: RwLock::new(Inner {
                filters: default_filters.clone(),
                ..Inner::default()
            }),
            default_filters,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    pub fn gateway(&self) -> &Arc<dyn StudentGateway> {
        &self.gateway
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn students(&self) -> Vec<Student> {
        self.read().students.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn filters(&self) -> Filters {
        self.read().filters.clone()
    }

    pub fn selected_student_id(&self) -> Option<StudentId> {
        self.read().selected
    }

    /// The selected record as it appears in the current cache; None if it is gone after a resync.
    pub fn selected_student(&self) -> Option<Student> {
        let inner = self.read();
        let id = inner.selected?;
        inner.students.iter().find(|s| s.id == id).cloned()
    }

    pub fn select_student(&self, id: Option<StudentId>) {
        self.write().selected = id;
    }

    pub fn set_filters(&self, patch: FiltersPatch) {
        self.write().filters.merge(patch);
    }

    pub fn reset_filters(&self) {
        self.write().filters = self.default_filters.clone();
    }

    /// Recomputed from `students` and `filters` on every call.
    pub fn filtered_students(&self) -> Vec<Student> {
        let inner = self.read();
        inner.filters.apply(&inner.students)
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let inner = self.read();
        RosterSnapshot {
            students: inner.students.clone(),
            filtered_students: inner.filters.apply(&inner.students),
            is_loading: inner.is_loading,
            error: inner.error.clone(),
            filters: inner.filters.clone(),
            selected_student: inner.selected,
        }
    }

    /// Read-only pass-through to the course catalog; not cached.
    pub async fn courses(&self) -> Result<Vec<Course>, StoreError> {
        self.gateway.list_courses().await
    }

    /// Replace the cache with a fresh list. A failure is recorded in `error` and the
    /// previous cache is kept; it is never returned to the caller.
    pub async fn fetch_students(&self) {
        let _loading = LoadingGuard::begin(self);
        match self.gateway.list_students().await {
            Ok(students) => {
                tracing::debug!(count = students.len(), "student list refreshed");
                self.write().students = students;
            }
            Err(e) => self.record_failure("fetch students", &e),
        }
    }

    pub async fn add_student(&self, input: NewStudent) -> Result<StudentId, StoreError> {
        let _loading = LoadingGuard::begin(self);
        match self.gateway.create_student(&input).await {
            Ok(id) => {
                tracing::info!(student_id = %id, "student added");
                self.fetch_students().await;
                Ok(id)
            }
            Err(e) => {
                self.record_failure("add student", &e);
                Err(e)
            }
        }
    }

    pub async fn update_student(&self, id: StudentId, patch: StudentPatch) -> Result<(), StoreError> {
        let _loading = LoadingGuard::begin(self);
        match self.gateway.update_student(id, &patch).await {
            Ok(()) => {
                tracing::info!(student_id = %id, "student updated");
                self.fetch_students().await;
                Ok(())
            }
            Err(e) => {
                self.record_failure("update student", &e);
                Err(e)
            }
        }
    }

    pub async fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        let _loading = LoadingGuard::begin(self);
        match self.gateway.delete_student(id).await {
            Ok(()) => {
                tracing::info!(student_id = %id, "student deleted");
                self.fetch_students().await;
                Ok(())
            }
            Err(e) => {
                self.record_failure("delete student", &e);
                Err(e)
            }
        }
    }

    fn record_failure(&self, action: &'static str, e: &StoreError) {
        tracing::warn!(action, error = %e, "roster action failed");
        self.write().error = Some(e.message());
    }
}
