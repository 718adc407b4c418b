//! In-process relational store with the same semantics as the PostgreSQL gateway:
//! store-assigned ids and timestamps, foreign keys on the association table,
//! cascade on student delete, and no rollback when a later step fails.

use crate::error::StoreError;
use crate::gateway::{StudentGateway, StudentValidator};
use crate::model::{Course, CourseId, NewStudent, Student, StudentId, StudentPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Clone, Debug)]
struct StudentRecord {
    name: String,
    cohort: String,
    status: bool,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Tables {
    students: BTreeMap<StudentId, StudentRecord>,
    courses: BTreeMap<CourseId, Course>,
    student_courses: BTreeSet<(StudentId, CourseId)>,
}

impl Tables {
    /// Multi-row association insert: either every row goes in or none does.
    fn insert_links(&mut self, id: StudentId, course_ids: &[CourseId]) -> Result<(), StoreError> {
        if !self.students.contains_key(&id) {
            return Err(StoreError::Constraint(format!(
                "student_courses.student_id references missing student {}",
                id
            )));
        }
        if let Some(missing) = course_ids.iter().find(|c| !self.courses.contains_key(*c)) {
            return Err(StoreError::Constraint(format!(
                "student_courses.course_id references missing course {}",
                missing
            )));
        }
        if let Some(dup) = course_ids
            .iter()
            .find(|c| self.student_courses.contains(&(id, (*c).clone())))
        {
            return Err(StoreError::Constraint(format!(
                "student {} is already linked to course {}",
                id, dup
            )));
        }
        for cid in course_ids {
            self.student_courses.insert((id, cid.clone()));
        }
        Ok(())
    }

    fn delete_links(&mut self, id: StudentId) {
        self.student_courses.retain(|(sid, _)| *sid != id);
    }

    fn courses_of(&self, id: StudentId) -> Vec<Course> {
        let mut out: Vec<Course> = self
            .student_courses
            .iter()
            .filter(|(sid, _)| *sid == id)
            .filter_map(|(_, cid)| self.courses.get(cid).cloned())
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        out
    }
}

#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let gw = Self::new();
        gw.upsert_courses(courses);
        gw
    }

    /// Course catalog maintenance; the roster core itself never writes courses.
    pub fn upsert_courses(&self, courses: impl IntoIterator<Item = Course>) {
        let mut t = self.lock();
        for c in courses {
            t.courses.insert(c.id.clone(), c);
        }
    }

    /// Store-managed login timestamp.
    pub fn record_login(&self, id: StudentId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut t = self.lock();
        let rec = t
            .students
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("student {}", id)))?;
        rec.last_login = Some(at);
        Ok(())
    }

    /// Raw association count, independent of the list query.
    pub fn link_count(&self, id: StudentId) -> usize {
        self.lock().student_courses.iter().filter(|(sid, _)| *sid == id).count()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StudentGateway for MemoryGateway {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let t = self.lock();
        let mut out: Vec<Student> = t
            .students
            .iter()
            .map(|(id, rec)| Student {
                id: *id,
                name: rec.name.clone(),
                cohort: rec.cohort.clone(),
                status: rec.status,
                date_joined: rec.date_joined,
                last_login: rec.last_login,
                courses: t.courses_of(*id),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn create_student(&self, input: &NewStudent) -> Result<StudentId, StoreError> {
        StudentValidator::validate_new(input)?;
        let mut t = self.lock();
        let id = Uuid::new_v4();
        t.students.insert(
            id,
            StudentRecord {
                name: input.name.clone(),
                cohort: input.cohort.clone(),
                status: input.status,
                date_joined: Utc::now(),
                last_login: None,
            },
        );
        if !input.course_ids.is_empty() {
            if let Err(e) = t.insert_links(id, &input.course_ids) {
                tracing::warn!(student_id = %id, error = %e, "course links failed after student insert; student row kept");
                return Err(e);
            }
        }
        Ok(id)
    }

    async fn update_student(&self, id: StudentId, patch: &StudentPatch) -> Result<(), StoreError> {
        StudentValidator::validate_patch(patch)?;
        let mut t = self.lock();
        if patch.has_scalar_fields() {
            let rec = t
                .students
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(format!("student {}", id)))?;
            if let Some(name) = &patch.name {
                rec.name = name.clone();
            }
            if let Some(cohort) = &patch.cohort {
                rec.cohort = cohort.clone();
            }
            if let Some(status) = patch.status {
                rec.status = status;
            }
        }
        if let Some(course_ids) = &patch.course_ids {
            t.delete_links(id);
            if !course_ids.is_empty() {
                t.insert_links(id, course_ids)?;
            }
        }
        Ok(())
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        let mut t = self.lock();
        t.students
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("student {}", id)))?;
        t.delete_links(id);
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let mut out: Vec<Course> = self.lock().courses.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}
