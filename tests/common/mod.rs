#![allow(dead_code)]

use async_trait::async_trait;
use roster_sdk::{
    Course, MemoryGateway, NewStudent, Student, StudentGateway, StoreError, StudentId, StudentPatch,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

/// Memory gateway that can be told to fail chosen operations, pause the list call,
/// and count how many list calls were made.
pub struct FlakyGateway {
    pub inner: MemoryGateway,
    failing: Mutex<HashSet<Op>>,
    list_calls: AtomicUsize,
    pause_list: Mutex<bool>,
    pub list_entered: Notify,
    pub list_release: Notify,
}

impl FlakyGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        FlakyGateway {
            inner,
            failing: Mutex::new(HashSet::new()),
            list_calls: AtomicUsize::new(0),
            pause_list: Mutex::new(false),
            list_entered: Notify::new(),
            list_release: Notify::new(),
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn pause_list(&self, pause: bool) {
        *self.pause_list.lock().unwrap() = pause;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentGateway for FlakyGateway {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let paused = *self.pause_list.lock().unwrap();
        if paused {
            self.list_entered.notify_one();
            self.list_release.notified().await;
        }
        self.check(Op::List)?;
        self.inner.list_students().await
    }

    async fn create_student(&self, input: &NewStudent) -> Result<StudentId, StoreError> {
        self.check(Op::Create)?;
        self.inner.create_student(input).await
    }

    async fn update_student(&self, id: StudentId, patch: &StudentPatch) -> Result<(), StoreError> {
        self.check(Op::Update)?;
        self.inner.update_student(id, patch).await
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        self.check(Op::Delete)?;
        self.inner.delete_student(id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_courses().await
    }
}

pub fn course(id: &str, name: &str) -> Course {
    Course {
        id: id.into(),
        name: name.into(),
        code: None,
    }
}

pub fn catalog() -> Vec<Course> {
    vec![
        course("c1", "CBSE 9 Math"),
        course("c2", "CBSE 9 Science"),
        course("c3", "CBSE 10 Math"),
    ]
}

pub fn new_student(name: &str, cohort: &str, course_ids: &[&str]) -> NewStudent {
    NewStudent {
        name: name.into(),
        cohort: cohort.into(),
        status: true,
        course_ids: course_ids.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn course_ids(student: &Student) -> Vec<String> {
    let mut ids: Vec<String> = student.courses.iter().map(|c| c.id.clone()).collect();
    ids.sort();
    ids
}
