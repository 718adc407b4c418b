//! Gateway over PostgreSQL. Every step is its own statement on the pool; nothing is
//! wrapped in a transaction, so a failed step leaves earlier steps in place.

use crate::error::StoreError;
use crate::gateway::{StudentGateway, StudentValidator};
use crate::model::{Course, NewStudent, Student, StudentId, StudentPatch};
use crate::sql::{bind_all, bind_all_as, QueryBuf, RosterTables};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

type StudentRow = (
    StudentId,
    String,
    String,
    bool,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
    Value,
);

/// One association row as the list query nests it.
#[derive(Deserialize)]
struct CourseLink {
    course: Course,
}

#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    tables: RosterTables,
}

impl PgGateway {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgGateway {
            pool,
            tables: RosterTables::new(schema),
        }
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let done = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(done.rows_affected())
    }

    async fn returning_id(&self, q: &QueryBuf) -> Result<Option<StudentId>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row: Option<(StudentId,)> = bind_all_as(sqlx::query_as(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(|(id,)| id))
    }

    async fn replace_courses(&self, id: StudentId, course_ids: &[String]) -> Result<(), StoreError> {
        self.execute(&self.tables.delete_student_courses(id)).await?;
        if let Some(q) = self.tables.insert_student_courses(id, course_ids) {
            self.execute(&q).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StudentGateway for PgGateway {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let q = self.tables.select_students_with_courses();
        tracing::debug!(sql = %q.sql, "query");
        let rows: Vec<StudentRow> = sqlx::query_as(&q.sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.into_iter().map(student_from_row).collect()
    }

    async fn create_student(&self, input: &NewStudent) -> Result<StudentId, StoreError> {
        StudentValidator::validate_new(input)?;
        let id = self
            .returning_id(&self.tables.insert_student(input))
            .await?
            .ok_or_else(|| StoreError::Db(sqlx::Error::RowNotFound))?;
        if let Some(q) = self.tables.insert_student_courses(id, &input.course_ids) {
            if let Err(e) = self.execute(&q).await {
                tracing::warn!(student_id = %id, error = %e, "course links failed after student insert; student row kept");
                return Err(e);
            }
        }
        Ok(id)
    }

    async fn update_student(&self, id: StudentId, patch: &StudentPatch) -> Result<(), StoreError> {
        StudentValidator::validate_patch(patch)?;
        if let Some(q) = self.tables.update_student(id, patch) {
            self.returning_id(&q)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("student {}", id)))?;
        }
        if let Some(course_ids) = &patch.course_ids {
            self.replace_courses(id, course_ids).await?;
        }
        Ok(())
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        self.returning_id(&self.tables.delete_student(id))
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("student {}", id)))?;
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let q = self.tables.select_courses();
        tracing::debug!(sql = %q.sql, "query");
        let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(&q.sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, name, code)| Course { id, name, code })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn student_from_row(row: StudentRow) -> Result<Student, StoreError> {
    let (id, name, cohort, status, date_joined, last_login, courses) = row;
    let links: Vec<CourseLink> = serde_json::from_value(courses)
        .map_err(|e| StoreError::Decode(format!("courses of student {}: {}", id, e)))?;
    Ok(Student {
        id,
        name,
        cohort,
        status,
        date_joined,
        last_login,
        courses: links.into_iter().map(|l| l.course).collect(),
    })
}

/// Foreign-key and unique violations become `Constraint` so callers see a conflict, not a server fault.
fn map_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() || db.is_unique_violation() {
            return StoreError::Constraint(db.message().to_string());
        }
    }
    StoreError::Db(e)
}
