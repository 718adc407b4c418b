//! Roster table DDL and course seeding. Tables live in the schema named by config
//! (`ROSTER_SCHEMA`, default `public`).

use crate::error::StoreError;
use crate::model::Course;
use crate::sql::{quoted, RosterTables};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create the schema if needed, then `students`, `courses` and `student_courses`.
/// Association rows are removed with their student through ON DELETE CASCADE.
pub async fn ensure_roster_tables(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    let tables = RosterTables::new(schema);
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;

    let students_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL CHECK (length(btrim(name)) > 0),
            cohort TEXT NOT NULL,
            status BOOLEAN NOT NULL DEFAULT TRUE,
            date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_login TIMESTAMPTZ
        )
        "#,
        tables.students
    );
    sqlx::query(&students_ddl).execute(pool).await?;

    let courses_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT
        )
        "#,
        tables.courses
    );
    sqlx::query(&courses_ddl).execute(pool).await?;
    // Older catalogs were created without a course code.
    let alter_code = format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS code TEXT", tables.courses);
    let _ = sqlx::query(&alter_code).execute(pool).await;

    let links_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            student_id UUID NOT NULL REFERENCES {} (id) ON DELETE CASCADE,
            course_id TEXT NOT NULL REFERENCES {} (id) ON DELETE CASCADE,
            PRIMARY KEY (student_id, course_id)
        )
        "#,
        tables.student_courses, tables.students, tables.courses
    );
    sqlx::query(&links_ddl).execute(pool).await?;

    let name_index = format!(
        "CREATE INDEX IF NOT EXISTS students_name_idx ON {} (name)",
        tables.students
    );
    sqlx::query(&name_index).execute(pool).await?;
    Ok(())
}

/// Insert or refresh catalog courses by id. Returns the number of rows written.
pub async fn seed_courses(pool: &PgPool, schema: &str, courses: &[Course]) -> Result<u64, StoreError> {
    if courses.is_empty() {
        return Ok(0);
    }
    let tables = RosterTables::new(schema);
    let sql = format!(
        "INSERT INTO {} (id, name, code) VALUES ($1, $2, $3) \
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, code = EXCLUDED.code",
        tables.courses
    );
    let mut tx = pool.begin().await?;
    let mut count = 0u64;
    for c in courses {
        tracing::debug!(sql = %sql, course_id = %c.id, "query (tx)");
        count += sqlx::query(&sql)
            .bind(&c.id)
            .bind(&c.name)
            .bind(c.code.as_deref())
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;
    Ok(count)
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| StoreError::Validation(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::Validation("DATABASE_URL: no path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim().to_string();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name))
}
