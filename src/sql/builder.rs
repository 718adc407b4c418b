//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the roster tables.

use crate::model::{NewStudent, StudentId, StudentPatch};
use crate::sql::BindValue;

pub const STUDENTS_TABLE: &str = "students";
pub const COURSES_TABLE: &str = "courses";
pub const STUDENT_COURSES_TABLE: &str = "student_courses";

/// Quote identifier for PostgreSQL (safe: schema comes from validated config, tables are constants).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub(crate) fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<BindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

/// Schema-qualified names of the three roster tables.
#[derive(Clone, Debug)]
pub struct RosterTables {
    pub students: String,
    pub courses: String,
    pub student_courses: String,
}

impl RosterTables {
    pub fn new(schema: &str) -> Self {
        RosterTables {
            students: qualified_table(schema, STUDENTS_TABLE),
            courses: qualified_table(schema, COURSES_TABLE),
            student_courses: qualified_table(schema, STUDENT_COURSES_TABLE),
        }
    }

    /// Students aliased as "main", with association rows aggregated into a `courses`
    /// JSON array of `{ "course": { id, name, code } }` objects. Names sort under the
    /// "C" collation (byte order) so the order matches `MemoryGateway`.
    pub fn select_students_with_courses(&self) -> QueryBuf {
        const MAIN_ALIAS: &str = "main";
        let mut q = QueryBuf::new();
        let main_cols = ["id", "name", "cohort", "status", "date_joined", "last_login"]
            .iter()
            .map(|c| format!("{}.{}", MAIN_ALIAS, quoted(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let courses = format!(
            "(SELECT COALESCE(json_agg(json_build_object('course', json_build_object('id', c.{id}, 'name', c.{name}, 'code', c.{code})) ORDER BY c.{name} COLLATE \"C\", c.{id}), '[]'::json) \
             FROM {links} sc JOIN {courses} c ON c.{id} = sc.{course_id} WHERE sc.{student_id} = {main}.{id})",
            id = quoted("id"),
            name = quoted("name"),
            code = quoted("code"),
            course_id = quoted("course_id"),
            student_id = quoted("student_id"),
            links = self.student_courses,
            courses = self.courses,
            main = MAIN_ALIAS,
        );
        q.sql = format!(
            "SELECT {}, {} AS {} FROM {} {} ORDER BY {main}.{} COLLATE \"C\" ASC, {main}.{} ASC",
            main_cols,
            courses,
            quoted("courses"),
            self.students,
            MAIN_ALIAS,
            quoted("name"),
            quoted("id"),
            main = MAIN_ALIAS,
        );
        q
    }

    pub fn select_courses(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        q.sql = format!(
            "SELECT {}, {}, {} FROM {} ORDER BY {} COLLATE \"C\" ASC, {} ASC",
            quoted("id"),
            quoted("name"),
            quoted("code"),
            self.courses,
            quoted("name"),
            quoted("id")
        );
        q
    }

    /// INSERT of the scalar fields; id and date_joined come from column defaults.
    pub fn insert_student(&self, input: &NewStudent) -> QueryBuf {
        let mut q = QueryBuf::new();
        let name = q.push_param(input.name.as_str());
        let cohort = q.push_param(input.cohort.as_str());
        let status = q.push_param(input.status);
        q.sql = format!(
            "INSERT INTO {} ({}, {}, {}) VALUES (${}, ${}, ${}) RETURNING {}",
            self.students,
            quoted("name"),
            quoted("cohort"),
            quoted("status"),
            name,
            cohort,
            status,
            quoted("id")
        );
        q
    }

    /// One multi-row INSERT for all association rows. Returns None for an empty id list.
    pub fn insert_student_courses(&self, student_id: StudentId, course_ids: &[String]) -> Option<QueryBuf> {
        if course_ids.is_empty() {
            return None;
        }
        let mut q = QueryBuf::new();
        let sid = q.push_param(student_id);
        let rows: Vec<String> = course_ids
            .iter()
            .map(|cid| {
                let n = q.push_param(cid.as_str());
                format!("(${}, ${})", sid, n)
            })
            .collect();
        q.sql = format!(
            "INSERT INTO {} ({}, {}) VALUES {}",
            self.student_courses,
            quoted("student_id"),
            quoted("course_id"),
            rows.join(", ")
        );
        Some(q)
    }

    /// UPDATE by id: SET only the scalar fields present in the patch. Returns None when none are.
    pub fn update_student(&self, id: StudentId, patch: &StudentPatch) -> Option<QueryBuf> {
        let mut q = QueryBuf::new();
        let mut sets = Vec::new();
        if let Some(name) = &patch.name {
            let n = q.push_param(name.as_str());
            sets.push(format!("{} = ${}", quoted("name"), n));
        }
        if let Some(cohort) = &patch.cohort {
            let n = q.push_param(cohort.as_str());
            sets.push(format!("{} = ${}", quoted("cohort"), n));
        }
        if let Some(status) = patch.status {
            let n = q.push_param(status);
            sets.push(format!("{} = ${}", quoted("status"), n));
        }
        if sets.is_empty() {
            return None;
        }
        let id_param = q.push_param(id);
        q.sql = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            self.students,
            sets.join(", "),
            quoted("id"),
            id_param,
            quoted("id")
        );
        Some(q)
    }

    pub fn delete_student_courses(&self, id: StudentId) -> QueryBuf {
        let mut q = QueryBuf::new();
        let n = q.push_param(id);
        q.sql = format!(
            "DELETE FROM {} WHERE {} = ${}",
            self.student_courses,
            quoted("student_id"),
            n
        );
        q
    }

    /// DELETE by id. Association rows are removed by ON DELETE CASCADE.
    pub fn delete_student(&self, id: StudentId) -> QueryBuf {
        let mut q = QueryBuf::new();
        let n = q.push_param(id);
        q.sql = format!(
            "DELETE FROM {} WHERE {} = ${} RETURNING {}",
            self.students,
            quoted("id"),
            n,
            quoted("id")
        );
        q
    }
}
