//! Roster SDK: student roster state container over a remote relational store.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Backend, RosterConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use gateway::{MemoryGateway, PgGateway, StudentGateway};
pub use model::{Course, CourseId, Filters, FiltersPatch, NewStudent, Student, StudentId, StudentPatch};
pub use routes::{app_router, common_routes, roster_routes};
pub use state::{RosterSnapshot, RosterState, SharedState};
pub use store::{ensure_database_exists, ensure_roster_tables, seed_courses};
