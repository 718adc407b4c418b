pub mod courses;
pub mod filters;
pub mod students;
