mod common;
mod roster;

pub use common::common_routes;
pub use roster::{app_router, roster_routes};
