pub mod names;
pub mod planner;

pub use names::snake;
pub use planner::{NamingStyle, SUBJECT_KEY_NAME, plan_headers};
