pub mod announcement;
pub mod object_id;
pub mod quiz;
pub mod user;

pub use announcement::*;
pub use quiz::*;
pub use user::*;
