pub mod courses;
pub mod recents;
pub mod reference;
pub mod reviews;
pub mod users;
