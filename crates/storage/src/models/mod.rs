pub mod course;
pub mod review;
pub mod semester;
pub mod user;

pub use course::Course;
pub use review::Review;
pub use semester::Semester;
pub use user::{User, is_gt_email};
