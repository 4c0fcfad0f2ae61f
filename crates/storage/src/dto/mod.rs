pub mod common;
pub mod course;
pub mod review;
