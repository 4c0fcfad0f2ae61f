pub mod handlers;
pub mod refresher;
pub mod routes;
