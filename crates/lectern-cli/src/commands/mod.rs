pub mod auth;
pub mod dispatch;
pub mod schema;
pub mod session;
pub mod shared;
pub mod training;
pub mod user;
