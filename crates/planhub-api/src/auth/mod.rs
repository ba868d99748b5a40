pub mod models;
pub mod password;
pub mod token;
