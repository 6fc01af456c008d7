pub mod balance;
pub mod chat;
pub mod conversations;
pub mod models;
pub mod session;
