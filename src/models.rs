pub mod app_settings;
pub mod catalog;
pub mod chat;
pub mod offers;
pub mod transactions;
pub mod users;
