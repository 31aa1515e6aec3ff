pub mod auth;
pub mod event;
pub mod image;
pub mod purchase;
pub mod review;
pub mod ticket;
pub mod user;
