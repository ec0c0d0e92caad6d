//! HTTP route handlers

pub mod contact;
pub mod health;
pub mod predict;
pub mod sms;
