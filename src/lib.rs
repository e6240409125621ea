//! Employee-roster administration: a REST API over users and employees,
//! plus the client-side session gate and roster view-model.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod employees;
pub mod error;
pub mod state;
pub mod users;
pub mod validation;
