//! HTTP handlers for all web routes.

pub mod layout;
pub mod dashboard;
pub mod projects;
pub mod upload;
pub mod configure;
pub mod simulation;
pub mod analysis;
pub mod api;
pub mod system;
