//! HTTP route handlers

pub mod health;
pub mod labels;
pub mod predict;
