//! HTTP inbound adapter exposing the `/api` resource and health probes.

pub mod api;
pub mod dto;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod upload_form;

pub use error::ApiResult;
