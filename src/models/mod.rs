//! Request and Response models for the cache admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_user_id, ClearQuery};
pub use responses::{
    ClearResponse, DeleteResponse, HealthResponse, InvalidateResponse, StatsResponse,
    SweepResponse,
};
