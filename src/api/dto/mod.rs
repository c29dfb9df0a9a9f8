//! Data Transfer Objects for the plain HTTP endpoints.

pub mod health;
