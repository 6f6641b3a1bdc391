//! content-service: sources plain text for the level checker.
//!
//! Two routes feed the evaluation flow: fetching a web page and reducing
//! it to text, and accepting an uploaded PDF, archiving it, and extracting
//! its text.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
