//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! This crate holds the entities and the rules deciding who may see and change
//! them, with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod visibility;

pub use error::DomainError;
