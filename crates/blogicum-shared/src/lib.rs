//! # Blogicum Shared
//!
//! Wire types exchanged with clients: forms, response bodies and the
//! problem-details error document.

pub mod dto;
pub mod forms;
pub mod response;

pub use response::{ErrorResponse, PageResponse};
