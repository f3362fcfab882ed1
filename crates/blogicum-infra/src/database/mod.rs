//! Persistence adapters: SeaORM/PostgreSQL and an in-memory store.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryDatabase,
    InMemoryLocationRepository, InMemoryPostRepository, InMemoryRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use connections::DatabaseConnection;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
