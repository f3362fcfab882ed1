pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_accounts_and_taxonomy;
mod m20240101_000002_create_posts_and_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_accounts_and_taxonomy::Migration),
            Box::new(m20240101_000002_create_posts_and_comments::Migration),
        ]
    }
}
