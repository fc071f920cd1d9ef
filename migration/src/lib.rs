pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_accounts_and_catalog;
mod m20250608_000001_create_carts_and_orders;
mod m20250615_000001_create_reviews_bookmarks_announcements;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_accounts_and_catalog::Migration),
            Box::new(m20250608_000001_create_carts_and_orders::Migration),
            Box::new(m20250615_000001_create_reviews_bookmarks_announcements::Migration),
        ]
    }
}
