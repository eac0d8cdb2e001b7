use crate::entities::chirps;
use crate::entities::prelude::Chirps;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

const AUTHOR_INDEX: &str = "idx_chirps_author_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Chirps)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Feed composition filters chirps by author set.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(AUTHOR_INDEX)
                    .table(Chirps)
                    .col(chirps::Column::AuthorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(AUTHOR_INDEX).table(Chirps).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Chirps).to_owned())
            .await
    }
}
