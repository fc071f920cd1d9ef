use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    Username,
    Email,
    PasswordHash,
    Phone,
    Gender,
    DateOfBirth,
    MembershipId,
    MembershipStatus,
    DateOfRegistration,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Phone,
    Role,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    AdminId,
    GenreId,
    Title,
    Author,
    Isbn,
    Language,
    Format,
    Price,
    Stock,
    PublicationDate,
    IsPhysicalAccess,
    IsOnSale,
    DiscountPercentage,
    DiscountStart,
    DiscountEnd,
    Description,
    Publisher,
    BookType,
    IsExclusiveEdition,
    AverageRating,
    TotalSold,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BookImages {
    Table,
    Id,
    BookId,
    Url,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("admin_role"))
                    .values(vec![Alias::new("admin"), Alias::new("superadmin")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Members::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Members::Email).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Members::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Members::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Members::Gender).string_len(32).not_null())
                    .col(ColumnDef::new(Members::DateOfBirth).date().null())
                    .col(
                        ColumnDef::new(Members::MembershipId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::MembershipStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::DateOfRegistration)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-members-email")
                    .table(Members::Table)
                    .col(Members::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq-members-username")
                    .table(Members::Table)
                    .col(Members::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Admins::Email).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Admins::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Admins::Phone).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Admins::Role)
                            .custom(Alias::new("admin_role"))
                            .not_null()
                            .default(Expr::cust("'admin'::admin_role")),
                    )
                    .col(
                        ColumnDef::new(Admins::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Admins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Admins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-admins-email")
                    .table(Admins::Table)
                    .col(Admins::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genres::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Genres::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-genres-name")
                    .table(Genres::Table)
                    .col(Genres::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::AdminId).big_integer().not_null())
                    .col(ColumnDef::new(Books::GenreId).big_integer().not_null())
                    .col(ColumnDef::new(Books::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Books::Author).string_len(255).not_null())
                    .col(ColumnDef::new(Books::Isbn).string_len(32).not_null())
                    .col(ColumnDef::new(Books::Language).string_len(64).not_null())
                    .col(ColumnDef::new(Books::Format).string_len(64).not_null())
                    .col(ColumnDef::new(Books::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Books::Stock).integer().not_null().default(0))
                    .col(ColumnDef::new(Books::PublicationDate).date().not_null())
                    .col(
                        ColumnDef::new(Books::IsPhysicalAccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Books::IsOnSale)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Books::DiscountPercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::DiscountStart)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Books::DiscountEnd)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Books::Description).text().not_null())
                    .col(ColumnDef::new(Books::Publisher).string_len(255).not_null())
                    .col(ColumnDef::new(Books::BookType).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Books::IsExclusiveEdition)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Books::AverageRating)
                            .decimal_len(3, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::TotalSold)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Books::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-books-admin_id")
                            .from(Books::Table, Books::AdminId)
                            .to(Admins::Table, Admins::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-books-genre_id")
                            .from(Books::Table, Books::GenreId)
                            .to(Genres::Table, Genres::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookImages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookImages::BookId).big_integer().not_null())
                    .col(ColumnDef::new(BookImages::Url).string_len(512).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-book_images-book_id")
                            .from(BookImages::Table, BookImages::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("admin_role")).to_owned())
            .await?;
        Ok(())
    }
}
