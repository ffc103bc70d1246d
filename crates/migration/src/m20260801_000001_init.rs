//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication and the active flag
//! - `profiles`: role plus registration details, one per user
//! - `categories`: registry of donated-goods categories
//! - `delivery_locations`: registry of drop-off points
//! - `recipients`: registry of people/organizations receiving goods
//! - `donations`: the stock ledger rows (remaining quantity + status)
//! - `distributions`: append-only ledger of handed-out quantities

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Active,
}

#[derive(Iden)]
enum Profiles {
    Table,
    UserId,
    Role,
    TaxId,
    BirthDate,
    Address,
    Phone,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum DeliveryLocations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Recipients {
    Table,
    Id,
    Name,
    TaxId,
    Address,
    Phone,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    CategoryId,
    Description,
    Quantity,
    InitialQuantity,
    LocationId,
    DonorId,
    CreatedAt,
    Status,
}

#[derive(Iden)]
enum Distributions {
    Table,
    Id,
    DonationId,
    RecipientId,
    Quantity,
    DistributedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Profiles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Role).string().not_null())
                    .col(ColumnDef::new(Profiles::TaxId).string())
                    .col(ColumnDef::new(Profiles::BirthDate).date())
                    .col(ColumnDef::new(Profiles::Address).string())
                    .col(ColumnDef::new(Profiles::Phone).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profiles-user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name_norm-unique")
                    .table(Categories::Table)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Delivery locations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DeliveryLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryLocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeliveryLocations::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Recipients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Recipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipients::Name).string().not_null())
                    .col(ColumnDef::new(Recipients::TaxId).string().not_null())
                    .col(ColumnDef::new(Recipients::Address).string().not_null())
                    .col(ColumnDef::new(Recipients::Phone).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Donations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Donations::Description).string().not_null())
                    .col(
                        ColumnDef::new(Donations::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::InitialQuantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::LocationId).uuid().not_null())
                    .col(ColumnDef::new(Donations::DonorId).string().not_null())
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-category_id")
                            .from(Donations::Table, Donations::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-location_id")
                            .from(Donations::Table, Donations::LocationId)
                            .to(DeliveryLocations::Table, DeliveryLocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-donor_id")
                            .from(Donations::Table, Donations::DonorId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The FIFO scan: open donations of a category, oldest first.
        manager
            .create_index(
                Index::create()
                    .name("idx-donations-category_id-status-created_at")
                    .table(Donations::Table)
                    .col(Donations::CategoryId)
                    .col(Donations::Status)
                    .col(Donations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-donor_id")
                    .table(Donations::Table)
                    .col(Donations::DonorId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Distributions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Distributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Distributions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Distributions::DonationId).uuid().not_null())
                    .col(
                        ColumnDef::new(Distributions::RecipientId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Distributions::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Distributions::DistributedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-distributions-donation_id")
                            .from(Distributions::Table, Distributions::DonationId)
                            .to(Donations::Table, Donations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-distributions-recipient_id")
                            .from(Distributions::Table, Distributions::RecipientId)
                            .to(Recipients::Table, Recipients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-distributions-donation_id")
                    .table(Distributions::Table)
                    .col(Distributions::DonationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-distributions-recipient_id")
                    .table(Distributions::Table)
                    .col(Distributions::RecipientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Distributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeliveryLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
