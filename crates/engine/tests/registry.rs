use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Actor, AllocationPolicy, AllocationRequest, DonationItem, DonationStatus, Engine, EngineError,
    NewUser, RecipientInput, ReportFilter, Role,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().unwrap();
    (engine, db)
}

fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "password".to_string(),
        role,
        tax_id: None,
        birth_date: None,
        address: None,
        phone: None,
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn register_creates_user_and_profile_together() {
    let (engine, _db) = engine_with_db().await;

    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();

    let actor = engine.actor("alice").await.unwrap();
    assert_eq!(actor, Actor::Donor {
        username: "alice".to_string()
    });

    let authenticated = engine.authenticate("alice", "password").await.unwrap();
    assert_eq!(authenticated, actor);
}

#[tokio::test]
async fn volunteer_registration_starts_inactive() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register_user(new_user("vera", Role::Volunteer))
        .await
        .unwrap();

    let err = engine.authenticate("vera", "password").await.unwrap_err();
    assert_eq!(err, EngineError::InactiveUser("vera".to_string()));

    engine.set_user_active("vera", true).await.unwrap();

    let actor = engine.authenticate("vera", "password").await.unwrap();
    assert_eq!(actor, Actor::Volunteer {
        username: "vera".to_string()
    });
}

#[tokio::test]
async fn registration_cannot_create_administrators() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .register_user(new_user("root", Role::Administrator))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("registration cannot create administrators".to_string())
    );
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let err = engine
        .register_user(new_user("alice", Role::Donor))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
}

#[tokio::test]
async fn administrators_cannot_be_deactivated() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_user(new_user("root", Role::Administrator), true)
        .await
        .unwrap();

    let err = engine.set_user_active("root", false).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("cannot change the status of administrators".to_string())
    );
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();

    let err = engine.authenticate("alice", "nope").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn role_reassignment_changes_the_actor() {
    let (engine, _db) = engine_with_db().await;

    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    engine.set_user_role("alice", Role::Volunteer).await.unwrap();

    let actor = engine.actor("alice").await.unwrap();
    assert_eq!(actor, Actor::Volunteer {
        username: "alice".to_string()
    });
}

#[tokio::test]
async fn profile_updates_keep_other_fields() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register_user(NewUser {
            tax_id: Some("52998224725".to_string()),
            ..new_user("alice", Role::Donor)
        })
        .await
        .unwrap();

    engine
        .update_profile("alice", Some("New St 2"), None)
        .await
        .unwrap();

    let profile = engine.profile("alice").await.unwrap();
    assert_eq!(profile.address, Some("New St 2".to_string()));
    assert_eq!(profile.tax_id, Some("52998224725".to_string()));
    assert_eq!(profile.role, Role::Donor);
}

#[tokio::test]
async fn deleting_a_user_removes_its_profile() {
    let (engine, _db) = engine_with_db().await;

    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    engine.delete_user("alice").await.unwrap();

    let err = engine.authenticate("alice", "password").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
    assert_eq!(engine.list_users().await.unwrap(), vec![]);
}

#[tokio::test]
async fn category_names_are_unique_under_folding() {
    let (engine, _db) = engine_with_db().await;

    engine.create_category("Rice").await.unwrap();
    let err = engine.create_category("rice").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("rice".to_string()));

    let beans = engine.create_category("Beans").await.unwrap();
    let err = engine.rename_category(beans, "RICE").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("RICE".to_string()));

    // Renaming to a new name (or itself) is fine.
    engine.rename_category(beans, "Black Beans").await.unwrap();
    let listed = engine.list_categories().await.unwrap();
    assert!(listed.iter().any(|c| c.name == "Black Beans"));
}

#[tokio::test]
async fn unknown_registry_keys_are_not_found() {
    let (engine, _db) = engine_with_db().await;

    let id = Uuid::new_v4();
    assert!(matches!(
        engine.delete_category(id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.rename_location(id, "x").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.delete_recipient(id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn recipient_round_trip() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .create_recipient(RecipientInput {
            name: "Shelter".to_string(),
            tax_id: "12345678000195".to_string(),
            address: "Main St 1".to_string(),
            phone: Some("  ".to_string()),
        })
        .await
        .unwrap();

    // Blank phone is normalized away.
    let recipient = engine.recipient(id).await.unwrap();
    assert_eq!(recipient.phone, None);

    engine
        .update_recipient(
            id,
            RecipientInput {
                name: "Shelter North".to_string(),
                tax_id: "12345678000195".to_string(),
                address: "Main St 1".to_string(),
                phone: Some("11987654321".to_string()),
            },
        )
        .await
        .unwrap();

    let recipient = engine.recipient(id).await.unwrap();
    assert_eq!(recipient.name, "Shelter North");
    assert_eq!(recipient.phone, Some("11987654321".to_string()));

    engine.delete_recipient(id).await.unwrap();
    assert_eq!(engine.list_recipients().await.unwrap(), vec![]);
}

#[tokio::test]
async fn empty_recipient_fields_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_recipient(RecipientInput {
            name: " ".to_string(),
            tax_id: "12345678000195".to_string(),
            address: "Main St 1".to_string(),
            phone: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("recipient name must not be empty".to_string())
    );
}

#[tokio::test]
async fn donation_batch_skips_zero_lines_and_defaults_descriptions() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let rice = engine.create_category("Rice").await.unwrap();
    let beans = engine.create_category("Beans").await.unwrap();
    let location = engine.create_location("Warehouse").await.unwrap();

    let ids = engine
        .record_donations(
            "alice",
            location,
            None,
            &[
                DonationItem {
                    category_id: rice,
                    quantity: 10,
                    description: None,
                },
                DonationItem {
                    category_id: beans,
                    quantity: 0,
                    description: None,
                },
            ],
            at(1),
        )
        .await
        .unwrap();

    assert_eq!(ids.len(), 1);

    let donations = engine.donations_by_donor("alice").await.unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].description, "Donation of 10 rice");
    assert_eq!(donations[0].initial_quantity, 10);
}

#[tokio::test]
async fn negative_donation_quantity_fails_the_batch() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let rice = engine.create_category("Rice").await.unwrap();
    let location = engine.create_location("Warehouse").await.unwrap();

    let err = engine
        .record_donations(
            "alice",
            location,
            None,
            &[DonationItem {
                category_id: rice,
                quantity: -1,
                description: None,
            }],
            at(1),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidQuantity("quantity must not be negative".to_string())
    );

    assert_eq!(engine.donations_by_donor("alice").await.unwrap(), vec![]);
}

#[tokio::test]
async fn pending_stock_groups_by_category_and_location() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let rice = engine.create_category("Rice").await.unwrap();
    let beans = engine.create_category("Beans").await.unwrap();
    let north = engine.create_location("North").await.unwrap();
    let south = engine.create_location("South").await.unwrap();

    engine
        .record_donation("alice", rice, None, 4, north, at(1))
        .await
        .unwrap();
    engine
        .record_donation("alice", rice, None, 6, north, at(2))
        .await
        .unwrap();
    engine
        .record_donation("alice", rice, None, 2, south, at(3))
        .await
        .unwrap();
    engine
        .record_donation("alice", beans, None, 1, south, at(4))
        .await
        .unwrap();

    let rows = engine.pending_stock().await.unwrap();
    let summary: Vec<(String, String, i64)> = rows
        .into_iter()
        .map(|row| (row.category, row.location, row.total))
        .collect();
    assert_eq!(summary, vec![
        ("Beans".to_string(), "South".to_string(), 1),
        ("Rice".to_string(), "North".to_string(), 10),
        ("Rice".to_string(), "South".to_string(), 2),
    ]);
}

#[tokio::test]
async fn stock_levels_omit_empty_categories() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let rice = engine.create_category("Rice").await.unwrap();
    engine.create_category("Beans").await.unwrap();
    let location = engine.create_location("Warehouse").await.unwrap();

    engine
        .record_donation("alice", rice, None, 5, location, at(1))
        .await
        .unwrap();

    let levels = engine.stock_levels().await.unwrap();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].category, "Rice");
    assert_eq!(levels[0].available, 5);
}

#[tokio::test]
async fn report_splits_open_and_distributed_quantities() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    let rice = engine.create_category("Rice").await.unwrap();
    let location = engine.create_location("Warehouse").await.unwrap();
    let recipient = engine
        .create_recipient(RecipientInput {
            name: "Shelter".to_string(),
            tax_id: "12345678000195".to_string(),
            address: "Main St 1".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    engine
        .record_donation("alice", rice, None, 10, location, at(1))
        .await
        .unwrap();
    engine
        .allocate(
            recipient,
            &[AllocationRequest {
                category_id: rice,
                quantity: 4,
            }],
            AllocationPolicy::Strict,
            at(2),
        )
        .await
        .unwrap();

    let everything = engine.donation_report(&ReportFilter::default()).await.unwrap();
    assert_eq!(everything.total, 10);

    let open = engine
        .donation_report(&ReportFilter {
            status: Some(DonationStatus::Open),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(open.total, 6);
    assert!(open.rows.iter().all(|row| row.status == DonationStatus::Open));

    let distributed = engine
        .donation_report(&ReportFilter {
            status: Some(DonationStatus::Closed),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(distributed.total, 4);
    assert_eq!(distributed.rows.len(), 1);
    assert_eq!(distributed.rows[0].donor, "alice");

    let other_category = engine
        .donation_report(&ReportFilter {
            category_id: Some(Uuid::new_v4()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(other_category.total, 0);
    assert_eq!(other_category.rows.len(), 0);
}

#[tokio::test]
async fn dashboard_counts_cover_the_registries() {
    let (engine, _db) = engine_with_db().await;
    engine.register_user(new_user("alice", Role::Donor)).await.unwrap();
    engine.create_category("Rice").await.unwrap();
    engine.create_location("Warehouse").await.unwrap();

    let counts = engine.dashboard_counts().await.unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.categories, 1);
    assert_eq!(counts.locations, 1);
    assert_eq!(counts.recipients, 0);
}
