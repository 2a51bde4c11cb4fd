//! Service and repository tests against PostgreSQL
//!
//! Every test gets its own database with the migrations applied.
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;

use agri_inventory_server::{
    config::AppConfig,
    error::AppError,
    models::{
        enums::{EquipmentStatus, Role},
        equipment::{CreateEquipment, EquipmentQuery},
        maintenance::CreateMaintenanceLog,
        user::{CreateUser, UserClaims},
    },
    repository::Repository,
    schemas::find_schema,
    services::Services,
};

fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: Default::default(),
        auth: Default::default(),
        logging: Default::default(),
        access: Default::default(),
        import: Default::default(),
        seed: Default::default(),
    }
}

/// Seeded services plus a session for the bootstrap admin
async fn seeded(pool: PgPool) -> (Services, UserClaims) {
    let config = test_config();
    let services = Services::new(Repository::new(pool), &config);
    services.seed.run(&config.seed).await.expect("Seeding failed");

    let (_, admin) = services
        .users
        .authenticate(&config.seed.admin_email, &config.seed.admin_password)
        .await
        .expect("Admin login failed");
    (services, UserClaims::for_user(&admin, 1))
}

fn equipment(value: Value) -> CreateEquipment {
    serde_json::from_value(value).expect("Invalid equipment payload")
}

fn tractor(department_id: &str) -> CreateEquipment {
    equipment(json!({
        "name": "Tractor X",
        "type": "Machinery",
        "status": "AVAILABLE",
        "purchaseDate": "2023-01-15",
        "departmentId": department_id
    }))
}

#[sqlx::test]
#[ignore] // needs DATABASE_URL
async fn test_seed_is_idempotent(pool: PgPool) {
    let (services, admin) = seeded(pool).await;
    assert_eq!(admin.role, Role::Admin);

    let config = test_config();
    services.seed.run(&config.seed).await.unwrap();

    let departments = services.departments.list().await.unwrap();
    assert!(departments.iter().any(|d| d.department.id == "agronomy"));
    let (users, total) = services.users.search_users(&Default::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(users[0].role, Role::Admin);
}

#[sqlx::test]
#[ignore]
async fn test_created_equipment_is_listed_with_department_name(pool: PgPool) {
    let (services, admin) = seeded(pool).await;

    let created = services.equipment.create(&admin, tractor("agronomy")).await.unwrap();
    assert_eq!(created.department_name.as_deref(), Some("Department of Agronomy"));

    let query = EquipmentQuery {
        department_id: Some("agronomy".to_string()),
        ..Default::default()
    };
    let (items, total) = services.equipment.list(&admin, &query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, created.id);
    assert_eq!(items[0].department_name.as_deref(), Some("Department of Agronomy"));
}

#[sqlx::test]
#[ignore]
async fn test_department_in_use_cannot_be_deleted(pool: PgPool) {
    let (services, admin) = seeded(pool).await;
    let created = services.equipment.create(&admin, tractor("agronomy")).await.unwrap();

    let result = services.departments.delete("agronomy").await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(services.departments.get_by_id("agronomy").await.is_ok());

    services.equipment.delete(&admin, created.id).await.unwrap();
    services.departments.delete("agronomy").await.unwrap();
    assert!(matches!(
        services.departments.get_by_id("agronomy").await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test]
#[ignore]
async fn test_department_with_users_cannot_be_deleted(pool: PgPool) {
    let (services, _) = seeded(pool).await;
    services
        .users
        .create_user(CreateUser {
            email: "head.cri@uaf.edu.pk".to_string(),
            password: "department-head".to_string(),
            name: "CRI Head".to_string(),
            role: Role::DeptHead,
            department_id: Some("cri".to_string()),
            designation: None,
            phone: None,
            image: None,
        })
        .await
        .unwrap();

    let result = services.departments.delete("cri").await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test]
#[ignore]
async fn test_dept_head_cannot_delete_other_department_record(pool: PgPool) {
    let (services, admin) = seeded(pool).await;
    let schema = find_schema("rari-assets").unwrap();
    let payload = json!({ "assetName": "Cotton gin", "category": "Machinery" });
    let record = services
        .records
        .create(&admin, schema, payload.as_object().unwrap())
        .await
        .unwrap();
    assert_eq!(record.department_id, "rari");

    let mut head = admin.clone();
    head.role = Role::DeptHead;
    head.department_id = Some("cri".to_string());

    let result = services.records.delete(&head, schema, record.id).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));
    assert!(services.records.get_by_id(&admin, schema, record.id).await.is_ok());
}

#[sqlx::test]
#[ignore]
async fn test_csv_import_persists_only_valid_rows(pool: PgPool) {
    let (services, admin) = seeded(pool).await;
    let csv = "\
Equipment Name,Category,Condition,Date of Purchase
Seed Drill,Machinery,active,2022-03-01
,Machinery,active,2022-03-01
Soil Auger,Tools,lost,2021-01-01
Thresher,Machinery,broken,15/06/2019
";

    let report = services
        .import
        .import_equipment(&admin, "agronomy", csv.as_bytes())
        .await
        .unwrap();
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.created, 2);
    assert_eq!(report.invalid_rows, 2);
    assert_eq!(report.valid_rows + report.invalid_rows, report.total_rows);

    let query = EquipmentQuery {
        department_id: Some("agronomy".to_string()),
        ..Default::default()
    };
    let (items, total) = services.equipment.list(&admin, &query).await.unwrap();
    assert_eq!(total, 2);
    let thresher = items.iter().find(|e| e.name == "Thresher").unwrap();
    assert_eq!(thresher.status, EquipmentStatus::NeedsRepair);
}

#[sqlx::test]
#[ignore]
async fn test_stats_and_maintenance_totals(pool: PgPool) {
    let (services, admin) = seeded(pool).await;

    let mut ids = Vec::new();
    for (name, status, department) in [
        ("Tractor", "AVAILABLE", "agronomy"),
        ("Sprayer", "NEEDS_REPAIR", "agronomy"),
        ("Microscope", "IN_USE", "entomology"),
    ] {
        let created = services
            .equipment
            .create(
                &admin,
                equipment(json!({
                    "name": name,
                    "type": "Machinery",
                    "status": status,
                    "departmentId": department
                })),
            )
            .await
            .unwrap();
        ids.push(created.id);
    }

    for (equipment_id, cost) in [(ids[0], "1500.25"), (ids[0], "99.75"), (ids[2], "10.00")] {
        let log: CreateMaintenanceLog = serde_json::from_value(json!({
            "date": "2024-01-10",
            "cost": cost,
            "description": "Service"
        }))
        .unwrap();
        services.maintenance.create(&admin, equipment_id, log).await.unwrap();
    }

    let per_equipment = services.maintenance.list_for_equipment(&admin, ids[0]).await.unwrap();
    assert_eq!(per_equipment.logs.len(), 2);
    assert_eq!(per_equipment.total_cost, Decimal::from_str("1600.00").unwrap());

    let all = services.maintenance.list(&admin, None).await.unwrap();
    assert_eq!(all.total_cost, Decimal::from_str("1610.00").unwrap());

    let overview = services.stats.overview().await.unwrap();
    assert_eq!(overview.total_equipment, 3);
    assert_eq!(overview.by_status.total(), overview.total_equipment);
    assert_eq!(overview.by_status.get(EquipmentStatus::Discarded), 0);
    assert_eq!(overview.total_maintenance_cost, all.total_cost);

    let agronomy = services.stats.scoped(&admin, Some("agronomy")).await.unwrap();
    assert_eq!(agronomy.total_equipment, 2);
    assert_eq!(agronomy.by_status.get(EquipmentStatus::NeedsRepair), 1);
    assert_eq!(agronomy.total_maintenance_cost, per_equipment.total_cost);
}
