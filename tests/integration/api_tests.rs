//! API integration tests
//!
//! These run against a live server seeded with the default configuration.

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ADMIN_EMAIL: &str = "admin@uaf.edu.pk";
const ADMIN_PASSWORD: &str = "change-me-now";

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Create a department head for `department_id` and return their token
async fn dept_head_token(client: &Client, admin: &str, department_id: &str) -> String {
    let email = format!("head-{}@uaf.edu.pk", Uuid::new_v4().simple());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "email": email,
            "password": "department-head",
            "name": "Department Head",
            "role": "DEPT_HEAD",
            "departmentId": department_id
        }))
        .send()
        .await
        .expect("Failed to create department head");
    assert_eq!(response.status(), StatusCode::CREATED);

    login(client, &email, "department-head").await
}

async fn create_tractor(client: &Client, token: &str, department_id: &str) -> Value {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "Tractor X",
            "type": "Machinery",
            "status": "AVAILABLE",
            "purchaseDate": "2023-01-15",
            "departmentId": department_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_and_me() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "ADMIN");
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
#[ignore]
async fn test_missing_token_is_unauthorized() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_create_equipment_joins_department_name() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let created = create_tractor(&client, &token, "agronomy").await;
    assert_eq!(created["name"], "Tractor X");
    assert_eq!(created["purchaseDate"], "2023-01-15");

    let response = client
        .get(format!("{}/equipment?department_id=agronomy&search=tractor%20x", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");

    let items = body["data"]["items"].as_array().expect("items array");
    let row = items
        .iter()
        .find(|row| row["id"] == created["id"])
        .expect("created equipment is listed");
    assert_eq!(row["departmentName"], "Department of Agronomy");
}

#[tokio::test]
#[ignore]
async fn test_equipment_validation_errors_are_per_field() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "", "departmentId": "agronomy", "purchaseDate": "2999-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["type"].is_array());
    assert!(body["errors"]["purchaseDate"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_dept_head_cannot_touch_other_department() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let head = dept_head_token(&client, &admin, "cri").await;

    // an asset owned by RARI
    let response = client
        .post(format!("{}/records/rari-assets", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "assetName": "Cotton gin", "category": "Machinery" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let asset_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .delete(format!("{}/records/rari-assets/{}", BASE_URL, asset_id))
        .bearer_auth(&head)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .get(format!("{}/records/rari-assets/{}", BASE_URL, asset_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&head)
        .json(&json!({ "name": "Sprayer", "type": "Machinery", "departmentId": "rari" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .get(format!("{}/records/rari-assets", BASE_URL))
        .bearer_auth(&head)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_blank_required_field_on_update_fails() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/records/cri-positions", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "designation": "Senior Scientist",
            "bpsScale": "18",
            "sanctionedPosts": "3",
            "displayOrder": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["attributes"]["sanctionedPosts"], 3);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .put(format!("{}/records/cri-positions/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "bpsScale": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["bpsScale"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_department_with_equipment_cannot_be_deleted() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let department_id = format!("test-{}", &Uuid::new_v4().simple().to_string()[..8]);

    let response = client
        .post(format!("{}/departments", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "id": department_id, "name": format!("Test Lab {}", department_id) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let tractor = create_tractor(&client, &token, &department_id).await;

    let response = client
        .delete(format!("{}/departments/{}", BASE_URL, department_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .get(format!("{}/departments/{}", BASE_URL, department_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    // once empty it can go
    client
        .delete(format!("{}/equipment/{}", BASE_URL, tractor["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let response = client
        .delete(format!("{}/departments/{}", BASE_URL, department_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_csv_import_reports_failed_rows() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let csv = "\
Equipment Name,Category,Condition,Date of Purchase
Seed Drill,Machinery,active,2022-03-01
,Machinery,active,2022-03-01
Soil Auger,Tools,lost,2021-01-01
Thresher,Machinery,broken,15/06/2019
";
    let file = multipart::Part::bytes(csv.as_bytes().to_vec())
        .file_name("equipment.csv")
        .mime_str("text/csv")
        .unwrap();
    let form = multipart::Form::new()
        .text("department_id", "agronomy")
        .part("file", file);

    let response = client
        .post(format!("{}/equipment/import", BASE_URL))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let report = &body["data"];
    assert_eq!(report["totalRows"], 4);
    assert_eq!(report["created"], 2);
    assert_eq!(report["invalidRows"], 2);
    let rows: Vec<u64> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["row"].as_u64().unwrap())
        .collect();
    assert_eq!(rows, vec![3, 4]);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_total_cost() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let tractor = create_tractor(&client, &token, "agronomy").await;
    let id = tractor["id"].as_str().unwrap();

    for (date, cost) in [("2024-01-10", "1500.25"), ("2024-02-10", "99.75")] {
        let response = client
            .post(format!("{}/equipment/{}/maintenance", BASE_URL, id))
            .bearer_auth(&token)
            .json(&json!({ "date": date, "cost": cost, "description": "Service" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = client
        .get(format!("{}/equipment/{}/maintenance", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["totalCost"], "1600.00");
    assert_eq!(body["data"]["logs"][0]["date"], "2024-02-10");
}

#[tokio::test]
#[ignore]
async fn test_stats_buckets_sum_to_total() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/stats/overview", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let stats = &body["data"];
    let buckets = stats["byStatus"].as_object().unwrap();
    assert_eq!(buckets.len(), 4);
    let sum: i64 = buckets.values().map(|v| v.as_i64().unwrap()).sum();
    assert_eq!(sum, stats["totalEquipment"].as_i64().unwrap());
    assert!(stats["recentEquipment"].as_array().unwrap().len() <= 10);
}
