use clinicdir_server::{AppConfig, AppState, CacheBackend, build_router};
use clinicdir_storage::DynStorage;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let storage: DynStorage = clinicdir_db_memory::create_storage(true);
    let state = AppState::new(AppConfig::in_memory(true), storage, CacheBackend::new_local());
    let app = build_router(state);

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn stop(shutdown_tx: tokio::sync::oneshot::Sender<()>, handle: JoinHandle<()>) {
    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

/// Registers an admin and returns a bearer token.
async fn login(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api/admin/register"))
        .json(&json!({
            "name": "frontdesk",
            "password": "correct-horse",
            "confirm_password": "correct-horse",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("password_hash").is_none());

    let resp = client
        .post(format!("{base}/api/admin/login"))
        .json(&json!({"name": "frontdesk", "password": "correct-horse"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoints_work() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "clinicdir");
    assert_eq!(body["status"], "ok");

    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["cache"], "local");

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn collections_are_cached_after_first_read() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let first: Value = client
        .get(format!("{base}/api/hospitals"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["cached"], false);
    assert_eq!(first["data"].as_array().unwrap().len(), 3);
    assert!(first["timestamp"].as_i64().unwrap() > 0);

    let second: Value = client
        .get(format!("{base}/api/hospitals"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["cached"], true);
    assert_eq!(second["data"], first["data"]);

    // Doctors come back newest first with their hospital attached.
    let doctors: Value = client
        .get(format!("{base}/api/doctors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doctors = doctors["data"].as_array().unwrap();
    assert_eq!(doctors.len(), 6);
    assert_eq!(doctors[0]["id"], "doc-6");
    assert_eq!(doctors[0]["hospital"]["id"], "h-haeundae");

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn refresh_endpoint_returns_fresh_snapshot() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/departments"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["refreshed"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // The refreshed snapshot is what the next read serves.
    let after: Value = client
        .get(format!("{base}/api/departments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["cached"], true);
    assert_eq!(after["data"], body["data"]);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn unknown_collection_is_not_found() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    for path in ["/api/admins", "/api/doctor"] {
        let resp = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("Unknown collection"));
    }

    let resp = client
        .post(format!("{base}/api/admins"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn search_filters_sorts_and_pages() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{base}/api/search"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 6);
    let ratings: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["rating"].as_str().unwrap())
        .collect();
    let mut sorted = ratings.clone();
    sorted.sort();
    assert_eq!(ratings, sorted);

    let body: Value = client
        .get(format!("{base}/api/search?rating=A&hospital=h-suwon"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], "doc-4");

    let body: Value = client
        .get(format!("{base}/api/search?q=REHAB&department=all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 0);

    let body: Value = client
        .get(format!("{base}/api/search?q=stroke"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], "Kang Eunji");

    let body: Value = client
        .get(format!("{base}/api/search?page=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let resp = client
        .get(format!("{base}/api/search?rating=Z"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = client
        .get(format!("{base}/api/search?page=9"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 6);
    assert!(body["data"].as_array().unwrap().is_empty());

    let resp = client
        .get(format!("{base}/api/search?page=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/admin/doctors"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .delete(format!("{base}/api/admin/doctors/doc-1"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = login(&client, &base).await;
    let session: Value = client
        .get(format!("{base}/api/admin/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["name"], "frontdesk");

    let resp = client
        .post(format!("{base}/api/admin/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base}/api/admin/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn mutations_are_visible_to_the_next_read() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    // Warm the cache first so a stale snapshot would be noticed.
    let warm: Value = client
        .get(format!("{base}/api/doctors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(warm["data"].as_array().unwrap().len(), 6);

    let resp = client
        .post(format!("{base}/api/admin/doctors"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Yoon Seojun",
            "rating": "b",
            "specialty": "Shoulder arthroscopy",
            "hospital_id": "h-gangnam",
            "department_id": "d-ortho",
            "email": "seojun.yoon@example.org",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["rating"], "B");
    let id = created["id"].as_str().unwrap().to_string();

    let doctors: Value = client
        .get(format!("{base}/api/doctors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doctors = doctors["data"].as_array().unwrap();
    assert_eq!(doctors.len(), 7);
    assert_eq!(doctors[0]["id"], id.as_str());

    let resp = client
        .put(format!("{base}/api/admin/hospitals/h-gangnam"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Gangnam Spine & Joint",
            "address": "12 Teheran-ro, Seoul",
            "phone": "02-555-0101",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let doctors: Value = client
        .get(format!("{base}/api/doctors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doctors["data"][0]["hospital"]["name"], "Gangnam Spine & Joint");

    let resp = client
        .delete(format!("{base}/api/admin/doctors/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let page: Value = client
        .get(format!("{base}/api/admin/doctors?page=1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 6);
    assert_eq!(page["total_pages"], 1);

    let resp = client
        .post(format!("{base}/api/admin/doctors"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Nobody",
            "rating": "A",
            "hospital_id": "h-missing",
            "email": "nobody@example.org",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn referenced_hospital_cannot_be_deleted() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    let resp = client
        .delete(format!("{base}/api/admin/hospitals/h-gangnam"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["blocked_by"]["kind"], "hospital");
    assert_eq!(body["blocked_by"]["name"], "Gangnam Spine Clinic");
    assert_eq!(body["blocked_by"]["count"], 2);

    let hospitals: Value = client
        .get(format!("{base}/api/hospitals"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hospitals["data"].as_array().unwrap().len(), 3);

    // An unreferenced hospital goes away and drops out of the collection.
    let created: Value = client
        .post(format!("{base}/api/admin/hospitals"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Incheon Annex",
            "address": "5 Harbor-ro, Incheon",
            "phone": "032-000-0000",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{base}/api/admin/hospitals/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base}/api/admin/hospitals/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    stop(shutdown_tx, handle).await;
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/healthz"))
        .header("x-request-id", "trace-abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap(),
        "trace-abc-123"
    );

    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.headers().get("x-request-id").is_some());

    stop(shutdown_tx, handle).await;
}
