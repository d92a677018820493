use anyhow::{Context, Result};
use clinicdir_core::{Department, DoctorRecord, Hospital};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::auth::StoredSession;
use crate::cli::Collection;

/// `GET /api/{entity}` body.
#[derive(Debug, Deserialize)]
pub struct CollectionEnvelope<T> {
    pub data: Vec<T>,
    pub cached: bool,
}

/// `POST /api/{entity}` body.
#[derive(Debug, Deserialize)]
pub struct RefreshEnvelope {
    pub data: Vec<Value>,
    pub refreshed: bool,
    pub timestamp: i64,
}

pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DirectoryClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let req = self.http.request(method, url);
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        req.header("Accept", "application/json")
    }

    async fn collection<T: DeserializeOwned>(&self, collection: Collection) -> Result<CollectionEnvelope<T>> {
        let url = self.api_url(collection.path());
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .context("Failed to connect to server")?;
        parse(resp).await
    }

    pub async fn doctors(&self) -> Result<CollectionEnvelope<DoctorRecord>> {
        self.collection(Collection::Doctors).await
    }

    pub async fn hospitals(&self) -> Result<CollectionEnvelope<Hospital>> {
        self.collection(Collection::Hospitals).await
    }

    pub async fn departments(&self) -> Result<CollectionEnvelope<Department>> {
        self.collection(Collection::Departments).await
    }

    pub async fn refresh(&self, collection: Collection) -> Result<RefreshEnvelope> {
        let url = self.api_url(collection.path());
        let resp = self
            .request(reqwest::Method::POST, &url)
            .send()
            .await
            .context("Failed to connect to server")?;
        parse(resp).await
    }

    /// Logs in and returns the session to store for this server.
    pub async fn login(&self, name: &str, password: &str) -> Result<StoredSession> {
        #[derive(Deserialize)]
        struct Issued {
            token: String,
            name: String,
            #[serde(with = "time::serde::rfc3339")]
            expires_at: time::OffsetDateTime,
        }

        let url = self.api_url("admin/login");
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(&json!({ "name": name, "password": password }))
            .send()
            .await
            .context("Failed to connect to server")?;
        let issued: Issued = parse(resp).await?;
        Ok(StoredSession {
            server: self.base_url.clone(),
            name: issued.name,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    pub async fn logout(&self) -> Result<()> {
        let url = self.api_url("admin/logout");
        let resp = self
            .request(reqwest::Method::POST, &url)
            .send()
            .await
            .context("Failed to connect to server")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {status}: {}", error_message(&body));
        }
        Ok(())
    }

    /// Probes `/healthz` and `/readyz`.
    pub async fn health(&self) -> Result<Vec<(&'static str, u16, String)>> {
        let mut results = Vec::with_capacity(2);
        for probe in ["healthz", "readyz"] {
            let url = format!("{}/{probe}", self.base_url);
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .context("Failed to connect to server")?;
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            results.push((probe, status, body));
        }
        Ok(results)
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        anyhow::bail!("HTTP {status}: {}", error_message(&body));
    }

    serde_json::from_str(&body).context("Failed to parse response JSON")
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    let Some(error) = json.get("error").and_then(|v| v.as_str()) else {
        return body.to_string();
    };
    match json.get("blocked_by") {
        Some(blocked) => format!(
            "{error} (blocked by {} {})",
            blocked.get("kind").and_then(|v| v.as_str()).unwrap_or("entity"),
            blocked.get("id").and_then(|v| v.as_str()).unwrap_or("-"),
        ),
        None => error.to_string(),
    }
}
