use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinicdir_api::{ApiError, HealthResponse, RefreshResponse};
use clinicdir_core::{EntityKind, Rating, epoch_millis, now_utc};
use clinicdir_search::{DoctorFilter, DoctorView, Facet, JoinPolicy, paginate, search};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::server::AppState;

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "clinicdir",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

/// Ready when the store answers. The cache is optional and only reported.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.storage.backend_name();
    let cache = state.directory.cache().backend();
    let cache_status = match cache.mode() {
        "redis" if !cache.is_redis_available().await => "redis (unreachable)".to_string(),
        mode => mode.to_string(),
    };

    match state.storage.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready".into(),
                storage: Some(backend.to_string()),
                cache: Some(cache_status),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, storage = backend, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".into(),
                    storage: Some(backend.to_string()),
                    cache: Some(cache_status),
                }),
            )
        }
    }
}

fn parse_entity(raw: &str) -> Result<EntityKind, ApiError> {
    match raw {
        "doctors" | "hospitals" | "departments" => raw
            .parse::<EntityKind>()
            .map_err(|_| ApiError::not_found(format!("Unknown collection: {raw}"))),
        _ => Err(ApiError::not_found(format!("Unknown collection: {raw}"))),
    }
}

/// `GET /api/{entity}`: cache-first read.
pub async fn list_collection(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, ApiError> {
    let kind = parse_entity(&entity)?;
    let context = format!("Failed to fetch {kind}");
    let directory = &state.directory;

    let response = match kind {
        EntityKind::Doctors => {
            let fetched = directory
                .doctors()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(fetched.into_collection()).into_response()
        }
        EntityKind::Hospitals => {
            let fetched = directory
                .hospitals()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(fetched.into_collection()).into_response()
        }
        EntityKind::Departments => {
            let fetched = directory
                .departments()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(fetched.into_collection()).into_response()
        }
    };
    Ok(response)
}

/// `POST /api/{entity}`: re-read from the store and overwrite the cache.
pub async fn refresh_collection(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, ApiError> {
    let kind = parse_entity(&entity)?;
    let context = format!("Failed to refresh {kind}");
    let directory = &state.directory;
    let timestamp = epoch_millis(now_utc());

    let response = match kind {
        EntityKind::Doctors => {
            let data = directory
                .refresh_doctors()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(RefreshResponse::new(data, timestamp)).into_response()
        }
        EntityKind::Hospitals => {
            let data = directory
                .refresh_hospitals()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(RefreshResponse::new(data, timestamp)).into_response()
        }
        EntityKind::Departments => {
            let data = directory
                .refresh_departments()
                .await
                .map_err(|e| ApiError::from_storage(e, &context))?;
            Json(RefreshResponse::new(data, timestamp)).into_response()
        }
    };
    Ok(response)
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    /// `lax` or `strict`; defaults to `search.join_policy`.
    #[serde(default)]
    pub join: Option<String>,
}

impl SearchParams {
    fn filter(&self) -> Result<DoctorFilter, ApiError> {
        let rating = match self.rating.as_deref() {
            Some(raw) => Facet::<Rating>::parse_rating(raw)
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
            None => Facet::All,
        };
        Ok(DoctorFilter {
            rating,
            hospital: self
                .hospital
                .as_deref()
                .map(Facet::<String>::parse_id)
                .unwrap_or_default(),
            department: self
                .department
                .as_deref()
                .map(Facet::<String>::parse_id)
                .unwrap_or_default(),
            text: self.q.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub data: Vec<DoctorView>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
}

/// `GET /api/search`: runs the search engine over the cached collections.
pub async fn search_doctors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let filter = params.filter()?;
    let policy = match params.join.as_deref() {
        Some(raw) => raw
            .parse::<JoinPolicy>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => state.config.search.join_policy,
    };

    let directory = &state.directory;
    let doctors = directory
        .doctors()
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch doctors"))?;
    let (hospitals, departments) = directory
        .reference_collections()
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch hospitals and departments"))?;

    let results = search(
        &doctors.data,
        &hospitals.data,
        &departments.data,
        &filter,
        policy,
    );

    let body = match params.page {
        None => SearchResults {
            total: results.len(),
            data: results,
            page: None,
            page_size: None,
            total_pages: None,
        },
        Some(page) => {
            let page = paginate(&results, page, state.config.search.admin_page_size)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            SearchResults {
                data: page.items,
                total: page.total,
                page: Some(page.page),
                page_size: Some(page.page_size),
                total_pages: Some(page.total_pages),
            }
        }
    };
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entity_accepts_collection_names_only() {
        assert_eq!(parse_entity("doctors").unwrap(), EntityKind::Doctors);
        assert_eq!(parse_entity("departments").unwrap(), EntityKind::Departments);
        assert!(parse_entity("doctor").is_err());
        assert!(parse_entity("admins").is_err());
    }

    #[test]
    fn search_params_build_filter() {
        let params = SearchParams {
            rating: Some("a".into()),
            hospital: Some("all".into()),
            department: Some("d1".into()),
            q: Some("kim".into()),
            ..SearchParams::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.rating, Facet::Only(Rating::A));
        assert_eq!(filter.hospital, Facet::All);
        assert_eq!(filter.department, Facet::Only("d1".to_string()));
        assert_eq!(filter.text, "kim");
    }

    #[test]
    fn bad_rating_is_rejected() {
        let params = SearchParams {
            rating: Some("Z".into()),
            ..SearchParams::default()
        };
        assert_eq!(
            params.filter().unwrap_err().status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
