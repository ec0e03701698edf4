//! Frequency and phrase endpoints
//!
//! The mutation endpoints are plain GETs with query-string parameters, and
//! redirect on success the way the form flow expects: creating a frequency
//! lands on the new-phrase page for it, posting a phrase lands back home.
//! Resubmitting or bookmarking a create URL re-executes the write.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::frequencies;
use crate::db::models::Frequency;
use crate::error::Result;
use crate::service;
use crate::AppState;

/// Query parameters for GET /frequency/create
///
/// Everything optional at the type level so validation failures surface as
/// our own 400 body rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CreateFrequencyParams {
    pub interval: Option<i64>,
    pub duration: Option<i64>,
    pub privacy: Option<String>,
}

/// GET /frequency/create
pub async fn create_frequency(
    State(state): State<AppState>,
    Query(params): Query<CreateFrequencyParams>,
) -> Result<Redirect> {
    let frequency = service::create_frequency(
        &state.db,
        &state.events,
        params.interval,
        params.duration,
        params.privacy,
    )
    .await?;

    Ok(Redirect::to(&format!(
        "/phrase/new?frequency_id={}",
        frequency.id
    )))
}

/// Query parameters for GET /phrase/create
#[derive(Debug, Deserialize)]
pub struct CreatePhraseParams {
    pub frequency_id: i64,
    pub text: Option<String>,
}

/// GET /phrase/create
pub async fn create_phrase(
    State(state): State<AppState>,
    Query(params): Query<CreatePhraseParams>,
) -> Result<Redirect> {
    service::append_phrase(
        &state.db,
        &state.events,
        params.frequency_id,
        params.text.unwrap_or_default(),
    )
    .await?;

    Ok(Redirect::to("/"))
}

/// Listing response for the home page
#[derive(Debug, Serialize)]
pub struct FrequencyListResponse {
    pub total: usize,
    /// Newest first (descending id)
    pub frequencies: Vec<Frequency>,
}

/// GET /api/frequencies
pub async fn list_frequencies(
    State(state): State<AppState>,
) -> Result<Json<FrequencyListResponse>> {
    let all = frequencies::list_all(&state.db).await?;

    Ok(Json(FrequencyListResponse {
        total: all.len(),
        frequencies: all,
    }))
}
