use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::{StatusCode, header::LOCATION},
  response::{IntoResponse, Response},
};
use json::{Value, json};
use serde::{Deserialize, Serialize};

use crate::{
  entity::PromotionKind,
  filter::Criteria,
  prelude::*,
  record::{PromotionPayload, PromotionRecord},
  state::AppState,
  utils,
};

type App = State<Arc<AppState>>;

#[derive(Serialize)]
pub struct ErrorBody {
  pub status: u16,
  pub error: String,
  pub message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
  let body = ErrorBody {
    status: status.as_u16(),
    error: status.canonical_reason().unwrap_or("Error").to_owned(),
    message,
  };
  (status, Json(body)).into_response()
}

/// Everything a handler can fail with.
pub enum ApiError {
  Domain(Error),
  Body(JsonRejection),
  Path(PathRejection),
}

impl From<Error> for ApiError {
  fn from(err: Error) -> Self {
    Self::Domain(err)
  }
}

impl From<Validation> for ApiError {
  fn from(err: Validation) -> Self {
    Self::Domain(err.into())
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Body(rejection)
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::Path(rejection)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      Self::Domain(err) => err.into_response(),
      Self::Body(rejection) => {
        warn!("Rejected request body: {rejection}");
        error_response(rejection.status(), rejection.body_text())
      }
      Self::Path(rejection) => {
        warn!("Rejected request path: {rejection}");
        error_response(rejection.status(), rejection.body_text())
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Validation(_) | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::Db(err) => {
        error!("Database failure: {err}");
        return error_response(
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".into(),
        );
      }
    };

    if status == StatusCode::BAD_REQUEST {
      warn!("{self}");
    }
    error_response(status, self.to_string())
  }
}

type IdPath = std::result::Result<Path<i64>, PathRejection>;

/// Ids are parsed wider than the column so that an integer no row can hold
/// reads as missing rather than malformed.
fn promotion_id(path: IdPath) -> Result<i32, ApiError> {
  let Path(id) = path?;
  i32::try_from(id).map_err(|_| Error::NotFound(id).into())
}

/// Raw list query string; empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
  pub name: Option<String>,
  pub product_id: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub value: Option<String>,
  pub active: Option<String>,
  pub start_date: Option<String>,
  pub expiration_date: Option<String>,
  pub available: Option<String>,
}

fn query_param<T>(
  key: &str,
  raw: Option<String>,
  parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>> {
  match raw.filter(|raw| !raw.trim().is_empty()) {
    None => Ok(None),
    Some(raw) => parse(raw.trim())
      .map(Some)
      .ok_or_else(|| Error::InvalidQuery(format!("{key}={raw}"))),
  }
}

impl TryFrom<ListQuery> for Criteria {
  type Error = Error;

  fn try_from(query: ListQuery) -> Result<Self> {
    Ok(Self {
      name: query.name.filter(|name| !name.is_empty()),
      product_id: query_param("product_id", query.product_id, |raw| {
        raw.parse().ok()
      })?,
      kind: query_param("type", query.kind, |raw| {
        raw.parse::<PromotionKind>().ok()
      })?,
      value: query_param("value", query.value, |raw| raw.parse().ok())?,
      active: query_param("active", query.active, utils::parse_bool)?,
      start_date: query_param(
        "start_date",
        query.start_date,
        utils::parse_date,
      )?,
      expiration_date: query_param(
        "expiration_date",
        query.expiration_date,
        utils::parse_date,
      )?,
      available: query_param("available", query.available, utils::parse_bool)?,
    })
  }
}

pub async fn index() -> Json<Value> {
  Json(json!({
    "name": "Promotion REST API Service",
    "version": env!("CARGO_PKG_VERSION"),
    "paths": "/promotions",
  }))
}

pub async fn health() -> Json<Value> {
  Json(json!({ "status": "OK" }))
}

pub async fn list(
  State(app): App,
  Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PromotionRecord>>, ApiError> {
  info!("Request for Promotions list");

  let criteria = Criteria::try_from(query)?;
  if !criteria.is_empty() {
    debug!("List criteria: {criteria:?}");
  }

  let sv = app.promotions();
  let promotions = match criteria.availability_only() {
    Some(is_available) => sv.find_available(is_available).await?,
    None => sv.list(&criteria).await?,
  };

  Ok(Json(promotions.into_iter().map(Into::into).collect()))
}

pub async fn get(
  State(app): App,
  id: IdPath,
) -> Result<Json<PromotionRecord>, ApiError> {
  let id = promotion_id(id)?;
  info!("Request for promotion with id: {id}");

  let promotion = app.promotions().get(id).await?;
  Ok(Json(promotion.into()))
}

pub async fn create(
  State(app): App,
  body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  info!("Request to create a Promotion");

  let Json(body) = body?;
  let payload = PromotionPayload::from_json(&body)?;
  let promotion = app.promotions().create(payload).await?;

  let location = format!("/promotions/{}", promotion.id);
  Ok((
    StatusCode::CREATED,
    [(LOCATION, location)],
    Json(PromotionRecord::from(promotion)),
  ))
}

pub async fn update(
  State(app): App,
  id: IdPath,
  body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PromotionRecord>, ApiError> {
  let id = promotion_id(id)?;
  info!("Request to update promotion with id: {id}");

  let Json(body) = body?;
  let payload = PromotionPayload::from_json(&body)?;
  let promotion = app.promotions().update(id, payload).await?;

  Ok(Json(promotion.into()))
}

pub async fn delete(
  State(app): App,
  id: IdPath,
) -> Result<StatusCode, ApiError> {
  let id = match promotion_id(id) {
    Ok(id) => id,
    // Nothing is stored outside the id range.
    Err(ApiError::Domain(Error::NotFound(_))) => {
      return Ok(StatusCode::NO_CONTENT);
    }
    Err(err) => return Err(err),
  };
  info!("Request to delete promotion with id: {id}");

  app.promotions().delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn activate(
  State(app): App,
  id: IdPath,
) -> Result<Json<PromotionRecord>, ApiError> {
  let id = promotion_id(id)?;
  info!("Request to activate promotion with id: {id}");

  let promotion = app.promotions().activate(id).await?;
  Ok(Json(promotion.into()))
}

pub async fn deactivate(
  State(app): App,
  id: IdPath,
) -> Result<Json<PromotionRecord>, ApiError> {
  let id = promotion_id(id)?;
  info!("Request to deactivate promotion with id: {id}");

  let promotion = app.promotions().deactivate(id).await?;
  Ok(Json(promotion.into()))
}
