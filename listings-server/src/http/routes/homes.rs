//! Home listing endpoints
//!
//! | Method | Path               | Guard   |
//! |--------|--------------------|---------|
//! | GET    | /home              | -       |
//! | GET    | /home/{id}         | -       |
//! | POST   | /home              | REALTOR |
//! | PUT    | /home/{id}         | REALTOR, owner |
//! | DELETE | /home/{id}         | REALTOR, owner |
//! | POST   | /home/{id}/inquire | BUYER   |
//! | GET    | /home/{id}/messages| REALTOR |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{Buyer, JsonBody, Realtor, ValidHomeId, ValidQuery};
use crate::http::server::AppState;
use crate::models::{
    Home, HomeChanges, HomeDetail, HomeFilter, HomeQueryParams, HomeSummary, Inquiry, Message,
    MessageText, NewHome, PropertyType, ValidationError,
};

/// Image reference in requests and detail responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDto {
    pub url: String,
}

/// Home response
///
/// List views carry `image` (first image only), the detail view carries
/// `images`, mutations carry neither.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub listed_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageDto>>,
}

impl From<Home> for HomeResponse {
    fn from(h: Home) -> Self {
        Self {
            id: h.id,
            address: h.address,
            city: h.city,
            price: h.price,
            number_of_bedrooms: h.number_of_bedrooms,
            number_of_bathrooms: h.number_of_bathrooms,
            land_size: h.land_size,
            property_type: h.property_type,
            listed_date: h.listed_date,
            image: None,
            images: None,
        }
    }
}

impl From<HomeSummary> for HomeResponse {
    fn from(s: HomeSummary) -> Self {
        Self {
            image: s.image,
            ..Self::from(s.home)
        }
    }
}

impl From<HomeDetail> for HomeResponse {
    fn from(d: HomeDetail) -> Self {
        Self {
            images: Some(d.images.into_iter().map(|url| ImageDto { url }).collect()),
            ..Self::from(d.home)
        }
    }
}

/// Create home request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeRequest {
    pub address: String,
    pub city: String,
    pub price: f64,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub land_size: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    pub images: Vec<ImageDto>,
}

impl TryFrom<CreateHomeRequest> for NewHome {
    type Error = ValidationError;

    fn try_from(req: CreateHomeRequest) -> Result<Self, Self::Error> {
        NewHome {
            address: req.address,
            city: req.city,
            price: req.price,
            number_of_bedrooms: req.number_of_bedrooms,
            number_of_bathrooms: req.number_of_bathrooms,
            land_size: req.land_size,
            property_type: req.property_type,
            images: req.images.into_iter().map(|img| img.url).collect(),
        }
        .validate()
    }
}

/// Partial update request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub number_of_bedrooms: Option<i32>,
    pub number_of_bathrooms: Option<i32>,
    pub land_size: Option<f64>,
    pub property_type: Option<PropertyType>,
}

impl TryFrom<UpdateHomeRequest> for HomeChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateHomeRequest) -> Result<Self, Self::Error> {
        HomeChanges {
            address: req.address,
            city: req.city,
            price: req.price,
            number_of_bedrooms: req.number_of_bedrooms,
            number_of_bathrooms: req.number_of_bathrooms,
            land_size: req.land_size,
            property_type: req.property_type,
        }
        .validate()
    }
}

/// Inquiry request
#[derive(Debug, Deserialize)]
pub struct InquireRequest {
    pub message: String,
}

/// GET /home - list homes matching the query filters
async fn get_homes(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<HomeQueryParams>,
) -> Result<Json<Vec<HomeResponse>>, ApiError> {
    let filter = HomeFilter::try_from(params)?;
    let homes = state.service.get_homes(&filter).await?;

    Ok(Json(homes.into_iter().map(HomeResponse::from).collect()))
}

/// GET /home/{id} - a single home with all images
async fn get_home(
    State(state): State<Arc<AppState>>,
    ValidHomeId(id): ValidHomeId,
) -> Result<Json<HomeResponse>, ApiError> {
    let home = state.service.get_home_by_id(id).await?;
    Ok(Json(HomeResponse::from(home)))
}

/// POST /home - list a new home owned by the caller
async fn create_home(
    State(state): State<Arc<AppState>>,
    Realtor(user): Realtor,
    JsonBody(req): JsonBody<CreateHomeRequest>,
) -> Result<(StatusCode, Json<HomeResponse>), ApiError> {
    let home = NewHome::try_from(req)?;
    let created = state.service.create_home(home, user.id).await?;

    Ok((StatusCode::CREATED, Json(HomeResponse::from(created))))
}

/// PUT /home/{id} - partial update by the owning realtor
async fn update_home(
    State(state): State<Arc<AppState>>,
    Realtor(user): Realtor,
    ValidHomeId(id): ValidHomeId,
    JsonBody(req): JsonBody<UpdateHomeRequest>,
) -> Result<Json<HomeResponse>, ApiError> {
    let changes = HomeChanges::try_from(req)?;
    let home = state.service.update_home_by_id(id, changes, user.id).await?;

    Ok(Json(HomeResponse::from(home)))
}

/// DELETE /home/{id} - remove a listing owned by the caller
async fn delete_home(
    State(state): State<Arc<AppState>>,
    Realtor(user): Realtor,
    ValidHomeId(id): ValidHomeId,
) -> Result<Json<HomeResponse>, ApiError> {
    let home = state.service.delete_home_by_id(id, user.id).await?;
    Ok(Json(HomeResponse::from(home)))
}

/// POST /home/{id}/inquire - buyer sends a message to the listing realtor
async fn inquire(
    State(state): State<Arc<AppState>>,
    Buyer(user): Buyer,
    ValidHomeId(id): ValidHomeId,
    JsonBody(req): JsonBody<InquireRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let text = MessageText::new(&req.message)?;
    let message = state.service.inquire(id, &user, text).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /home/{id}/messages - inquiries addressed to the caller
async fn get_messages(
    State(state): State<Arc<AppState>>,
    Realtor(user): Realtor,
    ValidHomeId(id): ValidHomeId,
) -> Result<Json<Vec<Inquiry>>, ApiError> {
    let messages = state.service.get_messages_by_home(id, &user).await?;
    Ok(Json(messages))
}

/// Home routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/home", get(get_homes).post(create_home))
        .route(
            "/home/{id}",
            get(get_home).put(update_home).delete(delete_home),
        )
        .route("/home/{id}/inquire", post(inquire))
        .route("/home/{id}/messages", get(get_messages))
}
