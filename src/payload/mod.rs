//! Typed request shapes, validated before reconciliation.
//!
//! Create shapes serialize every declared field (optionals as explicit
//! nulls, defaults applied), so the write set reflects the whole shape.
//! Update shapes serialize only the fields present in the request, so
//! omitted columns stay untouched. Unknown incoming fields are ignored.

mod validate;

use crate::entity::Entity;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validate::{check_email, check_len, check_min, check_pattern, PHONE_PATTERN};

/// Validate and serialize a create body into the payload map handed to the
/// reconciler.
pub fn create_map(entity: Entity, body: Value) -> Result<Map<String, Value>, ApiError> {
    match entity {
        Entity::Service => shaped::<ServiceCreate>(body),
        Entity::Booking => shaped::<BookingCreate>(body),
        Entity::Category => shaped::<CategoryCreate>(body),
        Entity::User => shaped::<UserCreate>(body),
        Entity::Profile => shaped::<ProfileCreate>(body),
        Entity::Post => shaped::<PostCreate>(body),
        Entity::Comment => shaped::<CommentCreate>(body),
        Entity::Pathway => shaped::<PathwayCreate>(body),
        Entity::Step => shaped::<StepCreate>(body),
    }
}

/// Validate and serialize an update body; only fields present in the request
/// end up in the map.
pub fn update_map(entity: Entity, body: Value) -> Result<Map<String, Value>, ApiError> {
    match entity {
        Entity::Service => shaped::<ServiceUpdate>(body),
        Entity::Booking => shaped::<BookingUpdate>(body),
        Entity::Category => shaped::<CategoryUpdate>(body),
        Entity::User => shaped::<UserUpdate>(body),
        Entity::Profile => shaped::<ProfileUpdate>(body),
        Entity::Post => shaped::<PostUpdate>(body),
        Entity::Comment => shaped::<CommentUpdate>(body),
        Entity::Pathway => shaped::<PathwayUpdate>(body),
        Entity::Step => shaped::<StepUpdate>(body),
    }
}

trait Shape: DeserializeOwned + Serialize {
    fn validate(&self) -> Result<(), ApiError>;
}

fn shaped<T: Shape>(body: Value) -> Result<Map<String, Value>, ApiError> {
    let shape: T = serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;
    shape.validate()?;
    match serde_json::to_value(&shape) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::Validation("body must be a JSON object".into())),
        Err(e) => Err(ApiError::Validation(e.to_string())),
    }
}

/// Booking lifecycle status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

fn default_price() -> Option<f64> {
    Some(0.0)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_price")]
    pub price: Option<f64>,
    pub artisan_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Shape for ServiceCreate {
    fn validate(&self) -> Result<(), ApiError> {
        check_len("title", &self.title, 2, 255)?;
        if let Some(p) = self.price {
            check_min("price", p, 0.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artisan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl Shape for ServiceUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(t) = &self.title {
            check_len("title", t, 2, 255)?;
        }
        if let Some(p) = self.price {
            check_min("price", p, 0.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BookingCreate {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl Shape for BookingCreate {
    fn validate(&self) -> Result<(), ApiError> {
        check_len("customer_name", &self.customer_name, 2, 100)?;
        if let Some(e) = &self.customer_email {
            check_email("customer_email", e)?;
        }
        if let Some(p) = &self.customer_phone {
            check_pattern("customer_phone", p, PHONE_PATTERN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

impl Shape for BookingUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(n) = &self.customer_name {
            check_len("customer_name", n, 2, 100)?;
        }
        if let Some(e) = &self.customer_email {
            check_email("customer_email", e)?;
        }
        if let Some(p) = &self.customer_phone {
            check_pattern("customer_phone", p, PHONE_PATTERN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
}

impl Shape for CategoryCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Shape for CategoryUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Write-only: never echoed in responses.
    pub password: String,
}

impl Shape for UserCreate {
    fn validate(&self) -> Result<(), ApiError> {
        check_email("email", &self.email)
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Write-only: never echoed in responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Shape for UserUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(e) = &self.email {
            check_email("email", e)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfileCreate {
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub user_id: i64,
}

impl Shape for ProfileCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Shape for ProfileUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostCreate {
    pub title: String,
    pub content: Option<String>,
    pub body: Option<String>,
    pub author_id: Option<i64>,
}

impl Shape for PostCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

impl Shape for PostUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentCreate {
    pub content: String,
    pub post_id: i64,
    pub author_id: Option<i64>,
}

impl Shape for CommentCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

impl Shape for CommentUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PathwayCreate {
    pub title: String,
    pub description: Option<String>,
    pub slug: Option<String>,
}

impl Shape for PathwayCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PathwayUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Shape for PathwayUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StepCreate {
    pub title: String,
    pub content: String,
    pub module_id: Option<i64>,
}

impl Shape for StepCreate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StepUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<i64>,
}

impl Shape for StepUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
