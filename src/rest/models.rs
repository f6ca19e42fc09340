use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Popsicle, PopsicleFields, ValidationErrors};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopsicleResponse {
    pub id: Uuid,
    pub name: String,
    pub flavor: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePopsicleRequest {
    pub name: String,
    pub flavor: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePopsicleRequest {
    pub name: String,
    pub flavor: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorResponse>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

impl From<&Popsicle> for PopsicleResponse {
    fn from(popsicle: &Popsicle) -> Self {
        Self {
            id: popsicle.id,
            name: popsicle.name.clone(),
            flavor: popsicle.flavor.clone(),
            price: popsicle.price,
            created_at: popsicle.created_at,
        }
    }
}

impl From<CreatePopsicleRequest> for PopsicleFields {
    fn from(request: CreatePopsicleRequest) -> Self {
        PopsicleFields::new(request.name, request.flavor, request.price)
    }
}

impl From<UpdatePopsicleRequest> for PopsicleFields {
    fn from(request: UpdatePopsicleRequest) -> Self {
        PopsicleFields::new(request.name, request.flavor, request.price)
    }
}

impl From<&ValidationErrors> for ErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            message: "validation failed".to_string(),
            errors: errors
                .errors()
                .iter()
                .map(|e| FieldErrorResponse {
                    field: e.field.to_string(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}
