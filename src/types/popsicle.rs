use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub type PopsicleId = Uuid;

/// The mutable part of a popsicle: what clients send on create/replace and
/// what a patch document is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopsicleFields {
    pub name: String,
    pub flavor: String,
    pub price: Decimal,
}

impl PopsicleFields {
    pub fn new(name: impl Into<String>, flavor: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            flavor: flavor.into(),
            price,
        }
    }
}

/// Canonical stored record. `id` and `created_at` are assigned once by the
/// server and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popsicle {
    pub id: PopsicleId,
    pub name: String,
    pub flavor: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Popsicle {
    pub fn new(id: PopsicleId, fields: PopsicleFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            flavor: fields.flavor,
            price: fields.price,
            created_at,
        }
    }

    pub fn fields(&self) -> PopsicleFields {
        PopsicleFields {
            name: self.name.clone(),
            flavor: self.flavor.clone(),
            price: self.price,
        }
    }

    /// Overwrites the mutable fields, leaving identity and creation time alone.
    pub fn apply(&mut self, fields: PopsicleFields) {
        self.name = fields.name;
        self.flavor = fields.flavor;
        self.price = fields.price;
    }
}
