use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{Property, Unit, UnitStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyResource {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Property> for PropertyResource {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            landlord_id: property.landlord_id,
            name: property.name.clone(),
            address: property.address.clone(),
            city: property.city.clone(),
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

/// Property reference embedded in a unit.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitResource {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub floor: Option<i32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area_sqm: Option<f64>,
    pub monthly_rent: f64,
    pub status: UnitStatus,
    pub property: Option<PropertySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnitResource {
    pub fn new(unit: &Unit, property: Option<&Property>) -> Self {
        Self {
            id: unit.id,
            property_id: unit.property_id,
            unit_number: unit.unit_number.clone(),
            floor: unit.floor,
            bedrooms: unit.bedrooms,
            bathrooms: unit.bathrooms,
            area_sqm: unit.area_sqm,
            monthly_rent: unit.monthly_rent,
            status: unit.status,
            property: property.map(|p| PropertySummary {
                id: p.id,
                name: p.name.clone(),
            }),
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}
