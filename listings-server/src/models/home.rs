//! Home listing types
//!
//! `Home` mirrors a row of the `homes` table. `NewHome` and `HomeChanges`
//! are validated inputs for create and partial update.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for street addresses
const MAX_ADDRESS_LEN: usize = 256;

/// Maximum length for city names
const MAX_CITY_LEN: usize = 128;

/// Maximum length for image URLs
const MAX_URL_LEN: usize = 2048;

/// Kind of property being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "property_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Residential,
    Condo,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "RESIDENTIAL",
            Self::Condo => "CONDO",
        }
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    /// Upper-case spellings only, the same ones JSON bodies use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESIDENTIAL" => Ok(Self::Residential),
            "CONDO" => Ok(Self::Condo),
            _ => Err(ValidationError::InvalidVariant {
                field: "propertyType",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Home record from the store
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Home {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub listed_date: DateTime<Utc>,
    pub realtor_id: i32,
}

/// Home with only its first image, for list views
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HomeSummary {
    #[sqlx(flatten)]
    pub home: Home,
    pub image: Option<String>,
}

/// Home with every image URL in insertion order
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HomeDetail {
    #[sqlx(flatten)]
    pub home: Home,
    pub images: Vec<String>,
}

/// Validated input for creating a home with its images
#[derive(Debug, Clone, PartialEq)]
pub struct NewHome {
    pub address: String,
    pub city: String,
    pub price: f64,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub images: Vec<String>,
}

impl NewHome {
    /// Check every field, trimming text.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.address = text("address", &self.address, MAX_ADDRESS_LEN)?;
        self.city = text("city", &self.city, MAX_CITY_LEN)?;
        positive("price", self.price)?;
        positive("landSize", self.land_size)?;
        count("numberOfBedrooms", self.number_of_bedrooms)?;
        count("numberOfBathrooms", self.number_of_bathrooms)?;
        self.images = self
            .images
            .iter()
            .map(|url| text("images.url", url, MAX_URL_LEN))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }
}

/// Validated partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeChanges {
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub number_of_bedrooms: Option<i32>,
    pub number_of_bathrooms: Option<i32>,
    pub land_size: Option<f64>,
    pub property_type: Option<PropertyType>,
}

impl HomeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check every present field. An update with no fields is rejected.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        if let Some(address) = &self.address {
            self.address = Some(text("address", address, MAX_ADDRESS_LEN)?);
        }
        if let Some(city) = &self.city {
            self.city = Some(text("city", city, MAX_CITY_LEN)?);
        }
        if let Some(price) = self.price {
            positive("price", price)?;
        }
        if let Some(land_size) = self.land_size {
            positive("landSize", land_size)?;
        }
        if let Some(n) = self.number_of_bedrooms {
            count("numberOfBedrooms", n)?;
        }
        if let Some(n) = self.number_of_bathrooms {
            count("numberOfBathrooms", n)?;
        }
        Ok(self)
    }

    /// Apply to an in-memory record.
    pub fn apply(&self, home: &mut Home) {
        if let Some(address) = &self.address {
            home.address = address.clone();
        }
        if let Some(city) = &self.city {
            home.city = city.clone();
        }
        if let Some(price) = self.price {
            home.price = price;
        }
        if let Some(n) = self.number_of_bedrooms {
            home.number_of_bedrooms = n;
        }
        if let Some(n) = self.number_of_bathrooms {
            home.number_of_bathrooms = n;
        }
        if let Some(land_size) = self.land_size {
            home.land_size = land_size;
        }
        if let Some(property_type) = self.property_type {
            home.property_type = property_type;
        }
    }
}

fn text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(())
}

fn count(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}
