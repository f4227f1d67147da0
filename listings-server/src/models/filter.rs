//! Listing search filters
//!
//! Query strings arrive as raw text and are parsed strictly into a
//! [`HomeFilter`]. Absent or empty parameters impose no constraint.

use serde::Deserialize;

use super::{Home, PropertyType, ValidationError};

/// Inclusive numeric range with optional ends
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Conjunction of optional predicates over homes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFilter {
    pub city: Option<String>,
    pub price: Bounds,
    pub land_size: Bounds,
    pub number_of_bedrooms: Option<i32>,
    pub number_of_bathrooms: Option<i32>,
    pub property_type: Option<PropertyType>,
}

impl HomeFilter {
    /// True when the home satisfies every provided predicate.
    pub fn matches(&self, home: &Home) -> bool {
        self.city.as_ref().map_or(true, |city| &home.city == city)
            && self.price.contains(home.price)
            && self.land_size.contains(home.land_size)
            && self
                .number_of_bedrooms
                .map_or(true, |n| home.number_of_bedrooms == n)
            && self
                .number_of_bathrooms
                .map_or(true, |n| home.number_of_bathrooms == n)
            && self
                .property_type
                .map_or(true, |kind| home.property_type == kind)
    }
}

/// Raw `GET /home` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeQueryParams {
    pub city: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub number_of_bedrooms: Option<String>,
    pub number_of_bathrooms: Option<String>,
    pub min_land_size: Option<String>,
    pub max_land_size: Option<String>,
    pub property_type: Option<String>,
}

impl TryFrom<HomeQueryParams> for HomeFilter {
    type Error = ValidationError;

    fn try_from(params: HomeQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            city: present(params.city.as_deref()).map(str::to_owned),
            price: Bounds {
                min: number("minPrice", params.min_price.as_deref())?,
                max: number("maxPrice", params.max_price.as_deref())?,
            },
            land_size: Bounds {
                min: number("minLandSize", params.min_land_size.as_deref())?,
                max: number("maxLandSize", params.max_land_size.as_deref())?,
            },
            number_of_bedrooms: integer("numberOfBedrooms", params.number_of_bedrooms.as_deref())?,
            number_of_bathrooms: integer(
                "numberOfBathrooms",
                params.number_of_bathrooms.as_deref(),
            )?,
            property_type: present(params.property_type.as_deref())
                .map(str::parse)
                .transpose()?,
        })
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn number(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ValidationError::NotANumber {
            field,
            value: raw.to_owned(),
        }),
    }
}

fn integer(field: &'static str, raw: Option<&str>) -> Result<Option<i32>, ValidationError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn home(price: f64) -> Home {
        Home {
            id: 1,
            address: "1 Main".into(),
            city: "Toronto".into(),
            price,
            number_of_bedrooms: 3,
            number_of_bathrooms: 2,
            land_size: 500.0,
            property_type: PropertyType::Residential,
            listed_date: Utc::now(),
            realtor_id: 1,
        }
    }

    #[test]
    fn empty_params_impose_nothing() {
        let filter = HomeFilter::try_from(HomeQueryParams::default()).unwrap();
        assert_eq!(filter, HomeFilter::default());
        assert!(filter.matches(&home(1.0)));
    }

    #[test]
    fn blank_strings_are_absent() {
        let filter = HomeFilter::try_from(HomeQueryParams {
            city: Some("".into()),
            min_price: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter, HomeFilter::default());
    }

    #[test]
    fn parses_every_field() {
        let filter = HomeFilter::try_from(HomeQueryParams {
            city: Some("Toronto".into()),
            min_price: Some("100000".into()),
            max_price: Some("200000.50".into()),
            number_of_bedrooms: Some("3".into()),
            number_of_bathrooms: Some("2".into()),
            min_land_size: Some("100".into()),
            max_land_size: Some("900".into()),
            property_type: Some("RESIDENTIAL".into()),
        })
        .unwrap();

        assert_eq!(filter.city.as_deref(), Some("Toronto"));
        assert_eq!(filter.price.min, Some(100_000.0));
        assert_eq!(filter.price.max, Some(200_000.5));
        assert_eq!(filter.number_of_bedrooms, Some(3));
        assert_eq!(filter.number_of_bathrooms, Some(2));
        assert_eq!(filter.land_size, Bounds { min: Some(100.0), max: Some(900.0) });
        assert_eq!(filter.property_type, Some(PropertyType::Residential));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let err = HomeFilter::try_from(HomeQueryParams {
            min_price: Some("cheap".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: "minPrice", .. }));
    }

    #[test]
    fn rejects_nan_and_infinity() {
        for raw in ["NaN", "inf", "-infinity"] {
            let err = HomeFilter::try_from(HomeQueryParams {
                max_land_size: Some(raw.into()),
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(err, ValidationError::NotANumber { field: "maxLandSize", .. }));
        }
    }

    #[test]
    fn rejects_fractional_bedrooms() {
        let err = HomeFilter::try_from(HomeQueryParams {
            number_of_bedrooms: Some("2.5".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: "numberOfBedrooms", .. }));
    }

    #[test]
    fn rejects_unknown_property_type() {
        let err = HomeFilter::try_from(HomeQueryParams {
            property_type: Some("CASTLE".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn price_range_is_inclusive() {
        let filter = HomeFilter {
            price: Bounds {
                min: Some(100_000.0),
                max: Some(200_000.0),
            },
            ..Default::default()
        };
        assert!(!filter.matches(&home(90_000.0)));
        assert!(filter.matches(&home(100_000.0)));
        assert!(filter.matches(&home(150_000.0)));
        assert!(filter.matches(&home(200_000.0)));
        assert!(!filter.matches(&home(210_000.0)));
    }

    #[test]
    fn every_predicate_must_hold() {
        let filter = HomeFilter {
            city: Some("Toronto".into()),
            number_of_bedrooms: Some(4),
            ..Default::default()
        };
        // city matches, bedrooms don't
        assert!(!filter.matches(&home(1.0)));
    }
}
