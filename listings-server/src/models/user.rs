//! Users and their roles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Role a user plays on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Buyer,
    Realtor,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Realtor => "REALTOR",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUYER" => Ok(Self::Buyer),
            "REALTOR" => Ok(Self::Realtor),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ValidationError::InvalidVariant {
                field: "userType",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserType,
}

/// Input for registering a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserType,
}

impl NewUser {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_owned();
        self.email = self.email.trim().to_owned();
        self.phone = self.phone.trim().to_owned();
        if self.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self.email.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if self.phone.is_empty() {
            return Err(ValidationError::Empty { field: "phone" });
        }
        Ok(self)
    }
}
