//! Buyer inquiries about a listing

use serde::Serialize;
use sqlx::FromRow;

use super::ValidationError;

/// Maximum inquiry length in characters
const MAX_MESSAGE_LEN: usize = 2000;

/// Validated inquiry text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Create inquiry text. Surrounding whitespace is dropped.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "message" });
        }
        if s.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::TooLong {
                field: "message",
                max: MAX_MESSAGE_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Message record from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub message: String,
    pub home_id: i32,
    pub buyer_id: i32,
    pub realtor_id: i32,
}

/// Input for recording an inquiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub message: MessageText,
    pub home_id: i32,
    pub buyer_id: i32,
    pub realtor_id: i32,
}

/// Buyer contact details shown to the realtor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BuyerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Inquiry as listed for the realtor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Inquiry {
    pub message: String,
    #[sqlx(flatten)]
    pub buyer: BuyerContact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        let text = MessageText::new("  is the basement finished?  ").unwrap();
        assert_eq!(text.as_str(), "is the basement finished?");
    }

    #[test]
    fn rejects_empty() {
        let err = MessageText::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        assert!(MessageText::new(&"a".repeat(2000)).is_ok());
        let err = MessageText::new(&"a".repeat(2001)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 2000, .. }));
    }

    #[test]
    fn inquiry_nests_buyer() {
        let inquiry = Inquiry {
            message: "hello".into(),
            buyer: BuyerContact {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "555-0100".into(),
            },
        };
        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["buyer"]["email"], "ada@example.com");
        assert_eq!(json["message"], "hello");
    }
}
