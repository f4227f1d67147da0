//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod home;
pub mod filter;
pub mod user;
pub mod message;

pub use validation::ValidationError;
pub use home::{Home, HomeChanges, HomeDetail, HomeSummary, NewHome, PropertyType};
pub use filter::{Bounds, HomeFilter, HomeQueryParams};
pub use user::{NewUser, User, UserType};
pub use message::{BuyerContact, Inquiry, Message, MessageText, NewMessage};
