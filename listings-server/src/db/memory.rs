//! In-memory listing store
//!
//! Same contract as [`PgHomeStore`](super::PgHomeStore), held behind one
//! `RwLock` so each operation is atomic. Used for tests and local runs
//! without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{DbError, HomeStore};
use crate::models::{
    BuyerContact, Home, HomeChanges, HomeDetail, HomeFilter, HomeSummary, Inquiry, Message,
    NewHome, NewMessage, NewUser, User,
};

#[derive(Debug, Clone)]
struct ImageRow {
    id: i32,
    url: String,
    home_id: i32,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    homes: Vec<Home>,
    images: Vec<ImageRow>,
    messages: Vec<Message>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn images_of(&self, home_id: i32) -> impl Iterator<Item = &ImageRow> {
        self.images.iter().filter(move |img| img.home_id == home_id)
    }

    fn user(&self, id: i32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

/// Listing store kept entirely in process memory
#[derive(Default)]
pub struct MemoryHomeStore {
    tables: RwLock<Tables>,
}

impl MemoryHomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images for a home.
    pub async fn image_count(&self, home_id: i32) -> usize {
        self.tables.read().await.images_of(home_id).count()
    }

    /// Number of stored messages across all homes.
    pub async fn message_count(&self) -> usize {
        self.tables.read().await.messages.len()
    }
}

#[async_trait]
impl HomeStore for MemoryHomeStore {
    async fn find_homes(&self, filter: &HomeFilter) -> Result<Vec<HomeSummary>, DbError> {
        let tables = self.tables.read().await;
        let mut homes: Vec<HomeSummary> = tables
            .homes
            .iter()
            .filter(|home| filter.matches(home))
            .map(|home| HomeSummary {
                home: home.clone(),
                image: tables.images_of(home.id).next().map(|img| img.url.clone()),
            })
            .collect();
        homes.sort_by_key(|summary| summary.home.id);
        Ok(homes)
    }

    async fn find_home(&self, id: i32) -> Result<Option<HomeDetail>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.homes.iter().find(|h| h.id == id).map(|home| HomeDetail {
            home: home.clone(),
            images: tables.images_of(id).map(|img| img.url.clone()).collect(),
        }))
    }

    async fn create_home(&self, realtor_id: i32, new: &NewHome) -> Result<Home, DbError> {
        let mut tables = self.tables.write().await;
        if tables.user(realtor_id).is_none() {
            return Err(DbError::Constraint(format!("realtor {} does not exist", realtor_id)));
        }

        let home = Home {
            id: tables.next_id(),
            address: new.address.clone(),
            city: new.city.clone(),
            price: new.price,
            number_of_bedrooms: new.number_of_bedrooms,
            number_of_bathrooms: new.number_of_bathrooms,
            land_size: new.land_size,
            property_type: new.property_type,
            listed_date: Utc::now(),
            realtor_id,
        };
        for url in &new.images {
            let id = tables.next_id();
            tables.images.push(ImageRow {
                id,
                url: url.clone(),
                home_id: home.id,
            });
        }
        tables.homes.push(home.clone());
        Ok(home)
    }

    async fn update_home(
        &self,
        id: i32,
        realtor_id: i32,
        changes: &HomeChanges,
    ) -> Result<Option<Home>, DbError> {
        let mut tables = self.tables.write().await;
        let Some(home) = tables
            .homes
            .iter_mut()
            .find(|h| h.id == id && h.realtor_id == realtor_id)
        else {
            return Ok(None);
        };
        changes.apply(home);
        Ok(Some(home.clone()))
    }

    async fn delete_home(&self, id: i32, realtor_id: i32) -> Result<Option<Home>, DbError> {
        let mut tables = self.tables.write().await;
        let Some(pos) = tables
            .homes
            .iter()
            .position(|h| h.id == id && h.realtor_id == realtor_id)
        else {
            return Ok(None);
        };
        let home = tables.homes.remove(pos);
        tables.images.retain(|img| img.home_id != id);
        tables.messages.retain(|m| m.home_id != id);
        Ok(Some(home))
    }

    async fn find_realtor(&self, home_id: i32) -> Result<Option<User>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .homes
            .iter()
            .find(|h| h.id == home_id)
            .and_then(|home| tables.user(home.realtor_id))
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::Constraint(format!(
                "email {} already registered",
                user.email
            )));
        }
        let user = User {
            id: tables.next_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            user_type: user.user_type,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DbError> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn create_message(&self, message: &NewMessage) -> Result<Message, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.homes.iter().any(|h| h.id == message.home_id) {
            return Err(DbError::Constraint(format!(
                "home {} does not exist",
                message.home_id
            )));
        }
        let message = Message {
            id: tables.next_id(),
            message: message.message.as_str().to_owned(),
            home_id: message.home_id,
            buyer_id: message.buyer_id,
            realtor_id: message.realtor_id,
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn find_messages(&self, home_id: i32, realtor_id: i32) -> Result<Vec<Inquiry>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.home_id == home_id && m.realtor_id == realtor_id)
            .filter_map(|m| {
                tables.user(m.buyer_id).map(|buyer| Inquiry {
                    message: m.message.clone(),
                    buyer: BuyerContact {
                        name: buyer.name.clone(),
                        email: buyer.email.clone(),
                        phone: buyer.phone.clone(),
                    },
                })
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
