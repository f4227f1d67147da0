//! Listing service
//!
//! Turns store records into outcomes the HTTP layer can report: missing
//! records become `NotFound`, ownership mismatches become `Unauthorized`.

use std::sync::Arc;

use crate::db::{DbError, HomeStore};
use crate::models::{
    Home, HomeChanges, HomeDetail, HomeFilter, HomeSummary, Inquiry, Message, MessageText,
    NewHome, NewMessage, NewUser, User,
};

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("user {user_id} does not own home {home_id}")]
    Unauthorized { home_id: i32, user_id: i32 },

    #[error(transparent)]
    Store(#[from] DbError),
}

impl ServiceError {
    fn home(id: i32) -> Self {
        Self::NotFound {
            resource: "home",
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Listing operations over any [`HomeStore`]
#[derive(Clone)]
pub struct HomeService {
    store: Arc<dyn HomeStore>,
}

impl HomeService {
    pub fn new(store: Arc<dyn HomeStore>) -> Self {
        Self { store }
    }

    /// Homes matching every provided predicate, ordered by id.
    ///
    /// An empty result is reported as `NotFound`, never as an empty list.
    pub async fn get_homes(&self, filter: &HomeFilter) -> ServiceResult<Vec<HomeSummary>> {
        let homes = self.store.find_homes(filter).await?;
        if homes.is_empty() {
            tracing::debug!(?filter, "no homes matched");
            return Err(ServiceError::NotFound {
                resource: "homes",
                id: "matching filter".into(),
            });
        }
        Ok(homes)
    }

    pub async fn get_home_by_id(&self, id: i32) -> ServiceResult<HomeDetail> {
        self.store
            .find_home(id)
            .await?
            .ok_or_else(|| ServiceError::home(id))
    }

    /// Insert a home owned by `owner_id` together with its images.
    pub async fn create_home(&self, home: NewHome, owner_id: i32) -> ServiceResult<Home> {
        let created = self.store.create_home(owner_id, &home).await?;
        tracing::info!(
            home_id = created.id,
            realtor_id = owner_id,
            images = home.images.len(),
            "home created"
        );
        Ok(created)
    }

    /// Apply a partial update if `owner_id` owns the home.
    ///
    /// Existence is checked before any write; ownership is enforced by the
    /// update statement itself.
    pub async fn update_home_by_id(
        &self,
        id: i32,
        changes: HomeChanges,
        owner_id: i32,
    ) -> ServiceResult<Home> {
        self.ensure_exists(id).await?;

        match self.store.update_home(id, owner_id, &changes).await? {
            Some(home) => {
                tracing::info!(home_id = id, realtor_id = owner_id, "home updated");
                Ok(home)
            }
            None => Err(self.rejection(id, owner_id).await),
        }
    }

    /// Delete the home if `owner_id` owns it. Images and messages go with it.
    pub async fn delete_home_by_id(&self, id: i32, owner_id: i32) -> ServiceResult<Home> {
        self.ensure_exists(id).await?;

        match self.store.delete_home(id, owner_id).await? {
            Some(home) => {
                tracing::info!(home_id = id, realtor_id = owner_id, "home deleted");
                Ok(home)
            }
            None => Err(self.rejection(id, owner_id).await),
        }
    }

    pub async fn get_realtor_by_home_id(&self, id: i32) -> ServiceResult<User> {
        self.store
            .find_realtor(id)
            .await?
            .ok_or_else(|| ServiceError::home(id))
    }

    /// Record a buyer inquiry addressed to the home's current realtor.
    pub async fn inquire(
        &self,
        home_id: i32,
        buyer: &User,
        message: MessageText,
    ) -> ServiceResult<Message> {
        let realtor = self.get_realtor_by_home_id(home_id).await?;

        let message = self
            .store
            .create_message(&NewMessage {
                message,
                home_id,
                buyer_id: buyer.id,
                realtor_id: realtor.id,
            })
            .await?;

        tracing::info!(
            home_id,
            buyer_id = buyer.id,
            realtor_id = realtor.id,
            message_id = message.id,
            "inquiry recorded"
        );
        Ok(message)
    }

    /// Inquiries on a home addressed to `realtor`.
    ///
    /// A missing home is `NotFound`; a realtor who doesn't own the home
    /// simply sees no messages.
    pub async fn get_messages_by_home(
        &self,
        home_id: i32,
        realtor: &User,
    ) -> ServiceResult<Vec<Inquiry>> {
        self.ensure_exists(home_id).await?;
        Ok(self.store.find_messages(home_id, realtor.id).await?)
    }

    pub async fn find_user(&self, id: i32) -> ServiceResult<Option<User>> {
        Ok(self.store.find_user(id).await?)
    }

    pub async fn register_user(&self, user: NewUser) -> ServiceResult<User> {
        let user = self.store.create_user(&user).await?;
        tracing::info!(user_id = user.id, user_type = %user.user_type, "user registered");
        Ok(user)
    }

    /// Whether the store answers a round trip.
    pub async fn store_ready(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "store ping failed");
                false
            }
        }
    }

    async fn ensure_exists(&self, id: i32) -> ServiceResult<()> {
        match self.store.find_home(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::home(id)),
        }
    }

    /// Why a conditional mutation matched no row.
    async fn rejection(&self, id: i32, owner_id: i32) -> ServiceError {
        match self.ensure_exists(id).await {
            Ok(()) => {
                tracing::warn!(home_id = id, user_id = owner_id, "ownership check failed");
                ServiceError::Unauthorized {
                    home_id: id,
                    user_id: owner_id,
                }
            }
            Err(e) => e,
        }
    }
}
