use std::sync::Arc;

use chrono::Utc;
use pawfectly_db::Database;
use pawfectly_types::models::{Profile, UserId};
use tracing::info;

pub use pawfectly_db::models::ProfileUpdate;

use crate::{CoreError, blocking, require_id};

/// What login needs to verify a password. Only handed out by
/// [`ProfileDirectory::account_by_email`].
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: UserId,
    pub password_hash: String,
    pub pet_type: Option<String>,
    pub image: Option<String>,
}

/// Accounts and profile data. The matching components only ever read
/// users through foreign keys; this is the one place that writes them.
#[derive(Clone)]
pub struct ProfileDirectory {
    db: Arc<Database>,
}

impl ProfileDirectory {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// `password_hash` must already be hashed. A taken email is a
    /// [`CoreError::Conflict`].
    pub async fn create_account(
        &self,
        email: String,
        password_hash: String,
    ) -> Result<UserId, CoreError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(CoreError::InvalidInput("a valid email is required".into()));
        }

        let now = Utc::now();
        let id = blocking(&self.db, "create_account", move |db| {
            db.create_user(email.trim(), &password_hash, now)
        })
        .await?;

        info!("Account {} created", id);
        Ok(id)
    }

    pub async fn account_by_email(&self, email: String) -> Result<Option<Account>, CoreError> {
        let row = blocking(&self.db, "account_by_email", move |db| {
            db.get_user_by_email(email.trim())
        })
        .await?;

        Ok(row.map(|row| Account {
            user_id: row.id,
            password_hash: row.password,
            pet_type: row.pet_type,
            image: row.image_pet,
        }))
    }

    pub async fn profile(&self, user_id: UserId) -> Result<Profile, CoreError> {
        require_id(user_id, "user")?;
        blocking(&self.db, "profile", move |db| db.get_user_by_id(user_id))
            .await?
            .map(|row| row.into_profile())
            .ok_or_else(|| CoreError::NotFound(format!("user {user_id} does not exist")))
    }

    pub async fn set_pet_type(&self, user_id: UserId, pet_type: String) -> Result<(), CoreError> {
        require_id(user_id, "user")?;
        if pet_type.trim().is_empty() {
            return Err(CoreError::InvalidInput("pet type is required".into()));
        }

        let updated = blocking(&self.db, "set_pet_type", move |db| {
            db.set_pet_type(user_id, pet_type.trim())
        })
        .await?;
        found(updated, user_id)
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), CoreError> {
        let user_id = require_id(update.id, "user")?;
        if update.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("name is required".into()));
        }

        let updated = blocking(&self.db, "update_profile", move |db| db.update_profile(&update)).await?;
        found(updated, user_id)
    }

    /// Removes the account together with its match records and messages.
    pub async fn delete(&self, user_id: UserId) -> Result<(), CoreError> {
        require_id(user_id, "user")?;
        let deleted = blocking(&self.db, "delete_user", move |db| db.delete_user(user_id)).await?;
        found(deleted, user_id)?;
        info!("Account {} deleted", user_id);
        Ok(())
    }
}

fn found(changed: bool, user_id: UserId) -> Result<(), CoreError> {
    if changed {
        Ok(())
    } else {
        Err(CoreError::NotFound(format!("user {user_id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use pawfectly_types::models::DesiredStatus;

    use super::ProfileUpdate;
    use crate::CoreError;
    use crate::testutil::*;

    #[tokio::test]
    async fn account_lifecycle() {
        let (_dir, _db, services) = services();
        let directory = &services.profiles;

        let id = directory
            .create_account("buddy@example.com".into(), "$argon2id$fake".into())
            .await
            .unwrap();
        assert!(matches!(
            directory
                .create_account("buddy@example.com".into(), "other".into())
                .await,
            Err(CoreError::Conflict(_))
        ));

        directory.set_pet_type(id, "dog".into()).await.unwrap();
        directory
            .update_profile(ProfileUpdate {
                id,
                pet_breeds: "Poodle".into(),
                gender: "male".into(),
                name: "Buddy".into(),
                age: 3,
                city: "CityA".into(),
                bio: "Friendly dog".into(),
                image: Some("buddy.png".into()),
            })
            .await
            .unwrap();

        let profile = directory.profile(id).await.unwrap();
        assert_eq!(profile.email, "buddy@example.com");
        assert_eq!(profile.pet_type.as_deref(), Some("dog"));
        assert_eq!(profile.image.as_deref(), Some("buddy.png"));

        let account = directory
            .account_by_email("buddy@example.com".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.user_id, id);
        assert_eq!(account.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn delete_cascades_to_matches() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let m = services
            .matches
            .propose_or_respond(a, b, DesiredStatus::Match)
            .await
            .unwrap()
            .match_id();
        services.conversations.append(m, a, "hi".into()).await.unwrap();

        services.profiles.delete(a).await.unwrap();

        assert!(matches!(services.matches.record(m).await, Err(CoreError::NotFound(_))));
        assert!(matches!(services.profiles.delete(a).await, Err(CoreError::NotFound(_))));
        assert!(services.feed.candidates(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_bad_profile_input() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");

        assert!(matches!(
            services.profiles.create_account("not-an-email".into(), "h".into()).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            services.profiles.set_pet_type(a, "  ".into()).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            services.profiles.set_pet_type(a + 100, "cat".into()).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
