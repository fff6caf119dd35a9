use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    notification::{Notification, NotificationKind},
    storage::{LocalStorage, StorageError, ADMIN_FLAG_KEY},
};

use super::AdminError;

const FLAG_VALUE: &str = "true";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "kartik".into(),
            password: "kartik123".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Dashboard visibility gate. A plain string comparison and a stored flag;
/// it keeps casual visitors out and nothing more.
#[derive(Clone)]
pub struct AdminGate<S: LocalStorage> {
    storage: S,
    credentials: AdminCredentials,
}

impl<S: LocalStorage> AdminGate<S> {
    pub fn new(storage: S, credentials: AdminCredentials) -> Self {
        Self {
            storage,
            credentials,
        }
    }

    pub async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get_item(ADMIN_FLAG_KEY).await?.as_deref() == Some(FLAG_VALUE))
    }

    pub async fn require_login(&self) -> Result<(), AdminError> {
        if self.is_logged_in().await? {
            Ok(())
        } else {
            Err(AdminError::NotLoggedIn)
        }
    }

    /// On a bad username/password pair the password field is cleared.
    pub async fn login(&self, form: &mut LoginForm) -> Result<Notification, StorageError> {
        if form.username.is_empty() || form.password.is_empty() {
            return Ok(Notification::admin(
                NotificationKind::Error,
                "Please enter both username and password",
            ));
        }

        if form.username == self.credentials.username && form.password == self.credentials.password
        {
            self.storage
                .set_item(ADMIN_FLAG_KEY, FLAG_VALUE.to_string())
                .await?;
            info!("Admin logged in");
            Ok(Notification::admin(
                NotificationKind::Success,
                "Login successful! Welcome to the admin panel.",
            ))
        } else {
            form.password.clear();
            Ok(Notification::admin(
                NotificationKind::Error,
                "Invalid username or password. Please try again.",
            ))
        }
    }

    pub async fn logout(&self, form: &mut LoginForm) -> Result<(), StorageError> {
        form.username.clear();
        form.password.clear();
        self.storage.remove_item(ADMIN_FLAG_KEY).await?;
        info!("Admin logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn gate(storage: &MemoryStorage) -> AdminGate<MemoryStorage> {
        AdminGate::new(storage.clone(), AdminCredentials::default())
    }

    #[tokio::test]
    async fn correct_credentials_set_the_flag() {
        let storage = MemoryStorage::new();
        let gate = gate(&storage);
        let mut form = LoginForm {
            username: "kartik".into(),
            password: "kartik123".into(),
        };

        let note = gate.login(&mut form).await.unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(
            storage.get_item(ADMIN_FLAG_KEY).await.unwrap().as_deref(),
            Some("true")
        );
        assert!(gate.require_login().await.is_ok());
    }

    #[tokio::test]
    async fn wrong_credentials_clear_password_and_stay_hidden() {
        let storage = MemoryStorage::new();
        let gate = gate(&storage);

        for (user, pass) in [("kartik", "wrong"), ("Kartik", "kartik123"), ("admin", "admin")] {
            let mut form = LoginForm {
                username: user.into(),
                password: pass.into(),
            };
            let note = gate.login(&mut form).await.unwrap();
            assert_eq!(note.kind, NotificationKind::Error);
            assert_eq!(form.username, user);
            assert!(form.password.is_empty());
        }

        assert!(!gate.is_logged_in().await.unwrap());
        assert!(matches!(
            gate.require_login().await,
            Err(AdminError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn empty_fields_are_refused_without_touching_the_form() {
        let storage = MemoryStorage::new();
        let mut form = LoginForm {
            username: "kartik".into(),
            password: String::new(),
        };
        let note = gate(&storage).login(&mut form).await.unwrap();
        assert_eq!(note.message, "Please enter both username and password");
        assert_eq!(form.username, "kartik");
    }

    #[tokio::test]
    async fn flag_must_be_the_literal_true() {
        let storage = MemoryStorage::new();
        storage.set_item(ADMIN_FLAG_KEY, "TRUE".into()).await.unwrap();
        assert!(!gate(&storage).is_logged_in().await.unwrap());
    }

    #[tokio::test]
    async fn logout_removes_the_flag() {
        let storage = MemoryStorage::new();
        let gate = gate(&storage);
        let mut form = LoginForm {
            username: "kartik".into(),
            password: "kartik123".into(),
        };
        gate.login(&mut form).await.unwrap();
        gate.logout(&mut form).await.unwrap();

        assert_eq!(form, LoginForm::default());
        assert_eq!(storage.get_item(ADMIN_FLAG_KEY).await.unwrap(), None);
    }
}
