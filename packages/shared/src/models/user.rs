use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub administrator: bool,
    pub registered: bool,
    pub guest: bool,
    pub registration_date: NaiveDate,
}

impl User {
    /// A freshly registered account. `user_id` is the identifier handed out by
    /// the identity provider.
    pub fn new(user_id: &str, username: &str, email: &str, administrator: bool) -> Self {
        User {
            user_id: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            administrator,
            registered: true,
            guest: false,
            registration_date: Utc::now().date_naive(),
        }
    }
}

/// The authenticated caller of an operation. Passed explicitly to every
/// service call that checks ownership or role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub administrator: bool,
}

impl Principal {
    pub fn new(user_id: &str, administrator: bool) -> Self {
        Principal {
            user_id: user_id.to_string(),
            administrator,
        }
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal::new(&user.user_id, user.administrator)
    }
}
