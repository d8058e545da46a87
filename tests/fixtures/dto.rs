use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Serialize)]
pub struct User {
    /// Unique id
    pub id: u64,
    #[serde(rename = "userName")]
    pub name: String,
    pub roles: Vec<Role>,
    #[serde(skip)]
    pub password_hash: String,
    pub manager: Option<Box<User>>,
}

#[derive(Serialize)]
pub enum Role {
    Admin,
    Member,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
