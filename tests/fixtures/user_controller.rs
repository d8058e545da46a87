use actix_web::{get, post, route, scope, web, web::Json};
use actix_web_httpauth::headers::authorization::Authorization;
use crate::dto::{NewUser, User};
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResult<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

/// User accounts.
#[api_doc]
pub struct UserController;

#[scope("/api/users")]
impl UserController {
    /// Gets a user.
    ///
    /// @param auth bearer token
    /// @param id user id
    #[get("/{id}")]
    pub async fn get(&self, auth: TypedHeader<Authorization>, id: web::Path<u64>) -> Json<ApiResult<User>> {
        unimplemented!()
    }

    /// Lists users.
    #[route("/", method = "GET", method = "HEAD")]
    pub async fn list(&self) -> Json<ApiResult<Vec<User>>> {
        unimplemented!()
    }

    /// Registers a user.
    ///
    /// @param user the new account
    #[post("/register")]
    pub async fn create(&self, user: Json<NewUser>) -> Json<ApiResult<User>> {
        unimplemented!()
    }
}
