//! Signup and login form handlers.

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// Missing fields decode as empty and are rejected by the account service.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> ApiResult<Json<MessageResponse>> {
    let message = state
        .accounts()?
        .signup(&form.name, &form.email, &form.password)
        .await?;
    Ok(Json(MessageResponse { message }))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<MessageResponse>> {
    let message = state.accounts()?.login(&form.email, &form.password).await?;
    Ok(Json(MessageResponse { message }))
}
