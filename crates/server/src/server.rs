use axum::{Router, routing::get};
use engine::UserRepository;

use std::sync::Arc;

use crate::{
    links::{LinkGenerator, USERS_PATH},
    users,
};

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<dyn UserRepository>,
    pub links: LinkGenerator,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, links: LinkGenerator) -> Self {
        Self { users, links }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            USERS_PATH,
            get(users::get_users)
                .post(users::create_user)
                .options(users::options_users),
        )
        .route(
            &format!("{USERS_PATH}/{{user_id}}"),
            get(users::get_user_by_id)
                .head(users::head_user_by_id)
                .put(users::update_user)
                .patch(users::partially_update_user)
                .delete(users::delete_user),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
