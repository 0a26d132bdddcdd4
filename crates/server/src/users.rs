//! Users API endpoints

use api_types::{
    pagination::{PageQuery, Pagination},
    user::{UserDto, UserPost, UserPut},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, headers::Allow};
use engine::UserEntity;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    ServerError,
    extract::Payload,
    negotiate::{self, Representation},
    patch,
    server::ServerState,
    validation::{self, FieldErrors, LOGIN_FORMAT_MESSAGE},
};

static X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

const DEFAULT_PAGE_NUMBER: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 20;

fn map_user(user: UserEntity) -> UserDto {
    UserDto {
        id: user.id,
        login: user.login,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}

fn map_post(post: UserPost) -> UserEntity {
    UserEntity::new(post.login, post.first_name, post.last_name)
}

fn map_update(user: &UserEntity) -> UserPut {
    UserPut {
        login: user.login.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

fn apply_update(user: &mut UserEntity, update: UserPut) {
    user.login = update.login;
    user.first_name = update.first_name;
    user.last_name = update.last_name;
}

fn not_found(user_id: Uuid) -> ServerError {
    ServerError::NotFound(format!("user {user_id} not found"))
}

fn header_value(value: &str) -> Result<HeaderValue, ServerError> {
    HeaderValue::from_str(value)
        .map_err(|err| ServerError::Internal(format!("invalid header value {value:?}: {err}")))
}

pub(crate) fn clamp_page_number(page_number: Option<i64>) -> usize {
    let page_number = page_number.unwrap_or(DEFAULT_PAGE_NUMBER).max(1);
    usize::try_from(page_number).unwrap_or(usize::MAX)
}

pub(crate) fn clamp_page_size(page_size: Option<i64>) -> usize {
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    usize::try_from(page_size).unwrap_or(1)
}

pub async fn get_user_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    tracing::debug!("looking up user {user_id}");
    let user = state.users.find_by_id(user_id).ok_or_else(|| not_found(user_id))?;

    Representation::from_accept(&headers).render(&map_user(user))
}

/// Same lookup as [`get_user_by_id`], answering with headers only.
pub async fn head_user_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if state.users.find_by_id(user_id).is_none() {
        return Err(not_found(user_id));
    }

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, negotiate::echo_accept(&headers))],
    )
        .into_response())
}

pub async fn create_user(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Payload(user): Payload<UserPost>,
) -> Result<Response, ServerError> {
    validation::validate(&user)?;
    if !validation::is_letters_or_digits(&user.login) {
        tracing::warn!("rejected login {:?}", user.login);
        return Err(FieldErrors::single("login", LOGIN_FORMAT_MESSAGE).into());
    }

    let created = state.users.insert(map_post(user))?;
    tracing::info!("created user {}", created.id);

    let location = header_value(&state.links.user(&headers, created.id))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created.id),
    )
        .into_response())
}

/// Full replace. An unknown id creates the user with that id.
pub async fn update_user(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Payload(update): Payload<UserPut>,
) -> Result<Response, ServerError> {
    if user_id.is_nil() {
        return Err(ServerError::Generic("user id must not be empty".to_string()));
    }
    validation::validate(&update)?;

    let mut user = state
        .users
        .find_by_id(user_id)
        .unwrap_or_else(|| UserEntity::with_id(user_id));
    apply_update(&mut user, update);

    let (stored, inserted) = state.users.upsert_by_id(user_id, user);
    if inserted {
        tracing::info!("created user {user_id} through upsert");
        return Ok((
            StatusCode::CREATED,
            [(header::LOCATION, HeaderValue::from_static("user"))],
            Json(stored),
        )
            .into_response());
    }

    tracing::info!("replaced user {user_id}");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Partial update through a patch document. Never creates a user.
///
/// The body must be a JSON array; its members are only decoded into
/// operations once the user is known to exist.
pub async fn partially_update_user(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Payload(operations): Payload<Vec<Value>>,
) -> Result<StatusCode, ServerError> {
    let mut user = state.users.find_by_id(user_id).ok_or_else(|| not_found(user_id))?;

    let patched = patch::parse(operations)
        .and_then(|document| patch::apply(&document, &map_update(&user)))
        .map_err(|err| {
            tracing::warn!("patch of user {user_id} failed: {err}");
            FieldErrors::from(err)
        })?;
    validation::validate(&patched)?;

    apply_update(&mut user, patched);
    state.users.update(user)?;
    tracing::info!("patched user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    if state.users.find_by_id(user_id).is_none() {
        return Err(not_found(user_id));
    }

    state.users.delete(user_id);
    tracing::info!("deleted user {user_id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_users(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let page_number = clamp_page_number(query.page_number);
    let page_size = clamp_page_size(query.page_size);

    let page = state.users.get_page(page_number, page_size).map(map_user);
    let total_pages = page.total_pages();

    let pagination = Pagination {
        previous_page_link: page
            .has_previous()
            .then(|| state.links.users_page(&headers, page_number - 1, page_size)),
        next_page_link: page
            .has_next()
            .then(|| state.links.users_page(&headers, page_number + 1, page_size)),
        total_count: page.total_count,
        page_size,
        current_page: page_number,
        total_pages,
    };
    let pagination = serde_json::to_string(&pagination)
        .map_err(|err| ServerError::Internal(format!("pagination header: {err}")))?;

    Ok((
        StatusCode::OK,
        [(X_PAGINATION.clone(), header_value(&pagination)?)],
        Json(page.items),
    )
        .into_response())
}

pub async fn options_users() -> impl IntoResponse {
    let allow: Allow = [Method::GET, Method::POST, Method::OPTIONS].into_iter().collect();
    (StatusCode::OK, TypedHeader(allow))
}
