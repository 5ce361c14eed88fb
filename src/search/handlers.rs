use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::session::AuthUser,
    error::ApiError,
    posts,
    search::dto::{SearchQuery, SearchResponse, UserHit},
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    AuthUser(_viewer): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    if params.q.is_empty() {
        return Ok(Json(SearchResponse {
            query: params.q,
            users: vec![],
            posts: vec![],
        }));
    }

    let users = User::search(&state.db, &params.q)
        .await?
        .into_iter()
        .map(UserHit::from)
        .collect();
    let posts = posts::repo::search(&state.db, &params.q).await?;

    Ok(Json(SearchResponse {
        query: params.q,
        users,
        posts,
    }))
}
