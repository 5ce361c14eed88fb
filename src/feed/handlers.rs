use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::session::{AuthUser, MaybeAuthUser},
    error::ApiError,
    feed::{
        dto::{
            FeedPost, FeedQuery, FeedResponse, HomeResponse, PageInfo, SuggestedUser,
            FEED_PAGE_SIZE,
        },
        repo,
    },
    state::AppState,
    users::repo::User,
};

const SUGGESTED_USERS: i64 = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/feed", get(api_feed))
}

#[instrument(skip(state))]
async fn home(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> Result<Json<HomeResponse>, ApiError> {
    let Some(user_id) = user else {
        return Ok(Json(HomeResponse {
            authenticated: false,
            posts: vec![],
            suggested_users: vec![],
        }));
    };

    let posts = repo::feed_all(&state.db, user_id)
        .await?
        .into_iter()
        .map(FeedPost::from)
        .collect();
    let suggested_users = User::suggested(&state.db, user_id, SUGGESTED_USERS)
        .await?
        .into_iter()
        .map(SuggestedUser::from)
        .collect();

    Ok(Json(HomeResponse {
        authenticated: true,
        posts,
        suggested_users,
    }))
}

#[instrument(skip(state))]
async fn api_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let total = repo::feed_total(&state.db, user_id).await?;
    let info = PageInfo::compute(total, query.page, FEED_PAGE_SIZE);

    let items = repo::feed_page(
        &state.db,
        user_id,
        FEED_PAGE_SIZE,
        info.offset(FEED_PAGE_SIZE),
    )
    .await?;

    Ok(Json(FeedResponse {
        posts: items.into_iter().map(FeedPost::from).collect(),
        has_next: info.has_next,
        has_prev: info.has_prev,
        page: info.page,
        pages: info.pages,
    }))
}
