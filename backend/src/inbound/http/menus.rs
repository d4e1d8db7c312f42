//! Menu API handlers.
//!
//! ```text
//! GET  /api/v1/messes/{id}/menu-posts
//! POST /api/v1/messes/{id}/menu-posts
//! GET  /api/v1/messes/{id}/menu-posts/history
//! GET  /api/v1/feed?area=Kothrud&mealType=lunch&vegOnly=true
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DEFAULT_MENU_TTL_HOURS, Error, FeedEntry, FeedFilter, MenuDraft, MenuPost, MenuPostView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_vocabulary, require};

/// A published menu.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuPostResponse {
    pub id: String,
    pub mess_id: String,
    pub meal_type: String,
    pub title: String,
    pub items: Vec<String>,
    pub is_veg: bool,
    pub price: Option<f64>,
    pub visible_from: String,
    pub expiry_time: String,
    pub created_at: String,
}

impl From<MenuPost> for MenuPostResponse {
    fn from(post: MenuPost) -> Self {
        Self {
            id: post.id.to_string(),
            mess_id: post.mess_id.to_string(),
            meal_type: post.meal_type.as_str().to_owned(),
            title: post.title,
            items: post.items,
            is_veg: post.is_veg,
            price: post.price,
            visible_from: post.visible_from.to_rfc3339(),
            expiry_time: post.expiry_time.to_rfc3339(),
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

/// A feed card: a live post with where it is served.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntryResponse {
    #[serde(flatten)]
    pub post: MenuPostResponse,
    pub mess_name: String,
    pub area_name: Option<String>,
}

impl From<FeedEntry> for FeedEntryResponse {
    fn from(entry: FeedEntry) -> Self {
        Self {
            post: MenuPostResponse::from(entry.post),
            mess_name: entry.mess_name,
            area_name: entry.area_name,
        }
    }
}

/// A past or present post with its liveness.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuHistoryEntryResponse {
    #[serde(flatten)]
    pub post: MenuPostResponse,
    pub live: bool,
}

impl From<MenuPostView> for MenuHistoryEntryResponse {
    fn from(view: MenuPostView) -> Self {
        Self {
            post: MenuPostResponse::from(view.post),
            live: view.live,
        }
    }
}

/// Request body for publishing a menu.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishMenuBody {
    /// `lunch` or `dinner`.
    pub meal_type: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub is_veg: bool,
    pub price: Option<f64>,
    /// Hours until the post expires; defaults to six.
    pub ttl_hours: Option<i64>,
}

/// Feed filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    /// Area name, matched exactly.
    pub area: Option<String>,
    pub meal_type: Option<String>,
    #[serde(default)]
    pub veg_only: bool,
}

fn parse_publish_body(mess: &str, body: PublishMenuBody) -> Result<MenuDraft, Error> {
    let meal = require(body.meal_type, FieldName::new("mealType"))?;
    Ok(MenuDraft {
        mess_id: parse_id(mess, FieldName::new("id"))?,
        meal_type: parse_vocabulary(&meal, FieldName::new("mealType"))?,
        title: require(body.title, FieldName::new("title"))?,
        items: body.items,
        is_veg: body.is_veg,
        price: body.price,
        ttl_hours: body.ttl_hours.unwrap_or(DEFAULT_MENU_TTL_HOURS),
    })
}

fn parse_feed_query(query: FeedQuery) -> Result<FeedFilter, Error> {
    Ok(FeedFilter {
        area: query.area.filter(|area| !area.trim().is_empty()),
        meal_type: query
            .meal_type
            .as_deref()
            .map(|meal| parse_vocabulary(meal, FieldName::new("mealType")))
            .transpose()?,
        veg_only: query.veg_only,
    })
}

/// Live menus of a mess, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/menu-posts",
    params(("id" = String, Path, description = "Mess id")),
    responses((status = 200, description = "Live menus", body = [MenuPostResponse])),
    tags = ["menus"],
    operation_id = "listMenuPosts",
    security([])
)]
#[get("/messes/{id}/menu-posts")]
pub async fn list_menu_posts(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MenuPostResponse>>> {
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let posts = state.menus_query.list_live(mess).await?;
    Ok(web::Json(posts.into_iter().map(MenuPostResponse::from).collect()))
}

/// Publish a menu.
#[utoipa::path(
    post,
    path = "/api/v1/messes/{id}/menu-posts",
    params(("id" = String, Path, description = "Mess id")),
    request_body = PublishMenuBody,
    responses(
        (status = 201, description = "Published", body = MenuPostResponse),
        (status = 400, description = "Invalid menu", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["menus"],
    operation_id = "publishMenuPost"
)]
#[post("/messes/{id}/menu-posts")]
pub async fn publish_menu_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PublishMenuBody>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let draft = parse_publish_body(&path.into_inner(), payload.into_inner())?;
    let post = state.menus.publish(&actor, draft).await?;
    Ok(HttpResponse::Created().json(MenuPostResponse::from(post)))
}

/// Every menu a mess published, with liveness.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/menu-posts/history",
    params(("id" = String, Path, description = "Mess id")),
    responses(
        (status = 200, description = "Menu history", body = [MenuHistoryEntryResponse]),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["menus"],
    operation_id = "menuHistory"
)]
#[get("/messes/{id}/menu-posts/history")]
pub async fn menu_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MenuHistoryEntryResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let views = state.menus_query.history(&actor, mess).await?;
    Ok(web::Json(views.into_iter().map(MenuHistoryEntryResponse::from).collect()))
}

/// Public feed of live menus across messes.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    params(FeedQuery),
    responses(
        (status = 200, description = "Feed", body = [FeedEntryResponse]),
        (status = 400, description = "Unknown meal type", body = Error)
    ),
    tags = ["menus"],
    operation_id = "menuFeed",
    security([])
)]
#[get("/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<Vec<FeedEntryResponse>>> {
    let filter = parse_feed_query(query.into_inner())?;
    let entries = state.menus_query.list_live_feed(filter).await?;
    Ok(web::Json(entries.into_iter().map(FeedEntryResponse::from).collect()))
}
