//! Poll API handlers.
//!
//! ```text
//! GET  /api/v1/messes/{id}/polls
//! POST /api/v1/messes/{id}/polls
//! POST /api/v1/polls/{id}/votes {"optionIndex":1}
//! POST /api/v1/polls/{id}/close
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::VoteReceipt;
use crate::domain::{DEFAULT_POLL_DEADLINE_HOURS, Error, Poll, PollDraft, PollSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_vocabulary, require};

/// A poll as seen by the caller.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub mess_id: String,
    pub target_meal: String,
    pub title: String,
    pub options: Vec<String>,
    pub deadline: String,
    /// Derived from the deadline as well as the stored flag.
    pub closed: bool,
    pub winning_option: Option<usize>,
    pub vote_count: u64,
    /// Option the caller chose, if they voted.
    pub my_vote: Option<usize>,
    pub created_at: String,
}

impl PollResponse {
    fn fresh(poll: Poll) -> Self {
        Self::from(PollSummary {
            poll,
            vote_count: 0,
            closed: false,
            viewer_vote: None,
        })
    }
}

impl From<PollSummary> for PollResponse {
    fn from(summary: PollSummary) -> Self {
        let PollSummary {
            poll,
            vote_count,
            closed,
            viewer_vote,
        } = summary;
        Self {
            id: poll.id.to_string(),
            mess_id: poll.mess_id.to_string(),
            target_meal: poll.target_meal.as_str().to_owned(),
            title: poll.title,
            options: poll.options,
            deadline: poll.deadline.to_rfc3339(),
            closed,
            winning_option: poll.winning_option,
            vote_count,
            my_vote: viewer_vote,
            created_at: poll.created_at.to_rfc3339(),
        }
    }
}

/// Result of a vote.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub poll_id: String,
    pub option_index: usize,
    pub vote_count: u64,
}

impl From<VoteReceipt> for VoteResponse {
    fn from(receipt: VoteReceipt) -> Self {
        Self {
            poll_id: receipt.poll_id.to_string(),
            option_index: receipt.option_index,
            vote_count: receipt.vote_count,
        }
    }
}

/// Request body for opening a poll.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollBody {
    /// `lunch` or `dinner`.
    pub target_meal: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    /// Hours until voting closes; defaults to 24.
    pub deadline_hours: Option<i64>,
}

/// Request body for voting.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub option_index: Option<usize>,
}

fn parse_create_body(mess: &str, body: CreatePollBody) -> Result<PollDraft, Error> {
    let meal = require(body.target_meal, FieldName::new("targetMeal"))?;
    Ok(PollDraft {
        mess_id: parse_id(mess, FieldName::new("id"))?,
        target_meal: parse_vocabulary(&meal, FieldName::new("targetMeal"))?,
        title: require(body.title, FieldName::new("title"))?,
        options: body.options,
        deadline_hours: body.deadline_hours.unwrap_or(DEFAULT_POLL_DEADLINE_HOURS),
    })
}

/// Polls of a mess, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/polls",
    params(("id" = String, Path, description = "Mess id")),
    responses(
        (status = 200, description = "Polls", body = [PollResponse]),
        (status = 403, description = "Neither member nor manager", body = Error)
    ),
    tags = ["polls"],
    operation_id = "listPolls"
)]
#[get("/messes/{id}/polls")]
pub async fn list_polls(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PollResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let summaries = state.polls_query.list_for_mess(&actor, mess).await?;
    Ok(web::Json(summaries.into_iter().map(PollResponse::from).collect()))
}

/// Open a poll.
#[utoipa::path(
    post,
    path = "/api/v1/messes/{id}/polls",
    params(("id" = String, Path, description = "Mess id")),
    request_body = CreatePollBody,
    responses(
        (status = 201, description = "Poll opened", body = PollResponse),
        (status = 400, description = "Invalid poll", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["polls"],
    operation_id = "createPoll"
)]
#[post("/messes/{id}/polls")]
pub async fn create_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreatePollBody>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let draft = parse_create_body(&path.into_inner(), payload.into_inner())?;
    let poll = state.polls.create(&actor, draft).await?;
    Ok(HttpResponse::Created().json(PollResponse::fresh(poll)))
}

/// Cast the caller's single vote.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{id}/votes",
    params(("id" = String, Path, description = "Poll id")),
    request_body = VoteBody,
    responses(
        (status = 200, description = "Vote counted", body = VoteResponse),
        (status = 400, description = "Option out of range", body = Error),
        (status = 404, description = "Unknown poll", body = Error),
        (status = 409, description = "Already voted or poll closed", body = Error),
        (status = 422, description = "No active membership", body = Error)
    ),
    tags = ["polls"],
    operation_id = "castVote"
)]
#[post("/polls/{id}/votes")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VoteBody>,
) -> ApiResult<web::Json<VoteResponse>> {
    let actor = require_actor(&state, &session).await?;
    let poll = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let option = require(payload.into_inner().option_index, FieldName::new("optionIndex"))?;
    let receipt = state.polls.cast_vote(&actor, poll, option).await?;
    Ok(web::Json(VoteResponse::from(receipt)))
}

/// Close a poll and record its winner.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{id}/close",
    params(("id" = String, Path, description = "Poll id")),
    responses(
        (status = 200, description = "Poll closed", body = PollResponse),
        (status = 403, description = "Not this mess's manager", body = Error),
        (status = 404, description = "Unknown poll", body = Error)
    ),
    tags = ["polls"],
    operation_id = "closePoll"
)]
#[post("/polls/{id}/close")]
pub async fn close_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollResponse>> {
    let actor = require_actor(&state, &session).await?;
    let poll = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let summary = state.polls.close(&actor, poll).await?;
    Ok(web::Json(PollResponse::from(summary)))
}
