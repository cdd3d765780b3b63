//! Team handlers
//!
//! Endpoints for teams. Creating or updating a team also makes its leader a
//! member of it.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_reference, filter_id, json_body, path_id};
use crate::domain::entities::{EmployeeBrief, EmployeeId, NewTeam, Team, TeamId};
use crate::domain::ports::{Page, Store, TeamFilter};
use crate::error::{AppError, DomainError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListTeamsQuery {
    pub q: Option<String>,
    pub leader: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Body of a create or update request. `leader` is a bare employee id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamRequest {
    pub name: Option<String>,
    pub leader: Option<Value>,
}

impl TeamRequest {
    pub fn decode(self) -> Result<NewTeam, DomainError> {
        Ok(NewTeam {
            name: self.name.unwrap_or_default(),
            leader_id: EmployeeId(decode_reference("leader", self.leader)?),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    pub leader: EmployeeBrief,
    pub create_date: i64,
    pub update_date: i64,
}

impl TeamResponse {
    pub fn new(team: Team, leader: EmployeeBrief) -> Self {
        Self {
            id: team.id,
            name: team.name,
            leader,
            create_date: team.created_at.timestamp(),
            update_date: team.updated_at.timestamp(),
        }
    }
}

/// Expand the leader reference of a team
async fn encode<S: Store>(state: &AppState<S>, team: Team) -> Result<TeamResponse, AppError> {
    let leader = state.employees.get(&team.leader_id).await?.brief();
    Ok(TeamResponse::new(team, leader))
}

/// GET /teams
pub async fn list_teams<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListTeamsQuery>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let filter = TeamFilter {
        q: query.q.filter(|q| !q.is_empty()),
        leader_id: filter_id("leader", query.leader.as_deref())?.map(EmployeeId),
    };
    let teams = state
        .teams
        .list(&filter, Page::new(query.limit, query.offset))
        .await?;

    let mut responses = Vec::with_capacity(teams.len());
    for team in teams {
        responses.push(encode(&state, team).await?);
    }
    Ok(Json(responses))
}

/// GET /teams/:id
pub async fn get_team<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<TeamResponse>, AppError> {
    let id = TeamId(path_id(&id, "Team")?);
    let team = state.teams.get(&id).await?;

    Ok(Json(encode(&state, team).await?))
}

/// POST /teams
pub async fn create_team<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<TeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let team = json_body(payload)?.decode()?;
    let created = state.teams.create(&team).await?;

    Ok((StatusCode::CREATED, Json(encode(&state, created).await?)))
}

/// PUT /teams/:id
pub async fn update_team<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<TeamRequest>, JsonRejection>,
) -> Result<Json<TeamResponse>, AppError> {
    let id = TeamId(path_id(&id, "Team")?);
    let team = json_body(payload)?.decode()?;
    let updated = state.teams.update(&id, &team).await?;

    Ok(Json(encode(&state, updated).await?))
}

/// DELETE /teams/:id
///
/// Removes the team's memberships along with it.
pub async fn delete_team<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = TeamId(path_id(&id, "Team")?);
    state.teams.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
