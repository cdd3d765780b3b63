//! Team membership handlers
//!
//! Served under `/team-employees`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_reference, filter_id, json_body, path_id};
use crate::domain::entities::{
    EmployeeBrief, EmployeeId, MembershipId, NewTeamMembership, TeamBrief, TeamId, TeamMembership,
};
use crate::domain::ports::{MembershipFilter, Page, Store};
use crate::error::{AppError, DomainError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListMembershipsQuery {
    pub team: Option<String>,
    pub employee: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Body of a create or update request: bare team and employee ids
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MembershipRequest {
    pub team: Option<Value>,
    pub employee: Option<Value>,
}

impl MembershipRequest {
    pub fn decode(self) -> Result<NewTeamMembership, DomainError> {
        Ok(NewTeamMembership {
            team_id: TeamId(decode_reference("team", self.team)?),
            employee_id: EmployeeId(decode_reference("employee", self.employee)?),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: MembershipId,
    pub team: TeamBrief,
    pub employee: EmployeeBrief,
    pub create_date: i64,
    pub update_date: i64,
}

async fn encode<S: Store>(
    state: &AppState<S>,
    membership: TeamMembership,
) -> Result<MembershipResponse, AppError> {
    let team = state.teams.get(&membership.team_id).await?.brief();
    let employee = state.employees.get(&membership.employee_id).await?.brief();

    Ok(MembershipResponse {
        id: membership.id,
        team,
        employee,
        create_date: membership.created_at.timestamp(),
        update_date: membership.updated_at.timestamp(),
    })
}

/// GET /team-employees
pub async fn list_memberships<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListMembershipsQuery>,
) -> Result<Json<Vec<MembershipResponse>>, AppError> {
    let filter = MembershipFilter {
        team_id: filter_id("team", query.team.as_deref())?.map(TeamId),
        employee_id: filter_id("employee", query.employee.as_deref())?.map(EmployeeId),
    };
    let memberships = state
        .memberships
        .list(&filter, Page::new(query.limit, query.offset))
        .await?;

    let mut responses = Vec::with_capacity(memberships.len());
    for membership in memberships {
        responses.push(encode(&state, membership).await?);
    }
    Ok(Json(responses))
}

/// GET /team-employees/:id
pub async fn get_membership<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MembershipResponse>, AppError> {
    let id = MembershipId(path_id(&id, "Team membership")?);
    let membership = state.memberships.get(&id).await?;

    Ok(Json(encode(&state, membership).await?))
}

/// POST /team-employees
pub async fn create_membership<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<MembershipRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MembershipResponse>), AppError> {
    let membership = json_body(payload)?.decode()?;
    let created = state.memberships.create(&membership).await?;

    Ok((StatusCode::CREATED, Json(encode(&state, created).await?)))
}

/// PUT /team-employees/:id
pub async fn update_membership<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<MembershipRequest>, JsonRejection>,
) -> Result<Json<MembershipResponse>, AppError> {
    let id = MembershipId(path_id(&id, "Team membership")?);
    let membership = json_body(payload)?.decode()?;
    let updated = state.memberships.update(&id, &membership).await?;

    Ok(Json(encode(&state, updated).await?))
}

/// DELETE /team-employees/:id
///
/// A team's leader cannot be removed from it.
pub async fn delete_membership<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = MembershipId(path_id(&id, "Team membership")?);
    state.memberships.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
