//! Work arrangement handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_reference, filter_id, json_body, path_id};
use crate::domain::entities::{
    EmployeeBrief, EmployeeId, NewWorkArrangement, WorkArrangement, WorkArrangementId, WorkType,
};
use crate::domain::ports::{Page, Store, WorkArrangementFilter};
use crate::domain::rules::validate_percentage;
use crate::error::{AppError, DomainError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListWorkArrangementsQuery {
    pub employee: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Body of a create or update request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WorkArrangementRequest {
    pub employee: Option<Value>,
    #[serde(rename = "type")]
    pub work_type: Option<Value>,
    pub percentage: Option<Value>,
}

impl WorkArrangementRequest {
    pub fn decode(self) -> Result<NewWorkArrangement, DomainError> {
        Ok(NewWorkArrangement {
            employee_id: EmployeeId(decode_reference("employee", self.employee)?),
            work_type: decode_work_type(self.work_type)?,
            percentage: decode_percentage(self.percentage)?,
        })
    }
}

fn decode_work_type(value: Option<Value>) -> Result<WorkType, DomainError> {
    const FIELD: &str = "type";

    match value {
        None | Some(Value::Null) => Err(DomainError::required(FIELD)),
        Some(Value::String(s)) if s.is_empty() => Err(DomainError::required(FIELD)),
        Some(Value::String(s)) => s.parse().map_err(|_| {
            DomainError::invalid_format(
                FIELD,
                format!("\"{}\" is not a valid choice (full_time, part_time).", s),
            )
        }),
        Some(other) => Err(DomainError::invalid_format(
            FIELD,
            format!("\"{}\" is not a valid choice (full_time, part_time).", other),
        )),
    }
}

fn decode_percentage(value: Option<Value>) -> Result<Option<i16>, DomainError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(p) => validate_percentage(Some(p)),
            None => Err(DomainError::invalid_format(
                "percentage",
                "A valid integer is required.",
            )),
        },
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(p) => validate_percentage(Some(p)),
            Err(_) => Err(DomainError::invalid_format(
                "percentage",
                "A valid integer is required.",
            )),
        },
        Some(_) => Err(DomainError::invalid_format(
            "percentage",
            "A valid integer is required.",
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct WorkArrangementResponse {
    pub id: WorkArrangementId,
    pub employee: EmployeeBrief,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub percentage: Option<i16>,
    pub create_date: i64,
    pub update_date: i64,
}

impl WorkArrangementResponse {
    pub fn new(arrangement: WorkArrangement, employee: EmployeeBrief) -> Self {
        Self {
            id: arrangement.id,
            employee,
            work_type: arrangement.work_type,
            percentage: arrangement.percentage,
            create_date: arrangement.created_at.timestamp(),
            update_date: arrangement.updated_at.timestamp(),
        }
    }
}

async fn encode<S: Store>(
    state: &AppState<S>,
    arrangement: WorkArrangement,
) -> Result<WorkArrangementResponse, AppError> {
    let employee = state.employees.get(&arrangement.employee_id).await?.brief();
    Ok(WorkArrangementResponse::new(arrangement, employee))
}

/// GET /work-arrangements
pub async fn list_work_arrangements<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListWorkArrangementsQuery>,
) -> Result<Json<Vec<WorkArrangementResponse>>, AppError> {
    let filter = WorkArrangementFilter {
        employee_id: filter_id("employee", query.employee.as_deref())?.map(EmployeeId),
    };
    let arrangements = state
        .arrangements
        .list(&filter, Page::new(query.limit, query.offset))
        .await?;

    let mut responses = Vec::with_capacity(arrangements.len());
    for arrangement in arrangements {
        responses.push(encode(&state, arrangement).await?);
    }
    Ok(Json(responses))
}

/// GET /work-arrangements/:id
pub async fn get_work_arrangement<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<WorkArrangementResponse>, AppError> {
    let id = WorkArrangementId(path_id(&id, "Work arrangement")?);
    let arrangement = state.arrangements.get(&id).await?;

    Ok(Json(encode(&state, arrangement).await?))
}

/// POST /work-arrangements
pub async fn create_work_arrangement<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<WorkArrangementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkArrangementResponse>), AppError> {
    let arrangement = json_body(payload)?.decode()?;
    let created = state.arrangements.create(&arrangement).await?;

    Ok((StatusCode::CREATED, Json(encode(&state, created).await?)))
}

/// PUT /work-arrangements/:id
pub async fn update_work_arrangement<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<WorkArrangementRequest>, JsonRejection>,
) -> Result<Json<WorkArrangementResponse>, AppError> {
    let id = WorkArrangementId(path_id(&id, "Work arrangement")?);
    let arrangement = json_body(payload)?.decode()?;
    let updated = state.arrangements.update(&id, &arrangement).await?;

    Ok(Json(encode(&state, updated).await?))
}

/// DELETE /work-arrangements/:id
pub async fn delete_work_arrangement<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = WorkArrangementId(path_id(&id, "Work arrangement")?);
    state.arrangements.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
