//! Employment API Server
//!
//! HR record keeping: employees, teams, team memberships and work
//! arrangements, plus salaries derived from them.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresEmployeeRepository, PostgresMembershipRepository, PostgresStore,
    PostgresTeamRepository, PostgresWorkArrangementRepository,
};
use app::{EmployeeService, MembershipService, SalaryService, TeamService, WorkArrangementService};
use config::Config;
use domain::entities::SalaryPolicy;
use domain::ports::Store;

/// Application state shared across all handlers
pub struct AppState<S: Store> {
    pub employees: Arc<EmployeeService<S::Employees>>,
    pub teams: Arc<TeamService<S::Teams, S::Employees, S::Memberships>>,
    pub memberships: Arc<MembershipService<S::Memberships, S::Teams, S::Employees>>,
    pub arrangements: Arc<WorkArrangementService<S::WorkArrangements, S::Employees>>,
    pub salaries: Arc<SalaryService<S::Employees, S::Teams, S::WorkArrangements>>,
}

impl<S: Store> AppState<S> {
    pub fn new(
        employee_repo: Arc<S::Employees>,
        team_repo: Arc<S::Teams>,
        membership_repo: Arc<S::Memberships>,
        arrangement_repo: Arc<S::WorkArrangements>,
        salary_policy: SalaryPolicy,
    ) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(employee_repo.clone())),
            teams: Arc::new(TeamService::new(
                team_repo.clone(),
                employee_repo.clone(),
                membership_repo.clone(),
            )),
            memberships: Arc::new(MembershipService::new(
                membership_repo,
                team_repo.clone(),
                employee_repo.clone(),
            )),
            arrangements: Arc::new(WorkArrangementService::new(
                arrangement_repo.clone(),
                employee_repo.clone(),
            )),
            salaries: Arc::new(SalaryService::new(
                employee_repo,
                team_repo,
                arrangement_repo,
                salary_policy,
            )),
        }
    }
}

impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            employees: self.employees.clone(),
            teams: self.teams.clone(),
            memberships: self.memberships.clone(),
            arrangements: self.arrangements.clone(),
            salaries: self.salaries.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router over any store
pub fn router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Employees
        .route(
            "/employees",
            get(handlers::list_employees::<S>).post(handlers::create_employee::<S>),
        )
        .route(
            "/employees/:id",
            get(handlers::get_employee::<S>)
                .put(handlers::update_employee::<S>)
                .delete(handlers::delete_employee::<S>),
        )
        // Teams
        .route(
            "/teams",
            get(handlers::list_teams::<S>).post(handlers::create_team::<S>),
        )
        .route(
            "/teams/:id",
            get(handlers::get_team::<S>)
                .put(handlers::update_team::<S>)
                .delete(handlers::delete_team::<S>),
        )
        // Team memberships
        .route(
            "/team-employees",
            get(handlers::list_memberships::<S>).post(handlers::create_membership::<S>),
        )
        .route(
            "/team-employees/:id",
            get(handlers::get_membership::<S>)
                .put(handlers::update_membership::<S>)
                .delete(handlers::delete_membership::<S>),
        )
        // Work arrangements
        .route(
            "/work-arrangements",
            get(handlers::list_work_arrangements::<S>)
                .post(handlers::create_work_arrangement::<S>),
        )
        .route(
            "/work-arrangements/:id",
            get(handlers::get_work_arrangement::<S>)
                .put(handlers::update_work_arrangement::<S>)
                .delete(handlers::delete_work_arrangement::<S>),
        )
        // Salaries (computed, read-only)
        .route("/salaries", get(handlers::get_salaries::<S>))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,employment_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Employment API...");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;
    tracing::info!(
        full_time_hours = %config.salary.full_time_hours,
        leader_coefficient = %config.salary.leader_coefficient,
        "Salary policy loaded"
    );

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters and app state
    let state = AppState::<PostgresStore>::new(
        Arc::new(PostgresEmployeeRepository::new(db.clone())),
        Arc::new(PostgresTeamRepository::new(db.clone())),
        Arc::new(PostgresMembershipRepository::new(db.clone())),
        Arc::new(PostgresWorkArrangementRepository::new(db)),
        config.salary,
    );

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
