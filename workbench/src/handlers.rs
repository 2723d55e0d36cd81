//! Console page handlers.
//!
//! Every POST handler runs one action against the session and redirects to
//! `/`, which renders the page from the updated session.

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use common::errors::AppError;
use common::models::{Credentials, RowLimit};

use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SelectDatabaseForm {
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDatabaseForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub sql: String,
    #[serde(default)]
    pub limit: String,
}

/// Renders the console.
pub async fn console(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let session = state.session.lock().await;
    views::render_console(&session)
}

pub async fn login(State(state): State<AppState>, Form(credentials): Form<Credentials>) -> Redirect {
    let mut session = state.session.lock().await;
    session.login(credentials).await;
    Redirect::to("/")
}

pub async fn select_database(
    State(state): State<AppState>,
    Form(form): Form<SelectDatabaseForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.select_database(form.database.as_deref()).await;
    Redirect::to("/")
}

pub async fn create_database(
    State(state): State<AppState>,
    Form(form): Form<CreateDatabaseForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.create_database(&form.name).await;
    Redirect::to("/")
}

pub async fn execute_query(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Redirect {
    let mut session = state.session.lock().await;
    match RowLimit::parse_form(&form.limit) {
        Ok(limit) => session.execute_query(&form.sql, limit).await,
        Err(e) => {
            session.form.query = form.sql;
            session.report(&e);
        }
    }
    Redirect::to("/")
}

pub async fn show_databases(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Redirect {
    run_shortcut(state, form, "SHOW DATABASES").await
}

pub async fn show_tables(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Redirect {
    run_shortcut(state, form, "SHOW TABLES").await
}

async fn run_shortcut(state: AppState, form: QueryForm, sql: &str) -> Redirect {
    let mut session = state.session.lock().await;
    // 保留查询框中尚未执行的内容
    session.form.query = form.sql;
    if let Ok(limit) = RowLimit::parse_form(&form.limit) {
        session.form.limit = limit;
    }
    session.run_shortcut(sql).await;
    Redirect::to("/")
}
