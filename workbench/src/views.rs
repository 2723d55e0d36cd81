//! View model for the console page.
//!
//! Turns the session into plain strings and flags so the template holds no
//! logic beyond loops and conditionals.

use askama::Template;
use axum::response::Html;

use common::errors::{AppError, AppResult};
use common::models::{Catalog, RowLimit};

use crate::presenter::ResultGrid;
use crate::session::Session;

/// Placeholder entry of the database selector.
pub const NO_DATABASE_SELECTED: &str = "No Database Selected";

pub struct MessageView {
    pub css_class: &'static str,
    pub text: String,
}

pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "console.html")]
pub struct ConsoleView {
    pub host: String,
    pub port: String,
    pub user: String,
    pub server_connected: bool,
    pub database_options: Vec<OptionView>,
    pub catalog_error: Option<String>,
    pub new_database: String,
    pub messages: Vec<MessageView>,
    pub database_connected: bool,
    pub show_tables_label: String,
    pub query: String,
    pub limit_options: Vec<OptionView>,
    pub grid: Option<ResultGrid>,
}

impl From<&Session> for ConsoleView {
    fn from(session: &Session) -> Self {
        let form = &session.form;
        let selected = form.selected_database.as_deref().unwrap_or("");

        let mut database_options = vec![OptionView {
            value: String::new(),
            label: NO_DATABASE_SELECTED.to_string(),
            selected: selected.is_empty(),
        }];
        database_options.extend(session.catalog().names().iter().map(|name| OptionView {
            value: name.clone(),
            label: name.clone(),
            selected: name == selected,
        }));

        let catalog_error = match session.catalog() {
            Catalog::Unavailable { reason } => Some(reason.clone()),
            _ => None,
        };

        let current_database = session.current_database();

        Self {
            host: form.host.clone(),
            port: form.port.clone(),
            user: form.user.clone(),
            server_connected: session.has_server_connection(),
            database_options,
            catalog_error,
            new_database: form.new_database.clone(),
            messages: session
                .messages()
                .iter()
                .map(|m| MessageView {
                    css_class: m.severity.css_class(),
                    text: m.text.clone(),
                })
                .collect(),
            database_connected: current_database.is_some(),
            show_tables_label: format!("Show Tables of {}", current_database.unwrap_or("Database")),
            query: form.query.clone(),
            limit_options: RowLimit::options()
                .map(|limit| OptionView {
                    value: limit.form_value(),
                    label: limit.label(),
                    selected: limit == form.limit,
                })
                .collect(),
            grid: session.result().map(ResultGrid::from),
        }
    }
}

/// Renders the whole console page from the session.
pub fn render_console(session: &Session) -> AppResult<Html<String>> {
    ConsoleView::from(session)
        .render()
        .map(Html)
        .map_err(|e| {
            tracing::error!(error = %e, "页面渲染失败");
            AppError::Template(e.to_string())
        })
}
