// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod error;
pub mod page;

pub use error::AppError;

use anyhow::Result;
use axum::Router;
use axum::extract::{Form, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use handlebars::Handlebars;
use partsheet_app::{
    Gateway, LoadedInventory, Notice, PartFormFields, PartFormInput, SAVED_MESSAGE,
    SubmitOutcome, ViewKind, load_or_fallback, submit_part,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::page::PageContext;

pub const SAVED_LOCATION: &str = "/?view=add&saved=1";

#[derive(Clone)]
pub struct WebState {
    gateway: Arc<dyn Gateway>,
    templates: Arc<Handlebars<'static>>,
}

pub fn router(gateway: Arc<dyn Gateway>) -> Result<Router> {
    let state = WebState {
        gateway,
        templates: Arc::new(page::templates()?),
    };
    Ok(Router::new()
        .route("/", get(show_page))
        .route("/parts", post(submit))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub view: Option<String>,
    pub q: Option<String>,
    pub saved: Option<String>,
}

async fn health() -> &'static str {
    "ok"
}

async fn show_page(
    State(state): State<WebState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let view = ViewKind::from_selection(query.view.as_deref());
    let gateway = Arc::clone(&state.gateway);
    let loaded = tokio::task::spawn_blocking(move || load_or_fallback(gateway.as_ref())).await?;
    let mut notices = read_notices(&loaded);

    let page = match view {
        ViewKind::Inventory => {
            PageContext::inventory(&loaded.table, query.q.as_deref().unwrap_or_default(), &notices)
        }
        ViewKind::AddRecord => {
            // Stateless: a hand-typed `saved=1` shows the notice too.
            if query.saved.as_deref() == Some("1") {
                notices.push(Notice::success(SAVED_MESSAGE));
            }
            PageContext::add_record(&PartFormInput::blank(), &notices)
        }
    };
    Ok(Html(page::render(&state.templates, &page)?))
}

async fn submit(
    State(state): State<WebState>,
    Form(fields): Form<PartFormFields>,
) -> Result<Response, AppError> {
    let form = PartFormInput::from_fields(&fields);
    let gateway = Arc::clone(&state.gateway);
    let submitted = form.clone();
    let (loaded, outcome) = tokio::task::spawn_blocking(move || -> Result<_> {
        let loaded = load_or_fallback(gateway.as_ref());
        let outcome = submit_part(gateway.as_ref(), &loaded.table, &submitted)?;
        Ok((loaded, outcome))
    })
    .await??;

    let mut notices = read_notices(&loaded);
    match outcome {
        SubmitOutcome::Saved(_) => return Ok(Redirect::to(SAVED_LOCATION).into_response()),
        SubmitOutcome::MissingFields(message) => notices.push(Notice::warning(message)),
        SubmitOutcome::DuplicateCode(message) => notices.push(Notice::error(message)),
    }
    let page = PageContext::add_record(&form, &notices);
    Ok(Html(page::render(&state.templates, &page)?).into_response())
}

fn read_notices(loaded: &LoadedInventory) -> Vec<Notice> {
    loaded.error.iter().cloned().map(Notice::error).collect()
}
