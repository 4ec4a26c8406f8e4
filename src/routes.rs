use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use tracing::{debug, info};

use crate::{
    AppState, csrf,
    error::{AppError, AppResult},
    models::{AddForm, EditForm, FindQuery, FormErrors, IdQuery},
    templates,
};

pub async fn home(State(state): State<AppState>) -> AppResult<Html<String>> {
    let movies = state.store.list_ranked().await?;
    debug!(count = movies.len(), "rendering ranked list");
    Ok(Html(templates::home_page(&movies)))
}

pub async fn add_form(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, token) = csrf::issue(jar);
    (jar, Html(templates::add_page(&token, "", &FormErrors::default())))
}

pub async fn add_search(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AddForm>,
) -> AppResult<Response> {
    let csrf_ok = csrf::verify(&jar, &form.csrf_token);
    let (jar, token) = csrf::issue(jar);

    let title = match form.validate(csrf_ok) {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&token, &form.title, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, jar, Html(body)).into_response());
        },
    };

    info!(title = %title, "searching movie database");
    let candidates = state.tmdb.search_movie(title).await?;
    Ok((jar, Html(templates::select_page(title, &candidates))).into_response())
}

pub async fn find(
    State(state): State<AppState>,
    Query(q): Query<FindQuery>,
) -> AppResult<Redirect> {
    let new_movie = state.tmdb.movie_details(q.id).await?;
    let movie = state.store.insert(new_movie).await?;
    info!(id = movie.id, tmdb_id = q.id, title = %movie.title, "movie added");
    Ok(Redirect::to(&format!("/update?id={}", movie.id)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<Response> {
    let movie = state.store.get(q.id).await?.ok_or_else(|| not_found(q.id))?;
    let (jar, token) = csrf::issue(jar);

    let rating = movie.rating.map(templates::format_rating).unwrap_or_default();
    let review = movie.review.clone().unwrap_or_default();
    let body = templates::edit_page(&movie, &token, &rating, &review, &FormErrors::default());
    Ok((jar, Html(body)).into_response())
}

pub async fn edit_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<IdQuery>,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let movie = state.store.get(q.id).await?.ok_or_else(|| not_found(q.id))?;
    let csrf_ok = csrf::verify(&jar, &form.csrf_token);

    let (rating, review) = match form.validate(csrf_ok) {
        Ok(valid) => valid,
        Err(errors) => {
            let (jar, token) = csrf::issue(jar);
            let body = templates::edit_page(&movie, &token, &form.rating, &form.review, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, jar, Html(body)).into_response());
        },
    };

    state.store.update_review(q.id, rating, review).await?.ok_or_else(|| not_found(q.id))?;
    info!(id = q.id, rating, "movie rated");
    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    if !state.store.delete(q.id).await? {
        return Err(not_found(q.id));
    }
    info!(id = q.id, "movie deleted");
    Ok(Redirect::to("/"))
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("There is no movie with id {id} in your list."))
}
