use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::{ApiError, OrApiError},
        pagination::{paginate, PageQuery},
    },
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuestionForm {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Vec<String>,
    categories: Vec<String>,
}

#[derive(Serialize)]
struct DeletedQuestion {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

impl QuestionForm {
    fn into_new_question(self) -> Option<NewQuestion> {
        Some(NewQuestion {
            question: self.question?,
            answer: self.answer?,
            category: self.category?,
            difficulty: self.difficulty?,
        })
    }
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Query(PageQuery { page }) = query.or_bad_request()?;

    let questions = questions::get_all_questions(&pool).await.or_bad_request()?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = categories::get_all_categories(&pool)
        .await
        .or_bad_request()?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(&questions, page),
        total_questions: questions.len(),
        current_category: vec![],
        categories: categories.into_iter().map(|c| c.name).collect(),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<DeletedQuestion>> {
    let Path(id) = id.or_not_found()?;
    let Query(PageQuery { page }) = query.or_unprocessable()?;

    let deleted = questions::delete_question(&pool, id)
        .await
        .or_unprocessable()?;
    if deleted == 0 {
        tracing::info!(id, "no question to delete");
        return Err(ApiError::Unprocessable);
    }
    tracing::info!(id, "question deleted");

    let remaining = questions::get_all_questions(&pool)
        .await
        .or_unprocessable()?;
    Ok(Json(DeletedQuestion {
        success: true,
        deleted: id,
        questions: paginate(&remaining, page),
        total_questions: remaining.len(),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
    form: Result<Json<QuestionForm>, JsonRejection>,
) -> ApiResponse<Json<CreatedQuestion>> {
    let Query(PageQuery { page }) = query.or_unprocessable()?;
    let Json(form) = form.or_unprocessable()?;
    let new_question = form.into_new_question().ok_or_else(|| {
        tracing::info!("question is missing a required field");
        ApiError::Unprocessable
    })?;

    if !categories::category_exists(&pool, new_question.category)
        .await
        .or_unprocessable()?
    {
        tracing::info!(category = new_question.category, "unknown category");
        return Err(ApiError::Unprocessable);
    }

    let id = questions::create_question(&pool, &new_question)
        .await
        .or_unprocessable()?;
    tracing::info!(id, "question created");

    let all = questions::get_all_questions(&pool)
        .await
        .or_unprocessable()?;
    Ok(Json(CreatedQuestion {
        success: true,
        created: id,
        questions: paginate(&all, page),
        total_questions: all.len(),
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(SearchBody { search_term }) = body.or_bad_request()?;
    let term = search_term
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::BadRequest)?;

    let found = questions::search_questions(&pool, term)
        .await
        .or_bad_request()?;
    Ok(Json(SearchResults {
        success: true,
        total_questions: found.len(),
        questions: found,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search", get(search_questions).post(search_questions))
        .with_state(state)
}
