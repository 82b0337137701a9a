use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, OrApiError},
        pagination::{paginate, PageQuery},
    },
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesListing {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Vec<String>,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesListing>> {
    let categories = categories::get_all_categories(&pool).await.or_bad_request()?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesListing {
        success: true,
        categories: categories.into_iter().map(|c| (c.id, c.name)).collect(),
    }))
}

async fn questions_in_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let Path(id) = id.or_not_found()?;
    let Query(PageQuery { page }) = query.or_not_found()?;

    let category = categories::get_category(&pool, id)
        .await
        .or_not_found()?
        .ok_or(ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, id)
        .await
        .or_not_found()?;

    Ok(Json(CategoryQuestions {
        success: true,
        questions: paginate(&questions, page),
        total_questions: questions.len(),
        current_category: vec![category.name],
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_in_category))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::testing::{app, get, seed, send};

    #[tokio::test]
    async fn lists_categories_by_id() {
        let (app, pool) = app().await;
        seed(&pool, 0).await;

        let (status, body) = send(&app, get("/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "categories": {"1": "Science", "2": "Art"}})
        );
    }

    #[tokio::test]
    async fn no_categories_is_not_found() {
        let (app, _pool) = app().await;

        let (status, body) = send(&app, get("/categories")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], "requested resource not found");
    }

    #[tokio::test]
    async fn filters_questions_by_category() {
        let (app, pool) = app().await;
        let (_, art) = seed(&pool, 25).await;

        let (status, body) = send(&app, get(&format!("/categories/{art}/questions"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total_questions"], 12);
        assert_eq!(body["current_category"], json!(["Art"]));
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 10);
        assert!(questions.iter().all(|q| q["category"] == art));

        let (_, body) = send(&app, get(&format!("/categories/{art}/questions?page=2"))).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_questions"], 12);
    }

    #[tokio::test]
    async fn category_without_questions_is_empty() {
        let (app, pool) = app().await;
        seed(&pool, 0).await;

        let (status, body) = send(&app, get("/categories/1/questions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"], json!([]));
        assert_eq!(body["total_questions"], 0);
        assert_eq!(body["current_category"], json!(["Science"]));
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let (app, pool) = app().await;
        seed(&pool, 4).await;

        let (status, body) = send(&app, get("/categories/3/questions")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], 404);

        let (status, _) = send(&app, get("/categories/science/questions")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sparse_category_ids_are_found() {
        let (app, pool) = app().await;
        seed(&pool, 0).await;
        crate::db::queries::categories::delete_category(&pool, 1)
            .await
            .unwrap();

        let (status, body) = send(&app, get("/categories/2/questions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_category"], json!(["Art"]));
    }
}
