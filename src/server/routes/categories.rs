use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        DbPool, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::{ApiPath, ApiQuery},
        pagination::PageQuery,
    },
};

use super::{questions::current_category_labels, ApiResponse};

#[derive(Serialize)]
struct CategoriesPage {
    success: bool,
    categories: BTreeMap<i32, String>,
    totals_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsPage {
    success: bool,
    questions: Vec<Question>,
    current_category: Vec<Option<String>>,
    totals_questions: usize,
}

async fn get_categories(
    State(pool): State<DbPool>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResponse<CategoriesPage> {
    let categories = get_all_categories(&pool).await?;
    page.slice(&categories)?;

    Ok(Json(CategoriesPage {
        success: true,
        totals_categories: categories.len(),
        categories: categories.into_iter().map(|c| (c.id, c.label)).collect(),
    }))
}

async fn questions_for_category(
    State(pool): State<DbPool>,
    ApiPath(category): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResponse<CategoryQuestionsPage> {
    // ids are integers, any other segment cannot match a stored category
    let category: i32 = category.trim().parse().map_err(|_| ApiError::NotFound)?;
    let questions = get_questions_for_category(&pool, category).await?;
    let current = page.slice(&questions)?;
    let current_category = current_category_labels(&pool, current).await?;

    Ok(Json(CategoryQuestionsPage {
        success: true,
        questions: current.to_vec(),
        current_category,
        totals_questions: questions.len(),
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/category/{category}/questions", get(questions_for_category))
        .with_state(state)
}
