use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{
        queries::{categories, questions},
        DbPool, NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::{ApiJson, ApiPath, ApiQuery},
        pagination::PageQuery,
    },
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuestionForm {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i32>,
}

impl TryFrom<QuestionForm> for NewQuestion {
    type Error = ApiError;

    fn try_from(form: QuestionForm) -> Result<Self, Self::Error> {
        match form {
            QuestionForm {
                question: Some(question),
                answer: Some(answer),
                category: Some(category),
                difficulty: Some(difficulty),
            } => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(ApiError::BadRequest),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    categories: BTreeMap<i32, String>,
    current_category: Vec<Option<String>>,
    totals_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    current_category: Vec<Option<String>>,
    totals_questions: usize,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i32,
    questions: Question,
    totals_questions: i64,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i32,
    questions: Question,
    totals_questions: i64,
}

/// Category label for each question, in order, resolved with a single query.
pub(super) async fn current_category_labels(
    pool: &DbPool,
    questions: &[Question],
) -> Result<Vec<Option<String>>, ApiError> {
    let labels = categories::get_category_labels(pool, questions.iter().map(|q| q.category)).await?;
    Ok(label_each(questions, &labels))
}

fn label_each(questions: &[Question], labels: &BTreeMap<i32, String>) -> Vec<Option<String>> {
    questions
        .iter()
        .map(|q| labels.get(&q.category).cloned())
        .collect()
}

async fn list_questions(
    State(pool): State<DbPool>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let all = questions::get_all_questions(&pool).await?;
    let current = page.slice(&all)?;
    let categories: BTreeMap<i32, String> = categories::get_all_categories(&pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.label))
        .collect();

    Ok(Json(QuestionsPage {
        success: true,
        current_category: label_each(current, &categories),
        questions: current.to_vec(),
        categories,
        totals_questions: all.len(),
    }))
}

async fn create_question(
    State(pool): State<DbPool>,
    ApiJson(form): ApiJson<QuestionForm>,
) -> ApiResponse<QuestionCreated> {
    let new_question = NewQuestion::try_from(form)?;
    if categories::get_category(&pool, new_question.category)
        .await?
        .is_none()
    {
        tracing::info!(
            category = new_question.category,
            "Rejected question for unknown category"
        );
        return Err(ApiError::NotFound);
    }

    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!(id, "Created question");
    let totals_questions = questions::count_questions(&pool).await?;

    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        questions: new_question.into_question(id),
        totals_questions,
    }))
}

async fn delete_question(
    State(pool): State<DbPool>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResponse<QuestionDeleted> {
    // owned snapshot, taken before the row goes away
    let snapshot = questions::get_question_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if questions::delete_question(&pool, id).await? == 0 {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Deleted question");
    let totals_questions = questions::count_questions(&pool).await?;

    Ok(Json(QuestionDeleted {
        success: true,
        deleted: id,
        questions: snapshot,
        totals_questions,
    }))
}

async fn search_questions(
    State(pool): State<DbPool>,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = body.search_term.ok_or(ApiError::NotFound)?;
    let found = questions::search_questions(&pool, &term).await?;
    let current = page.slice(&found)?;
    let current_category = current_category_labels(&pool, current).await?;

    Ok(Json(SearchResults {
        success: true,
        questions: current.to_vec(),
        current_category,
        totals_questions: found.len(),
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search/questions", post(search_questions))
        .with_state(state)
}
