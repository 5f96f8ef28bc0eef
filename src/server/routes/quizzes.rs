use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{queries::questions, DbPool, Question},
    server::{
        app::AppState, deserializers::serialize_or_false, error::ApiError, extractors::ApiJson,
    },
    telemetry::QUIZ_DRAWS,
};

use super::ApiResponse;

/// `quiz_category.id` meaning "draw from every category".
pub const ALL_CATEGORIES: i32 = 0;

#[derive(Deserialize)]
struct QuizBody {
    quiz_category: Option<QuizCategory>,
    previous_questions: Option<Vec<i32>>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i32>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    #[serde(serialize_with = "serialize_or_false")]
    question: Option<Question>,
    totals_questions: usize,
}

/// Uniformly picks one question whose id is not in `previous`.
/// `None` once every question has been seen.
pub fn draw_question<'a, R>(
    questions: &'a [Question],
    previous: &[i32],
    rng: &mut R,
) -> Option<&'a Question>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<&Question> = questions
        .iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    candidates.choose(rng).copied()
}

async fn play_quiz(
    State(pool): State<DbPool>,
    ApiJson(body): ApiJson<QuizBody>,
) -> ApiResponse<QuizQuestion> {
    let category = body
        .quiz_category
        .and_then(|c| c.id)
        .ok_or(ApiError::NotFound)?;
    let previous = body.previous_questions.ok_or(ApiError::NotFound)?;

    let in_play = if category == ALL_CATEGORIES {
        questions::get_all_questions(&pool).await?
    } else {
        questions::get_questions_for_category(&pool, category).await?
    };
    if in_play.is_empty() {
        return Err(ApiError::NotFound);
    }

    let drawn = draw_question(&in_play, &previous, &mut rand::thread_rng()).cloned();
    let response = match drawn {
        Some(question) => {
            QUIZ_DRAWS.with_label_values(&["question"]).inc();
            tracing::debug!(id = question.id, category, "Drew quiz question");
            QuizQuestion {
                success: true,
                question: Some(question),
                totals_questions: in_play.len(),
            }
        }
        None => {
            QUIZ_DRAWS.with_label_values(&["exhausted"]).inc();
            tracing::debug!(category, seen = previous.len(), "No unseen quiz questions left");
            QuizQuestion {
                success: true,
                question: None,
                totals_questions: 0,
            }
        }
    };
    Ok(Json(response))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
