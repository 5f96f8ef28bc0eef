use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// A trivia question as stored and as rendered in every JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

impl NewQuestion {
    pub fn into_question(self, id: i32) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

pub async fn get_all_questions(pool: &DbPool) -> sqlx::Result<Vec<Question>> {
    with_pool!(pool, conn => {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty FROM question ORDER BY id
            "#,
        )
        .fetch_all(conn)
        .await
    })
}

pub async fn get_question_by_id(pool: &DbPool, id: i32) -> sqlx::Result<Option<Question>> {
    with_pool!(pool, conn => {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty FROM question WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    })
}

pub async fn get_questions_for_category(
    pool: &DbPool,
    category: i32,
) -> sqlx::Result<Vec<Question>> {
    with_pool!(pool, conn => {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty FROM question
            WHERE category = $1
            ORDER BY id
            "#,
        )
        .bind(category)
        .fetch_all(conn)
        .await
    })
}

/// Case-insensitive substring match on question or answer text.
///
/// SQLite's `LOWER` only folds ASCII, so on that backend the rows are folded
/// here with the same Unicode lowercasing applied to the term.
pub async fn search_questions(pool: &DbPool, term: &str) -> sqlx::Result<Vec<Question>> {
    match pool {
        DbPool::Postgres(conn) => {
            let pattern = like_pattern(term);
            sqlx::query_as::<_, Question>(
                r#"
                SELECT id, question, answer, category, difficulty FROM question
                WHERE LOWER(question) LIKE $1 ESCAPE '\' OR LOWER(answer) LIKE $1 ESCAPE '\'
                ORDER BY id
                "#,
            )
            .bind(&pattern)
            .fetch_all(conn)
            .await
        }
        DbPool::Sqlite(_) => {
            let needle = term.to_lowercase();
            Ok(get_all_questions(pool)
                .await?
                .into_iter()
                .filter(|q| contains_folded(q, &needle))
                .collect())
        }
    }
}

fn contains_folded(question: &Question, needle: &str) -> bool {
    question.question.to_lowercase().contains(needle)
        || question.answer.to_lowercase().contains(needle)
}

pub async fn count_questions(pool: &DbPool) -> sqlx::Result<i64> {
    with_pool!(pool, conn => {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM question
            "#,
        )
        .fetch_one(conn)
        .await
    })
}

pub async fn create_question(pool: &DbPool, question: &NewQuestion) -> sqlx::Result<i32> {
    with_pool!(pool, conn => {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO question (question, answer, category, difficulty) VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .fetch_one(conn)
        .await
    })
}

/// Returns the number of deleted rows.
pub async fn delete_question(pool: &DbPool, id: i32) -> sqlx::Result<u64> {
    let result = with_pool!(pool, conn => {
        sqlx::query(
            r#"
            DELETE FROM question WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(conn)
        .await
        .map(|r| r.rows_affected())
    })?;
    Ok(result)
}

pub async fn import_questions(pool: &DbPool, questions: Vec<Question>) -> sqlx::Result<()> {
    for question in questions {
        with_pool!(pool, conn => {
            sqlx::query(
                r#"
                INSERT INTO question (id, question, answer, category, difficulty) VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(question.id)
            .bind(&question.question)
            .bind(&question.answer)
            .bind(question.category)
            .bind(question.difficulty)
            .execute(conn)
            .await
            .map(|_| ())
        })?;
    }
    if let DbPool::Postgres(conn) = pool {
        sqlx::query(
            r#"
            SELECT setval(pg_get_serial_sequence('question', 'id'), (SELECT COALESCE(MAX(id), 1) FROM question))
            "#,
        )
        .execute(conn)
        .await?;
    }
    Ok(())
}

fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
