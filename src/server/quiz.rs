use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::SqlitePool;

use crate::db::{queries::questions::get_unseen_questions, Question};
use crate::telemetry::QUIZ_QUESTIONS_SERVED;

/// Category id the quiz client sends to mean "all categories".
pub const ANY_CATEGORY: i64 = 0;

/// Draws one question uniformly from those in `category` (or any category for
/// [`ANY_CATEGORY`]) whose id is not in `previous`. `None` once every eligible
/// question has been seen.
pub async fn next_question<R: Rng + ?Sized>(
    pool: &SqlitePool,
    category: i64,
    previous: &[i64],
    rng: &mut R,
) -> sqlx::Result<Option<Question>> {
    let filter = (category != ANY_CATEGORY).then_some(category);
    let candidates = get_unseen_questions(pool, filter, previous).await?;
    let picked = pick(candidates, rng);

    match &picked {
        Some(question) => {
            tracing::debug!(category, question = question.id, "quiz question picked");
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.to_string().as_str()])
                .inc();
        }
        None => tracing::debug!(category, seen = previous.len(), "quiz pool exhausted"),
    }
    Ok(picked)
}

fn pick<R: Rng + ?Sized>(candidates: Vec<Question>, rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}
