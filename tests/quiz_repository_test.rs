use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use classhub::{
    domain::{object_id, Question, Quiz, QuizFilter, QuizType},
    repository::{QuizRepository, SqliteQuizRepository},
};

async fn test_pool() -> anyhow::Result<sqlx::SqlitePool> {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn sample_quiz(title: &str, due_in_days: i64) -> Quiz {
    let now = Utc::now();
    Quiz {
        id: object_id::generate(),
        title: title.to_string(),
        description: "Covers everything discussed in the last two lectures.".to_string(),
        course: "Math 101".to_string(),
        subject: "Mathematics".to_string(),
        topic: "Derivatives".to_string(),
        quiz_type: QuizType::Quiz,
        due_date: now + Duration::days(due_in_days),
        duration: Some(30),
        total_points: 50,
        questions: vec![
            Question {
                question: "What is the derivative of x^2?".to_string(),
                options: vec!["x".to_string(), "2x".to_string(), "x^2".to_string()],
                correct_answer: 1,
            },
            Question {
                question: "What is the derivative of sin(x)?".to_string(),
                options: vec!["cos(x)".to_string(), "-cos(x)".to_string()],
                correct_answer: 0,
            },
        ],
        is_active: true,
        instructions: Some("No calculators.".to_string()),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_quiz_crud_round_trips_questions() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteQuizRepository::new(pool);

    let quiz = sample_quiz("Unit 4 quiz", 7);
    let id = quiz.id.clone();
    let questions = quiz.questions.clone();

    let created = repo.create(quiz).await?;
    assert_eq!(created.id, id);
    assert_eq!(created.questions, questions);

    let found = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("quiz not found after create"))?;
    // Question order and content survive the JSON column intact
    assert_eq!(found.questions, questions);
    assert_eq!(found.instructions.as_deref(), Some("No calculators."));

    let mut updated = found.clone();
    updated.title = "Unit 4 quiz (revised)".to_string();
    updated.total_points = 75;
    updated.questions.pop();
    let updated = repo.update(&id, updated).await?;
    assert_eq!(updated.title, "Unit 4 quiz (revised)");
    assert_eq!(updated.total_points, 75);
    assert_eq!(updated.questions.len(), 1);

    assert!(repo.delete(&id).await?);
    assert!(repo.find_by_id(&id).await?.is_none());
    assert!(!repo.delete(&id).await?);

    Ok(())
}

#[tokio::test]
async fn test_list_is_sorted_by_due_date_ascending() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteQuizRepository::new(pool);

    repo.create(sample_quiz("later", 21)).await?;
    repo.create(sample_quiz("soonest", 3)).await?;
    repo.create(sample_quiz("middle", 10)).await?;

    let listed = repo.list(&QuizFilter::default(), 10, 0).await?;
    let titles: Vec<_> = listed.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["soonest", "middle", "later"]);

    Ok(())
}

#[tokio::test]
async fn test_filters_and_count() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteQuizRepository::new(pool);

    repo.create(sample_quiz("quiz one", 5)).await?;

    let mut assignment = sample_quiz("assignment", 10);
    assignment.quiz_type = QuizType::Assignment;
    assignment.course = "Physics 201".to_string();
    repo.create(assignment).await?;

    let mut inactive = sample_quiz("inactive quiz", 15);
    inactive.is_active = false;
    repo.create(inactive).await?;

    let assignments = QuizFilter {
        quiz_type: Some(QuizType::Assignment),
        ..Default::default()
    };
    assert_eq!(repo.count(&assignments).await?, 1);
    assert_eq!(repo.list(&assignments, 10, 0).await?[0].title, "assignment");

    let active = QuizFilter {
        is_active: Some(true),
        ..Default::default()
    };
    assert_eq!(repo.count(&active).await?, 2);

    let physics = QuizFilter {
        course: Some("Physics 201".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count(&physics).await?, 1);

    assert_eq!(repo.count(&QuizFilter::default()).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_upcoming_excludes_past_due_and_inactive() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteQuizRepository::new(pool);

    repo.create(sample_quiz("past", -2)).await?;
    repo.create(sample_quiz("due soon", 1)).await?;
    repo.create(sample_quiz("due later", 8)).await?;

    let mut inactive = sample_quiz("inactive future", 4);
    inactive.is_active = false;
    repo.create(inactive).await?;

    let upcoming = repo.list_upcoming(Utc::now(), 5).await?;
    let titles: Vec<_> = upcoming.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["due soon", "due later"]);

    Ok(())
}

#[tokio::test]
async fn test_upcoming_respects_limit() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteQuizRepository::new(pool);

    for i in 1..=7 {
        repo.create(sample_quiz(&format!("quiz {i}"), i)).await?;
    }

    let upcoming = repo.list_upcoming(Utc::now(), 5).await?;
    assert_eq!(upcoming.len(), 5);
    // Soonest five only
    assert_eq!(upcoming[0].title, "quiz 1");
    assert_eq!(upcoming[4].title, "quiz 5");

    Ok(())
}
