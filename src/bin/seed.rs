use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::lorem::en::{Paragraph, Sentence},
    faker::name::en::Name,
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use classhub::{
    config::Settings,
    domain::{
        object_id, Announcement, AnnouncementType, Author, AuthorRole, Priority, Question, Quiz,
        QuizType, User, UserRole,
    },
    repository::{
        AnnouncementRepository, QuizRepository, SqliteAnnouncementRepository, SqliteQuizRepository,
        SqliteUserRepository, UserRepository,
    },
};

#[derive(Parser)]
#[command(about = "Seed the classhub database with demo data")]
struct Args {
    /// Database to seed
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://classhub.db")]
    database_url: String,

    /// Number of extra generated announcements on top of the fixed set
    #[arg(long, default_value_t = 3)]
    extra_announcements: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Arc::new(Settings::default());

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let quiz_repo = SqliteQuizRepository::new(db_pool.clone());

    println!("👤 Creating demo user...");
    let now = Utc::now();
    let demo_user = match user_repo.find_by_email("student@anyware.com").await? {
        Some(user) => user,
        None => {
            user_repo
                .create(User {
                    id: object_id::generate(),
                    name: "Talia".to_string(),
                    email: "student@anyware.com".to_string(),
                    avatar: "https://picsum.photos/200".to_string(),
                    role: UserRole::Student,
                    created_at: now,
                    updated_at: now,
                })
                .await?
        }
    };
    println!("  ✅ Demo user ready ({})", demo_user.email);

    println!("📣 Creating announcements...");
    let fixed = [
        (
            "Exam schedule published",
            "The final exam schedule for this semester is now available on the portal. \
             Please review your exam dates and report any conflicts to the administration \
             office before the end of the week.",
            AuthorRole::Management,
            AnnouncementType::Academic,
            Priority::High,
            Some("Math 101"),
        ),
        (
            "Library hours extended",
            "Starting next Monday the library will stay open until 10pm on weekdays to \
             support exam preparation. Group study rooms can be booked at the front desk.",
            AuthorRole::Admin,
            AnnouncementType::General,
            Priority::Medium,
            None,
        ),
        (
            "Lab session moved to Thursday",
            "This week's physics lab session moves from Wednesday to Thursday at 2pm due \
             to equipment maintenance. Bring your lab notebooks as usual.",
            AuthorRole::Teacher,
            AnnouncementType::Urgent,
            Priority::High,
            Some("Physics 201"),
        ),
    ];

    for (title, content, role, announcement_type, priority, course) in fixed {
        announcement_repo
            .create(Announcement {
                id: object_id::generate(),
                title: title.to_string(),
                content: content.to_string(),
                author: Author {
                    name: Name().fake(),
                    avatar: "https://picsum.photos/150".to_string(),
                    role,
                },
                subject: course.map(str::to_string),
                course: course.map(str::to_string),
                announcement_type,
                priority,
                is_active: true,
                created_by: demo_user.id.clone(),
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    for _ in 0..args.extra_announcements {
        announcement_repo
            .create(Announcement {
                id: object_id::generate(),
                title: Sentence(3..7).fake(),
                content: Paragraph(2..4).fake(),
                author: Author {
                    name: Name().fake(),
                    avatar: "https://picsum.photos/150".to_string(),
                    role: AuthorRole::Teacher,
                },
                subject: None,
                course: None,
                announcement_type: AnnouncementType::General,
                priority: Priority::Low,
                is_active: true,
                created_by: demo_user.id.clone(),
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!(
        "  ✅ Created {} announcements",
        fixed.len() + args.extra_announcements
    );

    println!("📝 Creating quizzes...");
    let quizzes = [
        (
            "Unit 4 quiz: derivatives",
            "Short quiz covering the chain rule and implicit differentiation.",
            "Math 101",
            "Mathematics",
            "Derivatives",
            QuizType::Quiz,
            7,
            Some(30),
            50,
            vec![
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
        ),
        (
            "Newton's laws assignment",
            "Problem set on Newton's three laws of motion. Show all working.",
            "Physics 201",
            "Physics",
            "Mechanics",
            QuizType::Assignment,
            14,
            None,
            100,
            vec![Question {
                question: "Which law relates force, mass and acceleration?".to_string(),
                options: vec![
                    "First law".to_string(),
                    "Second law".to_string(),
                    "Third law".to_string(),
                ],
                correct_answer: 1,
            }],
        ),
    ];

    let quiz_count = quizzes.len();
    for (
        title,
        description,
        course,
        subject,
        topic,
        quiz_type,
        due_in_days,
        duration,
        total_points,
        questions,
    ) in quizzes
    {
        quiz_repo
            .create(Quiz {
                id: object_id::generate(),
                title: title.to_string(),
                description: description.to_string(),
                course: course.to_string(),
                subject: subject.to_string(),
                topic: topic.to_string(),
                quiz_type,
                due_date: now + Duration::days(due_in_days),
                duration,
                total_points,
                questions,
                is_active: true,
                instructions: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  ✅ Created {} quizzes", quiz_count);

    println!("🎉 Seeding complete");
    Ok(())
}
