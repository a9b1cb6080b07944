use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use classhub::{
    domain::{
        object_id, Announcement, AnnouncementFilter, AnnouncementType, Author, AuthorRole,
        Priority,
    },
    repository::{AnnouncementRepository, SqliteAnnouncementRepository},
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

fn sample_announcement(title: &str, priority: Priority) -> Announcement {
    let now = Utc::now();
    Announcement {
        id: object_id::generate(),
        title: title.to_string(),
        content: "Content that comfortably clears the minimum length.".to_string(),
        author: Author {
            name: "Ms. Carter".to_string(),
            avatar: "https://picsum.photos/150".to_string(),
            role: AuthorRole::Teacher,
        },
        subject: Some("Physics".to_string()),
        course: Some("Physics 201".to_string()),
        announcement_type: AnnouncementType::Academic,
        priority,
        is_active: true,
        created_by: object_id::generate(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_announcement_crud() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let announcement = sample_announcement("Exam schedule", Priority::High);
    let id = announcement.id.clone();

    let created = repo.create(announcement).await?;
    assert_eq!(created.id, id);
    assert_eq!(created.title, "Exam schedule");
    assert_eq!(created.author.role, AuthorRole::Teacher);
    assert_eq!(created.priority, Priority::High);
    assert!(created.is_active);

    let found = repo.find_by_id(&id).await?;
    assert!(found.is_some());

    let mut updated = created.clone();
    updated.title = "Revised exam schedule".to_string();
    updated.priority = Priority::Medium;
    let updated = repo.update(&id, updated).await?;
    assert_eq!(updated.title, "Revised exam schedule");
    assert_eq!(updated.priority, Priority::Medium);
    // Content was untouched by the update
    assert_eq!(updated.content, created.content);

    assert!(repo.delete(&id).await?);
    assert!(repo.find_by_id(&id).await?.is_none());
    // Deleting again reports that nothing matched
    assert!(!repo.delete(&id).await?);

    Ok(())
}

#[tokio::test]
async fn test_list_is_sorted_by_creation_time_descending() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let base = Utc::now();
    for (i, title) in ["oldest", "middle", "newest"].iter().enumerate() {
        let mut announcement = sample_announcement(title, Priority::Low);
        announcement.created_at = base + Duration::seconds(i as i64);
        announcement.updated_at = announcement.created_at;
        repo.create(announcement).await?;
    }

    let listed = repo.list(&AnnouncementFilter::default(), 10, 0).await?;
    let titles: Vec<_> = listed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);

    Ok(())
}

#[tokio::test]
async fn test_filters_and_count() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    repo.create(sample_announcement("High one", Priority::High)).await?;
    repo.create(sample_announcement("High two", Priority::High)).await?;
    repo.create(sample_announcement("Low one", Priority::Low)).await?;

    let mut inactive = sample_announcement("Inactive", Priority::High);
    inactive.is_active = false;
    inactive.course = Some("Math 101".to_string());
    repo.create(inactive).await?;

    let high = AnnouncementFilter {
        priority: Some(Priority::High),
        ..Default::default()
    };
    assert_eq!(repo.count(&high).await?, 3);
    assert_eq!(repo.list(&high, 10, 0).await?.len(), 3);

    let active_high = AnnouncementFilter {
        priority: Some(Priority::High),
        is_active: Some(true),
        ..Default::default()
    };
    assert_eq!(repo.count(&active_high).await?, 2);

    let math = AnnouncementFilter {
        course: Some("Math 101".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count(&math).await?, 1);

    let none = AnnouncementFilter {
        course: Some("History 101".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count(&none).await?, 0);
    assert!(repo.list(&none, 10, 0).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_pagination_offsets() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let base = Utc::now();
    for i in 0..5 {
        let mut announcement = sample_announcement(&format!("a{i}"), Priority::Medium);
        announcement.created_at = base + Duration::seconds(i);
        announcement.updated_at = announcement.created_at;
        repo.create(announcement).await?;
    }

    let filter = AnnouncementFilter::default();
    let first = repo.list(&filter, 2, 0).await?;
    let second = repo.list(&filter, 2, 2).await?;
    let third = repo.list(&filter, 2, 4).await?;

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);
    assert_eq!(repo.count(&filter).await?, 5);

    // No overlap between pages
    let mut seen: Vec<String> = first
        .iter()
        .chain(second.iter())
        .chain(third.iter())
        .map(|a| a.id.clone())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);

    Ok(())
}
