use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{enrollment, lesson, question};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Create or update every table registered under `crate::entity`.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("course_server::entity::*")
        .sync(db)
        .await
}

/// Ensure required database indexes exist.
///
/// Composite lookup indexes that schema sync does not declare.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Enrollment lookups by (user, course). Not unique: duplicates are allowed.
    let by_user_course = Index::create()
        .if_not_exists()
        .name("idx_enrollment_user_course")
        .table(enrollment::Entity)
        .col(enrollment::Column::UserId)
        .col(enrollment::Column::CourseId)
        .to_owned();

    // Lesson listing: WHERE course_id = ? ORDER BY "order", id
    let by_course_order = Index::create()
        .if_not_exists()
        .name("idx_lesson_course_order")
        .table(lesson::Entity)
        .col(lesson::Column::CourseId)
        .col(lesson::Column::Order)
        .to_owned();

    let by_course = Index::create()
        .if_not_exists()
        .name("idx_question_course")
        .table(question::Entity)
        .col(question::Column::CourseId)
        .to_owned();

    for (name, stmt) in [
        ("idx_enrollment_user_course", by_user_course),
        ("idx_lesson_course_order", by_course_order),
        ("idx_question_course", by_course),
    ] {
        create_index(db, name, stmt).await;
    }

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: IndexCreateStatement) {
    let sql = match db.get_database_backend() {
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    };

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
