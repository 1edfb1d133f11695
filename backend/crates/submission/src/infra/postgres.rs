//! PostgreSQL Repository Implementations
//!
//! Entities are stored as JSONB documents next to the handful of columns
//! needed for filtering and guarded updates.

use crate::domain::entity::{canonical_post::CanonicalPost, submission::Submission};
use crate::domain::repository::{
    PostRepository, PublishRepository, SubmissionPage, SubmissionQuery, SubmissionRepository,
};
use crate::domain::value_object::locale::Locale;
use crate::domain::value_object::submission_kind::SubmissionKind;
use crate::error::{SubmissionError, SubmissionResult};
use chrono::{DateTime, Utc};
use kernel::id::{PostId, SubmissionId};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// PostgreSQL-backed store for submissions and canonical posts
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const UPDATE_APPROVED_SUBMISSION: &str = r#"
    UPDATE submissions
    SET status = $2, document = $3, approved_at = $4, updated_at = $5
    WHERE submission_id = $1 AND status = 'approved'
"#;

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a SubmissionQuery) {
    qb.push(" WHERE kind = ").push_bind(query.kind.code());
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status.code());
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (");
        let mut fields = qb.separated(" OR ");
        for path in [
            "document->'submitter'->>'name'",
            "document->'submitter'->>'email'",
            "document->'post'->'title'->>'en'",
            "document->'post'->'title'->>'bn'",
        ] {
            fields
                .push(path)
                .push_unseparated(" ILIKE ")
                .push_bind_unseparated(pattern.clone());
        }
        qb.push(")");
    }
}

fn slug_column(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "slug_en",
        Locale::Bn => "slug_bn",
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl SubmissionRepository for PgSubmissionStore {
    async fn insert_submission(&self, submission: &Submission) -> SubmissionResult<()> {
        sqlx::query(
            r#"
            INSERT INTO submissions (
                submission_id,
                kind,
                status,
                owner_id,
                document,
                approved_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(submission.id.into_uuid())
        .bind(submission.kind.code())
        .bind(submission.status().code())
        .bind(submission.owner_id.map(|id| id.into_uuid()))
        .bind(Json(submission))
        .bind(submission.approved_at())
        .bind(submission.created_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_submission(&self, id: SubmissionId) -> SubmissionResult<Option<Submission>> {
        let row = sqlx::query_scalar::<_, Json<Submission>>(
            "SELECT document FROM submissions WHERE submission_id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(submission)| submission))
    }

    async fn save_submission(&self, submission: &Submission) -> SubmissionResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE submissions
            SET status = $2, owner_id = $3, document = $4, approved_at = $5, updated_at = $6
            WHERE submission_id = $1
            "#,
        )
        .bind(submission.id.into_uuid())
        .bind(submission.status().code())
        .bind(submission.owner_id.map(|id| id.into_uuid()))
        .bind(Json(submission))
        .bind(submission.approved_at())
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(SubmissionError::not_found());
        }
        Ok(())
    }

    async fn delete_submission(&self, id: SubmissionId) -> SubmissionResult<bool> {
        let deleted = sqlx::query("DELETE FROM submissions WHERE submission_id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_submissions(&self, query: &SubmissionQuery) -> SubmissionResult<SubmissionPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM submissions");
        push_filters(&mut count, query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT document FROM submissions");
        push_filters(&mut select, query);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));
        let rows = select
            .build_query_scalar::<Json<Submission>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(SubmissionPage {
            items: rows.into_iter().map(|Json(s)| s).collect(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn list_approved_before(
        &self,
        kind: SubmissionKind,
        cutoff: DateTime<Utc>,
    ) -> SubmissionResult<Vec<Submission>> {
        let rows = sqlx::query_scalar::<_, Json<Submission>>(
            r#"
            SELECT document FROM submissions
            WHERE kind = $1 AND status = 'approved' AND approved_at < $2
            ORDER BY approved_at
            "#,
        )
        .bind(kind.code())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(s)| s).collect())
    }
}

impl PostRepository for PgSubmissionStore {
    async fn find_post(&self, id: PostId) -> SubmissionResult<Option<CanonicalPost>> {
        let row = sqlx::query_scalar::<_, Json<CanonicalPost>>(
            "SELECT document FROM posts WHERE post_id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(post)| post))
    }

    async fn find_post_by_source(
        &self,
        submission_id: SubmissionId,
    ) -> SubmissionResult<Option<CanonicalPost>> {
        let row = sqlx::query_scalar::<_, Json<CanonicalPost>>(
            "SELECT document FROM posts WHERE source_submission_id = $1",
        )
        .bind(submission_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(post)| post))
    }

    async fn slug_taken(&self, locale: Locale, slug: &str) -> SubmissionResult<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM posts WHERE {} = $1)",
            slug_column(locale)
        );
        let taken = sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(taken)
    }
}

impl PublishRepository for PgSubmissionStore {
    async fn commit_publication(
        &self,
        post: &CanonicalPost,
        submission: &Submission,
    ) -> SubmissionResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(UPDATE_APPROVED_SUBMISSION)
            .bind(submission.id.into_uuid())
            .bind(submission.status().code())
            .bind(Json(submission))
            .bind(submission.approved_at())
            .bind(submission.updated_at)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(SubmissionError::Validation(
                "Submission is no longer approved".to_string(),
            ));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                post_type,
                source_submission_id,
                slug_en,
                slug_bn,
                document,
                published_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.into_uuid())
        .bind(post.post_type.code())
        .bind(post.source_submission_id.map(|id| id.into_uuid()))
        .bind(post.slug.en.as_deref())
        .bind(post.slug.bn.as_deref())
        .bind(Json(post))
        .bind(post.published_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                tracing::warn!(
                    submission_id = %submission.id,
                    error = %e,
                    "Publish collided with an existing post"
                );
                return Err(SubmissionError::Validation(
                    "A post with the same slug or source already exists; retry the publish"
                        .to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }

    async fn link_publication(&self, submission: &Submission) -> SubmissionResult<()> {
        let updated = sqlx::query(UPDATE_APPROVED_SUBMISSION)
            .bind(submission.id.into_uuid())
            .bind(submission.status().code())
            .bind(Json(submission))
            .bind(submission.approved_at())
            .bind(submission.updated_at)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(SubmissionError::Validation(
                "Submission is no longer approved".to_string(),
            ));
        }
        Ok(())
    }

    async fn find_unlinked_publications(&self) -> SubmissionResult<Vec<(SubmissionId, PostId)>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT p.source_submission_id, p.post_id
            FROM posts p
            JOIN submissions s ON s.submission_id = p.source_submission_id
            WHERE s.status <> 'published'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(sid, pid)| (SubmissionId::from_uuid(sid), PostId::from_uuid(pid)))
            .collect())
    }
}
