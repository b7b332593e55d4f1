//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations with proper
//! error handling and transaction support. Uniqueness violations raised by
//! the store are the authoritative "already exists" signal for concurrent
//! writers and are mapped to the matching conflict error here.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionError, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Compact user shape embedded in listings
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.user_role(),
        }
    }
}

/// An idea joined with its owner and read-time aggregate counts
#[derive(Debug)]
pub struct IdeaWithCounts {
    pub idea: Idea,
    pub owner: Option<User>,
    pub like_count: u64,
    pub comment_count: u64,
}

/// One comment row as fetched for thread assembly
pub type CommentRow = (Comment, Option<User>, u64);

/// New user attributes for signup
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub usage_note: Option<String>,
}

/// Self-service profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub usage_note: Option<String>,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

/// Map a store uniqueness violation to the workflow's conflict signal
fn on_unique_violation(err: DbErr, conflict: AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => AppError::Database(err),
    }
}

fn unwrap_tx_err(err: TransactionError<AppError>) -> AppError {
    match err {
        TransactionError::Connection(db) => AppError::Database(db),
        TransactionError::Transaction(app) => app,
    }
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user account
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let now = chrono::Utc::now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(String::from(new_user.role)),
            phone: Set(new_user.phone),
            city: Set(new_user.city),
            country: Set(new_user.country),
            institution: Set(new_user.institution),
            highest_education: Set(new_user.highest_education),
            usage_note: Set(new_user.usage_note),
            created_at: Set(now.into()),
        };

        user.insert(self.write_conn())
            .await
            .map_err(|e| on_unique_violation(e, AppError::DuplicateEmail))
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Apply a self-service profile update
    pub async fn update_user_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<User> {
        let mut user: UserActiveModel = UserEntity::find_by_id(user_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                id: user_id.to_string(),
            })?
            .into();

        if let Some(name) = update.name {
            user.name = Set(name);
        }
        if let Some(phone) = update.phone {
            user.phone = Set(Some(phone));
        }
        if let Some(city) = update.city {
            user.city = Set(Some(city));
        }
        if let Some(country) = update.country {
            user.country = Set(Some(country));
        }
        if let Some(institution) = update.institution {
            user.institution = Set(Some(institution));
        }
        if let Some(highest_education) = update.highest_education {
            user.highest_education = Set(Some(highest_education));
        }
        if let Some(usage_note) = update.usage_note {
            user.usage_note = Set(Some(usage_note));
        }

        user.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Submission Operations
    // ========================================================================

    /// Create a pending idea submission
    pub async fn create_submission(
        &self,
        owner_id: Uuid,
        title: String,
        caption: Option<String>,
        description: String,
        odr_experience: Option<String>,
    ) -> Result<IdeaSubmission> {
        let now = chrono::Utc::now();

        let submission = IdeaSubmissionActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            caption: Set(caption),
            description: Set(description),
            odr_experience: Set(odr_experience),
            owner_id: Set(owner_id),
            reviewed: Set(false),
            approved: Set(false),
            rejected: Set(false),
            rejection_reason: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now.into()),
        };

        submission.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find submission by ID
    pub async fn find_submission_by_id(&self, id: Uuid) -> Result<Option<IdeaSubmission>> {
        IdeaSubmissionEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List unreviewed submissions with their owners, oldest first
    pub async fn list_pending_submissions(&self) -> Result<Vec<(IdeaSubmission, Option<User>)>> {
        IdeaSubmissionEntity::find()
            .filter(IdeaSubmissionColumn::Reviewed.eq(false))
            .find_also_related(UserEntity)
            .order_by_asc(IdeaSubmissionColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List a user's own submissions, newest first
    pub async fn list_submissions_by_owner(&self, owner_id: Uuid) -> Result<Vec<IdeaSubmission>> {
        IdeaSubmissionEntity::find()
            .filter(IdeaSubmissionColumn::OwnerId.eq(owner_id))
            .order_by_desc(IdeaSubmissionColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Approve a pending submission, publishing it as an idea.
    ///
    /// One transaction covers both effects: the submission is claimed with
    /// a conditional update (reviewed=false is the guard, so exactly one of
    /// two concurrent approvals can win), then the published idea row is
    /// inserted copying the submission's content.
    pub async fn approve_submission(&self, submission_id: Uuid, admin_id: Uuid) -> Result<Idea> {
        let now = chrono::Utc::now();

        self.write_conn()
            .transaction::<_, Idea, AppError>(move |txn| {
                Box::pin(async move {
                    let submission = IdeaSubmissionEntity::find_by_id(submission_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| AppError::SubmissionNotFound {
                            id: submission_id.to_string(),
                        })?;

                    submission.review_state().ensure_pending(submission_id)?;

                    let claimed = IdeaSubmissionEntity::update_many()
                        .col_expr(IdeaSubmissionColumn::Reviewed, Expr::value(true))
                        .col_expr(IdeaSubmissionColumn::Approved, Expr::value(true))
                        .col_expr(IdeaSubmissionColumn::ReviewedBy, Expr::value(admin_id))
                        .col_expr(IdeaSubmissionColumn::ReviewedAt, Expr::value(now))
                        .filter(IdeaSubmissionColumn::Id.eq(submission_id))
                        .filter(IdeaSubmissionColumn::Reviewed.eq(false))
                        .exec(txn)
                        .await?;

                    if claimed.rows_affected == 0 {
                        return Err(AppError::AlreadyReviewed {
                            id: submission_id.to_string(),
                        });
                    }

                    let idea = IdeaActiveModel {
                        id: Set(Uuid::new_v4()),
                        title: Set(submission.title.clone()),
                        caption: Set(submission.caption.clone()),
                        description: Set(submission.description.clone()),
                        odr_experience: Set(submission.odr_experience.clone()),
                        owner_id: Set(submission.owner_id),
                        approved: Set(true),
                        reviewed_by: Set(Some(admin_id)),
                        reviewed_at: Set(Some(now.into())),
                        created_at: Set(now.into()),
                        updated_at: Set(now.into()),
                    };

                    Ok(idea.insert(txn).await?)
                })
            })
            .await
            .map_err(unwrap_tx_err)
    }

    /// Reject a pending submission with an optional reason
    pub async fn reject_submission(
        &self,
        submission_id: Uuid,
        admin_id: Uuid,
        reason: Option<String>,
    ) -> Result<IdeaSubmission> {
        let submission = self
            .find_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound {
                id: submission_id.to_string(),
            })?;

        submission.review_state().ensure_pending(submission_id)?;

        let now = chrono::Utc::now();
        let claimed = IdeaSubmissionEntity::update_many()
            .col_expr(IdeaSubmissionColumn::Reviewed, Expr::value(true))
            .col_expr(IdeaSubmissionColumn::Rejected, Expr::value(true))
            .col_expr(
                IdeaSubmissionColumn::RejectionReason,
                Expr::value(reason.clone()),
            )
            .col_expr(IdeaSubmissionColumn::ReviewedBy, Expr::value(admin_id))
            .col_expr(IdeaSubmissionColumn::ReviewedAt, Expr::value(now))
            .filter(IdeaSubmissionColumn::Id.eq(submission_id))
            .filter(IdeaSubmissionColumn::Reviewed.eq(false))
            .exec(self.write_conn())
            .await?;

        if claimed.rows_affected == 0 {
            return Err(AppError::AlreadyReviewed {
                id: submission_id.to_string(),
            });
        }

        self.find_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound {
                id: submission_id.to_string(),
            })
    }

    // ========================================================================
    // Idea Operations
    // ========================================================================

    /// Find idea by ID regardless of approval state
    pub async fn find_idea_by_id(&self, id: Uuid) -> Result<Option<Idea>> {
        IdeaEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find an approved idea; unapproved ideas are invisible to read paths
    pub async fn find_approved_idea(&self, id: Uuid) -> Result<Option<Idea>> {
        IdeaEntity::find_by_id(id)
            .filter(IdeaColumn::Approved.eq(true))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Get an approved idea with owner and read-time counts
    pub async fn get_approved_idea(&self, id: Uuid) -> Result<Option<IdeaWithCounts>> {
        let Some((idea, owner)) = IdeaEntity::find_by_id(id)
            .filter(IdeaColumn::Approved.eq(true))
            .find_also_related(UserEntity)
            .one(self.read_conn())
            .await?
        else {
            return Ok(None);
        };

        let like_count = LikeEntity::find()
            .filter(LikeColumn::IdeaId.eq(id))
            .count(self.read_conn())
            .await?;

        let comment_count = CommentEntity::find()
            .filter(CommentColumn::IdeaId.eq(id))
            .count(self.read_conn())
            .await?;

        Ok(Some(IdeaWithCounts {
            idea,
            owner,
            like_count,
            comment_count,
        }))
    }

    /// List approved ideas with owners and counts, newest first.
    ///
    /// Counts come from two bulk fetches over the listed ids, not from a
    /// per-idea query.
    pub async fn list_approved_ideas(&self) -> Result<Vec<IdeaWithCounts>> {
        let rows = IdeaEntity::find()
            .filter(IdeaColumn::Approved.eq(true))
            .find_also_related(UserEntity)
            .order_by_desc(IdeaColumn::CreatedAt)
            .all(self.read_conn())
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(idea, _)| idea.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut like_counts: HashMap<Uuid, u64> = HashMap::new();
        for like in LikeEntity::find()
            .filter(LikeColumn::IdeaId.is_in(ids.clone()))
            .all(self.read_conn())
            .await?
        {
            if let Some(idea_id) = like.idea_id {
                *like_counts.entry(idea_id).or_default() += 1;
            }
        }

        let mut comment_counts: HashMap<Uuid, u64> = HashMap::new();
        for comment in CommentEntity::find()
            .filter(CommentColumn::IdeaId.is_in(ids))
            .all(self.read_conn())
            .await?
        {
            *comment_counts.entry(comment.idea_id).or_default() += 1;
        }

        Ok(rows
            .into_iter()
            .map(|(idea, owner)| {
                let like_count = like_counts.get(&idea.id).copied().unwrap_or(0);
                let comment_count = comment_counts.get(&idea.id).copied().unwrap_or(0);
                IdeaWithCounts {
                    idea,
                    owner,
                    like_count,
                    comment_count,
                }
            })
            .collect())
    }

    /// Directly approve an existing idea row (legacy path).
    ///
    /// Same transition semantics as submission approval: the conditional
    /// update claims the unapproved row, and a second approval is a
    /// conflict.
    pub async fn approve_idea_direct(&self, idea_id: Uuid, admin_id: Uuid) -> Result<Idea> {
        let idea = self
            .find_idea_by_id(idea_id)
            .await?
            .ok_or_else(|| AppError::IdeaNotFound {
                id: idea_id.to_string(),
            })?;

        if idea.approved {
            return Err(AppError::Conflict {
                message: "Idea is already approved".to_string(),
            });
        }

        let now = chrono::Utc::now();
        let claimed = IdeaEntity::update_many()
            .col_expr(IdeaColumn::Approved, Expr::value(true))
            .col_expr(IdeaColumn::ReviewedBy, Expr::value(admin_id))
            .col_expr(IdeaColumn::ReviewedAt, Expr::value(now))
            .col_expr(IdeaColumn::UpdatedAt, Expr::value(now))
            .filter(IdeaColumn::Id.eq(idea_id))
            .filter(IdeaColumn::Approved.eq(false))
            .exec(self.write_conn())
            .await?;

        if claimed.rows_affected == 0 {
            return Err(AppError::Conflict {
                message: "Idea is already approved".to_string(),
            });
        }

        self.find_idea_by_id(idea_id)
            .await?
            .ok_or_else(|| AppError::IdeaNotFound {
                id: idea_id.to_string(),
            })
    }

    /// Edit an idea's content fields
    pub async fn update_idea(
        &self,
        idea_id: Uuid,
        title: Option<String>,
        caption: Option<String>,
        description: Option<String>,
    ) -> Result<Idea> {
        let mut idea: IdeaActiveModel = IdeaEntity::find_by_id(idea_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::IdeaNotFound {
                id: idea_id.to_string(),
            })?
            .into();

        if let Some(title) = title {
            idea.title = Set(title);
        }
        if let Some(caption) = caption {
            idea.caption = Set(Some(caption));
        }
        if let Some(description) = description {
            idea.description = Set(description);
        }
        idea.updated_at = Set(chrono::Utc::now().into());

        idea.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Delete idea by ID; related rows go with it via cascade
    pub async fn delete_idea(&self, id: Uuid) -> Result<bool> {
        let result = IdeaEntity::delete_by_id(id).exec(self.write_conn()).await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Comment Operations
    // ========================================================================

    /// Find comment by ID
    pub async fn find_comment_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        CommentEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Insert a comment
    pub async fn create_comment(
        &self,
        idea_id: Uuid,
        author_id: Uuid,
        content: String,
        parent_id: Option<Uuid>,
    ) -> Result<Comment> {
        let comment = CommentActiveModel {
            id: Set(Uuid::new_v4()),
            idea_id: Set(idea_id),
            author_id: Set(author_id),
            parent_id: Set(parent_id),
            content: Set(content),
            created_at: Set(chrono::Utc::now().into()),
        };

        comment.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Fetch all comment rows for an idea in one pass: comments with
    /// authors, plus per-comment like counts from a second bulk fetch.
    pub async fn list_comment_rows(&self, idea_id: Uuid) -> Result<Vec<CommentRow>> {
        let rows = CommentEntity::find()
            .filter(CommentColumn::IdeaId.eq(idea_id))
            .find_also_related(UserEntity)
            .order_by_asc(CommentColumn::CreatedAt)
            .all(self.read_conn())
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(comment, _)| comment.id).collect();
        let mut like_counts: HashMap<Uuid, u64> = HashMap::new();
        if !ids.is_empty() {
            for like in LikeEntity::find()
                .filter(LikeColumn::CommentId.is_in(ids))
                .all(self.read_conn())
                .await?
            {
                if let Some(comment_id) = like.comment_id {
                    *like_counts.entry(comment_id).or_default() += 1;
                }
            }
        }

        Ok(rows
            .into_iter()
            .map(|(comment, author)| {
                let like_count = like_counts.get(&comment.id).copied().unwrap_or(0);
                (comment, author, like_count)
            })
            .collect())
    }

    // ========================================================================
    // Like Operations
    // ========================================================================

    /// Check whether a user has liked an idea
    pub async fn has_liked_idea(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let existing = LikeEntity::find()
            .filter(LikeColumn::UserId.eq(user_id))
            .filter(LikeColumn::IdeaId.eq(idea_id))
            .one(self.read_conn())
            .await?;
        Ok(existing.is_some())
    }

    /// Toggle a user's like on an idea; returns the resulting liked state
    pub async fn toggle_idea_like(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let existing = LikeEntity::find()
            .filter(LikeColumn::UserId.eq(user_id))
            .filter(LikeColumn::IdeaId.eq(idea_id))
            .one(self.write_conn())
            .await?;

        match existing {
            Some(like) => {
                LikeEntity::delete_by_id(like.id)
                    .exec(self.write_conn())
                    .await?;
                Ok(false)
            }
            None => {
                let like = LikeActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    idea_id: Set(Some(idea_id)),
                    comment_id: Set(None),
                    created_at: Set(chrono::Utc::now().into()),
                };
                like.insert(self.write_conn()).await.map_err(|e| {
                    on_unique_violation(
                        e,
                        AppError::Conflict {
                            message: "Idea already liked".to_string(),
                        },
                    )
                })?;
                Ok(true)
            }
        }
    }

    /// Toggle a user's like on a comment; returns the resulting liked state
    pub async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let existing = LikeEntity::find()
            .filter(LikeColumn::UserId.eq(user_id))
            .filter(LikeColumn::CommentId.eq(comment_id))
            .one(self.write_conn())
            .await?;

        match existing {
            Some(like) => {
                LikeEntity::delete_by_id(like.id)
                    .exec(self.write_conn())
                    .await?;
                Ok(false)
            }
            None => {
                let like = LikeActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    idea_id: Set(None),
                    comment_id: Set(Some(comment_id)),
                    created_at: Set(chrono::Utc::now().into()),
                };
                like.insert(self.write_conn()).await.map_err(|e| {
                    on_unique_violation(
                        e,
                        AppError::Conflict {
                            message: "Comment already liked".to_string(),
                        },
                    )
                })?;
                Ok(true)
            }
        }
    }

    /// Count likes on an idea
    pub async fn count_idea_likes(&self, idea_id: Uuid) -> Result<u64> {
        LikeEntity::find()
            .filter(LikeColumn::IdeaId.eq(idea_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count likes on a comment
    pub async fn count_comment_likes(&self, comment_id: Uuid) -> Result<u64> {
        LikeEntity::find()
            .filter(LikeColumn::CommentId.eq(comment_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Collaboration Operations
    // ========================================================================

    /// Check for an existing collaborator relationship
    pub async fn find_collaborator(
        &self,
        user_id: Uuid,
        idea_id: Uuid,
    ) -> Result<Option<Collaborator>> {
        CollaboratorEntity::find()
            .filter(CollaboratorColumn::UserId.eq(user_id))
            .filter(CollaboratorColumn::IdeaId.eq(idea_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Join a user to an idea as collaborator
    pub async fn add_collaborator(&self, user_id: Uuid, idea_id: Uuid) -> Result<Collaborator> {
        let row = CollaboratorActiveModel {
            id: Set(Uuid::new_v4()),
            idea_id: Set(idea_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        row.insert(self.write_conn())
            .await
            .map_err(|e| on_unique_violation(e, AppError::AlreadyCollaborator))
    }

    /// Remove a collaborator relationship; false when none existed
    pub async fn remove_collaborator(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let result = CollaboratorEntity::delete_many()
            .filter(CollaboratorColumn::UserId.eq(user_id))
            .filter(CollaboratorColumn::IdeaId.eq(idea_id))
            .exec(self.write_conn())
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// List an idea's collaborators with user records
    pub async fn list_collaborators(
        &self,
        idea_id: Uuid,
    ) -> Result<Vec<(Collaborator, Option<User>)>> {
        CollaboratorEntity::find()
            .filter(CollaboratorColumn::IdeaId.eq(idea_id))
            .find_also_related(UserEntity)
            .order_by_asc(CollaboratorColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Check for an existing mentor relationship
    pub async fn find_mentor(&self, user_id: Uuid, idea_id: Uuid) -> Result<Option<Mentor>> {
        MentorEntity::find()
            .filter(MentorColumn::UserId.eq(user_id))
            .filter(MentorColumn::IdeaId.eq(idea_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Join a user to an idea as mentor; the role gate lives in the handler
    pub async fn add_mentor(&self, user_id: Uuid, idea_id: Uuid) -> Result<Mentor> {
        let row = MentorActiveModel {
            id: Set(Uuid::new_v4()),
            idea_id: Set(idea_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        row.insert(self.write_conn())
            .await
            .map_err(|e| on_unique_violation(e, AppError::AlreadyMentor))
    }

    /// Remove a mentor relationship; false when none existed
    pub async fn remove_mentor(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let result = MentorEntity::delete_many()
            .filter(MentorColumn::UserId.eq(user_id))
            .filter(MentorColumn::IdeaId.eq(idea_id))
            .exec(self.write_conn())
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// List an idea's mentors with user records
    pub async fn list_mentors(&self, idea_id: Uuid) -> Result<Vec<(Mentor, Option<User>)>> {
        MentorEntity::find()
            .filter(MentorColumn::IdeaId.eq(idea_id))
            .find_also_related(UserEntity)
            .order_by_asc(MentorColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Meeting Operations
    // ========================================================================

    /// Find meeting log by ID
    pub async fn find_meeting_by_id(&self, id: Uuid) -> Result<Option<MeetingLog>> {
        MeetingLogEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Record a scheduled meeting for an idea
    pub async fn create_meeting(
        &self,
        idea_id: Uuid,
        room_name: String,
        scheduled_by: Uuid,
        scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<MeetingLog> {
        let meeting = MeetingLogActiveModel {
            id: Set(Uuid::new_v4()),
            idea_id: Set(idea_id),
            room_name: Set(room_name),
            scheduled_by: Set(scheduled_by),
            scheduled_at: Set(scheduled_at.map(Into::into)),
            created_at: Set(chrono::Utc::now().into()),
        };

        meeting.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List meetings for an idea, newest first
    pub async fn list_meetings_for_idea(&self, idea_id: Uuid) -> Result<Vec<MeetingLog>> {
        MeetingLogEntity::find()
            .filter(MeetingLogColumn::IdeaId.eq(idea_id))
            .order_by_desc(MeetingLogColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }
}
