//! SeaORM entity models
//!
//! Database entities for the ODR Lab platform

mod collaborator;
mod comment;
mod idea;
mod idea_submission;
mod like;
mod meeting_log;
mod mentor;
mod user;

pub use user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as User,
    UserRole,
};

pub use idea::{
    ActiveModel as IdeaActiveModel, Column as IdeaColumn, Entity as IdeaEntity, Model as Idea,
};

pub use idea_submission::{
    ActiveModel as IdeaSubmissionActiveModel, Column as IdeaSubmissionColumn,
    Entity as IdeaSubmissionEntity, Model as IdeaSubmission,
};

pub use comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as CommentEntity,
    Model as Comment,
};

pub use like::{
    ActiveModel as LikeActiveModel, Column as LikeColumn, Entity as LikeEntity, Model as Like,
};

pub use collaborator::{
    ActiveModel as CollaboratorActiveModel, Column as CollaboratorColumn,
    Entity as CollaboratorEntity, Model as Collaborator,
};

pub use mentor::{
    ActiveModel as MentorActiveModel, Column as MentorColumn, Entity as MentorEntity,
    Model as Mentor,
};

pub use meeting_log::{
    ActiveModel as MeetingLogActiveModel, Column as MeetingLogColumn, Entity as MeetingLogEntity,
    Model as MeetingLog,
};
