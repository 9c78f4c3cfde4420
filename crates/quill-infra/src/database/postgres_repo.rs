//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use quill_core::domain::{CommentDetail, PostDetail, Tag, UserDetail};
use quill_core::error::RepoError;
use quill_core::filter::PostQuery;
use quill_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Load the comments of a post, each with its author.
async fn load_post_comments(db: &DbConn, post_id: Uuid) -> Result<Vec<CommentDetail>, RepoError> {
    let rows = CommentEntity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .order_by_asc(comment::Column::CreatedAt)
        .find_also_related(UserEntity)
        .all(db)
        .await
        .map_err(map_db_err)?;

    rows.into_iter()
        .map(|(comment, author)| {
            let author = author
                .ok_or_else(|| RepoError::Query("comment author missing".to_owned()))?;
            Ok(CommentDetail {
                comment: comment.into(),
                author: author.into(),
            })
        })
        .collect()
}

/// Assemble a post detail: owning user, attached tags, comments with authors.
async fn load_post_detail(db: &DbConn, model: post::Model) -> Result<PostDetail, RepoError> {
    let author = model
        .find_related(UserEntity)
        .one(db)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| RepoError::Query("post owner missing".to_owned()))?;

    let tags: Vec<Tag> = model
        .find_related(TagEntity)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(Into::into)
        .collect();

    let comments = load_post_comments(db, model.id).await?;

    Ok(PostDetail {
        post: model.into(),
        author: author.into(),
        tags,
        comments,
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(Some(load_post_detail(&self.db, model).await?))
    }

    async fn list_detail(&self, query: &PostQuery) -> Result<Vec<PostDetail>, RepoError> {
        let mut select = PostEntity::find().order_by_asc(post::Column::CreatedAt);

        // Exact match against the raw value; an unknown status matches no
        // rows, which is the contract (empty list, not an error).
        if let Some(status) = query.status.as_deref() {
            select = select.filter(post::Column::Status.eq(status));
        }

        let models = select.all(&self.db).await.map_err(map_db_err)?;

        let mut details = Vec::with_capacity(models.len());
        for model in models {
            details.push(load_post_detail(&self.db, model).await?);
        }

        Ok(details)
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(*tag_id),
        });
        PostTagEntity::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<UserDetail>, RepoError> {
        let Some(user) = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(Some(load_user_detail(&self.db, user).await?))
    }

    async fn list_detail(&self) -> Result<Vec<UserDetail>, RepoError> {
        let users = UserEntity::find()
            .order_by_asc(super::entity::user::Column::Username)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut details = Vec::with_capacity(users.len());
        for user in users {
            details.push(load_user_detail(&self.db, user).await?);
        }

        Ok(details)
    }
}

async fn load_user_detail(
    db: &DbConn,
    user: super::entity::user::Model,
) -> Result<UserDetail, RepoError> {
    let post_models = PostEntity::find()
        .filter(post::Column::UserId.eq(user.id))
        .order_by_asc(post::Column::CreatedAt)
        .all(db)
        .await
        .map_err(map_db_err)?;

    let mut posts = Vec::with_capacity(post_models.len());
    for model in post_models {
        posts.push(load_post_detail(db, model).await?);
    }

    let comment_rows = CommentEntity::find()
        .filter(comment::Column::UserId.eq(user.id))
        .order_by_asc(comment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(map_db_err)?;

    let author: quill_core::domain::User = user.into();
    let comments = comment_rows
        .into_iter()
        .map(|comment| CommentDetail {
            comment: comment.into(),
            author: author.clone(),
        })
        .collect();

    Ok(UserDetail {
        user: author,
        posts,
        comments,
    })
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(tag::Column::Name))).eq(name.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<CommentDetail>, RepoError> {
        let Some((comment, author)) = CommentEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let author =
            author.ok_or_else(|| RepoError::Query("comment author missing".to_owned()))?;

        Ok(Some(CommentDetail {
            comment: comment.into(),
            author: author.into(),
        }))
    }

    async fn list_detail(&self) -> Result<Vec<CommentDetail>, RepoError> {
        let rows = CommentEntity::find()
            .order_by_asc(comment::Column::CreatedAt)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author
                    .ok_or_else(|| RepoError::Query("comment author missing".to_owned()))?;
                Ok(CommentDetail {
                    comment: comment.into(),
                    author: author.into(),
                })
            })
            .collect()
    }
}
