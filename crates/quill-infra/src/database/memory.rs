//! In-memory store - used as fallback when no database is configured.
//!
//! Implements every repository port over a single locked table set so the
//! relational rules (cascade delete, unique constraints) behave like the
//! real store. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, CommentDetail, Post, PostDetail, Tag, User, UserDetail};
use quill_core::error::RepoError;
use quill_core::filter::PostQuery;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Tag>,
    comments: HashMap<Uuid, Comment>,
    post_tags: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn comment_detail(&self, comment: &Comment) -> Result<CommentDetail, RepoError> {
        let author = self
            .users
            .get(&comment.user_id)
            .ok_or_else(|| RepoError::Query("comment author missing".to_owned()))?;
        Ok(CommentDetail {
            comment: comment.clone(),
            author: author.clone(),
        })
    }

    fn post_comments(&self, post_id: Uuid) -> Result<Vec<CommentDetail>, RepoError> {
        let mut comments: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
            .into_iter()
            .map(|c| self.comment_detail(c))
            .collect()
    }

    fn post_detail(&self, post: &Post) -> Result<PostDetail, RepoError> {
        let author = self
            .users
            .get(&post.user_id)
            .ok_or_else(|| RepoError::Query("post owner missing".to_owned()))?;

        let mut tags: Vec<Tag> = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(PostDetail {
            post: post.clone(),
            author: author.clone(),
            tags,
            comments: self.post_comments(post.id)?,
        })
    }

    fn user_detail(&self, user: &User) -> Result<UserDetail, RepoError> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| p.user_id == user.id)
            .collect();
        posts.sort_by_key(|p| p.created_at);
        let posts = posts
            .into_iter()
            .map(|p| self.post_detail(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut comments: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| c.user_id == user.id)
            .collect();
        comments.sort_by_key(|c| c.created_at);
        let comments = comments
            .into_iter()
            .map(|c| self.comment_detail(c))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserDetail {
            user: user.clone(),
            posts,
            comments,
        })
    }

    /// Cascade: a post takes its comments and join rows with it.
    fn drop_post(&mut self, post_id: Uuid) {
        self.comments.retain(|_, c| c.post_id != post_id);
        self.post_tags.retain(|(pid, _)| *pid != post_id);
    }
}

/// In-memory store implementing all repository ports.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("duplicate user id".to_owned()));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("duplicate username".to_owned()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.posts.remove(&post_id);
            tables.drop_post(post_id);
        }
        tables.comments.retain(|_, c| c.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_detail(&self, id: Uuid) -> Result<Option<UserDetail>, RepoError> {
        let tables = self.tables.read().await;
        match tables.users.get(&id) {
            Some(user) => Ok(Some(tables.user_detail(user)?)),
            None => Ok(None),
        }
    }

    async fn list_detail(&self) -> Result<Vec<UserDetail>, RepoError> {
        let tables = self.tables.read().await;
        let mut users: Vec<&User> = tables.users.values().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
            .into_iter()
            .map(|user| tables.user_detail(user))
            .collect()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by_key(|p| p.created_at);
        Ok(posts)
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("duplicate post id".to_owned()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.drop_post(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let tables = self.tables.read().await;
        match tables.posts.get(&id) {
            Some(post) => Ok(Some(tables.post_detail(post)?)),
            None => Ok(None),
        }
    }

    async fn list_detail(&self, query: &PostQuery) -> Result<Vec<PostDetail>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p.status.as_str()))
            .collect();
        posts.sort_by_key(|p| p.created_at);
        posts
            .into_iter()
            .map(|post| tables.post_detail(post))
            .collect()
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.post_tags.retain(|(pid, _)| *pid != post_id);
        for tag_id in tag_ids {
            tables.post_tags.push((post_id, *tag_id));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.contains_key(&tag.id) {
            return Err(RepoError::Constraint("duplicate tag id".to_owned()));
        }
        // Mirrors the unique index on lower(name).
        if tables
            .tags
            .values()
            .any(|t| t.name.eq_ignore_ascii_case(&tag.name))
        {
            return Err(RepoError::Constraint("duplicate tag name".to_owned()));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.tags.contains_key(&tag.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .tags
            .values()
            .any(|t| t.id != tag.id && t.name.eq_ignore_ascii_case(&tag.name))
        {
            return Err(RepoError::Constraint("duplicate tag name".to_owned()));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Detach from all posts; the posts themselves survive.
        tables.post_tags.retain(|(_, tid)| *tid != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .values()
            .find(|t| t.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables.comments.values().cloned().collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::Constraint("duplicate comment id".to_owned()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_detail(&self, id: Uuid) -> Result<Option<CommentDetail>, RepoError> {
        let tables = self.tables.read().await;
        match tables.comments.get(&id) {
            Some(comment) => Ok(Some(tables.comment_detail(comment)?)),
            None => Ok(None),
        }
    }

    async fn list_detail(&self) -> Result<Vec<CommentDetail>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables.comments.values().collect();
        comments.sort_by_key(|c| c.created_at);
        comments
            .into_iter()
            .map(|c| tables.comment_detail(c))
            .collect()
    }
}
