//! Community feed: list recent posts, create a post, like a post.
//!
//! - Resolves the author from the session first, then from the request body
//! - Verifies the author exists before looking at the rest of the body
//! - Applies the falsy-points default (absent or 0 becomes 10)
//! - Likes go through the store's atomic increment, never read-modify-write

use crate::domain::{
    CreatedPost, DomainError, NewPost, PostSummary, RECENT_POSTS_LIMIT, content_from_json,
    points_from_json,
};
use crate::ports::{AvatarPicker, CommunityPort, CreatePostRequest, PostStore, UserStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Community service. Holds injected store handles; no per-request state.
pub struct CommunityService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    avatars: Arc<dyn AvatarPicker>,
}

impl CommunityService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        avatars: Arc<dyn AvatarPicker>,
    ) -> Self {
        Self {
            users,
            posts,
            avatars,
        }
    }
}

#[async_trait::async_trait]
impl CommunityPort for CommunityService {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, DomainError> {
        let posts = self.posts.find_recent(RECENT_POSTS_LIMIT).await?;
        Ok(posts.iter().map(PostSummary::from).collect())
    }

    async fn create_post(&self, req: CreatePostRequest) -> Result<CreatedPost, DomainError> {
        let Some(user_id) = req.resolve_user_id()? else {
            warn!("create_post without a resolvable user id");
            return Err(DomainError::Unauthenticated);
        };

        let Some(user) = self.users.find_by_id(&user_id).await? else {
            warn!(user_id = %user_id, "create_post for unknown user");
            return Err(DomainError::UserNotFound);
        };

        let points = points_from_json(&req.points)?;
        let content = content_from_json(&req.content)?;
        let new_post = NewPost::new(user.id.clone(), content, req.task, points);
        let post = self.posts.insert(new_post).await?;

        info!(
            post_id = %post.id,
            user_id = %user.id,
            points = post.points,
            "post created"
        );

        Ok(CreatedPost::new(post, &user, self.avatars.pick()))
    }

    async fn like_post(&self, post_id: &str) -> Result<i64, DomainError> {
        match self.posts.increment_likes(post_id).await? {
            Some(likes) => {
                info!(post_id, likes, "post liked");
                Ok(likes)
            }
            None => {
                warn!(post_id, "like for unknown post");
                Err(DomainError::PostNotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::avatar::FixedAvatarPicker;
    use crate::adapters::persistence::MemoryRepo;
    use crate::domain::{NewPost, PopulatedPost, Post, User};
    use serde_json::{Value, json};

    async fn setup() -> (Arc<MemoryRepo>, CommunityService) {
        let repo = Arc::new(MemoryRepo::new());
        repo.save_user(User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        })
        .await;
        let service = CommunityService::new(
            Arc::clone(&repo) as Arc<dyn UserStore>,
            Arc::clone(&repo) as Arc<dyn PostStore>,
            Arc::new(FixedAvatarPicker(0)),
        );
        (repo, service)
    }

    fn request(content: &str, points: Value) -> CreatePostRequest {
        CreatePostRequest {
            content: json!(content),
            task: json!("planting"),
            points,
            session_user_id: None,
            body_user_id: json!("u1"),
        }
    }

    #[tokio::test]
    async fn test_create_post_example() {
        let (_repo, service) = setup().await;

        let created = service
            .create_post(request("Planted a tree", json!(0)))
            .await
            .unwrap();

        assert_eq!(created.content, "Planted a tree");
        assert_eq!(created.task, json!("planting"));
        assert_eq!(created.points, 10);
        assert_eq!(created.likes, 0);
        assert_eq!(created.comments_count, 0);
        assert_eq!(created.user.name, "Ada");
        assert_eq!(created.user.avatar, "🌱");
    }

    #[tokio::test]
    async fn test_create_post_points() {
        let (repo, service) = setup().await;

        let omitted = service.create_post(request("a", Value::Null)).await.unwrap();
        let zero = service.create_post(request("b", json!(0))).await.unwrap();
        let explicit = service.create_post(request("c", json!(42))).await.unwrap();

        assert_eq!(repo.get_post(&omitted.id).await.unwrap().points, 10);
        assert_eq!(repo.get_post(&zero.id).await.unwrap().points, 10);
        assert_eq!(repo.get_post(&explicit.id).await.unwrap().points, 42);
    }

    #[tokio::test]
    async fn test_create_post_session_takes_precedence() {
        let (repo, service) = setup().await;
        let mut req = request("Walked", Value::Null);
        req.session_user_id = Some("u1".into());
        req.body_user_id = json!("someone-else");

        let created = service.create_post(req).await.unwrap();
        assert_eq!(repo.get_post(&created.id).await.unwrap().author, "u1");
    }

    #[tokio::test]
    async fn test_create_post_empty_session_falls_back_to_body() {
        let (_repo, service) = setup().await;
        let mut req = request("Walked", Value::Null);
        req.session_user_id = Some(String::new());

        assert!(service.create_post(req).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_post_unauthenticated() {
        let (repo, service) = setup().await;
        let mut req = request("Walked", Value::Null);
        req.body_user_id = Value::Null;

        let err = service.create_post(req).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
        assert_eq!(repo.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_post_unknown_user() {
        let (repo, service) = setup().await;
        let mut req = request("Walked", Value::Null);
        req.body_user_id = json!("ghost");

        let err = service.create_post(req).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
        assert_eq!(repo.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_identity_checked_before_body_fields() {
        let (repo, service) = setup().await;

        let mut anonymous = request("hi", json!("lots"));
        anonymous.body_user_id = Value::Null;
        assert!(matches!(
            service.create_post(anonymous).await,
            Err(DomainError::Unauthenticated)
        ));

        let mut ghost = request("hi", json!(-5));
        ghost.body_user_id = json!("ghost");
        ghost.content = json!({ "not": "text" });
        assert!(matches!(
            service.create_post(ghost).await,
            Err(DomainError::UserNotFound)
        ));

        let known = request("hi", json!(-5));
        assert!(matches!(
            service.create_post(known).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(repo.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_post_missing_content() {
        let (repo, service) = setup().await;
        let mut req = request("", Value::Null);
        req.content = Value::Null;

        let err = service.create_post(req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(repo.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_posts_newest_first_capped() {
        let (_repo, service) = setup().await;
        for i in 0..60 {
            service
                .create_post(request(&format!("post {i}"), Value::Null))
                .await
                .unwrap();
        }

        let posts = service.list_posts().await.unwrap();
        assert_eq!(posts.len(), RECENT_POSTS_LIMIT);
        assert_eq!(posts[0].content, "post 59");
        assert_eq!(posts[49].content, "post 10");
    }

    #[tokio::test]
    async fn test_list_posts_empty() {
        let (_repo, service) = setup().await;
        assert!(service.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_like_post_counts() {
        let (_repo, service) = setup().await;
        let created = service.create_post(request("Recycled", Value::Null)).await.unwrap();

        assert_eq!(service.like_post(&created.id).await.unwrap(), 1);
        assert_eq!(service.like_post(&created.id).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_like_post_concurrent() {
        let (repo, service) = setup().await;
        let service = Arc::new(service);
        let created = service.create_post(request("Recycled", Value::Null)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let service = Arc::clone(&service);
            let id = created.id.clone();
            handles.push(tokio::spawn(async move { service.like_post(&id).await }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(repo.get_post(&created.id).await.unwrap().likes, 100);
    }

    #[tokio::test]
    async fn test_like_unknown_post() {
        let (repo, service) = setup().await;
        let created = service.create_post(request("Recycled", Value::Null)).await.unwrap();

        let err = service.like_post("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound));
        assert_eq!(repo.get_post(&created.id).await.unwrap().likes, 0);
    }

    /// Post store whose every call fails, for the internal-error path.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl PostStore for BrokenStore {
        async fn find_recent(&self, _limit: usize) -> Result<Vec<PopulatedPost>, DomainError> {
            Err(DomainError::Repo("connection reset".into()))
        }

        async fn insert(&self, _post: NewPost) -> Result<Post, DomainError> {
            Err(DomainError::Repo("connection reset".into()))
        }

        async fn increment_likes(&self, _post_id: &str) -> Result<Option<i64>, DomainError> {
            Err(DomainError::Repo("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failures_surface() {
        let (repo, _) = setup().await;
        let service = CommunityService::new(
            repo as Arc<dyn UserStore>,
            Arc::new(BrokenStore),
            Arc::new(FixedAvatarPicker(0)),
        );

        let list_err = service.list_posts().await.unwrap_err();
        assert_eq!(list_err.to_string(), "Repository error: connection reset");
        assert!(matches!(
            service.create_post(request("x", Value::Null)).await,
            Err(DomainError::Repo(_))
        ));
        assert!(matches!(
            service.like_post("p").await,
            Err(DomainError::Repo(_))
        ));
    }
}
