//! In-memory store. Implements UserStore and PostStore behind one RwLock.
//!
//! Used for tests and for `storage = "memory"` runs; nothing survives a restart.

use super::clock::CreationClock;
use crate::domain::{DomainError, NewPost, PopulatedPost, Post, User};
use crate::ports::{PostStore, UserStore};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryData {
    users: HashMap<String, User>,
    /// Insertion order; newest last.
    posts: Vec<Post>,
}

/// Process-local store. Safe to share via Arc.
#[derive(Debug, Default)]
pub struct MemoryRepo {
    data: RwLock<MemoryData>,
    clock: CreationClock,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a user.
    pub async fn save_user(&self, user: User) {
        self.data.write().await.users.insert(user.id.clone(), user);
    }

    /// Snapshot of a single post, mainly for assertions.
    pub async fn get_post(&self, post_id: &str) -> Option<Post> {
        self.data
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    pub async fn post_count(&self) -> usize {
        self.data.read().await.posts.len()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.data.read().await.users.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryRepo {
    async fn find_recent(&self, limit: usize) -> Result<Vec<PopulatedPost>, DomainError> {
        let data = self.data.read().await;
        // Vec is in insertion order, so reversing gives newest first with
        // insertion order as the tie-break for equal timestamps.
        let mut posts: Vec<&Post> = data.posts.iter().rev().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .take(limit)
            .map(|p| PopulatedPost {
                post: p.clone(),
                author: data.users.get(&p.author).cloned(),
            })
            .collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, DomainError> {
        let content = post
            .content
            .ok_or_else(|| DomainError::Validation("content is required".into()))?;
        // Stamp under the write guard so timestamp order matches Vec order.
        let mut data = self.data.write().await;
        let stored = Post {
            id: Uuid::new_v4().to_string(),
            author: post.author,
            content,
            task: post.task,
            points: post.points,
            likes: 0,
            comments: Vec::new(),
            created_at: self.clock.stamp()?,
        };
        data.posts.push(stored.clone());
        Ok(stored)
    }

    async fn increment_likes(&self, post_id: &str) -> Result<Option<i64>, DomainError> {
        // Lookup and increment happen under one write guard.
        let mut data = self.data.write().await;
        Ok(data
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .map(|p| {
                p.likes += 1;
                p.likes
            }))
    }
}
