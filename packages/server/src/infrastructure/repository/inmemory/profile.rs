//! In-memory `ProfileDirectory` implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Profile, ProfileDirectory, StoreError, UserId};

/// Profile lookup backed by a process-local map, seeded at startup.
pub struct InMemoryProfileDirectory {
    profiles: Mutex<HashMap<UserId, Profile>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, user_id: UserId, profile: Profile) {
        let mut profiles = self.profiles.lock().await;
        profiles.insert(user_id, profile);
    }
}

impl Default for InMemoryProfileDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn profile_of(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.lock().await;
        Ok(profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_of_known_user() {
        // given:
        let directory = InMemoryProfileDirectory::new();
        let alice = UserId::new("alice".to_string()).unwrap();
        directory
            .insert(alice.clone(), Profile::new("Alice", "Johnson"))
            .await;

        // when:
        let profile = directory.profile_of(&alice).await.unwrap();

        // then:
        assert_eq!(profile, Some(Profile::new("Alice", "Johnson")));
    }

    #[tokio::test]
    async fn test_profile_of_unknown_user_is_none() {
        // given:
        let directory = InMemoryProfileDirectory::new();
        let ghost = UserId::new("ghost".to_string()).unwrap();

        // when:
        let profile = directory.profile_of(&ghost).await.unwrap();

        // then:
        assert_eq!(profile, None);
    }
}
