//! Demo sign-in fallback.
//!
//! When the login call fails for any reason the session still opens: a seed
//! user with the same email is reused, otherwise a fresh user is synthesized
//! with the requested role. Swap the policy out to turn this off.

use crate::models::{new_id, User, UserRole};
use crate::seed;

pub const MOCK_TOKEN: &str = "mock_token_123";

/// Where a signed-in actor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInSource {
    Remote,
    Seed,
    Synthesized,
}

/// Placeholder avatar keyed by email, stable across sessions.
pub fn avatar_for(email: &str) -> String {
    format!("https://picsum.photos/seed/{email}/200")
}

#[derive(Debug, Clone)]
pub struct DemoFallback {
    users: Vec<User>,
    token: String,
}

impl Default for DemoFallback {
    fn default() -> Self {
        Self::new(seed::users(), MOCK_TOKEN)
    }
}

impl DemoFallback {
    pub fn new(users: Vec<User>, token: impl Into<String>) -> Self {
        Self {
            users,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Seed users keep their own role; synthesized ones take `role`.
    pub fn resolve(&self, email: &str, role: UserRole) -> (User, SignInSource) {
        match self.users.iter().find(|u| u.email == email) {
            Some(user) => (user.clone(), SignInSource::Seed),
            None => (synthesize(email, role), SignInSource::Synthesized),
        }
    }
}

fn synthesize(email: &str, role: UserRole) -> User {
    let name = email.split('@').next().unwrap_or(email);
    let mut user = User::new(new_id(), name, email, role);
    user.avatar = avatar_for(email);
    user.headline = match role {
        UserRole::Candidate => "Open to Work",
        UserRole::Recruiter | UserRole::Admin => "Recruiting for Tech",
    }
    .to_string();
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_email_resolves_to_seed_user() {
        let (user, source) = DemoFallback::default().resolve(seed::RECRUITER_EMAIL, UserRole::Candidate);
        assert_eq!(source, SignInSource::Seed);
        assert_eq!(user.id, "u2");
        assert_eq!(user.role, UserRole::Recruiter);
    }

    #[test]
    fn test_unknown_email_is_synthesized_with_requested_role() {
        let (user, source) = DemoFallback::default().resolve("ada@lovelace.dev", UserRole::Recruiter);
        assert_eq!(source, SignInSource::Synthesized);
        assert_eq!(user.name, "ada");
        assert_eq!(user.role, UserRole::Recruiter);
        assert_eq!(user.headline, "Recruiting for Tech");
        assert_eq!(user.avatar, "https://picsum.photos/seed/ada@lovelace.dev/200");
        assert!(user.connections.is_empty());
        assert!(user.following.is_empty());
    }

    #[test]
    fn test_synthesized_candidate_is_open_to_work() {
        let (user, _) = DemoFallback::default().resolve("new@person.io", UserRole::Candidate);
        assert_eq!(user.headline, "Open to Work");
    }

    #[test]
    fn test_email_without_at_sign_uses_whole_string_as_name() {
        let (user, _) = DemoFallback::new(vec![], "t").resolve("nobody", UserRole::Candidate);
        assert_eq!(user.name, "nobody");
    }
}
