//! Domain store: posts, jobs, users, messages and projects.
//!
//! Every mutation is committed locally first and then mirrored through the
//! [`Outbox`]. Remote failures never roll a local change back, so local state
//! may diverge from the backend until the next hydration.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::gateway::{endpoints, RemoteGateway};
use crate::models::{
    Comment, Education, Experience, Job, ManagementProject, Message, Post, User, UserPatch,
};
use crate::session::SessionStore;
use crate::storage::{save_json, KeyValueStore, ALL_USERS_KEY, THEME_KEY};

pub mod commands;
pub mod hydration;
pub mod outbox;
pub mod views;

pub use commands::{Collections, Command};
pub use hydration::{Adoption, HydrationReport};
pub use outbox::{DrainReport, Outbox, OutboxWorker, RemoteWrite, RetryPolicy};

/// UI preferences that live next to the collections but never leave the
/// device, except the theme which is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub search_term: String,
    pub dark_mode: bool,
}

pub struct DomainStore {
    collections: RwLock<Collections>,
    preferences: RwLock<Preferences>,
    session: Arc<SessionStore>,
    gateway: Arc<dyn RemoteGateway>,
    outbox: Outbox,
    storage: Arc<dyn KeyValueStore>,
}

impl DomainStore {
    /// A store seeded with the demo collections.
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<dyn RemoteGateway>,
        outbox: Outbox,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_collections(Collections::seeded(), session, gateway, outbox, storage)
    }

    pub fn with_collections(
        collections: Collections,
        session: Arc<SessionStore>,
        gateway: Arc<dyn RemoteGateway>,
        outbox: Outbox,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let dark_mode = match storage.get(THEME_KEY) {
            Ok(theme) => theme.as_deref() == Some("dark"),
            Err(e) => {
                warn!("Could not read theme preference: {e}");
                false
            }
        };
        Self {
            collections: RwLock::new(collections),
            preferences: RwLock::new(Preferences {
                search_term: String::new(),
                dark_mode,
            }),
            session,
            gateway,
            outbox,
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_users(&self, users: &[User]) {
        if let Err(e) = save_json(self.storage.as_ref(), ALL_USERS_KEY, users) {
            warn!("Could not persist user list: {e}");
        }
    }

    /// Applies `command` locally under one write lock. Returns whether it
    /// changed anything.
    fn commit(&self, command: &Command) -> bool {
        let (changed, users) = {
            let mut state = self.write();
            let changed = command.apply(&mut state);
            let users = (changed && command.touches_users()).then(|| state.users.clone());
            (changed, users)
        };
        if let Some(users) = users {
            self.persist_users(&users);
        }
        changed
    }

    /// Commits locally, then queues the remote mirror. A command that changed
    /// nothing is not sent.
    fn dispatch(&self, command: Command) -> bool {
        let changed = self.commit(&command);
        if changed {
            self.outbox.enqueue(command.remote_write());
        } else {
            debug!("No local change, not sending: {command:?}");
        }
        changed
    }

    // ── Feed ───────────────────────────────────────────────────────────────

    pub fn add_post(&self, post: Post) {
        self.dispatch(Command::AddPost(post));
    }

    /// Toggles `user_id` in the post's likes.
    pub fn like_post(&self, post_id: &str, user_id: &str) {
        self.dispatch(Command::LikePost {
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    pub fn add_comment(&self, post_id: &str, comment: Comment) {
        self.dispatch(Command::AddComment {
            post_id: post_id.to_string(),
            comment,
        });
    }

    // ── Jobs ───────────────────────────────────────────────────────────────

    pub fn add_job(&self, job: Job) {
        self.dispatch(Command::AddJob(job));
    }

    /// Re-applying is a silent no-op, locally and remotely.
    pub fn apply_for_job(&self, job_id: &str, user_id: &str) {
        self.dispatch(Command::ApplyForJob {
            job_id: job_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    // ── Messaging ──────────────────────────────────────────────────────────

    pub fn send_message(&self, sender_id: &str, receiver_id: &str, content: &str) -> Message {
        let message = Message::new(sender_id, receiver_id, content);
        self.dispatch(Command::SendMessage(message.clone()));
        message
    }

    // ── Network ────────────────────────────────────────────────────────────

    pub fn toggle_follow(&self, current_user_id: &str, target_user_id: &str) {
        self.dispatch(Command::ToggleFollow {
            follower_id: current_user_id.to_string(),
            target_id: target_user_id.to_string(),
        });
    }

    pub fn toggle_connect(&self, current_user_id: &str, target_user_id: &str) {
        self.dispatch(Command::ToggleConnect {
            requester_id: current_user_id.to_string(),
            target_id: target_user_id.to_string(),
        });
    }

    // ── Profiles ───────────────────────────────────────────────────────────

    /// Patches a user in the directory. When the user is the actor, the
    /// session record is patched too and it sends the single remote update.
    pub fn update_user_profile(&self, user_id: &str, patch: UserPatch) {
        let is_actor = self.session.actor().is_some_and(|a| a.id == user_id);
        if is_actor {
            self.session.update_actor(&patch);
        }

        let command = Command::UpdateProfile {
            user_id: user_id.to_string(),
            patch,
        };
        if self.commit(&command) && !is_actor {
            self.outbox.enqueue(command.remote_write());
        }
    }

    fn edit_user(&self, user_id: &str, edit: impl FnOnce(&User) -> UserPatch) {
        let Some(user) = self.user(user_id) else {
            debug!("No user {user_id} to edit");
            return;
        };
        self.update_user_profile(user_id, edit(&user));
    }

    /// Replaces the entry with the same id, or appends it.
    pub fn upsert_experience(&self, user_id: &str, entry: Experience) {
        self.edit_user(user_id, |user| {
            let mut list = user.experience.clone();
            match list.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => list.push(entry),
            }
            UserPatch {
                experience: Some(list),
                ..Default::default()
            }
        });
    }

    pub fn remove_experience(&self, user_id: &str, entry_id: &str) {
        self.edit_user(user_id, |user| UserPatch {
            experience: Some(
                user.experience
                    .iter()
                    .filter(|e| e.id != entry_id)
                    .cloned()
                    .collect(),
            ),
            ..Default::default()
        });
    }

    /// Replaces the entry with the same id, or appends it.
    pub fn upsert_education(&self, user_id: &str, entry: Education) {
        self.edit_user(user_id, |user| {
            let mut list = user.education.clone();
            match list.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => list.push(entry),
            }
            UserPatch {
                education: Some(list),
                ..Default::default()
            }
        });
    }

    pub fn remove_education(&self, user_id: &str, entry_id: &str) {
        self.edit_user(user_id, |user| UserPatch {
            education: Some(
                user.education
                    .iter()
                    .filter(|e| e.id != entry_id)
                    .cloned()
                    .collect(),
            ),
            ..Default::default()
        });
    }

    // ── Projects ───────────────────────────────────────────────────────────

    pub fn add_project(&self, project: ManagementProject) {
        self.dispatch(Command::AddProject(project));
    }

    // ── Preferences ────────────────────────────────────────────────────────

    pub fn preferences(&self) -> Preferences {
        self.preferences
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.preferences
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .search_term = term.into();
    }

    /// Flips the theme, persists it and returns the new dark-mode flag.
    pub fn toggle_dark_mode(&self) -> bool {
        let dark = {
            let mut prefs = self.preferences.write().unwrap_or_else(PoisonError::into_inner);
            prefs.dark_mode = !prefs.dark_mode;
            prefs.dark_mode
        };
        let theme = if dark { "dark" } else { "light" };
        if let Err(e) = self.storage.set(THEME_KEY, theme) {
            warn!("Could not persist theme: {e}");
        }
        dark
    }

    // ── Snapshots ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Collections {
        self.read().clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.read().jobs.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    pub fn projects(&self) -> Vec<ManagementProject> {
        self.read().projects.clone()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.read().users.iter().find(|u| u.id == id).cloned()
    }

    // ── Hydration ──────────────────────────────────────────────────────────

    /// Replaces posts, jobs and users with the backend's lists. The three
    /// fetches run concurrently and each is adopted on its own; a failed one
    /// keeps the current local list. Does nothing without an actor.
    pub async fn hydrate(&self) -> HydrationReport {
        if self.session.actor().is_none() {
            debug!("Skipping hydration: no actor");
            return HydrationReport::skipped();
        }

        let gateway = self.gateway.as_ref();
        let (posts, jobs, users) = tokio::join!(
            hydration::fetch_list::<Post>(gateway, endpoints::POSTS),
            hydration::fetch_list::<Job>(gateway, endpoints::JOBS),
            hydration::fetch_list::<User>(gateway, endpoints::USERS),
        );

        let mut adopted_users = None;
        let report = {
            let mut state = self.write();
            let posts = adopt(&mut state.posts, posts, "posts");
            let jobs = adopt(&mut state.jobs, jobs, "jobs");
            let users = adopt(&mut state.users, users, "users");
            if users.is_replaced() {
                adopted_users = Some(state.users.clone());
            }
            HydrationReport {
                skipped: false,
                posts,
                jobs,
                users,
            }
        };
        if let Some(users) = adopted_users {
            self.persist_users(&users);
        }

        info!(
            "Hydration finished: posts={:?} jobs={:?} users={:?}",
            report.posts, report.jobs, report.users
        );
        report
    }
}

fn adopt<T>(
    slot: &mut Vec<T>,
    fetched: Result<Vec<T>, crate::gateway::GatewayError>,
    what: &str,
) -> Adoption {
    match fetched {
        Ok(list) => {
            let len = list.len();
            *slot = list;
            Adoption::Replaced(len)
        }
        Err(e) => {
            warn!("Keeping local {what}: {e}");
            Adoption::Kept
        }
    }
}
