//! Domain mutations as values.
//!
//! A [`Command`] knows how to apply itself to the local [`Collections`] and
//! which [`RemoteWrite`] mirrors it. The store applies under one write lock,
//! so each command (including the two-sided relationship toggles) is atomic
//! with respect to readers.

use serde_json::{json, Value};

use crate::gateway::endpoints;
use crate::models::{Comment, Job, ManagementProject, Message, Post, User, UserPatch};
use crate::seed;
use crate::store::outbox::RemoteWrite;

/// Every collection the domain store owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub posts: Vec<Post>,
    pub jobs: Vec<Job>,
    pub users: Vec<User>,
    pub messages: Vec<Message>,
    pub projects: Vec<ManagementProject>,
}

impl Collections {
    pub fn seeded() -> Self {
        Self {
            posts: seed::posts(),
            jobs: seed::jobs(),
            users: seed::users(),
            messages: seed::messages(),
            projects: seed::projects(),
        }
    }

    fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPost(Post),
    LikePost { post_id: String, user_id: String },
    AddComment { post_id: String, comment: Comment },
    AddJob(Job),
    ApplyForJob { job_id: String, user_id: String },
    SendMessage(Message),
    ToggleFollow { follower_id: String, target_id: String },
    ToggleConnect { requester_id: String, target_id: String },
    UpdateProfile { user_id: String, patch: UserPatch },
    AddProject(ManagementProject),
}

/// A project built by hand may carry any progress; stored and sent copies
/// stay within 0..=100.
fn bounded(project: &ManagementProject) -> ManagementProject {
    project.clone().with_progress(project.progress)
}

/// Adds `id` if absent, removes it if present.
fn toggle(ids: &mut Vec<String>, id: &str) {
    if let Some(pos) = ids.iter().position(|x| x == id) {
        ids.remove(pos);
    } else {
        ids.push(id.to_string());
    }
}

impl Command {
    /// Applies the command and reports whether anything changed. A command
    /// that references no existing record changes nothing.
    pub fn apply(&self, state: &mut Collections) -> bool {
        match self {
            Command::AddPost(post) => {
                state.posts.insert(0, post.clone());
                true
            }
            Command::LikePost { post_id, user_id } => match state.post_mut(post_id) {
                Some(post) => {
                    toggle(&mut post.likes, user_id);
                    true
                }
                None => false,
            },
            Command::AddComment { post_id, comment } => match state.post_mut(post_id) {
                Some(post) => {
                    post.comments.push(comment.clone());
                    true
                }
                None => false,
            },
            Command::AddJob(job) => {
                state.jobs.insert(0, job.clone());
                true
            }
            Command::ApplyForJob { job_id, user_id } => {
                match state.jobs.iter_mut().find(|j| j.id == *job_id) {
                    Some(job) if !job.has_applicant(user_id) => {
                        job.applicants.push(user_id.clone());
                        true
                    }
                    _ => false,
                }
            }
            Command::SendMessage(message) => {
                state.messages.push(message.clone());
                true
            }
            Command::ToggleFollow {
                follower_id,
                target_id,
            } => {
                if follower_id == target_id {
                    return false;
                }
                let mut changed = false;
                if let Some(follower) = state.user_mut(follower_id) {
                    toggle(&mut follower.following, target_id);
                    changed = true;
                }
                if let Some(target) = state.user_mut(target_id) {
                    toggle(&mut target.followers, follower_id);
                    changed = true;
                }
                changed
            }
            Command::ToggleConnect {
                requester_id,
                target_id,
            } => {
                if requester_id == target_id {
                    return false;
                }
                let mut changed = false;
                if let Some(requester) = state.user_mut(requester_id) {
                    toggle(&mut requester.connections, target_id);
                    changed = true;
                }
                if let Some(target) = state.user_mut(target_id) {
                    toggle(&mut target.connections, requester_id);
                    changed = true;
                }
                changed
            }
            Command::UpdateProfile { user_id, patch } => {
                if patch.is_empty() {
                    return false;
                }
                match state.user_mut(user_id) {
                    Some(user) => {
                        patch.apply_to(user);
                        true
                    }
                    None => false,
                }
            }
            Command::AddProject(project) => {
                state.projects.insert(0, bounded(project));
                true
            }
        }
    }

    /// Whether applying this command can change the user list, which is
    /// persisted as a snapshot.
    pub fn touches_users(&self) -> bool {
        matches!(
            self,
            Command::ToggleFollow { .. }
                | Command::ToggleConnect { .. }
                | Command::UpdateProfile { .. }
        )
    }

    /// The write that mirrors this command on the backend.
    pub fn remote_write(&self) -> RemoteWrite {
        match self {
            Command::AddPost(post) => RemoteWrite::post(
                "create post",
                format!("post:{}", post.id),
                endpoints::POSTS.to_string(),
                to_body(post),
            ),
            Command::LikePost { post_id, user_id } => RemoteWrite::post(
                "like post",
                format!("post:{post_id}"),
                endpoints::post_like(post_id),
                json!({ "userId": user_id }),
            ),
            Command::AddComment { post_id, comment } => RemoteWrite::post(
                "add comment",
                format!("post:{post_id}"),
                endpoints::post_comment(post_id),
                to_body(comment),
            ),
            Command::AddJob(job) => RemoteWrite::post(
                "create job",
                format!("job:{}", job.id),
                endpoints::JOBS.to_string(),
                to_body(job),
            ),
            Command::ApplyForJob { job_id, user_id } => RemoteWrite::post(
                "apply for job",
                format!("job:{job_id}"),
                endpoints::job_apply(job_id),
                json!({ "userId": user_id }),
            ),
            Command::SendMessage(message) => RemoteWrite::post(
                "send message",
                format!("message:{}", message.id),
                endpoints::MESSAGES.to_string(),
                to_body(message),
            ),
            Command::ToggleFollow {
                follower_id,
                target_id,
            } => RemoteWrite::post(
                "toggle follow",
                format!("user:{target_id}"),
                endpoints::user_follow(target_id),
                json!({ "followerId": follower_id }),
            ),
            Command::ToggleConnect {
                requester_id,
                target_id,
            } => RemoteWrite::post(
                "toggle connection",
                format!("user:{target_id}"),
                endpoints::user_connect(target_id),
                json!({ "requesterId": requester_id }),
            ),
            Command::UpdateProfile { user_id, patch } => profile_write(user_id, patch),
            Command::AddProject(project) => RemoteWrite::post(
                "create project",
                format!("project:{}", project.id),
                endpoints::PROJECTS.to_string(),
                to_body(&bounded(project)),
            ),
        }
    }
}

/// `PUT /user/{id}` carrying only the patched fields. Shared with the session
/// store so an actor edit and a directory edit version the same record.
pub fn profile_write(user_id: &str, patch: &UserPatch) -> RemoteWrite {
    RemoteWrite::replace(
        "update profile",
        format!("user:{user_id}"),
        endpoints::user(user_id),
        to_body(patch),
    )
}

fn to_body<T: serde::Serialize>(value: &T) -> Value {
    // Derived Serialize on these records never fails.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
