//! Derived views: pure functions over collection snapshots.
//!
//! Nothing here mutates state or talks to the network; screens compute these
//! on demand from whatever the stores currently hold.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{Job, ManagementProject, Message, Post, ProjectStatus, User, UserRole};

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

/// Jobs whose title, company, description or location contain `term`,
/// case-insensitively. An empty term matches everything.
pub fn search_jobs<'a>(jobs: &'a [Job], term: &str) -> Vec<&'a Job> {
    let needle = term.trim().to_lowercase();
    jobs.iter()
        .filter(|job| {
            needle.is_empty()
                || contains_ci(&job.title, &needle)
                || contains_ci(&job.company, &needle)
                || contains_ci(&job.description, &needle)
                || contains_ci(&job.location, &needle)
        })
        .collect()
}

/// Candidates matching `term` on name or headline, optionally restricted to
/// those listing a skill containing `skill`.
pub fn search_candidates<'a>(users: &'a [User], term: &str, skill: Option<&str>) -> Vec<&'a User> {
    let needle = term.trim().to_lowercase();
    let skill = skill
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    users
        .iter()
        .filter(|u| u.role == UserRole::Candidate)
        .filter(|u| {
            needle.is_empty() || contains_ci(&u.name, &needle) || contains_ci(&u.headline, &needle)
        })
        .filter(|u| match &skill {
            Some(skill) => u.all_skills().iter().any(|s| contains_ci(s, skill)),
            None => true,
        })
        .collect()
}

/// Every skill listed by a candidate, sorted and unique. Feeds the skill
/// filter drop-down.
pub fn candidate_skills(users: &[User]) -> Vec<String> {
    users
        .iter()
        .filter(|u| u.role == UserRole::Candidate)
        .flat_map(|u| u.skills.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    /// Planning or in progress.
    pub active: usize,
    pub completed: usize,
}

pub fn project_stats(projects: &[ManagementProject]) -> ProjectStats {
    ProjectStats {
        total: projects.len(),
        active: projects.iter().filter(|p| p.status.is_active()).count(),
        completed: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count(),
    }
}

/// `None` means "all".
pub fn projects_with_status(
    projects: &[ManagementProject],
    status: Option<ProjectStatus>,
) -> Vec<&ManagementProject> {
    projects
        .iter()
        .filter(|p| status.map_or(true, |s| p.status == s))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, clamped into `1..=total_pages`.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    /// At least 1, even for an empty list.
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);

    Page {
        items: &items[start..end],
        page,
        per_page,
        total_items,
        total_pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Kanban columns, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStage {
    ToReview,
    InProgress,
    Interview,
    Hired,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::ToReview,
        PipelineStage::InProgress,
        PipelineStage::Interview,
        PipelineStage::Hired,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PipelineStage::ToReview => "To Review",
            PipelineStage::InProgress => "In Progress",
            PipelineStage::Interview => "Interview",
            PipelineStage::Hired => "Hired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCard {
    /// Applicant user id.
    pub id: String,
    pub name: String,
    /// Position applied for.
    pub role: String,
    /// Match score out of 100, when one has been computed.
    pub score: Option<u8>,
    pub stage: PipelineStage,
}

/// One card per applicant of `job`, all starting in `ToReview`. Applicants
/// missing from `users` still get a card, named by id.
pub fn application_cards(job: &Job, users: &[User]) -> Vec<ApplicationCard> {
    job.applicants
        .iter()
        .map(|applicant| ApplicationCard {
            id: applicant.clone(),
            name: users
                .iter()
                .find(|u| u.id == *applicant)
                .map_or_else(|| applicant.clone(), |u| u.name.clone()),
            role: job.title.clone(),
            score: None,
            stage: PipelineStage::ToReview,
        })
        .collect()
}

/// Groups cards by stage. Every stage is present, possibly empty, and cards
/// keep their input order within a column.
pub fn kanban(cards: impl IntoIterator<Item = ApplicationCard>) -> BTreeMap<PipelineStage, Vec<ApplicationCard>> {
    let mut board: BTreeMap<_, Vec<_>> = PipelineStage::ALL
        .into_iter()
        .map(|stage| (stage, Vec::new()))
        .collect();
    for card in cards {
        board.entry(card.stage).or_default().push(card);
    }
    board
}

/// Jobs `recruiter_id` posted, each with its applicant count.
pub fn jobs_posted_by<'a>(jobs: &'a [Job], recruiter_id: &str) -> Vec<(&'a Job, usize)> {
    jobs.iter()
        .filter(|j| j.posted_by == recruiter_id)
        .map(|j| (j, j.applicants.len()))
        .collect()
}

pub fn jobs_applied_by<'a>(jobs: &'a [Job], user_id: &str) -> Vec<&'a Job> {
    jobs.iter().filter(|j| j.has_applicant(user_id)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Messaging and feed
// ────────────────────────────────────────────────────────────────────────────

/// Messages exchanged between `a` and `b`, oldest first.
pub fn conversation<'a>(messages: &'a [Message], a: &str, b: &str) -> Vec<&'a Message> {
    let mut thread: Vec<_> = messages.iter().filter(|m| m.is_between(a, b)).collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
}

/// Everyone `user_id` has exchanged messages with, most recent first.
pub fn conversation_partners(messages: &[Message], user_id: &str) -> Vec<String> {
    let mut latest: BTreeMap<&str, &Message> = BTreeMap::new();
    for message in messages {
        let partner = if message.sender_id == user_id {
            &message.receiver_id
        } else if message.receiver_id == user_id {
            &message.sender_id
        } else {
            continue;
        };
        latest
            .entry(partner.as_str())
            .and_modify(|m| {
                if message.timestamp > m.timestamp {
                    *m = message;
                }
            })
            .or_insert(message);
    }

    let mut partners: Vec<_> = latest.into_iter().collect();
    partners.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    partners.into_iter().map(|(id, _)| id.to_string()).collect()
}

pub fn posts_by<'a>(posts: &'a [Post], author_id: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.author_id == author_id).collect()
}
