// Resource paths relative to the configured base URL.

pub const LOGIN: &str = "/login";
pub const LOGOUT: &str = "/logout";
pub const CURRENT_USER: &str = "/user";
pub const POSTS: &str = "/posts";
pub const JOBS: &str = "/jobs";
pub const USERS: &str = "/users";
pub const MESSAGES: &str = "/messages";
pub const PROJECTS: &str = "/projects";

pub fn user(id: &str) -> String {
    format!("/user/{id}")
}

pub fn post_like(post_id: &str) -> String {
    format!("/posts/{post_id}/like")
}

pub fn post_comment(post_id: &str) -> String {
    format!("/posts/{post_id}/comment")
}

pub fn job_apply(job_id: &str) -> String {
    format!("/jobs/{job_id}/apply")
}

pub fn user_follow(target_id: &str) -> String {
    format!("/users/{target_id}/follow")
}

pub fn user_connect(target_id: &str) -> String {
    format!("/users/{target_id}/connect")
}
