//! Seed data used when no backend is reachable.
//!
//! The stores start from these collections and keep them for any collection
//! whose hydration call fails. Sign-in falls back to [`users`] by email.

use chrono::{Duration, Utc};

use crate::models::{
    Education, Experience, Job, JobStatus, JobType, ManagementProject, Message, Post,
    ProjectStatus, User, UserRole,
};

pub const RECRUITER_EMAIL: &str = "bhargav.desai@sapsol.com";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn experience(
    id: &str,
    title: &str,
    company: &str,
    location: &str,
    start: &str,
    end: Option<&str>,
    description: &str,
) -> Experience {
    Experience {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        start_date: start.to_string(),
        end_date: end.map(str::to_string),
        description: description.to_string(),
    }
}

pub fn users() -> Vec<User> {
    let mut sarah = User::new("u1", "Sarah Connor", "sarah@candidate.com", UserRole::Candidate);
    sarah.phone = Some("+1 (555) 123-4567".into());
    sarah.location = Some("San Francisco, CA".into());
    sarah.avatar = "https://images.unsplash.com/photo-1494790108377-be9c29b29330?q=80&w=200&auto=format&fit=crop".into();
    sarah.banner = Some("https://images.unsplash.com/photo-1557683316-973673baf926?q=80&w=1000&auto=format&fit=crop".into());
    sarah.headline = "Senior Full Stack Developer | React & Node.js Expert".into();
    sarah.bio = Some("Passionate Senior Full Stack Developer with over 5 years of experience building scalable web applications. Adept at leading frontend teams and mentoring junior developers.".into());
    sarah.connections = strings(&["u2", "u3", "u4"]);
    sarah.following = strings(&["u2"]);
    sarah.followers = strings(&["u2", "u5"]);
    sarah.skills = strings(&["React", "TypeScript", "Node.js", "AWS", "Docker"]);
    sarah.technical_skills = strings(&["React", "TypeScript", "Node.js", "AWS", "Docker", "GraphQL", "PostgreSQL"]);
    sarah.soft_skills = strings(&["Leadership", "Mentoring", "Communication", "Problem Solving", "Agile Methodology"]);
    sarah.is_looking_for_job = true;
    sarah.experience = vec![experience(
        "e1",
        "Senior Engineer",
        "Tech Solutions Inc.",
        "Remote",
        "2021-01",
        None,
        "Leading the frontend team in developing high-performance dashboards. Improved application load time by 40% through code splitting and optimization.",
    )];
    sarah.education = vec![Education {
        id: "ed1".into(),
        school: "University of Technology".into(),
        degree: "Bachelor of Science".into(),
        field: "Computer Science".into(),
        start_date: "2015-09".into(),
        end_date: Some("2019-05".into()),
    }];

    let mut bhargav = User::new("u2", "Bhargav Desai", RECRUITER_EMAIL, UserRole::Recruiter);
    bhargav.phone = Some("+1 (555) 987-6543".into());
    bhargav.location = Some("Toronto, ON".into());
    bhargav.avatar = "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?q=80&w=200&auto=format&fit=crop".into();
    bhargav.banner = Some("https://images.unsplash.com/photo-1560179707-f14e90ef3623?q=80&w=1000&auto=format&fit=crop".into());
    bhargav.headline = "Talent Acquisition @ Sapsol".into();
    bhargav.bio = Some("Helping developers find their dream roles in the tech industry.".into());
    bhargav.connections = strings(&["u1", "u3"]);
    bhargav.following = strings(&["u1"]);
    bhargav.followers = strings(&["u1"]);
    bhargav.is_hiring = true;

    let mut michael = User::new("u3", "Michael Chen", "michael@candidate.com", UserRole::Candidate);
    michael.location = Some("Austin, TX".into());
    michael.avatar = "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?q=80&w=200&auto=format&fit=crop".into();
    michael.headline = "UX/UI Designer | Creating Human-Centered Digital Experiences".into();
    michael.bio = Some("Award-winning designer with a knack for simplifying complex workflows.".into());
    michael.connections = strings(&["u1", "u2"]);
    michael.followers = strings(&["u1"]);
    michael.skills = strings(&["Figma", "User Research", "Prototyping", "Adobe XD", "HTML/CSS"]);
    michael.technical_skills = strings(&["Figma", "Adobe XD", "Sketch", "HTML", "CSS"]);
    michael.soft_skills = strings(&["Empathy", "Collaboration", "Presentation"]);
    michael.is_looking_for_job = true;
    michael.experience = vec![experience(
        "e2",
        "Product Designer",
        "Creative Studio",
        "San Francisco, CA",
        "2020-05",
        Some("2023-08"),
        "Redesigned the core mobile application resulting in a 40% increase in user retention.",
    )];

    let mut emily = User::new("u4", "Emily Davis", "emily@candidate.com", UserRole::Candidate);
    emily.location = Some("Seattle, WA".into());
    emily.avatar = "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?q=80&w=200&auto=format&fit=crop".into();
    emily.headline = "DevOps Engineer | Cloud Infrastructure & CI/CD Automation".into();
    emily.bio = Some("Automating everything I can. Focused on reliability, scalability, and security.".into());
    emily.connections = strings(&["u1"]);
    emily.following = strings(&["u1"]);
    emily.skills = strings(&["Kubernetes", "Terraform", "AWS", "Python", "Jenkins"]);
    emily.technical_skills = strings(&["Kubernetes", "Terraform", "AWS", "Python", "Bash", "Jenkins", "Docker"]);
    emily.soft_skills = strings(&["Problem Solving", "Incident Management", "Communication"]);
    emily.experience = vec![experience(
        "e3",
        "DevOps Lead",
        "CloudNet Systems",
        "Austin, TX",
        "2019-11",
        None,
        "Managing a multi-region cloud infrastructure for high-traffic applications.",
    )];

    let mut david = User::new("u5", "David Kim", "david@candidate.com", UserRole::Candidate);
    david.avatar = "https://images.unsplash.com/photo-1519085360753-af0119f7cbe7?q=80&w=200&auto=format&fit=crop".into();
    david.headline = "Product Manager | MBA | Strategy & Execution".into();
    david.bio = Some("Bridging the gap between business requirements and technical implementation.".into());
    david.connections = strings(&["u1"]);
    david.followers = strings(&["u1"]);
    david.skills = strings(&["Product Strategy", "Agile", "JIRA", "SQL", "Market Analysis"]);
    david.is_looking_for_job = true;

    let mut lisa = User::new("u6", "Lisa Wang", "lisa@candidate.com", UserRole::Candidate);
    lisa.avatar = "https://images.unsplash.com/photo-1580489944761-15a19d654956?q=80&w=200&auto=format&fit=crop".into();
    lisa.headline = "Data Scientist | Machine Learning & AI Enthusiast".into();
    lisa.bio = Some("Turning raw data into actionable insights.".into());
    lisa.skills = strings(&["Python", "TensorFlow", "PyTorch", "SQL", "Tableau"]);
    lisa.is_looking_for_job = true;

    vec![sarah, bhargav, michael, emily, david, lisa]
}

pub fn posts() -> Vec<Post> {
    let now = Utc::now();
    vec![
        Post {
            id: "p1".into(),
            author_id: "u1".into(),
            author_name: "Sarah Connor".into(),
            author_avatar: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?q=80&w=200&auto=format&fit=crop".into(),
            author_headline: "Senior Full Stack Developer".into(),
            content: "Just finished building a new design system using Tailwind and Headless UI. #React #Frontend #DesignSystem".into(),
            image: Some("https://images.unsplash.com/photo-1498050108023-c5249f4df085?q=80&w=1200&auto=format&fit=crop".into()),
            likes: strings(&["u2", "u3"]),
            comments: vec![],
            timestamp: now,
        },
        Post {
            id: "p2".into(),
            author_id: "u2".into(),
            author_name: "Bhargav Desai".into(),
            author_avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?q=80&w=200&auto=format&fit=crop".into(),
            author_headline: "Talent Acquisition @ Sapsol".into(),
            content: "We are actively hiring Senior Backend Engineers! If you love Go and Distributed Systems, DM me.".into(),
            image: None,
            likes: strings(&["u4"]),
            comments: vec![],
            timestamp: now - Duration::hours(1),
        },
    ]
}

fn sapsol_job(
    id: &str,
    title: &str,
    location: &str,
    job_type: JobType,
    description: &str,
    requirements: &[&str],
    applicants: &[&str],
    posted_date: &str,
) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        company: "Sapsol".to_string(),
        location: location.to_string(),
        job_type,
        salary: Some("TBD".to_string()),
        description: description.to_string(),
        requirements: strings(requirements),
        posted_by: "u2".to_string(),
        applicants: strings(applicants),
        posted_date: posted_date.to_string(),
        status: JobStatus::Active,
        schedule: None,
        is_remote: None,
        address: None,
        benefits: vec![],
        compensation: None,
        company_pitch: None,
        company_description: None,
        resume_required: None,
        notification_emails: vec![RECRUITER_EMAIL.to_string()],
    }
}

pub fn jobs() -> Vec<Job> {
    const SURAT: &str = "Surat, Gujarat, India";
    let mut laravel = sapsol_job(
        "j11",
        "PHP Laravel Dev",
        "Mississauga, Ontario, Canada",
        JobType::FullTime,
        "Laravel development.",
        &["PHP", "Laravel"],
        &[],
        "2023-12-20 11:48:04",
    );
    laravel.company = "Test Company".to_string();

    vec![
        sapsol_job(
            "j1",
            "Retail Inventory & Planning Systems Integration Consultant",
            "Canada",
            JobType::Contract,
            "Specialized consultant needed for retail planning systems.",
            &["Retail Systems", "Integration", "Planning"],
            &["u1", "u3", "u4"],
            "2025-07-23 10:44:00",
        ),
        sapsol_job(
            "j2",
            "Post Partner",
            "Mississauga, Ontario, Canada",
            JobType::FullTime,
            "Partner role for ongoing operations.",
            &["Partnership", "Business Development"],
            &["u3", "u5", "u6"],
            "2025-03-07 12:53:11",
        ),
        sapsol_job(
            "j3",
            "Web Application",
            SURAT,
            JobType::FullTime,
            "Web application development role.",
            &["Web Dev", "HTML", "CSS"],
            &[],
            "2025-01-09 08:44:07",
        ),
        sapsol_job(
            "j4",
            "Data",
            SURAT,
            JobType::FullTime,
            "Data entry and processing.",
            &["Excel", "Data Entry"],
            &["u6", "u1"],
            "2024-10-02 12:03:07",
        ),
        sapsol_job(
            "j5",
            "Developers",
            SURAT,
            JobType::FullTime,
            "General developer role.",
            &["Coding", "Debugging"],
            &["u1", "u4", "u6", "u3"],
            "2024-09-20 10:30:39",
        ),
        sapsol_job(
            "j6",
            "Excel",
            SURAT,
            JobType::PartTime,
            "Advanced Excel tasks.",
            &["Excel", "Macros"],
            &["u5"],
            "2024-07-15 11:03:44",
        ),
        sapsol_job(
            "j7",
            "C",
            SURAT,
            JobType::FullTime,
            "C programming.",
            &["C", "Embedded"],
            &["u4", "u1"],
            "2023-12-15 11:09:47",
        ),
        sapsol_job(
            "j8",
            "Developer",
            SURAT,
            JobType::FullTime,
            "Software developer.",
            &["Software Development"],
            &["u1", "u3", "u4"],
            "2024-05-24 11:15:18",
        ),
        sapsol_job(
            "j9",
            "Java",
            SURAT,
            JobType::FullTime,
            "Java backend development.",
            &["Java", "Spring"],
            &["u1", "u4"],
            "2023-10-20 14:39:54",
        ),
        sapsol_job(
            "j10",
            "Automation Testing",
            SURAT,
            JobType::FullTime,
            "QA Automation.",
            &["Selenium", "Java"],
            &["u4"],
            "2024-03-21 10:27:49",
        ),
        laravel,
    ]
}

pub fn projects() -> Vec<ManagementProject> {
    vec![
        ManagementProject {
            id: "pr1".into(),
            title: "E-Commerce Platform Redesign".into(),
            client: "RetailGiant Corp".into(),
            description: "Complete overhaul of the legacy monolithic e-commerce system to a microservices architecture.".into(),
            status: ProjectStatus::InProgress,
            deadline: "2024-12-15".into(),
            tech_stack: strings(&["React", "Node.js", "AWS", "MongoDB"]),
            team: strings(&["u1", "u3"]),
            progress: 65,
            budget: Some("$120,000".into()),
        },
        ManagementProject {
            id: "pr2".into(),
            title: "AI Customer Support Bot".into(),
            client: "FinTech Solutions".into(),
            description: "Conversational bot handling level 1 customer support queries automatically.".into(),
            status: ProjectStatus::Planning,
            deadline: "2025-02-28".into(),
            tech_stack: strings(&["Python", "TensorFlow", "Gemini API", "FastAPI"]),
            team: strings(&["u6"]),
            progress: 10,
            budget: Some("$45,000".into()),
        },
        ManagementProject {
            id: "pr3".into(),
            title: "Internal HR Dashboard".into(),
            client: "Global Logistics".into(),
            description: "A centralized dashboard for HR to manage leaves, performance reviews, and payroll.".into(),
            status: ProjectStatus::Completed,
            deadline: "2023-11-30".into(),
            tech_stack: strings(&["Vue.js", "Laravel", "MySQL"]),
            team: strings(&["u1", "u4", "u5"]),
            progress: 100,
            budget: Some("$85,000".into()),
        },
    ]
}

pub fn messages() -> Vec<Message> {
    vec![Message {
        id: "m1".into(),
        sender_id: "u2".into(),
        receiver_id: "u1".into(),
        content: "Hi Sarah! I saw your recent post about the design system. Would you be open to a quick call?".into(),
        timestamp: Utc::now() - Duration::days(1),
        read: true,
    }]
}

/// Case-sensitive email lookup, as the sign-in fallback expects.
pub fn find_user_by_email(email: &str) -> Option<User> {
    users().into_iter().find(|u| u.email == email)
}
