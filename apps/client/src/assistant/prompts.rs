// Prompt templates for the assistant features.
// Placeholders in `{braces}` are replaced before sending.

/// Bio rewrite. Replace `{headline}` and `{bio}`.
pub const BIO_PROMPT_TEMPLATE: &str = "I am a professional in {headline}. \
    My current bio is: \"{bio}\". \
    Please rewrite this bio to be more engaging, professional, and impactful \
    for a social hiring platform like LinkedIn. Keep it under 100 words. \
    Return only the rewritten bio.";

/// Job match. Replace `{headline}`, `{skills}`, `{title}`, `{requirements}`
/// and `{description}`.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Candidate Profile:
Headline: {headline}
Skills: {skills}

Job Details:
Title: {title}
Requirements: {requirements}
Description: {description}

Analyze the match between the candidate and the job.
Return a JSON object with this EXACT schema:
{
  "score": 72,
  "reasoning": "short explanation",
  "gapAnalysis": "what skills are missing"
}
`score` is a number from 0 to 100."#;

/// Smart replies. Replace `{message}`.
pub const SMART_REPLIES_PROMPT_TEMPLATE: &str = "The following message was received \
    on a professional networking platform: \"{message}\". \
    Suggest 3 short, professional \"Smart Replies\" for the user. \
    Return them as a JSON array of strings.";

/// Resume generation. Replace `{name}`, `{headline}`, `{bio}`, `{skills}`,
/// `{experience_json}`, `{education_json}`, `{projects_json}` and
/// `{grounding_instruction}`.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Create a high-impact, professional resume based on this profile:
Name: {name}
Headline: {headline}
About: {bio}
Skills: {skills}
Experience: {experience_json}
Education: {education_json}
Projects: {projects_json}

{grounding_instruction}

Format the output in clean Markdown. Include sections for:
1. Contact Header (use placeholder for email/phone)
2. Professional Summary
3. Key Skills (categorized if possible)
4. Professional Experience (Reverse chronological)
5. Education
6. Projects (if applicable)

Make it ATS-friendly and professional in tone."#;

/// Project blueprint. Replace `{idea}`.
pub const PROJECT_BLUEPRINT_PROMPT_TEMPLATE: &str = r#"Generate a realistic software project blueprint based on this idea: "{idea}".
Return a JSON object with this EXACT schema:
{
  "title": "professional project name",
  "client": "a fictional company name",
  "description": "2 sentences technical summary",
  "techStack": ["4 to 5 relevant technologies"],
  "duration": "estimated time, e.g. 3 months",
  "estimatedBudget": "e.g. $50,000"
}"#;

/// Chat system instruction. Replace `{platform_context}` and `{member}`.
pub const CHAT_SYSTEM_TEMPLATE: &str = "{platform_context} \
    You are the HireRig Assistant. Help with job search, profile building, \
    networking and recruiting questions. Answer in a few short paragraphs at most. \
    {member}";

/// Resume-file analysis. Replace `{resume}`.
pub const CAREER_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a career agent. Analyze the candidate's resume below.

{resume}

Return a JSON object with this EXACT schema:
{
  "candidateAnalysis": "a short paragraph on strengths, seniority and direction",
  "recommendedModules": [
    {"id": 1, "title": "course or topic to study", "level": "Beginner | Intermediate | Advanced", "duration": "e.g. 4 weeks"}
  ],
  "openPositions": [
    {"id": 1, "jobTitle": "role", "company": "company", "salaryRange": "e.g. $90k - $120k", "applyLink": "https://..."}
  ]
}
Recommend 3 modules and 3 positions."#;

/// Stand-in for `{resume}` when the file travels as an attachment.
pub const ATTACHED_RESUME_NOTE: &str = "The resume is attached as a file.";
