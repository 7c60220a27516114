//! Resume-file analysis.
//!
//! The file is validated and prepared before any call. Plain text and PDFs
//! with a text layer go into the prompt; other accepted files are attached.

use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assistant::{prompts, Assistant, Feature};
use crate::llm_client::{
    parse_json_text, prompts::JSON_ONLY_SYSTEM, Attachment, GenerationRequest, LlmError,
    FLASH_MODEL,
};

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// An uploaded resume.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedModule {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPosition {
    pub id: u32,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub apply_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAnalysis {
    pub candidate_analysis: String,
    #[serde(default)]
    pub recommended_modules: Vec<RecommendedModule>,
    #[serde(default)]
    pub open_positions: Vec<OpenPosition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Complete(CareerAnalysis),
    /// The file was refused before any call; carries the reason to show.
    Rejected(String),
    /// The call or its decoding failed. The caller may retry with the same file.
    Failed,
}

/// How the resume reaches the model.
#[derive(Debug, Clone, PartialEq)]
enum ResumeContent {
    Text(String),
    Attached(Attachment),
}

pub struct ResumeAnalysis {
    content: ResumeContent,
}

impl ResumeAnalysis {
    /// Validates and prepares `file`. Errors are user-facing reasons.
    pub fn prepare(file: &ResumeFile) -> Result<Self, String> {
        if file.bytes.is_empty() {
            return Err(format!("{} is empty.", file.file_name));
        }

        let attach = || {
            ResumeContent::Attached(Attachment {
                mime_type: file.mime_type.clone(),
                data: file.bytes.clone(),
            })
        };

        let content = match file.mime_type.as_str() {
            PDF_MIME => match extract_pdf_text(file) {
                Some(text) => ResumeContent::Text(text),
                None => attach(),
            },
            DOC_MIME | DOCX_MIME => attach(),
            TEXT_MIME => {
                let text = String::from_utf8_lossy(&file.bytes).trim().to_string();
                if text.is_empty() {
                    return Err(format!("{} is empty.", file.file_name));
                }
                ResumeContent::Text(text)
            }
            _ => return Err("Please upload a PDF, DOCX, or TXT file.".to_string()),
        };

        Ok(Self { content })
    }
}

/// Text layer of a PDF, or `None` when there is none or it cannot be read.
fn extract_pdf_text(file: &ResumeFile) -> Option<String> {
    // pdf-extract panics on some malformed files.
    let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&file.bytes)
    }));
    match extracted {
        Ok(Ok(text)) if !text.trim().is_empty() => {
            debug!("Extracted {} chars from {}", text.len(), file.file_name);
            Some(text.trim().to_string())
        }
        Ok(Ok(_)) => {
            debug!("{} has no text layer, attaching it", file.file_name);
            None
        }
        Ok(Err(e)) => {
            warn!("PDF text extraction failed for {}, attaching it: {e}", file.file_name);
            None
        }
        Err(_) => {
            warn!("PDF parser gave up on {}, attaching it", file.file_name);
            None
        }
    }
}

impl Feature for ResumeAnalysis {
    type Output = AnalysisOutcome;
    const NAME: &'static str = "resume analysis";

    fn request(&self) -> GenerationRequest {
        let resume = match &self.content {
            ResumeContent::Text(text) => format!("Resume:\n{text}"),
            ResumeContent::Attached(_) => prompts::ATTACHED_RESUME_NOTE.to_string(),
        };
        let prompt = prompts::CAREER_ANALYSIS_PROMPT_TEMPLATE.replace("{resume}", &resume);
        let request = GenerationRequest::prompt(FLASH_MODEL, prompt)
            .with_system(JSON_ONLY_SYSTEM)
            .expecting_json();
        match &self.content {
            ResumeContent::Attached(attachment) => request.with_attachment(attachment.clone()),
            ResumeContent::Text(_) => request,
        }
    }

    fn parse(&self, text: &str) -> Result<AnalysisOutcome, LlmError> {
        let analysis: CareerAnalysis = parse_json_text(text)?;
        if analysis.candidate_analysis.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(AnalysisOutcome::Complete(analysis))
    }

    fn fallback(&self) -> AnalysisOutcome {
        AnalysisOutcome::Failed
    }
}

impl Assistant {
    /// Analyses an uploaded resume. Unsupported or empty files are rejected
    /// without calling the model.
    pub async fn analyze_resume_file(&self, file: &ResumeFile) -> AnalysisOutcome {
        match ResumeAnalysis::prepare(file) {
            Ok(analysis) => self.run(&analysis).await,
            Err(reason) => {
                debug!("Rejected {} ({}): {reason}", file.file_name, file.mime_type);
                AnalysisOutcome::Rejected(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeGenerator;
    use std::sync::Arc;

    const ANALYSIS_JSON: &str = r#"{
        "candidateAnalysis": "Senior frontend engineer moving toward architecture.",
        "recommendedModules": [{"id": 1, "title": "System Design", "level": "Advanced", "duration": "6 weeks"}],
        "openPositions": [{"id": 1, "jobTitle": "Staff Engineer", "company": "Ferris Labs", "salaryRange": "$180k - $210k", "applyLink": "https://example.com/apply"}]
    }"#;

    fn file(name: &str, mime: &str, bytes: &'static [u8]) -> ResumeFile {
        ResumeFile {
            file_name: name.into(),
            mime_type: mime.into(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn test_text_resume_is_inlined_and_decoded() {
        let generator = FakeGenerator::replying([ANALYSIS_JSON]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let outcome = assistant
            .analyze_resume_file(&file("cv.txt", TEXT_MIME, b"Sarah Connor\nReact, Node.js"))
            .await;

        let analysis = match outcome {
            AnalysisOutcome::Complete(analysis) => analysis,
            other => panic!("expected a complete analysis, got {other:?}"),
        };
        assert_eq!(analysis.recommended_modules[0].title, "System Design");
        assert_eq!(analysis.open_positions[0].job_title, "Staff Engineer");

        let request = &generator.requests()[0];
        assert!(request.attachment.is_none());
        assert!(request.user_text().contains("React, Node.js"));
        assert!(request.json_output);
    }

    #[tokio::test]
    async fn test_docx_is_sent_as_attachment() {
        let generator = FakeGenerator::replying([ANALYSIS_JSON]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let outcome = assistant
            .analyze_resume_file(&file("cv.docx", DOCX_MIME, b"PK\x03\x04fake"))
            .await;
        assert!(matches!(outcome, AnalysisOutcome::Complete(_)));

        let request = &generator.requests()[0];
        let attachment = request.attachment.as_ref().unwrap();
        assert_eq!(attachment.mime_type, DOCX_MIME);
        assert!(request.user_text().contains(prompts::ATTACHED_RESUME_NOTE));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_falls_back_to_attachment() {
        let generator = FakeGenerator::replying([ANALYSIS_JSON]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        assistant
            .analyze_resume_file(&file("cv.pdf", PDF_MIME, b"%PDF-1.4 not really a pdf"))
            .await;

        let request = &generator.requests()[0];
        assert_eq!(request.attachment.as_ref().unwrap().mime_type, PDF_MIME);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_without_a_call() {
        let generator = FakeGenerator::replying([ANALYSIS_JSON]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let outcome = assistant
            .analyze_resume_file(&file("photo.png", "image/png", b"\x89PNG"))
            .await;
        assert!(matches!(outcome, AnalysisOutcome::Rejected(_)));
        assert!(generator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::failing()));
        let outcome = assistant.analyze_resume_file(&file("cv.txt", TEXT_MIME, b"  ")).await;
        assert!(matches!(outcome, AnalysisOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_model_failure_is_a_retryable_failed_state() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::replying(["{\"oops\": true}"])));
        let resume = file("cv.txt", TEXT_MIME, b"Some resume");

        assert_eq!(assistant.analyze_resume_file(&resume).await, AnalysisOutcome::Failed);
        // Replies are exhausted, the retry fails too but still yields the same state.
        assert_eq!(assistant.analyze_resume_file(&resume).await, AnalysisOutcome::Failed);
    }
}
