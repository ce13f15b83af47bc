use std::fmt;

/// File extensions accepted for the resume upload (matched case-insensitively).
pub const ACCEPTED_RESUME_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "txt"];

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn is_recognized_type(&self) -> bool {
        let declared_pdf = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
        declared_pdf
            || self
                .extension()
                .is_some_and(|ext| ACCEPTED_RESUME_EXTENSIONS.contains(&ext.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingResume,
    EmptyResume,
    UnsupportedResumeType,
    MissingUrls,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingResume => write!(f, "Please upload a resume"),
            ValidationError::EmptyResume => write!(f, "The selected resume file is empty"),
            ValidationError::UnsupportedResumeType => {
                write!(f, "Please upload a valid resume (PDF, DOC, DOCX, TXT)")
            }
            ValidationError::MissingUrls => write!(f, "Please enter at least one URL"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_resume(resume: &ResumeFile) -> Result<(), ValidationError> {
    if !resume.is_recognized_type() {
        return Err(ValidationError::UnsupportedResumeType);
    }
    if resume.bytes.is_empty() {
        return Err(ValidationError::EmptyResume);
    }
    Ok(())
}

/// Local checks run before any network call, in the order the form reports them.
pub fn validate_submission(resume: Option<&ResumeFile>, urls: &str) -> Result<(), ValidationError> {
    let resume = resume.ok_or(ValidationError::MissingResume)?;
    validate_resume(resume)?;
    if urls.trim().is_empty() {
        return Err(ValidationError::MissingUrls);
    }
    Ok(())
}

/// Number of non-blank lines in a newline-delimited URL list.
pub fn count_urls(raw: &str) -> usize {
    raw.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Form state shown while no job is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionForm {
    pub(crate) resume: Option<ResumeFile>,
    pub(crate) urls_input: String,
    pub(crate) error: Option<ValidationError>,
    pub(crate) alert: Option<String>,
    pub(crate) submitting: bool,
}

impl SubmissionForm {
    pub fn resume(&self) -> Option<&ResumeFile> {
        self.resume.as_ref()
    }

    pub fn urls_input(&self) -> &str {
        &self.urls_input
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}
