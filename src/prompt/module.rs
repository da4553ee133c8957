//! Study modules and their prompt templates

/// Fixed instruction that opens every prompt sent to the model
pub const SYSTEM_INSTRUCTION: &str = "You are AI Study Doctor.\n\
Your purpose is to help students academically and emotionally.\n\
You must strictly follow the role defined by the MODULE.\n\
Never mix roles.\n\
Never give medical or clinical advice.\n\
Your tone must always be student-friendly, calm, and motivating.";

/// Subject used by the tutor template when the intent names none
pub const DEFAULT_SUBJECT: &str = "General";

/// Study module selecting which template frames the user's request
///
/// The set is closed; any tag that is not recognized maps to `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Wellness,
    Tutor,
    Examiner,
    StudyPlanner,
    Generic,
}

impl ModuleKind {
    /// Resolve a module tag, case-insensitively
    ///
    /// `studyplanner` and `study-plan` are aliases for the planner.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "wellness" => Self::Wellness,
            "tutor" => Self::Tutor,
            "examiner" => Self::Examiner,
            "studyplanner" | "study-plan" => Self::StudyPlanner,
            _ => Self::Generic,
        }
    }

    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wellness => "wellness",
            Self::Tutor => "tutor",
            Self::Examiner => "examiner",
            Self::StudyPlanner => "study_planner",
            Self::Generic => "generic",
        }
    }

    /// Render this module's template around the (already sanitized) user text
    ///
    /// `subject` is only used by the tutor template.
    pub fn render(&self, user_text: &str, subject: Option<&str>) -> String {
        match self {
            Self::Wellness => format!(
                "You are an empathetic wellness mentor. Keep responses supportive, non-clinical, \
                and focused on study-related wellbeing. Reply briefly and include one actionable tip.\n\
                Student message:\n\"{}\"",
                user_text
            ),
            Self::Tutor => format!(
                "You are a tutor. Explain the student's doubt in very simple words, provide one \
                short example, and avoid advanced jargon.\n\
                Topic/subject: {}\n\
                Student doubt:\n\"{}\"",
                subject.unwrap_or(DEFAULT_SUBJECT),
                user_text
            ),
            Self::Examiner => format!(
                "You are an examiner. Generate one concise mock question and a short \
                explanation/answer. Topic:\n\"{}\"",
                user_text
            ),
            Self::StudyPlanner => format!(
                "You are a study planner. Suggest a short, pragmatic study plan tailored to the \
                student's exam date or constraints. Context:\n\"{}\"",
                user_text
            ),
            Self::Generic => format!("User input:\n\"{}\"", user_text),
        }
    }
}
