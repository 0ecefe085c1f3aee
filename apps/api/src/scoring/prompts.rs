// Prompt constants for resume scoring.

/// Resume text beyond this many characters is not sent to the model.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// System prompt for scoring. The model runs in JSON-object mode.
pub const SCORE_SYSTEM: &str = "You are an expert HR AI Assistant. \
    Evaluate the resume against the job description. \
    Return JSON only with keys: 'score' (0-100), \
    'summary' (brief justification), \
    'strengths' (list of 3-5 key strong points), and \
    'weaknesses' (list of 3-5 potential gaps or missing skills).";

/// Builds the user turn. The job description is sent whole; the resume is truncated.
pub fn build_score_prompt(job_description: &str, resume_text: &str) -> String {
    let resume: String = resume_text.chars().take(MAX_RESUME_CHARS).collect();
    format!("Job Description:\n{job_description}\n\nResume:\n{resume}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = build_score_prompt("Rust engineer", "Jane Doe");
        assert_eq!(prompt, "Job Description:\nRust engineer\n\nResume:\nJane Doe");
    }

    #[test]
    fn test_resume_truncated_by_characters_not_bytes() {
        let resume = "é".repeat(MAX_RESUME_CHARS + 50);
        let prompt = build_score_prompt("jd", &resume);
        let sent = prompt.split("Resume:\n").nth(1).unwrap();
        assert_eq!(sent.chars().count(), MAX_RESUME_CHARS);
    }

    #[test]
    fn test_job_description_not_truncated() {
        let jd = "x".repeat(MAX_RESUME_CHARS * 2);
        let prompt = build_score_prompt(&jd, "cv");
        assert!(prompt.contains(&jd));
    }
}
