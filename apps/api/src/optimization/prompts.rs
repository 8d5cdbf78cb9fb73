use crate::llm_client::prompts::PLAIN_TEXT_ONLY;

/// Opening instruction of the resume rewrite prompt.
pub const REWRITE_INSTRUCTION: &str = "You are a professional resume optimizer. \
Given the job description and the base resume below, rewrite the resume to match the job \
description by improving keywords, phrasing, and tone. Make it ATS-friendly and compelling.";

pub fn build_rewrite_prompt(job_description: &str, base_resume: &str) -> String {
    format!(
        "{REWRITE_INSTRUCTION}\n\n\
         Job Description:\n{job_description}\n\n\
         Base Resume:\n{base_resume}\n\n\
         Return only the optimized resume text {PLAIN_TEXT_ONLY}"
    )
}
