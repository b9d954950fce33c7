use crate::models::Mode;

/// System instruction sent with every completion call.
pub const SYSTEM_INSTRUCTION: &str =
    "You strictly return clean JSON only. No markdown. No explanations.";

/// Builds the user prompt for the given mode.
pub fn build_prompt(industry: &str, description: &str, mode: Mode) -> String {
    match mode {
        Mode::Generate => generate_prompt(industry, description),
        Mode::Compare => compare_prompt(industry, description),
    }
}

fn generate_prompt(industry: &str, description: &str) -> String {
    format!(
        r#"You are a senior productivity consultant.

Industry: {industry}
Job Description: {description}

Return ONLY valid JSON:

{{
  "summary": "80-100 word overview",
  "improvements": ["4-5 actionable improvements"],
  "daily_plan": ["4-5 daily execution steps"],
  "growth_tips": ["4-5 long-term strategies"]
}}

No markdown. No explanation. JSON only."#
    )
}

fn compare_prompt(industry: &str, description: &str) -> String {
    format!(
        r#"You are an expert workforce planning strategist.

Industry: {industry}
Job Description: {description}

Create a realistic weekly workload distribution.

Rules:
- Total must equal exactly 40 hours.
- 5-9 intelligent activities.
- Industry-specific.
- Professional wording.
- Balanced workload.

Return ONLY valid JSON:

{{
  "activities": [
    {{ "title": "Activity Name", "hours": "X - Y" }}
  ]
}}

No markdown.
No explanation.
JSON only."#
    )
}
