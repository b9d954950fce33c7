use crate::models::{Activity, GenerateResult};

use super::view_model::Body;

pub const EMPTY_LABEL: &str = "AI Response:";
pub const COMPARE_HEADING: &str = "Weekly Work Distribution (40 Hours)";
pub const COMPARE_TOTAL_LINE: &str = "Estimated Weekly Hours: 40 hrs";

pub const SUMMARY_HEADING: &str = "SUMMARY";
pub const IMPROVEMENTS_HEADING: &str = "KEY IMPROVEMENTS";
pub const DAILY_PLAN_HEADING: &str = "DAILY PLAN";
pub const GROWTH_TIPS_HEADING: &str = "GROWTH TIPS";

/// Builds the narrative revealed by the typing animation. Sections that are
/// absent or empty produce no heading.
pub fn build_generate_text(result: &GenerateResult) -> String {
    let mut text = String::new();

    if let Some(summary) = result.summary.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("{SUMMARY_HEADING}\n{summary}\n\n"));
    }

    push_list(&mut text, IMPROVEMENTS_HEADING, &result.improvements, true);
    push_list(&mut text, DAILY_PLAN_HEADING, &result.daily_plan, true);
    push_list(&mut text, GROWTH_TIPS_HEADING, &result.growth_tips, false);

    text
}

fn push_list(text: &mut String, heading: &str, items: &[String], trailing_blank: bool) {
    if items.is_empty() {
        return;
    }
    text.push_str(heading);
    text.push('\n');
    for item in items {
        text.push_str(&format!("• {item}\n"));
    }
    if trailing_blank {
        text.push('\n');
    }
}

pub fn is_heading(line: &str) -> bool {
    matches!(
        line,
        SUMMARY_HEADING | IMPROVEMENTS_HEADING | DAILY_PLAN_HEADING | GROWTH_TIPS_HEADING
    )
}

pub fn activity_row(activity: &Activity) -> String {
    format!("{}  {} hrs / week", activity.title, activity.hours)
}

/// Lines shown in the response panel. `typed` is the portion of the narrative
/// revealed so far; nothing is shown for a narrative until it starts typing.
pub fn panel_lines(body: &Body, typed: &str) -> Vec<String> {
    match body {
        Body::Empty => vec![EMPTY_LABEL.to_string()],
        Body::Loading => Vec::new(),
        Body::Narrative { .. } if typed.is_empty() => Vec::new(),
        Body::Narrative { .. } => typed.split('\n').map(ToOwned::to_owned).collect(),
        Body::Workload { heading, total, rows } => {
            let mut lines = Vec::with_capacity(rows.len() + 2);
            lines.push(heading.clone());
            lines.push(total.clone());
            lines.extend(rows.iter().cloned());
            lines
        }
    }
}
