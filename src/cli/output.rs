//! Output formatting for CLI commands

use serde::Serialize;

use crate::notification::dispatcher::{Decision, DispatchOutcome, FeedbackStatus};

/// Format output as pretty JSON
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Human-readable report of one dispatched event
pub fn format_outcome(outcome: &DispatchOutcome) -> String {
    let mut lines = vec![format!(
        "Event '{}' for User {} scored {} (threshold {})",
        outcome.category, outcome.user_id, outcome.score, outcome.threshold
    )];

    match &outcome.decision {
        Decision::Skipped => lines.push("→ Skipped (low priority)".to_string()),
        Decision::Notified {
            message,
            deliveries,
            feedback,
        } => {
            lines.push(format!("📤 Sending proactive message to User {}:", outcome.user_id));
            lines.push(format!("👉 '{}'", message));
            for (channel, result) in deliveries {
                lines.push(format!("   {}: {:?}", channel, result));
            }
            lines.push(match feedback {
                FeedbackStatus::Recorded { clicked: true } => {
                    "🧠 Engagement recorded: Clicked ✅".to_string()
                }
                FeedbackStatus::Recorded { clicked: false } => {
                    "🧠 Engagement recorded: Ignored ❌".to_string()
                }
                FeedbackStatus::Pending => "🧠 Awaiting feedback".to_string(),
            });
        }
    }

    lines.join("\n")
}
