#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use std::{collections::BTreeMap, fmt::Display};

use chrono::{Local, Utc};
use serde_json::Value;

use crate::{
    chart::{ChartView, RowRange},
    models::{Conversation, Feedback, Message, MessageStatus, QueryResult},
};

const NO_CONVERSATIONS: &str = "No conversations found";
const MAX_CELL_WIDTH: usize = 40;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversationGroup {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    Older,
}

impl Display for ConversationGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationGroup::Today => write!(f, "Today"),
            ConversationGroup::Yesterday => write!(f, "Yesterday"),
            ConversationGroup::Last7Days => write!(f, "Last 7 Days"),
            ConversationGroup::Last30Days => write!(f, "Last 30 Days"),
            ConversationGroup::Older => write!(f, "Older"),
        }
    }
}

pub fn categorize_conversation(
    now: chrono::DateTime<Utc>,
    conversation: &Conversation,
) -> ConversationGroup {
    let age = now.with_timezone(&Local).date_naive()
        - conversation
            .updated_at()
            .with_timezone(&Local)
            .date_naive();
    match age.num_days() {
        i64::MIN..=0 => ConversationGroup::Today,
        1 => ConversationGroup::Yesterday,
        2..=7 => ConversationGroup::Last7Days,
        8..=30 => ConversationGroup::Last30Days,
        _ => ConversationGroup::Older,
    }
}

/// Lists conversations under their age group, keeping the store's order
/// inside each group. The active conversation is marked with `[*]`.
pub fn render_history(
    now: chrono::DateTime<Utc>,
    conversations: &[Conversation],
    current: Option<&str>,
) -> String {
    if conversations.is_empty() {
        return NO_CONVERSATIONS.to_string();
    }

    let mut groups: BTreeMap<ConversationGroup, Vec<&Conversation>> = BTreeMap::new();
    for conversation in conversations {
        groups
            .entry(categorize_conversation(now, conversation))
            .or_default()
            .push(conversation);
    }

    let mut lines = vec![];
    for (group, conversations) in groups {
        lines.push(group.to_string());
        for c in conversations {
            let mut line = format!("  {}  {}", short_id(c.id()), c.title());
            if current == Some(c.id()) {
                line.push_str(" [*]");
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}

pub fn render_conversation(conversation: &Conversation, max_rows: usize) -> String {
    let mut out = format!("# {}\n", conversation.title());
    for message in conversation.messages() {
        out.push('\n');
        out.push_str(&render_message(message, max_rows));
        out.push('\n');
    }
    out
}

pub fn render_message(message: &Message, max_rows: usize) -> String {
    let timestamp = message.timestamp().with_timezone(&Local).format("%Y-%m-%d %H:%M");
    if message.is_user() {
        return format!("> {}\n  ({})", message.content(), timestamp);
    }

    let mut lines = vec![format!("[{}] {}", message.id(), timestamp)];
    if message.status() == MessageStatus::Pending {
        lines.push("Generating SQL...".to_string());
        return lines.join("\n");
    }

    if let Some(err) = message.error() {
        lines.push(format!("Error: {}", err));
        return lines.join("\n");
    }

    if !message.content().is_empty() {
        lines.push(message.content().to_string());
    }
    if let Some(sql) = message.sql() {
        lines.push(String::new());
        lines.extend(sql.lines().map(|line| format!("    {}", line)));
        lines.push(String::new());
    }
    if let Some(result) = message.result() {
        lines.push(render_table(result, max_rows));
    }

    match message.feedback() {
        Feedback::Yes => lines.push("Feedback: helpful".to_string()),
        Feedback::No => lines.push("Feedback: not helpful".to_string()),
        Feedback::None if message.wants_feedback() => {
            lines.push("Was this helpful? (yes / no)".to_string())
        }
        Feedback::None => {}
    }
    lines.join("\n")
}

/// Renders at most `max_rows` rows as an aligned text table.
pub fn render_table(result: &QueryResult, max_rows: usize) -> String {
    if let Some(err) = result.error() {
        return format!("Error: {}", err);
    }
    if result.columns().is_empty() {
        return "(no columns)".to_string();
    }

    let shown = &result.rows()[..result.len().min(max_rows)];
    let cells = shown
        .iter()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = result
        .columns()
        .iter()
        .map(|c| c.chars().count().min(MAX_CELL_WIDTH))
        .collect::<Vec<_>>();
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count().min(MAX_CELL_WIDTH));
        }
    }

    let format_row = |row: &[String]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| pad(&truncate(cell, MAX_CELL_WIDTH), *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(result.columns())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(cells.iter().map(|row| format_row(row.as_slice())));

    match result.len() {
        0 => lines.push("(no rows)".to_string()),
        n if n > shown.len() => lines.push(format!("... {} more rows", n - shown.len())),
        n => lines.push(format!("({} rows)", n)),
    }
    lines.join("\n")
}

/// Draws a chart view with text bars.
pub fn render_chart(view: &ChartView, range: Option<RowRange>, total: usize) -> String {
    let mut lines = vec![];
    if let Some(range) = range {
        lines.push(format!("Rows {} to {} of {}", range.start, range.end, total));
    }

    match view {
        ChartView::Unavailable { message } => lines.push(message.clone()),
        ChartView::Cartesian {
            kind, series, data, ..
        } => {
            let keys = series.iter().map(|s| s.key.as_str()).collect::<Vec<_>>();
            lines.push(format!("{} chart of {}", kind, keys.join(", ")));

            let max = data
                .iter()
                .flat_map(|record| keys.iter().filter_map(move |k| record.get(k)?.as_f64()))
                .fold(0.0_f64, |acc, v| acc.max(v.abs()));
            let label_width = data
                .iter()
                .map(|r| r.label().chars().count().min(MAX_CELL_WIDTH))
                .max()
                .unwrap_or(0);

            for record in data {
                for (idx, key) in keys.iter().enumerate() {
                    let label = if idx == 0 {
                        truncate(record.label(), MAX_CELL_WIDTH)
                    } else {
                        String::new()
                    };
                    let value = record.get(key).and_then(|c| c.as_f64()).unwrap_or(0.0);
                    let line = format!(
                        "{} | {:<width$} {} {}",
                        pad(&label, label_width),
                        bar(value, max),
                        format_number(value),
                        if keys.len() > 1 { *key } else { "" },
                        width = BAR_WIDTH,
                    );
                    lines.push(line.trim_end().to_string());
                }
            }
        }
        ChartView::Pie { value_key, slices } => {
            lines.push(format!("pie chart of {}", value_key));
            let total: f64 = slices.iter().map(|s| s.value).sum();
            for slice in slices {
                let share = if total == 0.0 {
                    0.0
                } else {
                    slice.value / total * 100.0
                };
                lines.push(format!(
                    "{} {:>6.1}%  {}",
                    truncate(&slice.name, MAX_CELL_WIDTH),
                    share,
                    format_number(slice.value)
                ));
            }
        }
    }
    lines.join("\n")
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = (value.abs() / max * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.min(BAR_WIDTH))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
