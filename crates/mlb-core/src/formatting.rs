//! Formatting utilities (replies, insights and limits → Telegram HTML).

use crate::{
    paste::{Insights, Limits},
    reply::Reply,
};

const MAX_PROBLEMS_SHOWN: usize = 5;
const MAX_INFORMATION_SHOWN: usize = 8;
const MAX_TITLE_CHARS: usize = 200;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn link(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        escape_html(url),
        escape_html(label)
    )
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Render a reply card as Telegram HTML.
///
/// Telegram has no embeds; the accent color and author icon are dropped.
pub fn render_reply_html(reply: &Reply) -> String {
    let mut out = String::new();
    out.push_str(&format!("📄 {}\n", link(&reply.author.url, &reply.author.name)));
    out.push_str(&format!("<b>{}</b>\n", escape_html(&reply.title)));
    out.push_str(&escape_html(&reply.description));
    out.push('\n');

    for field in &reply.fields {
        out.push('\n');
        out.push_str(&format!("<b>{}</b>\n", escape_html(&field.title)));
        out.push_str(&link(&field.url, &field.url));
        out.push('\n');
        if field.problems > 0 {
            out.push_str(&format!(
                "⚠️ {} detected\n",
                plural(field.problems, "problem", "problems")
            ));
        }
    }

    let links = reply
        .links
        .iter()
        .map(|l| link(&l.url, &l.label))
        .collect::<Vec<_>>()
        .join(" · ");
    out.push_str(&format!(
        "\n<i>{}</i> · {links}",
        reply.timestamp.format("%Y-%m-%d %H:%M UTC")
    ));
    out
}

/// Render analysis results (problems with solutions, then information) as Telegram HTML.
///
/// Whole items are dropped once the text would pass `max_len` characters, so tags are never cut.
pub fn render_insights_html(insights: &Insights, max_len: usize) -> String {
    // Room kept for the "… and N more" and information trailers.
    const RESERVE: usize = 64;
    let budget = max_len.saturating_sub(RESERVE);

    let mut out = String::new();
    let title: String = insights
        .display_title()
        .unwrap_or("Log analysis")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();
    out.push_str(&format!("🔎 <b>{}</b>\n", escape_html(&title)));

    let problems = &insights.analysis.problems;
    if problems.is_empty() {
        out.push_str("\n✅ No problems detected.\n");
    } else {
        out.push_str(&format!(
            "\n⚠️ <b>{}</b>\n",
            plural(problems.len(), "problem", "problems")
        ));
        let mut shown = 0;
        for p in problems.iter().take(MAX_PROBLEMS_SHOWN) {
            let mut item = format!("• {}", escape_html(&p.message));
            if p.counter > 1 {
                item.push_str(&format!(" (×{})", p.counter));
            }
            if let Some(line) = p.entry.lines.first() {
                item.push_str(&format!(" <i>line {}</i>", line.number));
            }
            item.push('\n');
            for s in &p.solutions {
                item.push_str(&format!("  ↳ {}\n", escape_html(&s.message)));
            }
            if !push_within(&mut out, &item, budget) {
                break;
            }
            shown += 1;
        }
        if problems.len() > shown {
            out.push_str(&format!("  … and {} more\n", problems.len() - shown));
        }
    }

    let info = &insights.analysis.information;
    if !info.is_empty() {
        let header = "\nℹ️ <b>Information</b>\n";
        if push_within(&mut out, header, budget) {
            for i in info.iter().take(MAX_INFORMATION_SHOWN) {
                let item = format!(
                    "• {}: <code>{}</code>\n",
                    escape_html(&i.label),
                    escape_html(&i.value)
                );
                if !push_within(&mut out, &item, budget) {
                    break;
                }
            }
        }
    }

    out.trim_end().to_string()
}

fn push_within(out: &mut String, item: &str, budget: usize) -> bool {
    if out.chars().count() + item.chars().count() > budget {
        return false;
    }
    out.push_str(item);
    true
}

/// Render the service limits as Telegram HTML.
pub fn render_limits_html(limits: &Limits) -> String {
    format!(
        "📏 <b>mclo.gs limits</b>\n\nStorage time: {}\nMax length: {} bytes\nMax lines: {}",
        format_duration(limits.storage_time_seconds),
        limits.max_content_length,
        limits.max_lines
    )
}

pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if days > 0 {
        return format!("{days}d {hours}h");
    }
    if hours > 0 {
        return format!("{hours}h {mins}m");
    }
    if mins > 0 {
        return format!("{mins}m {secs}s");
    }
    format!("{secs}s")
}
