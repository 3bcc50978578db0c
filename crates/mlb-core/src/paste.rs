//! Paste service data model.
//!
//! Field names follow the mclo.gs JSON payloads; everything is read-only once decoded.

use serde::{Deserialize, Serialize};

/// A stored paste, as returned by a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteResult {
    pub id: String,
    pub url: String,
    #[serde(rename = "raw")]
    pub raw_url: String,
}

/// Parsed analysis of a log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insights {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub title: String,
    pub analysis: Analysis,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub problems: Vec<Problem>,
    pub information: Vec<Information>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Problem {
    pub message: String,
    pub counter: u32,
    pub entry: LogEntry,
    pub solutions: Vec<Solution>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Information {
    pub message: String,
    pub counter: u32,
    pub label: String,
    pub value: String,
    pub entry: LogEntry,
}

/// A slice of the original log, with line numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub level: i32,
    pub time: Option<String>,
    pub prefix: String,
    pub lines: Vec<LogLine>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogLine {
    pub number: u32,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solution {
    pub message: String,
}

/// Service storage limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(rename = "storageTime")]
    pub storage_time_seconds: u64,
    #[serde(rename = "maxLength")]
    pub max_content_length: u64,
    #[serde(rename = "maxLines")]
    pub max_lines: u64,
}

impl Insights {
    /// Title to show for this log, if the service produced a usable one.
    pub fn display_title(&self) -> Option<&str> {
        let t = self.title.trim();
        if t.is_empty() {
            None
        } else {
            Some(t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_insights_payload() {
        let raw = serde_json::json!({
            "id": "name/type",
            "name": "Vanilla",
            "type": "Server Log",
            "version": "1.20.1",
            "title": "Vanilla 1.20.1 Server Log",
            "analysis": {
                "problems": [{
                    "message": "A mod is missing.",
                    "counter": 2,
                    "entry": {
                        "level": 3,
                        "time": null,
                        "prefix": "[ERROR]",
                        "lines": [{"number": 12, "content": "missing mod foo"}]
                    },
                    "solutions": [{"message": "Install foo."}]
                }],
                "information": [{
                    "message": "Minecraft version: 1.20.1",
                    "counter": 1,
                    "label": "Minecraft version",
                    "value": "1.20.1",
                    "entry": {"level": 6, "time": "12:00:00", "prefix": "", "lines": []}
                }]
            }
        });

        let insights: Insights = serde_json::from_value(raw).unwrap();
        assert_eq!(insights.kind, "Server Log");
        assert_eq!(insights.analysis.problems.len(), 1);
        let problem = &insights.analysis.problems[0];
        assert_eq!(problem.counter, 2);
        assert_eq!(problem.entry.time, None);
        assert_eq!(problem.entry.lines[0].number, 12);
        assert_eq!(problem.solutions[0].message, "Install foo.");
        assert_eq!(
            insights.analysis.information[0].entry.time.as_deref(),
            Some("12:00:00")
        );
    }

    #[test]
    fn blank_title_is_not_displayable() {
        let insights = Insights {
            title: "   ".to_string(),
            ..Insights::default()
        };
        assert_eq!(insights.display_title(), None);
    }

    #[test]
    fn decodes_limits() {
        let limits: Limits = serde_json::from_str(
            r#"{"storageTime":7776000,"maxLength":10485760,"maxLines":25000}"#,
        )
        .unwrap();
        assert_eq!(limits.storage_time_seconds, 7_776_000);
        assert_eq!(limits.max_content_length, 10_485_760);
        assert_eq!(limits.max_lines, 25_000);
    }
}
