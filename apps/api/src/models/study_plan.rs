use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::job_analysis::JobAnalysis;
use super::{array_schema, enum_schema, object_schema, string_schema};

#[derive(Debug, Clone, Deserialize)]
pub struct StudyPlanRequest {
    pub job_analysis: JobAnalysis,
    /// Hours per week the candidate can spend preparing.
    pub available_time_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Course,
    Book,
    Article,
    Video,
    Documentation,
    Practice,
    #[serde(other)]
    Other,
}

impl ResourceType {
    pub const ALL: [&'static str; 7] = [
        "Course",
        "Book",
        "Article",
        "Video",
        "Documentation",
        "Practice",
        "Other",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResource {
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTopic {
    pub name: String,
    pub description: String,
    /// 1 is highest.
    pub priority: u8,
    pub estimated_hours: f64,
    pub resources: Vec<StudyResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub total_duration_hours: f64,
    /// Ordered in the sequence the candidate should study them.
    pub topics: Vec<StudyTopic>,
    pub strategy: String,
    pub timeline: String,
}

impl StudyPlan {
    pub fn json_schema() -> Value {
        let resource = object_schema(
            &[
                ("title", string_schema()),
                ("type", enum_schema(&ResourceType::ALL)),
                ("url", string_schema()),
            ],
            &["url"],
        );

        let topic = object_schema(
            &[
                ("name", string_schema()),
                ("description", string_schema()),
                (
                    "priority",
                    json!({"type": "INTEGER", "description": "1 (highest) to 5 (lowest)"}),
                ),
                ("estimated_hours", json!({"type": "NUMBER"})),
                ("resources", array_schema(resource)),
            ],
            &[],
        );

        object_schema(
            &[
                ("total_duration_hours", json!({"type": "NUMBER"})),
                ("topics", array_schema(topic)),
                ("strategy", string_schema()),
                ("timeline", string_schema()),
            ],
            &[],
        )
    }
}
