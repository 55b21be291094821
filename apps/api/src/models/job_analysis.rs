use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{array_schema, enum_schema, object_schema, string_schema};

#[derive(Debug, Clone, Deserialize)]
pub struct JobAnalysisRequest {
    pub job_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "Entry-level", alias = "Entry Level")]
    Entry,
    Junior,
    #[serde(alias = "Mid-level", alias = "Mid Level")]
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [&'static str; 6] = ["Entry", "Junior", "Mid", "Senior", "Lead", "Executive"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

/// How hard the interview loop for the role is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [&'static str; 4] = ["Beginner", "Intermediate", "Advanced", "Expert"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
            DifficultyLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillImportance {
    Critical,
    Important,
    #[serde(rename = "Nice-to-have", alias = "Nice to have", alias = "NiceToHave")]
    NiceToHave,
}

impl SkillImportance {
    pub const ALL: [&'static str; 3] = ["Critical", "Important", "Nice-to-have"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillImportance::Critical => "Critical",
            SkillImportance::Important => "Important",
            SkillImportance::NiceToHave => "Nice-to-have",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Technical,
    #[serde(rename = "Soft Skill", alias = "SoftSkill")]
    SoftSkill,
    #[serde(rename = "Domain Knowledge", alias = "DomainKnowledge")]
    DomainKnowledge,
}

impl SkillCategory {
    pub const ALL: [&'static str; 3] = ["Technical", "Soft Skill", "Domain Knowledge"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "Technical",
            SkillCategory::SoftSkill => "Soft Skill",
            SkillCategory::DomainKnowledge => "Domain Knowledge",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_via_as_str!(ExperienceLevel, DifficultyLevel, SkillImportance, SkillCategory);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub importance: SkillImportance,
    pub category: SkillCategory,
}

/// Structured analysis of a job description. Also the input of the study
/// plan and question pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub role_title: String,
    pub company_type: String,
    pub experience_level: ExperienceLevel,
    /// Ordered most to least important.
    pub key_skills: Vec<Skill>,
    pub difficulty_level: DifficultyLevel,
    pub summary: String,
}

impl JobAnalysis {
    pub fn json_schema() -> Value {
        let skill = object_schema(
            &[
                ("name", string_schema()),
                ("importance", enum_schema(&SkillImportance::ALL)),
                ("category", enum_schema(&SkillCategory::ALL)),
            ],
            &[],
        );

        object_schema(
            &[
                ("role_title", string_schema()),
                ("company_type", string_schema()),
                ("experience_level", enum_schema(&ExperienceLevel::ALL)),
                ("key_skills", array_schema(skill)),
                ("difficulty_level", enum_schema(&DifficultyLevel::ALL)),
                ("summary", json!({"type": "STRING", "description": "Two to four sentences."})),
            ],
            &[],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_wire_values() {
        let parsed: SkillImportance = serde_json::from_str(r#""Nice-to-have""#).unwrap();
        assert_eq!(parsed, SkillImportance::NiceToHave);
        assert_eq!(
            serde_json::to_string(&SkillImportance::NiceToHave).unwrap(),
            r#""Nice-to-have""#
        );
    }

    #[test]
    fn test_category_accepts_compact_alias() {
        let parsed: SkillCategory = serde_json::from_str(r#""SoftSkill""#).unwrap();
        assert_eq!(parsed, SkillCategory::SoftSkill);
        assert_eq!(parsed.to_string(), "Soft Skill");
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        assert!(serde_json::from_str::<SkillImportance>(r#""Optional""#).is_err());
        assert!(serde_json::from_str::<ExperienceLevel>(r#""Wizard""#).is_err());
    }

    #[test]
    fn test_job_analysis_deserializes() {
        let json = r#"{
            "role_title": "Senior Backend Engineer",
            "company_type": "Fintech startup",
            "experience_level": "Senior",
            "key_skills": [
                {"name": "Rust", "importance": "Critical", "category": "Technical"},
                {"name": "Mentoring", "importance": "Important", "category": "Soft Skill"}
            ],
            "difficulty_level": "Advanced",
            "summary": "Own the payments ledger."
        }"#;

        let analysis: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.experience_level, ExperienceLevel::Senior);
        assert_eq!(analysis.key_skills.len(), 2);
        assert_eq!(analysis.key_skills[1].category, SkillCategory::SoftSkill);
    }

    #[test]
    fn test_schema_enumerates_every_variant() {
        let schema = JobAnalysis::json_schema();
        let levels = &schema["properties"]["experience_level"]["enum"];
        assert_eq!(levels.as_array().unwrap().len(), ExperienceLevel::ALL.len());
        let importance = &schema["properties"]["key_skills"]["items"]["properties"]["importance"];
        assert_eq!(importance["enum"][2], "Nice-to-have");
    }
}
