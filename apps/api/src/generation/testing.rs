//! Test doubles and fixtures shared by the generation tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::generation::structured::{RetryPolicy, StructuredGenerator};
use crate::llm_client::{LlmError, StructuredModel, StructuredPrompt};
use crate::models::JobAnalysis;

/// What the scripted model does on one call.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    /// 503 from the provider.
    Transient,
    /// 401 from the provider.
    Fatal,
    /// Never answers.
    Hang,
}

impl Step {
    pub fn reply(value: Value) -> Self {
        Step::Reply(value.to_string())
    }
}

/// A `StructuredModel` that plays back a fixed script. Once the script runs
/// out, the last step repeats.
pub struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: AtomicU32,
    instructions: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
            instructions: Mutex::new(Vec::new()),
        })
    }

    pub fn always(step: Step) -> Arc<Self> {
        Self::new(vec![step])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match steps.pop_front() {
            Some(step) => {
                *last = Some(step.clone());
                step
            }
            None => last.clone().unwrap_or(Step::Transient),
        }
    }
}

#[async_trait]
impl StructuredModel for ScriptedModel {
    async fn generate(&self, prompt: StructuredPrompt<'_>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions
            .lock()
            .unwrap()
            .push(prompt.instruction.to_string());

        match self.next_step() {
            Step::Reply(raw) => Ok(raw),
            Step::Transient => Err(LlmError::Api {
                status: 503,
                message: "model overloaded".into(),
            }),
            Step::Fatal => Err(LlmError::Api {
                status: 401,
                message: "API key not valid".into(),
            }),
            Step::Hang => std::future::pending().await,
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn test_policy() -> RetryPolicy {
    RetryPolicy::new(Duration::from_secs(5), Duration::from_millis(100))
}

pub fn generator_for(model: &Arc<ScriptedModel>) -> StructuredGenerator {
    StructuredGenerator::new(model.clone(), test_policy())
}

pub fn sample_job_analysis_json() -> Value {
    json!({
        "role_title": "Senior Backend Engineer",
        "company_type": "Series B fintech startup",
        "experience_level": "Senior",
        "key_skills": [
            {"name": "Rust", "importance": "Critical", "category": "Technical"},
            {"name": "Distributed systems", "importance": "Important", "category": "Technical"},
            {"name": "Stakeholder communication", "importance": "Nice-to-have", "category": "Soft Skill"}
        ],
        "difficulty_level": "Advanced",
        "summary": "Owns the payments ledger services end to end."
    })
}

pub fn sample_job_analysis() -> JobAnalysis {
    serde_json::from_value(sample_job_analysis_json()).unwrap()
}

pub fn sample_study_plan_json() -> Value {
    json!({
        "total_duration_hours": 30,
        "topics": [
            {
                "name": "Rust ownership and async",
                "description": "Borrowing, lifetimes, and tokio internals.",
                "priority": 1,
                "estimated_hours": 18,
                "resources": [
                    {"title": "The Rust Book", "type": "Book", "url": "https://doc.rust-lang.org/book/"},
                    {"title": "Tokio tutorial", "type": "Documentation"}
                ]
            },
            {
                "name": "Consensus and replication",
                "description": "Raft, leader election, and log replication.",
                "priority": 2,
                "estimated_hours": 12,
                "resources": []
            }
        ],
        "strategy": "Front-load Rust depth, then system design.",
        "timeline": "3 weeks at 10 hours per week"
    })
}

pub fn sample_question_set_json(count: usize) -> Value {
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            let difficulty = ["Easy", "Medium", "Hard"][i % 3];
            let question_type = ["Technical", "Behavioral", "Situational"][i % 3];
            json!({
                "text": format!("Design question {}", i + 1),
                "difficulty": difficulty,
                "type": question_type,
                "hint": "Start from the requirements.",
                "key_points": ["Clarify scope", "Discuss trade-offs"]
            })
        })
        .collect();
    json!({ "questions": questions })
}

pub fn sample_evaluation_json(score: u32) -> Value {
    json!({
        "score": score,
        "strengths": ["Honest about the outcome"],
        "improvements": ["Use the STAR structure", "Describe the action you took"],
        "example_answer": "When two teammates disagreed on an API design, I set up a meeting...",
        "overall_feedback": "Expand on what you did and what changed as a result."
    })
}
