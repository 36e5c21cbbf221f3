//! Caption generation, posting-time suggestions, and the help assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ChatClient;
use crate::error::AiError;

const CAPTION_SYSTEM_PROMPT: &str = "You are a creative social media manager for a college. \
    Create exciting, relevant captions. Do not sound robotic.";

const ASSISTANT_SYSTEM_PROMPT: &str = "You are a helpful assistant for the college's event \
    automation system. You can answer any topic the user asks about. HOWEVER, if the user asks \
    about the system, you are an expert in: managing events (creating, editing, deleting), \
    approval workflows (HOD approval, rejection), social media automation (Instagram and \
    Facebook posting, scheduling), and user management (Admin, Provider roles).";

const POSTING_TIME_SYSTEM_PROMPT: &str = "You are a social media expert algorithm.";

/// The event fields the caption prompts are built from.
#[derive(Debug, Clone)]
pub struct EventBrief {
    pub title: String,
    pub event_type: String,
    pub department: String,
    pub audience: String,
    pub date: DateTime<Utc>,
    pub resource_person: Option<String>,
    /// Requested writing tone, e.g. "formal" or "fun".
    pub tone: Option<String>,
    /// Free-form instructions that replace the default caption brief.
    pub custom_prompt: Option<String>,
}

/// A suggested publish slot, parsed from the model's JSON answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingTimeSuggestion {
    /// ISO-8601 datetime to post at.
    pub datetime: String,
    /// Short explanation of the choice.
    pub reason: String,
}

/// Generate a social caption for the event. Never fails: when every key
/// attempt fails (or none is configured) the deterministic template is
/// used instead.
pub async fn generate_caption(client: &ChatClient, brief: &EventBrief) -> String {
    match client
        .complete_with_rotation(CAPTION_SYSTEM_PROMPT, &caption_prompt(brief), 0.8)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "caption generation failed, using fallback template");
            fallback_caption(brief)
        }
    }
}

/// Ask the model for the best time to publish the event post.
pub async fn suggest_posting_time(
    client: &ChatClient,
    brief: &EventBrief,
) -> Result<PostingTimeSuggestion, AiError> {
    let answer = client
        .complete_once(
            POSTING_TIME_SYSTEM_PROMPT,
            &posting_time_prompt(brief),
            0.7,
            true,
        )
        .await?;
    serde_json::from_str(&answer).map_err(|err| AiError::Parse(err.to_string()))
}

/// One-shot help-assistant reply.
pub async fn chat(client: &ChatClient, message: &str) -> Result<String, AiError> {
    client
        .complete_once(ASSISTANT_SYSTEM_PROMPT, message, 0.7, false)
        .await
}

fn caption_prompt(brief: &EventBrief) -> String {
    let mut prompt = format!(
        "Event Title: {}\nDepartment: {}\nType: {}\nAudience: {}\nDate: {}\n",
        brief.title,
        brief.department,
        brief.event_type,
        brief.audience,
        brief.date.format("%a %b %d %Y"),
    );
    if let Some(person) = &brief.resource_person {
        prompt.push_str(&format!("Resource Person: {person}\n"));
    }
    if let Some(tone) = &brief.tone {
        prompt.push_str(&format!("Tone: {tone}\n"));
    }

    prompt.push('\n');
    match &brief.custom_prompt {
        Some(custom) => prompt.push_str(&format!("CUSTOM INSTRUCTIONS: {custom}\n")),
        None => prompt.push_str("Write an engaging Instagram caption for this college event.\n"),
    }

    prompt.push_str(
        "\n- Analyze the title and details.\n\
         - Write 3-4 compelling and slightly more descriptive sentences to fully capture the \
         essence of the event.\n\
         - Generate 6-8 relevant hashtags at the end.\n\
         - Output ONLY the caption and hashtags.\n",
    );
    prompt
}

fn posting_time_prompt(brief: &EventBrief) -> String {
    format!(
        "Analyze this college event:\n\
         Title: {}\n\
         Audience: {}\n\
         Type: {}\n\
         Date: {}\n\n\
         Suggest the BEST date and time to post this on social media (Facebook/Instagram) for \
         maximum engagement.\n\
         - Consider students are busy during class hours (9am-4pm).\n\
         - Evenings (6pm-9pm) or weekends are usually better.\n\
         - If the event is soon, suggest a time ASAP.\n\n\
         Output ONLY a valid JSON object in this format:\n\
         {{\n  \"datetime\": \"ISO_8601_STRING\",\n  \"reason\": \"Short explanation (under 15 words)\"\n}}",
        brief.title,
        brief.audience,
        brief.event_type,
        brief.date.format("%a %b %d %Y"),
    )
}

/// Deterministic caption used when every completion attempt fails.
pub fn fallback_caption(brief: &EventBrief) -> String {
    let mut caption = format!(
        "🚀 Exciting News!\n\n\
         Join us for **{}** organized by the **{}** department!\n\n\
         📅 Date: {}\n",
        brief.title,
        brief.department,
        brief.date.format("%a %b %d %Y"),
    );
    if let Some(person) = &brief.resource_person {
        caption.push_str(&format!("📍 Resource Person: {person}\n"));
    }
    caption.push_str(&format!(
        "\nDon't miss this opportunity to learn and grow! 🎓\n\n\
         #NSRIT #CollegeEvent #{} #Learning",
        brief.department.replace(' ', ""),
    ));
    caption
}
