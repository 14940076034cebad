//! Prompt text and response schema for mentor generation.

use serde_json::{Value, json};

use super::GenerationRequest;

/// Headshots the model picks avatars from, and the fallback pool for
/// mentors whose avatar comes back unusable.
pub const PHOTO_POOL: [&str; 15] = [
    "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1519085360753-af0119f7cbe7?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1560250097-0b93528c311a?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1580489944761-15a19d654956?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1539571696357-5a69c17a67c6?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1544005313-94ddf0286df2?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1531123897727-8f129e1688ce?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1554151228-14d9def656e4?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1566492031773-4f4e44671857?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1548142813-c348350df52b?q=80&w=400&h=400&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?q=80&w=400&h=400&auto=format&fit=crop",
];

/// Fields every generated mentor object must carry.
pub const REQUIRED_FIELDS: [&str; 14] = [
    "id",
    "name",
    "role",
    "company",
    "bio",
    "successStories",
    "mentoringStyle",
    "rating",
    "sessionCount",
    "languages",
    "hourlyRate",
    "avatar",
    "availability",
    "timeSlots",
];

fn join_labels<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the instruction asking for `count` mentor profiles.
pub fn mentor_prompt(request: &GenerationRequest, count: usize) -> String {
    let c = &request.criteria;
    let days = join_labels(&c.days);
    let slots = join_labels(&c.time_slots);

    format!(
        "Generate {count} realistic professional mentor profiles for a mentee interested in \
         {goal} within the {industry} industry.\n\
         The mentee is at a {level} level, prefers communication in {language}, and has a \
         budget preference of {budget} per session.\n\n\
         IMPORTANT: the mentee is looking for mentors available on these days: {days}\n\
         during these hourly time slots: {slots}.\n\n\
         Every mentor must be clearly more experienced than the mentee and fluent in {language}.\n\n\
         For each mentor, pick one URL from this list of professional headshots:\n\
         {photos}\n\n\
         Each profile must include:\n\
         - A professional name\n\
         - A relevant job title at a well-known or plausible tech company\n\
         - A compelling 3-sentence bio\n\
         - 2 specific success stories from their mentoring career\n\
         - 3 distinct mentoring style tags\n\
         - A rating between 4.7 and 5.0\n\
         - A number of sessions between 50 and 500\n\
         - The languages they speak (must include {language})\n\
         - An hourly rate within the {budget} range (if 'Free', set it to 'Free')\n\
         - The chosen avatar URL\n\
         - An 'availability' array of full day names they are free (must include some of: {days})\n\
         - A 'timeSlots' array of hourly slots (must include some of: {slots})",
        goal = request.goal,
        industry = c.industry,
        level = c.experience_level,
        language = c.language,
        budget = c.budget,
        photos = PHOTO_POOL.join("\n"),
    )
}

/// Gemini response schema: an array of mentor objects.
pub fn response_schema() -> Value {
    let string_array = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "name": { "type": "STRING" },
                "role": { "type": "STRING" },
                "company": { "type": "STRING" },
                "bio": { "type": "STRING" },
                "successStories": string_array,
                "mentoringStyle": string_array,
                "rating": { "type": "NUMBER" },
                "sessionCount": { "type": "INTEGER" },
                "languages": string_array,
                "hourlyRate": { "type": "STRING" },
                "avatar": { "type": "STRING" },
                "availability": string_array,
                "timeSlots": string_array,
            },
            "required": REQUIRED_FIELDS,
        }
    })
}
