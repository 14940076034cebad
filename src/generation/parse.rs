//! Validation of generated mentor payloads.

use serde::{Deserialize, Deserializer};

use crate::error::GenerationError;
use crate::model::{Industry, Mentor};

use super::prompt::PHOTO_POOL;

/// A mentor object as the model returned it.
///
/// `id` and `avatar` may be missing and are repaired; everything else is
/// required. Any `industry` the model emits is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMentor {
    #[serde(default)]
    id: Option<String>,
    name: String,
    role: String,
    company: String,
    bio: String,
    success_stories: Vec<String>,
    mentoring_style: Vec<String>,
    rating: f64,
    #[serde(deserialize_with = "count")]
    session_count: u32,
    languages: Vec<String>,
    hourly_rate: String,
    #[serde(default)]
    avatar: Option<String>,
    availability: Vec<String>,
    time_slots: Vec<String>,
}

/// Accept integral counts written as floats (`120.0`), which some models emit
/// for INTEGER schema fields.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Ok(n as u32)
    } else {
        Err(serde::de::Error::custom(format!("invalid session count {n}")))
    }
}

/// Whether `url` is a well-formed https URL with a host.
pub fn is_secure_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| u.scheme() == "https" && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// Fallback avatar for the mentor at `index`.
pub fn fallback_avatar(index: usize) -> &'static str {
    PHOTO_POOL[index % PHOTO_POOL.len()]
}

impl RawMentor {
    fn into_mentor(self, index: usize, industry: Industry) -> Mentor {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("m-{index}"));
        let avatar = match self.avatar {
            Some(url) if is_secure_url(&url) => url,
            _ => fallback_avatar(index).to_string(),
        };

        Mentor {
            id,
            name: self.name,
            role: self.role,
            company: self.company,
            industry,
            bio: self.bio,
            success_stories: self.success_stories,
            mentoring_style: self.mentoring_style,
            avatar,
            rating: self.rating,
            session_count: self.session_count,
            languages: self.languages,
            hourly_rate: self.hourly_rate,
            availability: self.availability,
            time_slots: self.time_slots,
        }
    }
}

/// Parse the model's text into mentors for `industry`.
///
/// Empty text is an empty list. Text that is not an array of schema-shaped
/// objects is rejected as a whole.
pub fn parse_mentors(text: &str, industry: Industry) -> Result<Vec<Mentor>, GenerationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json = extract_json_array(text);
    let items: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| GenerationError::MalformedResponse {
            reason: format!("not a JSON array: {e}"),
        })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawMentor =
                serde_json::from_value(item).map_err(|e| GenerationError::MalformedResponse {
                    reason: format!("mentor {index}: {e}"),
                })?;
            Ok(raw.into_mentor(index, industry))
        })
        .collect()
}

/// Extract a JSON array from output that might carry markdown fences or
/// surrounding prose.
fn extract_json_array(text: &str) -> &str {
    let trimmed = text.trim();

    // A bare object is never unwrapped into an inner array.
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('[') {
                return inner;
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
