use serde::{Deserialize, Serialize};

/// Outcome of a successful submission. Never mutated after it is received.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub points_awarded: i64,
    pub badges_awarded: Vec<AwardedBadge>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AwardedBadge {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl QuizResult {
    pub fn percentage_of(score: f64, max_score: f64) -> f64 {
        if max_score <= 0.0 {
            return 0.0;
        }
        score / max_score * 100.0
    }

    /// Inclusive: hitting the passing score exactly is a pass.
    pub fn meets_passing_score(percentage: f64, passing_score: f64) -> bool {
        percentage >= passing_score
    }

    pub fn summary(&self) -> String {
        format!(
            "You scored {}/{} ({}%)",
            self.score,
            self.max_score,
            self.percentage.round()
        )
    }
}

impl AwardedBadge {
    /// Badges arrive either as bare names or as badge objects.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(name) => Some(AwardedBadge {
                id: None,
                name: name.clone(),
                description: None,
                image_url: None,
            }),
            serde_json::Value::Object(map) => {
                let text = |key: &str| map.get(key).and_then(|v| v.as_str()).map(str::to_string);
                let id = text("id").or_else(|| map.get("id").map(|v| v.to_string()));
                let name = text("name").or_else(|| id.clone())?;
                Some(AwardedBadge {
                    id,
                    name,
                    description: text("description"),
                    image_url: text("image_url"),
                })
            }
            _ => None,
        }
    }
}
