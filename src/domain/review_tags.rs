use serde::Deserialize;

/// Output columns appended by the labeling pass, in order. 7W2H without
/// "Which", plus the ABC triple.
pub const TAG_COLUMNS: [&str; 9] = [
    "When",
    "Where",
    "Who",
    "Why",
    "How",
    "How_much",
    "Affect",
    "Behavior",
    "Cognition",
];

/// Tag arrays for one review, as the model is instructed to return them.
/// Missing fields deserialize as empty, same as an explicit `[]`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ReviewTags {
    #[serde(default, rename = "When")]
    pub when: Vec<String>,
    #[serde(default, rename = "Where")]
    pub where_: Vec<String>,
    #[serde(default, rename = "Who")]
    pub who: Vec<String>,
    #[serde(default, rename = "Why")]
    pub why: Vec<String>,
    #[serde(default, rename = "How")]
    pub how: Vec<String>,
    #[serde(default, rename = "How_much")]
    pub how_much: Vec<String>,
    #[serde(default, rename = "Affect")]
    pub affect: Vec<String>,
    #[serde(default, rename = "Behavior")]
    pub behavior: Vec<String>,
    #[serde(default, rename = "Cognition")]
    pub cognition: Vec<String>,
}

impl ReviewTags {
    /// One comma-joined value per tag column, in `TAG_COLUMNS` order.
    pub fn to_columns(&self) -> Vec<String> {
        [
            &self.when,
            &self.where_,
            &self.who,
            &self.why,
            &self.how,
            &self.how_much,
            &self.affect,
            &self.behavior,
            &self.cognition,
        ]
        .iter()
        .map(|tags| tags.join(","))
        .collect()
    }
}
