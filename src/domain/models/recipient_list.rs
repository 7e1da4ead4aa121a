use serde::{Deserialize, Serialize};

/// Named, ordered sequence of raw recipient identifiers.
///
/// Loaded once at job creation; where lists come from is an
/// infrastructure concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientList {
    pub id: String,
    pub recipients: Vec<String>,
}
