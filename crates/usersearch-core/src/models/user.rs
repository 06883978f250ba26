use serde::{Deserialize, Serialize};

/// Ranked entry returned by a directory search. Only lives for the duration
/// of a run, until it is joined with its detail lookup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Option<u64>,
    pub login: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    pub id: Option<u64>,
    pub login: String,
    pub avatar_url: String,
    pub followers: u64,
    pub html_url: String,
}
