use crate::models::{SearchQuery, UserDetail};
use crate::orchestration::SearchSnapshot;

pub const TITLE: &str = "Users Search";
pub const SEARCH_PLACEHOLDER: &str = "Start typing user name here...";
pub const NO_RESULTS_MESSAGE: &str = "No user found!!";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again.";
pub const PROFILE_LINK_LABEL: &str = "View Profile";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserCard {
    pub login: String,
    pub followers_label: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub profile_link_label: &'static str,
}

impl From<&UserDetail> for UserCard {
    fn from(user: &UserDetail) -> Self {
        Self {
            login: user.login.clone(),
            followers_label: format!("Followers: {}", user.followers),
            avatar_url: user.avatar_url.clone(),
            profile_url: user.html_url.clone(),
            profile_link_label: PROFILE_LINK_LABEL,
        }
    }
}

/// What the body of the page shows. Exactly one variant applies to any
/// snapshot; a non-empty result list wins over the loading indicator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchView {
    Results(Vec<UserCard>),
    Loading,
    NoResults,
    Idle,
}

impl SearchView {
    pub fn from_snapshot(snapshot: &SearchSnapshot) -> Self {
        if !snapshot.results.is_empty() {
            return Self::Results(snapshot.results.iter().map(UserCard::from).collect());
        }
        if snapshot.loading {
            return Self::Loading;
        }
        if !SearchQuery::new(snapshot.query.as_str()).is_blank() {
            return Self::NoResults;
        }
        Self::Idle
    }
}
