use std::str::FromStr;

use crate::models::CoreError;

pub const MAX_PAGE_SIZE: u8 = 100;

/// Raw text as typed. Runs are keyed on the trimmed form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchQuery {
    pub text: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum UserSortKey {
    #[default]
    Followers,
    Repositories,
    Joined,
}

impl UserSortKey {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Repositories => "repositories",
            Self::Joined => "joined",
        }
    }
}

impl FromStr for UserSortKey {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "followers" => Ok(Self::Followers),
            "repositories" => Ok(Self::Repositories),
            "joined" => Ok(Self::Joined),
            other => Err(CoreError::invalid_input(format!(
                "unknown sort key '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchUsersRequest {
    pub query: String,
    pub sort: UserSortKey,
    pub per_page: u8,
}

impl SearchUsersRequest {
    pub fn new(query: impl Into<String>, sort: UserSortKey, per_page: u8) -> Self {
        Self {
            query: query.into(),
            sort,
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DirectoryOperation {
    SearchUsers,
    UserDetails,
}
