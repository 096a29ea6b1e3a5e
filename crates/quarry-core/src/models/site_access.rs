use serde::{Deserialize, Serialize};

/// A named configuration scope selected per request.
///
/// `matcher` records the name of the matcher that selected this site access,
/// when one did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAccess {
    pub name: String,
    pub matcher: Option<String>,
}

impl SiteAccess {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: None,
        }
    }

    pub fn matched_by(name: impl Into<String>, matcher: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: Some(matcher.into()),
        }
    }
}
