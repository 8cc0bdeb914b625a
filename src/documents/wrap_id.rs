use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

/// Storefront identifier of one game build, e.g. `F15533T1L2`: game id,
/// platform tag and language tag. Always stored uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WrapId(String);

impl WrapId {
    /// Returns the first wrapID embedded in `input`, if any.
    pub fn parse(input: &str) -> Option<WrapId> {
        RE.find(input).map(|m| WrapId(m.as_str().to_uppercase()))
    }

    /// True if the id contains the catalog filter tag, ignoring case.
    pub fn matches_filter(&self, tag: &str) -> bool {
        self.0.contains(&tag.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?i)F\d+T\dL\d").unwrap();
}
