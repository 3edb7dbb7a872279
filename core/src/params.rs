use crate::error::SearchError;


/// The three query-string parameters the search endpoint understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text query.
    pub q: Option<String>,
    /// Warzone filter.
    pub z: Option<String>,
    /// Level filter.
    pub l: Option<String>,
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.z = Some(zone.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.l = Some(level.into());
        self
    }

    /// Picks `q`, `z` and `l` out of raw query-string pairs. Other keys are
    /// ignored and the first occurrence of a repeated key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "q" => &mut params.q,
                "z" => &mut params.z,
                "l" => &mut params.l,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        params
    }

    pub fn require_query(&self) -> Result<&str, SearchError> {
        self.q.as_deref().ok_or(SearchError::MissingParameter("q"))
    }
}
