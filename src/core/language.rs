use serde::Serialize;

/// Languages a summary can be produced in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Polish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Polish];

    /// Parses the user-facing selector (`eng` or `pl`).
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector.trim() {
            "eng" => Some(Self::English),
            "pl" => Some(Self::Polish),
            _ => None,
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            Self::English => "eng",
            Self::Polish => "pl",
        }
    }

    /// Language code used by the transcript service.
    pub fn service_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Polish => "pl",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Polish => "Polish",
        }
    }

    /// The language a dual-language run translates into.
    pub fn counterpart(self) -> Self {
        match self {
            Self::English => Self::Polish,
            Self::Polish => Self::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn selectors_map_to_service_codes() {
        assert_eq!(Language::from_selector("eng").map(Language::service_code), Some("en"));
        assert_eq!(Language::from_selector("pl").map(Language::service_code), Some("pl"));
        assert_eq!(Language::from_selector("en"), None);
        assert_eq!(Language::from_selector("ENG"), None);
    }

    #[test]
    fn serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Language::Polish).unwrap(), "\"polish\"");
    }
}
