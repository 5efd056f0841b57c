use std::fmt;

/// A language/country/variant triple used to pick resource bundle variants.
///
/// Any part may be empty; the root locale has all three empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.trim().to_ascii_lowercase(),
            country: country.trim().to_ascii_uppercase(),
            variant: variant.trim().to_string(),
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    /// Parses `ll`, `ll_CC`, `ll_CC_variant` and POSIX forms such as
    /// `en_US.UTF-8@euro` (codeset and modifier are ignored). `-` is accepted as
    /// a separator too. `C` and `POSIX` map to the root locale.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        let tag = tag.split(['.', '@']).next().unwrap_or_default();
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return Self::root();
        }

        let mut parts = tag.splitn(3, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();
        Self::new(language, country, variant)
    }

    /// Locale of the current process, taken from `LC_ALL`, `LC_MESSAGES` and
    /// `LANG` (first non-empty wins).
    pub fn from_env() -> Self {
        Self::from_env_values(
            ["LC_ALL", "LC_MESSAGES", "LANG"]
                .iter()
                .map(|key| std::env::var(key).ok()),
        )
    }

    fn from_env_values(values: impl IntoIterator<Item = Option<String>>) -> Self {
        values
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// Bundle name suffixes from most to least specific:
    /// `_ll_CC_variant`, `_ll_CC`, `_ll`, and the empty suffix.
    ///
    /// Empty parts are skipped, so some suffixes may repeat.
    pub fn bundle_suffixes(&self) -> [String; 4] {
        let part = |value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                format!("_{value}")
            }
        };
        let language = part(&self.language);
        let country = part(&self.country);
        let variant = part(&self.variant);
        [
            format!("{language}{country}{variant}"),
            format!("{language}{country}"),
            language,
            String::new(),
        ]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![self.language.as_str()];
        if !self.country.is_empty() || !self.variant.is_empty() {
            parts.push(&self.country);
        }
        if !self.variant.is_empty() {
            parts.push(&self.variant);
        }
        f.write_str(&parts.join("_"))
    }
}
