use std::collections::{BTreeMap, HashMap};

use xsltgen_core::{Locale, TextEncoding};

use crate::filter::{BundleLoader, Filter, FilterContext, FilterError};

/// Registry name of [`TranslatingFilter`].
pub const TRANSLATING_FILTER: &str = "translating";

const DEFAULT_TOKEN: &str = "#";
const DEFAULT_BUNDLE: &str = "Resource";

/// Replaces `#token#` placeholders with values from a resource bundle.
///
/// Parameters (all optional):
///
/// | name             | default                  |
/// |------------------|--------------------------|
/// | `startToken`     | `#`                      |
/// | `endToken`       | `#`                      |
/// | `bundle`         | `Resource`               |
/// | `bundleLanguage` | default locale language  |
/// | `bundleCountry`  | default locale country   |
/// | `bundleVariant`  | default locale variant   |
/// | `bundleEncoding` | source encoding          |
#[derive(Debug)]
pub struct TranslatingFilter {
    start_token: String,
    end_token: String,
    bundle: String,
    language: Option<String>,
    country: Option<String>,
    variant: Option<String>,
    bundle_encoding: Option<TextEncoding>,
    resources: HashMap<String, String>,
}

impl Default for TranslatingFilter {
    fn default() -> Self {
        Self {
            start_token: DEFAULT_TOKEN.to_string(),
            end_token: DEFAULT_TOKEN.to_string(),
            bundle: DEFAULT_BUNDLE.to_string(),
            language: None,
            country: None,
            variant: None,
            bundle_encoding: None,
            resources: HashMap::new(),
        }
    }
}

impl TranslatingFilter {
    pub fn start_token(&self) -> &str {
        &self.start_token
    }

    pub fn end_token(&self) -> &str {
        &self.end_token
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn resources(&self) -> &HashMap<String, String> {
        &self.resources
    }

    /// The requested bundle locale, completed from `default`.
    pub fn bundle_locale(&self, default: &Locale) -> Locale {
        Locale::new(
            self.language.as_deref().unwrap_or(default.language()),
            self.country.as_deref().unwrap_or(default.country()),
            self.variant.as_deref().unwrap_or(default.variant()),
        )
    }
}

impl Filter for TranslatingFilter {
    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), FilterError> {
        let delimiter = |name: &str| -> Result<String, FilterError> {
            match parameters.get(name) {
                Some(value) if value.is_empty() => Err(FilterError::InvalidParameter {
                    name: name.to_string(),
                    reason: "delimiter must not be empty".to_string(),
                }),
                Some(value) => Ok(value.clone()),
                None => Ok(DEFAULT_TOKEN.to_string()),
            }
        };
        self.start_token = delimiter("startToken")?;
        self.end_token = delimiter("endToken")?;
        self.bundle = parameters
            .get("bundle")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BUNDLE.to_string());
        self.language = parameters.get("bundleLanguage").cloned();
        self.country = parameters.get("bundleCountry").cloned();
        self.variant = parameters.get("bundleVariant").cloned();
        self.bundle_encoding = parameters
            .get("bundleEncoding")
            .map(|name| {
                TextEncoding::from_name(name).map_err(|source| FilterError::Encoding {
                    name: "bundleEncoding".to_string(),
                    source,
                })
            })
            .transpose()?;

        tracing::debug!(
            target = "xsltgen.filter",
            start_token = %self.start_token,
            end_token = %self.end_token,
            bundle = %self.bundle,
            "configured translating filter"
        );
        Ok(())
    }

    fn initialize(&mut self, context: &FilterContext<'_>) -> Result<(), FilterError> {
        let locale = self.bundle_locale(context.default_locale);
        let encoding = self.bundle_encoding.unwrap_or(context.source_encoding);
        tracing::debug!(
            target = "xsltgen.filter",
            bundle = %self.bundle,
            locale = %locale,
            encoding = %encoding,
            "loading bundle"
        );
        self.resources = BundleLoader::new(&self.bundle, encoding).load(
            context.resolver,
            &locale,
            context.default_locale,
        )?;
        Ok(())
    }

    fn transform(&self, text: &str, name: &str) -> Result<String, FilterError> {
        tracing::debug!(target = "xsltgen.filter", name, "filtering");
        Ok(translate_text(
            text,
            &self.start_token,
            &self.end_token,
            &self.resources,
        ))
    }
}

/// Replaces `start token end` placeholders line by line.
///
/// Tokens never span lines and never contain `:`, `=`, whitespace or either
/// delimiter. Unmapped tokens are kept verbatim. Replacement values are not
/// scanned again. Empty delimiters leave the text unchanged.
pub fn translate_text(
    text: &str,
    start: &str,
    end: &str,
    resources: &HashMap<String, String>,
) -> String {
    if start.is_empty() || end.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let body_len = rest.find(['\n', '\r']).unwrap_or(rest.len());
        let terminator_len = match rest[body_len..].as_bytes() {
            [b'\r', b'\n', ..] => 2,
            [] => 0,
            _ => 1,
        };
        let (line, tail) = rest.split_at(body_len + terminator_len);
        let (body, terminator) = line.split_at(body_len);

        let translated = translate_line(body, start, end, resources);
        if translated != body {
            tracing::trace!(
                target = "xsltgen.filter",
                before = body.trim(),
                after = translated.trim(),
                "translated line"
            );
        }
        out.push_str(&translated);
        out.push_str(terminator);
        rest = tail;
    }
    out
}

fn translate_line(
    line: &str,
    start: &str,
    end: &str,
    resources: &HashMap<String, String>,
) -> String {
    let mut line = line.to_string();
    let mut cursor = 0;

    while let Some(offset) = line[cursor..].find(start) {
        let start_at = cursor + offset;
        let token_at = start_at + start.len();
        let Some(token_len) = line[token_at..].find(end) else {
            cursor = next_char(&line, start_at);
            continue;
        };
        let token = &line[token_at..token_at + token_len];
        if !is_valid_token(token, start, end) {
            cursor = next_char(&line, start_at);
            continue;
        }

        let placeholder_end = token_at + token_len + end.len();
        let replacement = match resources.get(token) {
            Some(value) => value.clone(),
            None => {
                tracing::warn!(
                    target = "xsltgen.filter",
                    token,
                    "translation missing for token"
                );
                line[start_at..placeholder_end].to_string()
            }
        };
        line.replace_range(start_at..placeholder_end, &replacement);
        cursor = start_at + replacement.len();
    }
    line
}

fn is_valid_token(token: &str, start: &str, end: &str) -> bool {
    !token.contains(start)
        && !token.contains(end)
        && !token
            .chars()
            .any(|c| c == ':' || c == '=' || c.is_whitespace())
}

fn next_char(line: &str, at: usize) -> usize {
    at + line[at..].chars().next().map_or(1, char::len_utf8)
}
