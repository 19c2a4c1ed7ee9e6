use serde::{de, Deserialize, Deserializer, Serialize};

/// Template used when a file is uploaded; only the name is forwarded.
const FILE_PAYLOAD_PREFIX: &str = "File content of: ";

/// What the caller asked us to check, after resolving text vs. file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInput {
    Text(String),
    File { name: String },
}

impl CheckInput {
    /// Resolve raw form fields into an input. A file wins over text; text that
    /// is empty after trimming counts as absent.
    pub fn resolve(text: Option<String>, file_name: Option<String>) -> Option<Self> {
        if let Some(name) = file_name {
            return Some(CheckInput::File { name });
        }

        text.filter(|t| !t.trim().is_empty()).map(CheckInput::Text)
    }

    /// Text forwarded to the completion provider.
    pub fn payload(&self) -> String {
        match self {
            CheckInput::Text(text) => text.clone(),
            CheckInput::File { name } => format!("{}{}", FILE_PAYLOAD_PREFIX, name),
        }
    }
}

/// JSON body accepted by `POST /api/check`.
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Upper bound for every similarity score, in percent.
pub const MAX_SIMILARITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedSection {
    pub text: String,
    #[serde(deserialize_with = "bounded_similarity")]
    pub similarity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    #[serde(deserialize_with = "bounded_similarity")]
    pub similarity: u8,
    pub flagged_sections: Vec<FlaggedSection>,
}

fn bounded_similarity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > MAX_SIMILARITY {
        return Err(de::Error::custom(format!(
            "similarity {} is outside 0-{}",
            value, MAX_SIMILARITY
        )));
    }
    Ok(value)
}

/// Whether a result came from the completion service or the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Live,
    Fallback,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Live => "live",
            ResultSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result plus where it came from. Only `result` goes on the wire.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub result: CheckResult,
    pub source: ResultSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_takes_precedence_over_text() {
        let input = CheckInput::resolve(Some("some text".into()), Some("essay.pdf".into()));
        assert_eq!(
            input,
            Some(CheckInput::File {
                name: "essay.pdf".into()
            })
        );
    }

    #[test]
    fn file_payload_uses_fixed_template() {
        let input = CheckInput::File {
            name: "thesis.docx".into(),
        };
        assert_eq!(input.payload(), "File content of: thesis.docx");
    }

    #[test]
    fn whitespace_only_text_is_absent() {
        assert_eq!(CheckInput::resolve(Some("   \n\t".into()), None), None);
        assert_eq!(CheckInput::resolve(Some(String::new()), None), None);
        assert_eq!(CheckInput::resolve(None, None), None);
    }

    #[test]
    fn text_payload_is_kept_verbatim() {
        let input = CheckInput::resolve(Some("  padded text ".into()), None).unwrap();
        assert_eq!(input.payload(), "  padded text ");
    }

    #[test]
    fn similarity_above_hundred_is_rejected() {
        let overall = serde_json::from_str::<CheckResult>(
            r#"{"similarity":250,"flaggedSections":[]}"#,
        );
        assert!(overall.is_err());

        let section = serde_json::from_str::<CheckResult>(
            r#"{"similarity":10,"flaggedSections":[{"text":"x","similarity":101}]}"#,
        );
        assert!(section.is_err());

        let edge = serde_json::from_str::<CheckResult>(
            r#"{"similarity":100,"flaggedSections":[{"text":"x","similarity":0}]}"#,
        )
        .unwrap();
        assert_eq!(edge.similarity, 100);
    }

    #[test]
    fn result_serializes_with_camel_case_sections() {
        let result = CheckResult {
            similarity: 42,
            flagged_sections: vec![FlaggedSection {
                text: "copied".into(),
                similarity: 80,
            }],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["similarity"], 42);
        assert_eq!(value["flaggedSections"][0]["text"], "copied");
        assert_eq!(value["flaggedSections"][0]["similarity"], 80);
    }
}
