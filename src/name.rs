use crate::consts::{INVALID_CHARS_RE, UNDERSCORE_RE};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Sanitize a name component into a filesystem-safe string.
/// Replaces whitespace with `_` and removes invalid Windows chars.
pub fn sanitize_name(name: &str) -> String {
    let s = name.trim().replace(|c: char| c.is_whitespace(), "_");
    let out = INVALID_CHARS_RE.replace_all(&s, "").to_string();
    let out = UNDERSCORE_RE.replace_all(&out, "_").to_string();
    tracing::trace!(original = name, sanitized = %out);
    out.trim_matches('_').to_string()
}

/// Production stage a scene belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Layout,
    Planning,
    #[default]
    Blocking,
    BlockingPlus,
    Spline,
    Polish,
    Lighting,
    Final,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Layout,
        PipelineStage::Planning,
        PipelineStage::Blocking,
        PipelineStage::BlockingPlus,
        PipelineStage::Spline,
        PipelineStage::Polish,
        PipelineStage::Lighting,
        PipelineStage::Final,
    ];

    /// Display label, e.g. `Blocking Plus`.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Layout => "Layout",
            PipelineStage::Planning => "Planning",
            PipelineStage::Blocking => "Blocking",
            PipelineStage::BlockingPlus => "Blocking Plus",
            PipelineStage::Spline => "Spline",
            PipelineStage::Polish => "Polish",
            PipelineStage::Lighting => "Lighting",
            PipelineStage::Final => "Final",
        }
    }

    /// The form used inside file names, e.g. `blocking_plus`.
    pub fn file_token(self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.file_token() == wanted)
            .ok_or_else(|| format!("unknown pipeline stage `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Wip,
    Final,
}

impl VersionStatus {
    pub fn file_token(self) -> &'static str {
        match self {
            VersionStatus::Wip => "wip",
            VersionStatus::Final => "final",
        }
    }
}

impl FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wip" => Ok(VersionStatus::Wip),
            "final" => Ok(VersionStatus::Final),
            _ => Err(format!("unknown version status `{s}`")),
        }
    }
}

/// Fields of a pipeline-standard scene name:
/// `X##_LastName_FirstName_stage_status_##`, e.g. `J02_Smith_John_layout_wip_01`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentName {
    pub letter: char,
    pub number: u8,
    pub last_name: String,
    pub first_name: String,
    pub stage: PipelineStage,
    pub status: VersionStatus,
    pub version: u32,
}

impl Default for AssignmentName {
    fn default() -> Self {
        Self {
            letter: 'A',
            number: 1,
            last_name: String::new(),
            first_name: String::new(),
            stage: PipelineStage::default(),
            status: VersionStatus::default(),
            version: 1,
        }
    }
}

impl AssignmentName {
    pub const LETTERS: std::ops::RangeInclusive<char> = 'A'..='J';
    pub const NUMBERS: std::ops::RangeInclusive<u8> = 1..=99;

    /// Check the fields and render the base name.
    pub fn generate(&self) -> Result<String> {
        if !Self::LETTERS.contains(&self.letter) {
            return Err(eyre!(
                "assignment letter must be A through J, got `{}`",
                self.letter
            ));
        }
        if !Self::NUMBERS.contains(&self.number) {
            return Err(eyre!(
                "assignment number must be 1 through 99, got {}",
                self.number
            ));
        }
        let last = sanitize_name(&self.last_name);
        let first = sanitize_name(&self.first_name);
        if last.is_empty() || first.is_empty() {
            return Err(eyre!("both last name and first name are required"));
        }

        let name = format!(
            "{letter}{number:02}_{last}_{first}_{stage}_{status}_{version:02}",
            letter = self.letter,
            number = self.number,
            stage = self.stage.file_token(),
            status = self.status.file_token(),
            version = self.version,
        );
        tracing::debug!(name = %name, "generated assignment name");
        Ok(name)
    }

    /// The `X##_` prefix that identifies the project.
    pub fn project_identifier(&self) -> String {
        format!("{}{:02}_", self.letter, self.number)
    }
}

impl fmt::Display for AssignmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generate() {
            Ok(name) => f.write_str(&name),
            Err(_) => f.write_str("<incomplete name>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionIncrementer;

    fn smith() -> AssignmentName {
        AssignmentName {
            letter: 'J',
            number: 2,
            last_name: "Smith".into(),
            first_name: "John".into(),
            stage: PipelineStage::Layout,
            status: VersionStatus::Wip,
            version: 1,
        }
    }

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_name("Create Users"), "Create_Users");
        assert_eq!(sanitize_name("  space  test  "), "space_test");
        assert_eq!(sanitize_name("weird:/\\name"), "weirdname");
    }

    #[test]
    fn generates_pipeline_name() {
        assert_eq!(smith().generate().unwrap(), "J02_Smith_John_layout_wip_01");
        assert_eq!(smith().project_identifier(), "J02_");

        let plus = AssignmentName {
            stage: PipelineStage::BlockingPlus,
            status: VersionStatus::Final,
            version: 12,
            ..smith()
        };
        assert_eq!(plus.to_string(), "J02_Smith_John_blocking_plus_final_12");
    }

    #[test]
    fn generated_name_increments() {
        let name = smith().generate().unwrap();
        assert_eq!(
            VersionIncrementer::default().preview(&name).unwrap(),
            "J02_Smith_John_layout_wip_02"
        );
    }

    #[test]
    fn rejects_missing_fields() {
        let missing = AssignmentName {
            first_name: "  ".into(),
            ..smith()
        };
        assert!(missing.generate().is_err());
        assert_eq!(missing.to_string(), "<incomplete name>");

        let bad_letter = AssignmentName {
            letter: 'Z',
            ..smith()
        };
        assert!(bad_letter.generate().is_err());
    }

    #[test]
    fn stage_parsing() {
        assert_eq!(
            "blocking plus".parse::<PipelineStage>().unwrap(),
            PipelineStage::BlockingPlus
        );
        assert_eq!(
            "Blocking-Plus".parse::<PipelineStage>().unwrap(),
            PipelineStage::BlockingPlus
        );
        assert_eq!("FINAL".parse::<VersionStatus>().unwrap(), VersionStatus::Final);
        assert!("rigging".parse::<PipelineStage>().is_err());
    }
}
