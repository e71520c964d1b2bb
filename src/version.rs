//! Version-number parsing and next-free-name resolution for scene base names.
//!
//! A base name is matched against an ordered list of [`Recognizer`]s; the first
//! one that accepts it decides which digit run is the version token. The token
//! is bumped while keeping its zero padding, and the result is probed against
//! the target directory until a name that does not exist yet is found.

use crate::consts::{
    ASSIGNMENT_RE, FALLBACK_SUFFIX, LAST_DIGITS_RE, MAX_PROBE_ATTEMPTS, PROJECT_PREFIX_RE,
};
use crate::types::SceneFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IncrementError {
    #[error("file name is empty")]
    EmptyBaseName,

    #[error("file name `{0}` must not contain path separators")]
    InvalidBaseName(String),

    #[error("no free name found for `{base}` after {attempts} attempts")]
    NoAvailableName { base: String, attempts: u32 },

    #[error("could not create directory {}", dir.display())]
    DirectoryCreateFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A run of ASCII digits read as a version number.
///
/// The padding width is the length of the run, leading zeros included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken {
    digits: String,
}

impl VersionToken {
    /// Returns `None` unless `digits` is a non-empty run of ASCII digits.
    pub fn new(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            digits: digits.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// Add `by` and re-render with at least the original width.
    ///
    /// Works on the decimal text directly, so arbitrarily long runs never overflow.
    pub fn bumped(&self, by: u64) -> VersionToken {
        let mut out: Vec<u8> = self.digits.bytes().rev().map(|b| b - b'0').collect();
        let mut carry = by;
        let mut i = 0;
        while carry > 0 {
            if i == out.len() {
                out.push(0);
            }
            let sum = u64::from(out[i]) + carry % 10;
            out[i] = (sum % 10) as u8;
            carry = carry / 10 + sum / 10;
            i += 1;
        }
        let digits = out.iter().rev().map(|d| char::from(b'0' + d)).collect();
        VersionToken { digits }
    }
}

/// Which recognizer accepted a base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    Assignment,
    ProjectPrefixed,
    TrailingNumber,
    Fallback,
}

/// A base name split around its version token.
///
/// `head` and `tail` are copied verbatim into every derived name. Without a
/// token the next name is `head + "02" + tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub pattern: NamePattern,
    pub head: String,
    pub version: Option<VersionToken>,
    pub tail: String,
}

impl ParsedName {
    /// Render with the version advanced by `by`.
    pub fn render(&self, by: u64) -> String {
        match &self.version {
            Some(v) => format!("{}{}{}", self.head, v.bumped(by).as_str(), self.tail),
            None => format!("{}{}{}", self.head, FALLBACK_SUFFIX, self.tail),
        }
    }

    /// The next name, one version up.
    pub fn next(&self) -> String {
        self.render(1)
    }
}

/// A single filename pattern, tried in priority order by [`VersionIncrementer`].
pub trait Recognizer {
    fn pattern(&self) -> NamePattern;

    /// Split `base_name` if this pattern applies to it.
    fn try_match(&self, base_name: &str) -> Option<ParsedName>;
}

/// `A01_Smith_John_wip_01`: bump the trailing version group.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentPattern;

impl Recognizer for AssignmentPattern {
    fn pattern(&self) -> NamePattern {
        NamePattern::Assignment
    }

    fn try_match(&self, base_name: &str) -> Option<ParsedName> {
        let caps = ASSIGNMENT_RE.captures(base_name)?;
        Some(ParsedName {
            pattern: self.pattern(),
            head: caps["head"].to_string(),
            version: VersionToken::new(&caps["version"]),
            tail: String::new(),
        })
    }
}

/// `A01_<remainder>`: the project prefix is never touched, only the remainder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectPrefixPattern;

impl Recognizer for ProjectPrefixPattern {
    fn pattern(&self) -> NamePattern {
        NamePattern::ProjectPrefixed
    }

    fn try_match(&self, base_name: &str) -> Option<ParsedName> {
        let caps = PROJECT_PREFIX_RE.captures(base_name)?;
        let prefix = &caps["prefix"];
        let rest = &caps["rest"];

        let inner = AssignmentPattern
            .try_match(rest)
            .or_else(|| TrailingNumberPattern.try_match(rest))
            .or_else(|| AppendFallback.try_match(rest))?;

        Some(ParsedName {
            pattern: self.pattern(),
            head: format!("{prefix}{}", inner.head),
            version: inner.version,
            tail: inner.tail,
        })
    }
}

/// The last digit run anywhere in the name, with its trailing non-digits kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrailingNumberPattern;

impl Recognizer for TrailingNumberPattern {
    fn pattern(&self) -> NamePattern {
        NamePattern::TrailingNumber
    }

    fn try_match(&self, base_name: &str) -> Option<ParsedName> {
        let caps = LAST_DIGITS_RE.captures(base_name)?;
        let version = caps.name("version")?;
        Some(ParsedName {
            pattern: self.pattern(),
            head: base_name[..version.start()].to_string(),
            version: VersionToken::new(version.as_str()),
            tail: caps["tail"].to_string(),
        })
    }
}

/// Always matches; the next name is the base name with `02` appended.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppendFallback;

impl Recognizer for AppendFallback {
    fn pattern(&self) -> NamePattern {
        NamePattern::Fallback
    }

    fn try_match(&self, base_name: &str) -> Option<ParsedName> {
        Some(ParsedName {
            pattern: self.pattern(),
            head: base_name.to_string(),
            version: None,
            tail: String::new(),
        })
    }
}

/// Maps a base name to the next free, incremented base name in a directory.
///
/// Holds no state between calls: the same inputs against the same directory
/// contents always give the same answer.
pub struct VersionIncrementer {
    recognizers: Vec<Box<dyn Recognizer + Send + Sync>>,
    max_attempts: u32,
}

impl Default for VersionIncrementer {
    fn default() -> Self {
        Self {
            recognizers: vec![
                Box::new(AssignmentPattern),
                Box::new(ProjectPrefixPattern),
                Box::new(TrailingNumberPattern),
                Box::new(AppendFallback),
            ],
            max_attempts: MAX_PROBE_ATTEMPTS,
        }
    }
}

impl VersionIncrementer {
    /// Use a custom recognizer list. [`AppendFallback`] is added at the end
    /// when missing so every valid name still parses.
    pub fn with_recognizers(mut recognizers: Vec<Box<dyn Recognizer + Send + Sync>>) -> Self {
        if recognizers
            .last()
            .is_none_or(|r| r.pattern() != NamePattern::Fallback)
        {
            recognizers.push(Box::new(AppendFallback));
        }
        Self {
            recognizers,
            max_attempts: MAX_PROBE_ATTEMPTS,
        }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Reject names that cannot be a bare file stem.
    pub fn validate(base_name: &str) -> Result<(), IncrementError> {
        if base_name.trim().is_empty() {
            return Err(IncrementError::EmptyBaseName);
        }
        if base_name.contains(['/', '\\']) {
            return Err(IncrementError::InvalidBaseName(base_name.to_string()));
        }
        Ok(())
    }

    /// Split `base_name` with the first recognizer that accepts it.
    pub fn parse(&self, base_name: &str) -> Result<ParsedName, IncrementError> {
        Self::validate(base_name)?;
        let parsed = self
            .recognizers
            .iter()
            .find_map(|r| r.try_match(base_name))
            .unwrap_or_else(|| ParsedName {
                pattern: NamePattern::Fallback,
                head: base_name.to_string(),
                version: None,
                tail: String::new(),
            });
        tracing::trace!(base = base_name, pattern = ?parsed.pattern, "parsed base name");
        Ok(parsed)
    }

    /// The next name without looking at the filesystem.
    pub fn preview(&self, base_name: &str) -> Result<String, IncrementError> {
        Ok(self.parse(base_name)?.next())
    }

    /// The next name for which `exists` returns false.
    ///
    /// The first candidate is the plain increment. On collision, attempt `k`
    /// adds `k` to the last digit run of that first candidate (so probes walk
    /// `02`, `03`, `04`, ...). When the base name had no version token and the
    /// appended `02` collides, probes are `<first>_<k>` instead.
    pub fn resolve<F>(&self, base_name: &str, mut exists: F) -> Result<String, IncrementError>
    where
        F: FnMut(&str) -> bool,
    {
        let parsed = self.parse(base_name)?;
        let first = parsed.next();
        if !exists(&first) {
            tracing::debug!(base = base_name, next = %first, "next name is free");
            return Ok(first);
        }

        let probe = match parsed.version {
            Some(_) => TrailingNumberPattern.try_match(&first),
            None => None,
        };
        for attempt in 1..=self.max_attempts {
            let candidate = match &probe {
                Some(parsed) => parsed.render(u64::from(attempt)),
                None => format!("{first}_{attempt}"),
            };
            if !exists(&candidate) {
                tracing::debug!(base = base_name, next = %candidate, attempt, "resolved collision");
                return Ok(candidate);
            }
            tracing::trace!(candidate = %candidate, attempt, "candidate taken");
        }

        Err(IncrementError::NoAvailableName {
            base: base_name.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Resolve against `directory/<candidate><ext>` on disk.
    pub fn resolve_in(
        &self,
        base_name: &str,
        directory: &Path,
        format: SceneFormat,
    ) -> Result<String, IncrementError> {
        self.resolve(base_name, |candidate| {
            directory
                .join(format!("{candidate}{}", format.extension()))
                .exists()
        })
    }
}
