use regex::Regex;
use std::sync::LazyLock;

/// `<Letter><NN>_<LastName>_<FirstName>_<Type>_<NN>`, e.g. `A01_Smith_John_wip_01`.
pub static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>[A-Z][0-9]+_[^_]+_[^_]+_[^_]+_)(?P<version>[0-9]+)$").unwrap()
});

/// `<Letter><NN>_<remainder>`, capturing the prefix (underscore included) and the remainder.
pub static PROJECT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<prefix>[A-Z][0-9]+_)(?P<rest>.+)$").unwrap());

/// The last run of ASCII digits and whatever text trails it.
///
/// Digit classes are spelled `[0-9]`: `\d` would also match non-ASCII digits.
pub static LAST_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<version>[0-9]+)(?P<tail>[^0-9]*)$").unwrap());

/// Everything before the first ASCII digit of a file name, used to group related versions.
pub static GROUP_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<prefix>[^0-9]*?)[0-9]").unwrap());

/// Collapses consecutive underscores.
pub static UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Characters invalid on Windows file names (double-quote included).
pub static INVALID_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).unwrap());

/// Collision probes tried after the first candidate before giving up.
pub const MAX_PROBE_ATTEMPTS: u32 = 100;

/// Appended to base names that carry no digits at all.
pub const FALLBACK_SUFFIX: &str = "02";

/// Records kept per history group.
pub const HISTORY_GROUP_LIMIT: usize = 50;

/// Name of the project subfolder that holds scenes.
pub const SCENES_DIR: &str = "scenes";
