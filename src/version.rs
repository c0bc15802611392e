use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Grammar for a single version identifier: dotted numeric/alphanumeric
/// release segments, optionally followed by a hyphen-introduced pre-release
/// suffix of dot-separated tokens.
const VERSION_PATTERN: &str = r"[0-9]+(\.[0-9a-zA-Z]+)*(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?";

static ANCHORED_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\s*({VERSION_PATTERN})?\s*$")).unwrap());

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+|[a-zA-Z]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Malformed version number string {version}")]
    MalformedVersion { version: String },
}

/// One atomic comparable unit of a canonical version string: a maximal run
/// of digits or a maximal run of letters. Letter runs are stored lowercased
/// so comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSegment {
    Number(u64),
    Alpha(String),
}

impl VersionSegment {
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Number(0))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn is_alpha(&self) -> bool {
        matches!(self, Self::Alpha(_))
    }
}

impl std::fmt::Display for VersionSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionSegment::Number(n) => write!(f, "{n}"),
            VersionSegment::Alpha(s) => write!(f, "{s}"),
        }
    }
}

/// A validated, normalized version identifier.
///
/// `canonical` always matches the version grammar: whitespace is trimmed,
/// empty input becomes `"0"`, and every hyphen is rewritten to the `.pre.`
/// separator so pre-release markers segment like ordinary alphabetic
/// qualifiers. The segment sequence is derived from `canonical` once, at
/// construction, and the value is immutable from then on.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    raw: String,
    canonical: String,
    segments: Vec<VersionSegment>,
}

impl Version {
    pub fn new(version: impl AsRef<str>) -> Result<Self, VersionError> {
        let raw = version.as_ref();
        if !Self::is_valid(raw) {
            return Err(VersionError::MalformedVersion {
                version: raw.to_string(),
            });
        }

        let canonical = Self::normalize(raw);
        let segments = Self::parse_segments(&canonical).ok_or_else(|| {
            VersionError::MalformedVersion {
                version: raw.to_string(),
            }
        })?;

        Ok(Self {
            raw: raw.to_string(),
            canonical,
            segments,
        })
    }

    /// Whether `version` matches the anchored version grammar, i.e. whether
    /// construction would get past validation.
    pub fn is_valid(version: &str) -> bool {
        ANCHORED_VERSION_RE.is_match(version)
    }

    fn normalize(version: &str) -> String {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.replace('-', ".pre.")
        }
    }

    /// Scans for maximal digit and letter runs, skipping dot separators.
    /// Returns `None` when a digit run overflows 64 bits.
    fn parse_segments(canonical: &str) -> Option<Vec<VersionSegment>> {
        let mut segments = Vec::new();

        for run in SEGMENT_RE.find_iter(canonical) {
            let run = run.as_str();
            if run.starts_with(|c: char| c.is_ascii_digit()) {
                segments.push(VersionSegment::Number(run.parse().ok()?));
            } else {
                segments.push(VersionSegment::Alpha(run.to_ascii_lowercase()));
            }
        }

        if segments.is_empty() {
            segments.push(VersionSegment::Number(0));
        }

        Some(segments)
    }

    /// The input string exactly as given to the constructor.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized form: trimmed, zero-substituted, hyphens rewritten.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn segments(&self) -> &[VersionSegment] {
        &self.segments
    }

    /// The segment sequence with trailing zero segments trimmed, keeping at
    /// least one segment. Versions that compare equal share this form.
    pub fn canonical_segments(&self) -> &[VersionSegment] {
        let keep = self
            .segments
            .iter()
            .rposition(|s| !s.is_zero())
            .map_or(1, |i| i + 1);
        &self.segments[..keep]
    }

    /// True when any segment is alphabetic, which marks a pre-release.
    pub fn is_prerelease(&self) -> bool {
        self.segments.iter().any(VersionSegment::is_alpha)
    }

    /// The release form: the leading numeric prefix with any pre-release
    /// qualifier stripped.
    pub fn release(&self) -> Self {
        let segments = self
            .segments
            .iter()
            .take_while(|s| s.is_number())
            .cloned()
            .collect();

        Self::from_segments(segments)
    }

    /// The next release version: the pre-release tail is dropped, then the
    /// least significant remaining number is carried, so `5.2.4` and
    /// `5.2.4.a10` both bump to `5.3`, and `5` bumps to `6`.
    pub fn bump(&self) -> Self {
        let mut segments = self.segments.clone();

        while segments.iter().any(VersionSegment::is_alpha) {
            segments.pop();
        }

        if segments.len() > 1 {
            segments.pop();
        }

        if let Some(VersionSegment::Number(n)) = segments.last_mut() {
            *n += 1;
        }

        Self::from_segments(segments)
    }

    fn from_segments(segments: Vec<VersionSegment>) -> Self {
        if segments.is_empty() {
            return Self::default();
        }

        let canonical = segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");

        Self {
            raw: canonical.clone(),
            canonical,
            segments,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self {
            raw: "0".to_string(),
            canonical: "0".to_string(),
            segments: vec![VersionSegment::Number(0)],
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_segments() == other.canonical_segments()
    }
}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_segments().hash(state);
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Position-wise comparison of the two segment sequences. A side that
    /// runs out of segments continues as implicit zeros, and a number beats
    /// a letter run at the same position, so a bare release outranks any
    /// pre-release continuation of the same prefix.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        static ZERO: VersionSegment = VersionSegment::Number(0);

        for i in 0..self.segments.len().max(other.segments.len()) {
            let lhs = self.segments.get(i).unwrap_or(&ZERO);
            let rhs = other.segments.get(i).unwrap_or(&ZERO);

            match (lhs, rhs) {
                (VersionSegment::Number(a), VersionSegment::Number(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                },
                (VersionSegment::Number(_), VersionSegment::Alpha(_)) => return Ordering::Greater,
                (VersionSegment::Alpha(_), VersionSegment::Number(_)) => return Ordering::Less,
                (VersionSegment::Alpha(a), VersionSegment::Alpha(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                },
            }
        }

        Ordering::Equal
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, VersionError> {
        Version::new(s)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Version::new(raw).map_err(de::Error::custom)
    }
}
