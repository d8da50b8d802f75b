//! Engine version model: `major.minor.build<type><number>`, e.g. `2019.3.5f1`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("expected 3 dot-separated components, found {0}")]
    ComponentCount(usize),
    #[error("{component} component '{text}' is not a number")]
    NotANumber {
        component: &'static str,
        text: String,
    },
    #[error("unknown release type '{0}'")]
    UnknownReleaseType(char),
}

/// Release channel letter of a build. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Experimental,
    Alpha,
    Beta,
    Final,
    Patch,
}

impl ReleaseType {
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'x' => Some(ReleaseType::Experimental),
            'a' => Some(ReleaseType::Alpha),
            'b' => Some(ReleaseType::Beta),
            'f' => Some(ReleaseType::Final),
            'p' => Some(ReleaseType::Patch),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            ReleaseType::Experimental => 'x',
            ReleaseType::Alpha => 'a',
            ReleaseType::Beta => 'b',
            ReleaseType::Final => 'f',
            ReleaseType::Patch => 'p',
        }
    }
}

/// A comparable engine version. Field order is the comparison order.
///
/// A bare build (`5.6.0`) compares equal to its explicit final-zero spelling
/// (`5.6.0f0`) but displays the way it was written.
#[derive(Debug, Clone, Copy)]
pub struct EngineVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub release: ReleaseType,
    pub release_number: u16,
    has_release_suffix: bool,
}

impl EngineVersion {
    pub fn new(major: u16, minor: u16, build: u16, release: ReleaseType, number: u16) -> Self {
        EngineVersion {
            major,
            minor,
            build,
            release,
            release_number: number,
            has_release_suffix: true,
        }
    }

    /// `major.minor.build` with no release suffix; final 0.
    pub fn bare(major: u16, minor: u16, build: u16) -> Self {
        EngineVersion {
            has_release_suffix: false,
            ..EngineVersion::new(major, minor, build, ReleaseType::Final, 0)
        }
    }

    fn key(&self) -> (u16, u16, u16, ReleaseType, u16) {
        (
            self.major,
            self.minor,
            self.build,
            self.release,
            self.release_number,
        )
    }
}

impl PartialEq for EngineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EngineVersion {}

impl Hash for EngineVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

fn number(component: &'static str, text: &str) -> Result<u16, VersionError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::NotANumber {
            component,
            text: text.to_owned(),
        });
    }
    text.parse().map_err(|_| VersionError::NotANumber {
        component,
        text: text.to_owned(),
    })
}

impl FromStr for EngineVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::ComponentCount(parts.len()));
        }
        let major = number("major", parts[0])?;
        let minor = number("minor", parts[1])?;

        let tag = parts[2];
        let split = tag
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tag.len());
        let build = number("build", &tag[..split])?;
        let rest = &tag[split..];
        let mut chars = rest.chars();
        match chars.next() {
            None => Ok(EngineVersion::bare(major, minor, build)),
            Some(c) => {
                let release =
                    ReleaseType::from_letter(c).ok_or(VersionError::UnknownReleaseType(c))?;
                let release_number = number("release", chars.as_str())?;
                Ok(EngineVersion::new(major, minor, build, release, release_number))
            }
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if self.has_release_suffix {
            write!(f, "{}{}", self.release.letter(), self.release_number)?;
        }
        Ok(())
    }
}

impl Serialize for EngineVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
