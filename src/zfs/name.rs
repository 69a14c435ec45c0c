use crate::zfs::{ValidationError, ValidationResult, DATASET_NAME_MAX_DEPTH,
                 DATASET_NAME_MAX_LENGTH};
use regex::Regex;
use std::{convert::TryFrom, fmt, str::FromStr};

lazy_static! {
    static ref FORBIDDEN_CHARACTER: Regex =
        Regex::new(r"[^A-Za-z0-9_.: \-]").expect("static regex must compile");
}

/// Name of a filesystem, volume or snapshot: `pool/parent/child` or `pool/parent@snapshot`.
///
/// Always valid once constructed. The first component is the pool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName(String);

impl DatasetName {
    pub fn new<S: Into<String>>(name: S) -> ValidationResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(DatasetName(name))
    }

    /// Names reported by the native layer. They are valid by construction.
    pub(crate) fn from_native<S: Into<String>>(name: S) -> Self { DatasetName(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Name of the pool this dataset lives in.
    pub fn pool(&self) -> &str {
        let end = self.0.find(|c| c == '/' || c == '@').unwrap_or_else(|| self.0.len());
        &self.0[..end]
    }

    /// Everything before `@`. For anything but a snapshot that's the whole name.
    pub fn dataset(&self) -> &str {
        match self.0.find('@') {
            Some(at) => &self.0[..at],
            None => &self.0,
        }
    }

    pub fn is_snapshot(&self) -> bool { self.0.contains('@') }

    /// Snapshot suffix, if this is a snapshot.
    pub fn snapshot(&self) -> Option<&str> { self.0.find('@').map(|at| &self.0[at + 1..]) }

    /// Top-level dataset of a pool.
    pub fn is_root(&self) -> bool { !self.0.contains('/') && !self.is_snapshot() }

    /// Number of components, pool included.
    pub fn depth(&self) -> usize { self.dataset().split('/').count() }

    /// Snapshots belong to their dataset, datasets to the one above them. Pool roots have no
    /// parent.
    pub fn parent(&self) -> Option<DatasetName> {
        if self.is_snapshot() {
            return Some(DatasetName(self.dataset().to_string()));
        }
        self.0.rfind('/').map(|slash| DatasetName(self.0[..slash].to_string()))
    }

    /// Direct descendant called `component`.
    pub fn child(&self, component: &str) -> ValidationResult<DatasetName> {
        if self.is_snapshot() {
            return Err(ValidationError::MisplacedDelimiter(format!("{}/{}", self, component)));
        }
        DatasetName::new(format!("{}/{}", self, component))
    }

    /// `self@suffix`.
    pub fn with_snapshot(&self, suffix: &str) -> ValidationResult<DatasetName> {
        if self.is_snapshot() {
            return Err(ValidationError::MultipleDelimiters(format!("{}@{}", self, suffix)));
        }
        DatasetName::new(format!("{}@{}", self, suffix))
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for DatasetName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { DatasetName::new(s) }
}

impl TryFrom<&str> for DatasetName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> { DatasetName::new(value) }
}

impl TryFrom<String> for DatasetName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> { DatasetName::new(value) }
}

impl From<DatasetName> for String {
    fn from(name: DatasetName) -> String { name.0 }
}

pub(crate) fn validate_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if name.starts_with('/') {
        return Err(ValidationError::LeadingSlash(name.to_owned()));
    }
    if name.ends_with('/') {
        return Err(ValidationError::TrailingSlash(name.to_owned()));
    }
    if name.len() > DATASET_NAME_MAX_LENGTH {
        return Err(ValidationError::NameTooLong(name.to_owned()));
    }
    if let Some(found) = FORBIDDEN_CHARACTER.find(&name.replacen('@', "", 1).replace('/', "")) {
        let c = found.as_str().chars().next().unwrap_or('@');
        return Err(ValidationError::InvalidCharacter(name.to_owned(), c));
    }

    let (dataset, snapshot) = match name.find('@') {
        Some(at) => (&name[..at], Some(&name[at + 1..])),
        None => (name, None),
    };
    if let Some(snapshot) = snapshot {
        if snapshot.contains('/') {
            return Err(ValidationError::MisplacedDelimiter(name.to_owned()));
        }
        if snapshot.is_empty() {
            return Err(ValidationError::EmptyComponent(name.to_owned()));
        }
    }

    let components: Vec<&str> = dataset.split('/').collect();
    if components.iter().any(|c| c.is_empty() || *c == "." || *c == "..") {
        return Err(ValidationError::EmptyComponent(name.to_owned()));
    }
    if components.len() > DATASET_NAME_MAX_DEPTH {
        return Err(ValidationError::TooDeep(name.to_owned()));
    }
    let starts_with_letter =
        components[0].chars().next().map_or(false, |c| c.is_ascii_alphabetic());
    if !starts_with_letter {
        return Err(ValidationError::InvalidPoolName(name.to_owned()));
    }
    Ok(())
}
