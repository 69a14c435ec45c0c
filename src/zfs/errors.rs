use crate::{parsers::{Rule, ZfsParser},
            zfs::DatasetKind};
use pest::Parser;
use std::io;

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    /// Reasons a string is not a usable dataset name.
    pub enum ValidationError {
        Empty {
            display("dataset name is empty")
        }
        LeadingSlash(name: String) {
            display("leading slash in name: {}", name)
        }
        TrailingSlash(name: String) {
            display("trailing slash in name: {}", name)
        }
        EmptyComponent(name: String) {
            display("empty component in name: {}", name)
        }
        InvalidCharacter(name: String, c: char) {
            display("invalid character '{}' in name: {}", c, name)
        }
        MultipleDelimiters(name: String) {
            display("multiple '@' delimiters in name: {}", name)
        }
        MisplacedDelimiter(name: String) {
            display("'@' is only allowed in the last component: {}", name)
        }
        InvalidPoolName(name: String) {
            display("pool name must begin with a letter: {}", name)
        }
        NameTooLong(name: String) {
            display("name is too long: {}", name)
        }
        TooDeep(name: String) {
            display("dataset nesting is too deep: {}", name)
        }
        /// The native layer refused the name. Carries its explanation.
        Rejected(reason: String) {
            display("{}", reason)
        }
    }
}

pub type ValidationResult<T = ()> = std::result::Result<T, ValidationError>;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// `zfs` or `zpool` not found in the PATH. Open3 specific error.
        CmdNotFound {
            display("zfs/zpool command not found")
        }
        LzcInitializationFailed(err: std::io::Error) {
            cause(err)
            display("failed to initialize libzfs_core: {}", err)
        }
        InvalidInput {
            display("invalid input")
        }
        InvalidProperty(name: String) {
            display("invalid property: {}", name)
        }
        Io(err: std::io::Error) {
            cause(err)
            display("I/O error: {}", err)
        }
        NotFound(dataset: String) {
            display("dataset does not exist: {}", dataset)
        }
        AlreadyExists(dataset: String) {
            display("dataset already exists: {}", dataset)
        }
        TypeMismatch(expected: DatasetKind, found: DatasetKind) {
            display("expected {}, found {}", expected, found)
        }
        InvalidName(err: ValidationError) {
            cause(err)
            from()
            display("invalid dataset name: {}", err)
        }
        DependencyExists(dataset: String) {
            display("dataset has dependents: {}", dataset)
        }
        PermissionDenied(dataset: String) {
            display("permission denied: {}", dataset)
        }
        /// Mount/share state already is what was asked for.
        Unchanged(dataset: String) {
            display("dataset already in requested state: {}", dataset)
        }
        SessionClosed {
            display("session has been disposed")
        }
        NativeCallFailed(message: String) {
            display("native call failed: {}", message)
        }
        Unimplemented {
            display("operation is not supported by this engine")
        }
    }
}

impl From<io::Error> for Error {
    #[allow(clippy::wildcard_enum_match_arm)]
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::NotFound => Error::CmdNotFound,
            io::ErrorKind::InvalidInput => Error::InvalidInput,
            _ => Error::Io(err),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CmdNotFound => ErrorKind::CmdNotFound,
            Error::LzcInitializationFailed(_) => ErrorKind::LzcInitializationFailed,
            Error::InvalidInput => ErrorKind::InvalidInput,
            Error::InvalidProperty(_) => ErrorKind::InvalidProperty,
            Error::Io(_) => ErrorKind::Io,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::TypeMismatch(..) => ErrorKind::TypeMismatch,
            Error::InvalidName(_) => ErrorKind::InvalidName,
            Error::DependencyExists(_) => ErrorKind::DependencyExists,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::Unchanged(_) => ErrorKind::Unchanged,
            Error::SessionClosed => ErrorKind::SessionClosed,
            Error::NativeCallFailed(_) => ErrorKind::NativeCallFailed,
            Error::Unimplemented => ErrorKind::Unimplemented,
        }
    }

    fn native_call_failed(stderr: &str) -> Self { Error::NativeCallFailed(stderr.trim_end().into()) }

    /// Classify an errno returned by the native library. `dataset` is what the call was about.
    pub fn from_errno(errno: i32, dataset: &str) -> Self {
        match errno {
            libc::ENOENT => Error::NotFound(dataset.into()),
            libc::EEXIST => Error::AlreadyExists(dataset.into()),
            libc::EPERM | libc::EACCES => Error::PermissionDenied(dataset.into()),
            libc::EBUSY | libc::ENOTEMPTY => Error::DependencyExists(dataset.into()),
            libc::EINVAL => Error::InvalidInput,
            _ => {
                let io_error = io::Error::from_raw_os_error(errno);
                Error::NativeCallFailed(format!("{}: {}", dataset, io_error))
            },
        }
    }

    /// Classify stderr of `zfs(8)`/`zpool(8)`. Only the first line is looked at.
    pub(crate) fn from_stderr(stderr_raw: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr_raw);
        let stderr: &str = &stderr;
        let error_pair = match ZfsParser::parse(Rule::error, stderr) {
            Ok(mut pairs) => match pairs.next().and_then(|pair| pair.into_inner().next()) {
                Some(pair) => pair,
                None => return Self::native_call_failed(stderr),
            },
            Err(_) => return Self::native_call_failed(stderr),
        };

        match error_pair.as_rule() {
            // Pest: error > snapshots_not_found
            Rule::snapshots_not_found => Error::NotFound(String::new()),
            // Pest: error > dataset_error > (action, dataset_name, reason)
            Rule::dataset_error => {
                let mut inner = error_pair.into_inner().skip(1);
                let dataset = match inner.next() {
                    Some(pair) => pair.as_str().to_string(),
                    None => return Self::native_call_failed(stderr),
                };
                let reason = match inner.next() {
                    Some(pair) => pair,
                    None => return Self::native_call_failed(stderr),
                };
                match reason.as_rule() {
                    Rule::dataset_not_found | Rule::parent_missing => Error::NotFound(dataset),
                    Rule::already_exists => Error::AlreadyExists(dataset),
                    Rule::has_children => Error::DependencyExists(dataset),
                    Rule::permission_denied => Error::PermissionDenied(dataset),
                    Rule::invalid_name => {
                        Error::InvalidName(ValidationError::Rejected(reason.as_str().into()))
                    },
                    Rule::already_mounted
                    | Rule::not_mounted
                    | Rule::already_shared
                    | Rule::not_shared => Error::Unchanged(dataset),
                    _ => Self::native_call_failed(stderr),
                }
            },
            _ => Self::native_call_failed(stderr),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind {
    CmdNotFound,
    LzcInitializationFailed,
    InvalidInput,
    InvalidProperty,
    Io,
    NotFound,
    AlreadyExists,
    TypeMismatch,
    InvalidName,
    DependencyExists,
    PermissionDenied,
    Unchanged,
    SessionClosed,
    NativeCallFailed,
    Unimplemented,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool { self.kind() == other.kind() }
}
