//! Open3 implementation of [`ZfsEngine`](../trait.ZfsEngine.html).
//!
//! Easy way - [`ZfsOpen3::new()`](struct.ZfsOpen3.html#method.new). It will look for `ZFS_CMD`
//! and `ZPOOL_CMD` in current environment and fall back to `zfs` and `zpool` in `PATH`.
//!
//! ```rust,no_run
//! use zfs_session::zfs::{DatasetName, ZfsEngine, ZfsOpen3};
//!
//! let engine = ZfsOpen3::new().with_cmd("/sbin/zfs");
//! let name = DatasetName::new("tank/usr").unwrap();
//! assert!(engine.exists(&name).unwrap());
//! ```
//!
//! It's called open 3 because it opens stdin, stdout, stder.
use crate::{parsers::{Rule, ZfsParser},
            zfs::{Acl, AclEntry, AllowScope, CreateDatasetRequest, DatasetKind, DatasetName,
                  Error, Principal, Property, PropertyKey, Result, UserPropertyKey, ZfsEngine,
                  ZfsProperty},
            GlobalLogger};
use pest::Parser;
use slog::Logger;
use std::{collections::{BTreeMap, HashMap},
          ffi::OsString,
          fs, io,
          path::{Path, PathBuf},
          process::Command};

/// Where `zfs share` records what it shared: illumos/FreeBSD sharetab, OpenZFS on Linux exports.
pub static DEFAULT_SHARE_TABLES: &str =
    "/etc/dfs/sharetab:/etc/exports.d/zfs.exports:/etc/zfs/exports";

pub struct ZfsOpen3 {
    cmd_name:       OsString,
    zpool_cmd_name: OsString,
    share_tables:   Vec<PathBuf>,
    logger:         Logger,
}

impl ZfsOpen3 {
    /// Engine configured from `ZFS_CMD`, `ZPOOL_CMD` and `ZFS_SHARE_TABLES`.
    pub fn new() -> Self {
        let logger = GlobalLogger::get().new(o!("zfs_module" => "zfs", "zfs_impl" => "open3"));
        let cmd_name = std::env::var_os("ZFS_CMD").unwrap_or_else(|| "zfs".into());
        let zpool_cmd_name = std::env::var_os("ZPOOL_CMD").unwrap_or_else(|| "zpool".into());
        let share_tables = match std::env::var_os("ZFS_SHARE_TABLES") {
            Some(val) => std::env::split_paths(&val).collect(),
            None => std::env::split_paths(DEFAULT_SHARE_TABLES).collect(),
        };

        ZfsOpen3 { cmd_name, zpool_cmd_name, share_tables, logger }
    }

    /// Use supplied path as `zfs` command.
    pub fn with_cmd<I: Into<OsString>>(mut self, cmd_name: I) -> Self {
        self.cmd_name = cmd_name.into();
        self
    }

    /// Use supplied path as `zpool` command.
    pub fn with_zpool_cmd<I: Into<OsString>>(mut self, cmd_name: I) -> Self {
        self.zpool_cmd_name = cmd_name.into();
        self
    }

    /// Files consulted by `is_shared`. Missing files are skipped.
    pub fn with_share_tables<I, P>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.share_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Derive this engine's logger from `logger` instead of the global one.
    pub fn with_logger(mut self, logger: &Logger) -> Self {
        self.logger = logger.new(o!("zfs_module" => "zfs", "zfs_impl" => "open3"));
        self
    }

    pub fn logger(&self) -> &Logger { &self.logger }

    pub fn share_tables(&self) -> &[PathBuf] { &self.share_tables }

    fn zfs(&self) -> Command { Command::new(&self.cmd_name) }

    pub(crate) fn zpool(&self) -> Command { Command::new(&self.zpool_cmd_name) }

    /// Run to completion. Stdout on success, classified stderr otherwise.
    pub(crate) fn run(&self, z: &mut Command) -> Result<String> {
        debug!(self.logger, "executing"; "cmd" => format_args!("{:?}", z));
        let out = z.output()?;
        if out.status.success() {
            Ok(String::from_utf8_lossy(&out.stdout).into_owned())
        } else {
            let err = Error::from_stderr(&out.stderr);
            debug!(self.logger, "command failed"; "cmd" => format_args!("{:?}", z), "error" => %err);
            Err(err)
        }
    }

    fn get_value(&self, name: &DatasetName, property: &str) -> Result<String> {
        let mut z = self.zfs();
        z.args(&["get", "-H", "-o", "value", property]);
        z.arg(name.as_str());
        let stdout = self.run(&mut z)?;
        Ok(stdout.trim_end_matches('\n').to_string())
    }

    fn delegate(&self, verb: &str, name: &DatasetName, acl: &Acl) -> Result<()> {
        for entry in acl.entries() {
            let mut z = self.zfs();
            z.args(delegation_args(verb, entry, acl.scope()));
            z.arg(name.as_str());
            self.run(&mut z)?;
        }
        Ok(())
    }
}

impl Default for ZfsOpen3 {
    fn default() -> Self { ZfsOpen3::new() }
}

impl ZfsEngine for ZfsOpen3 {
    fn kind(&self, name: &DatasetName) -> Result<DatasetKind> {
        let mut z = self.zfs();
        z.args(&["list", "-H", "-o", "type", "-t", "all"]);
        z.arg(name.as_str());
        let stdout = self.run(&mut z)?;
        let kind = stdout.trim();
        kind.parse().map_err(|_| Error::NativeCallFailed(format!("unknown dataset type: {}", kind)))
    }

    fn create(&self, request: &CreateDatasetRequest) -> Result<()> {
        let mut z = self.zfs();
        z.arg("create");
        // left unmounted, mounting is up to the caller
        if *request.kind() == DatasetKind::Filesystem {
            z.arg("-u");
        }
        if let Some(size) = request.volume_size() {
            z.arg("-V").arg(size.to_string());
        }
        if let Some(block_size) = request.volume_block_size() {
            z.arg("-b").arg(block_size.to_string());
        }
        for property in request.properties()? {
            z.arg("-o").arg(property.to_pair());
        }
        z.arg(request.name().as_str());
        self.run(&mut z).map(|_| ())
    }

    fn snapshot(
        &self,
        name: &DatasetName,
        user_properties: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        let mut z = self.zfs();
        z.arg("snapshot");
        if let Some(user_properties) = user_properties {
            for (key, value) in user_properties {
                z.arg("-o").arg(format!("{}={}", key, value));
            }
        }
        z.arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn destroy(&self, name: &DatasetName, recursive: bool) -> Result<()> {
        let mut z = self.zfs();
        z.arg("destroy");
        if recursive {
            z.arg("-r");
        }
        z.arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    /// One `zfs destroy dataset@a,b,c` per dataset.
    fn destroy_snapshots(&self, snapshots: &[DatasetName]) -> Result<()> {
        let mut by_dataset: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for snapshot in snapshots {
            let suffix = snapshot.snapshot().ok_or(Error::InvalidInput)?;
            by_dataset.entry(snapshot.dataset()).or_default().push(suffix);
        }
        for (dataset, suffixes) in by_dataset {
            let mut z = self.zfs();
            z.arg("destroy");
            z.arg(format!("{}@{}", dataset, suffixes.join(",")));
            self.run(&mut z)?;
        }
        Ok(())
    }

    fn rename(&self, from: &DatasetName, to: &DatasetName) -> Result<()> {
        let mut z = self.zfs();
        z.arg("rename").arg(from.as_str()).arg(to.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn list_roots(&self) -> Result<Vec<DatasetName>> {
        let mut z = self.zfs();
        z.args(&["list", "-H", "-o", "name", "-d", "0"]);
        parse_datasets(&self.run(&mut z)?)
    }

    fn list_children(&self, name: &DatasetName) -> Result<Vec<(DatasetKind, DatasetName)>> {
        let mut z = self.zfs();
        z.args(&["list", "-H", "-o", "type,name", "-d", "1", "-t", "filesystem,volume"]);
        z.arg(name.as_str());
        let listing = parse_datasets_with_type(&self.run(&mut z)?)?;
        Ok(listing.into_iter().filter(|(_, child)| child != name).collect())
    }

    fn list_snapshots(&self, name: &DatasetName) -> Result<Vec<DatasetName>> {
        let mut z = self.zfs();
        z.args(&["list", "-H", "-o", "name", "-d", "1", "-t", "snapshot"]);
        z.arg(name.as_str());
        parse_datasets(&self.run(&mut z)?)
    }

    fn list_mounts(&self) -> Result<Vec<(DatasetName, PathBuf)>> {
        let mut z = self.zfs();
        z.args(&["list", "-H", "-o", "name,mountpoint,mounted", "-t", "filesystem"]);
        parse_mounts(&self.run(&mut z)?)
    }

    fn read_properties(
        &self,
        name: &DatasetName,
        keys: &[ZfsProperty],
    ) -> Result<HashMap<ZfsProperty, String>> {
        let mut z = self.zfs();
        z.args(&["get", "-Hp", "-o", "property,value", "all"]);
        z.arg(name.as_str());
        let stdout = self.run(&mut z)?;
        let properties = parse_properties(&stdout)?
            .into_iter()
            .filter_map(|(key, value)| key.parse::<ZfsProperty>().ok().map(|key| (key, value)))
            .filter(|(key, _)| keys.is_empty() || keys.contains(key))
            .collect();
        Ok(properties)
    }

    fn read_user_property(
        &self,
        name: &DatasetName,
        key: &UserPropertyKey,
    ) -> Result<Option<String>> {
        let mut z = self.zfs();
        z.args(&["get", "-H", "-o", "value,source"]);
        z.arg(key.as_str()).arg(name.as_str());
        parse_user_property(&self.run(&mut z)?)
    }

    fn set_property(&self, name: &DatasetName, property: &Property) -> Result<()> {
        let mut z = self.zfs();
        z.arg("set").arg(property.to_pair()).arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn inherit_property(&self, name: &DatasetName, key: &PropertyKey) -> Result<()> {
        let mut z = self.zfs();
        z.arg("inherit").arg(key.as_str()).arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn mount(&self, name: &DatasetName) -> Result<()> {
        let mut z = self.zfs();
        z.arg("mount").arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn unmount(&self, name: &DatasetName) -> Result<()> {
        let mut z = self.zfs();
        z.arg("unmount").arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn is_mounted(&self, name: &DatasetName) -> Result<bool> {
        Ok(self.get_value(name, "mounted")? == "yes")
    }

    fn share(&self, name: &DatasetName) -> Result<()> {
        let mut z = self.zfs();
        z.arg("share").arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    fn unshare(&self, name: &DatasetName) -> Result<()> {
        let mut z = self.zfs();
        z.arg("unshare").arg(name.as_str());
        self.run(&mut z).map(|_| ())
    }

    /// Looks the mount point up in the share tables.
    fn is_shared(&self, name: &DatasetName) -> Result<bool> {
        let mount_point = self.get_value(name, "mountpoint")?;
        if !mount_point.starts_with('/') {
            return Ok(false);
        }
        for table in &self.share_tables {
            if share_table_contains(table, Path::new(&mount_point))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn allow(&self, name: &DatasetName, acl: &Acl) -> Result<()> {
        self.delegate("allow", name, acl)
    }

    fn unallow(&self, name: &DatasetName, acl: &Acl) -> Result<()> {
        self.delegate("unallow", name, acl)
    }
}

/// `zfs allow|unallow [-l] [-d] (-e | -u user | -g group) perm,...`, dataset name not included.
fn delegation_args(verb: &str, entry: &AclEntry, scope: AllowScope) -> Vec<String> {
    let mut args = vec![verb.to_string()];
    if scope.contains(AllowScope::LOCAL) {
        args.push("-l".into());
    }
    if scope.contains(AllowScope::DESCENDENT) {
        args.push("-d".into());
    }
    match entry.principal() {
        Principal::Everyone => args.push("-e".into()),
        Principal::User(user) => {
            args.push("-u".into());
            args.push(user.clone());
        },
        Principal::Group(group) => {
            args.push("-g".into());
            args.push(group.clone());
        },
    }
    args.push(entry.permission_list());
    args
}

fn unexpected_output(stdout: &str) -> Error {
    Error::NativeCallFailed(format!("unexpected output: {}", stdout.trim_end()))
}

/// `-o name` listing.
fn parse_datasets(stdout: &str) -> Result<Vec<DatasetName>> {
    let pairs = ZfsParser::parse(Rule::datasets, stdout).map_err(|_| unexpected_output(stdout))?;
    Ok(pairs
        .flat_map(|pair| pair.into_inner())
        .filter(|pair| pair.as_rule() == Rule::dataset_name)
        .map(|pair| DatasetName::from_native(pair.as_str()))
        .collect())
}

/// `-o type,name` listing.
fn parse_datasets_with_type(stdout: &str) -> Result<Vec<(DatasetKind, DatasetName)>> {
    let pairs = ZfsParser::parse(Rule::datasets_with_type, stdout)
        .map_err(|_| unexpected_output(stdout))?;
    let mut listing = Vec::new();
    //
    // - datasets_with_type
    //   - dataset_with_type
    //     - dataset_type: "volume"
    //     - dataset_name: "z/iohyve/rancher/disk0"
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        if pair.as_rule() != Rule::dataset_with_type {
            continue;
        }
        let mut inner = pair.into_inner();
        let (kind, name) = match (inner.next(), inner.next()) {
            (Some(kind), Some(name)) => (kind, name),
            _ => return Err(unexpected_output(stdout)),
        };
        let kind = kind.as_str().parse().map_err(|_| unexpected_output(stdout))?;
        listing.push((kind, DatasetName::from_native(name.as_str())));
    }
    Ok(listing)
}

/// `-o property,value` output. Values are kept verbatim, `-` and empty ones included.
pub(crate) fn parse_properties(stdout: &str) -> Result<Vec<(String, String)>> {
    let pairs = ZfsParser::parse(Rule::prop_lines, stdout).map_err(|_| unexpected_output(stdout))?;
    let mut properties = Vec::new();
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        if pair.as_rule() != Rule::prop_line {
            continue;
        }
        let mut inner = pair.into_inner();
        match (inner.next(), inner.next()) {
            (Some(key), Some(value)) => {
                properties.push((key.as_str().to_string(), value.as_str().to_string()))
            },
            _ => return Err(unexpected_output(stdout)),
        }
    }
    Ok(properties)
}

/// `-o name,mountpoint,mounted` output. Only what is mounted somewhere in the tree.
fn parse_mounts(stdout: &str) -> Result<Vec<(DatasetName, PathBuf)>> {
    let pairs = ZfsParser::parse(Rule::mount_lines, stdout).map_err(|_| unexpected_output(stdout))?;
    let mut mounts = Vec::new();
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        if pair.as_rule() != Rule::mount_line {
            continue;
        }
        let mut inner = pair.into_inner();
        let (name, mount_point, mounted) = match (inner.next(), inner.next(), inner.next()) {
            (Some(name), Some(mount_point), Some(mounted)) => (name, mount_point, mounted),
            _ => return Err(unexpected_output(stdout)),
        };
        if mounted.as_str() == "yes" && mount_point.as_str().starts_with('/') {
            mounts.push((DatasetName::from_native(name.as_str()), PathBuf::from(mount_point.as_str())));
        }
    }
    Ok(mounts)
}

/// `-o value,source` of a single user property. Source `-` means it isn't set anywhere.
fn parse_user_property(stdout: &str) -> Result<Option<String>> {
    let line = stdout.trim_end_matches('\n');
    let mut fields = line.rsplitn(2, '\t');
    match (fields.next(), fields.next()) {
        (Some("-"), Some(_)) => Ok(None),
        (Some(_), Some(value)) => Ok(Some(value.to_string())),
        _ => Err(unexpected_output(stdout)),
    }
}

/// First field of every line is the shared path, optionally quoted.
fn share_table_contains(table: &Path, mount_point: &Path) -> Result<bool> {
    let content = match fs::read_to_string(table) {
        Ok(content) => content,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::Io(e)),
    };
    Ok(content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|path| path.trim_matches('"'))
        .any(|path| Path::new(path) == mount_point))
}

#[cfg(test)]
mod test {
    use super::{delegation_args, parse_datasets, parse_datasets_with_type, parse_mounts,
                parse_properties, parse_user_property, share_table_contains, ZfsOpen3};
    use crate::zfs::{AclBuilder, AllowScope, CreateDatasetRequest, DatasetKind, DatasetName,
                     ErrorKind, Permission, ZfsEngine};
    use std::{io::Write, path::Path};

    fn name(name: &str) -> DatasetName { DatasetName::new(name).unwrap() }

    #[test]
    fn test_parse_datasets() {
        let stdout = "z/usr\nz/usr/home\nz/usr/home@snap\n";
        let names = parse_datasets(stdout).unwrap();
        assert_eq!(3, names.len());
        assert_eq!("z/usr/home@snap", names[2].as_str());

        assert!(parse_datasets("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_datasets_with_type() {
        let stdout = "filesystem\tz/usr\nvolume\tz/usr/disk0\n";
        let listing = parse_datasets_with_type(stdout).unwrap();
        assert_eq!(
            vec![
                (DatasetKind::Filesystem, DatasetName::new("z/usr").unwrap()),
                (DatasetKind::Volume, DatasetName::new("z/usr/disk0").unwrap()),
            ],
            listing
        );

        let err = parse_datasets_with_type("zvol\tz/usr\n").unwrap_err();
        assert_eq!(ErrorKind::NativeCallFailed, err.kind());
    }

    #[test]
    fn test_parse_properties_keeps_values_verbatim() {
        let stdout = "type\tfilesystem\nused\t24576\norigin\t-\ncomment\t\nmountpoint\t/z/my fs\n";
        let properties = parse_properties(stdout).unwrap();
        assert_eq!(5, properties.len());
        assert_eq!(("origin".to_string(), "-".to_string()), properties[2]);
        assert_eq!(("comment".to_string(), String::new()), properties[3]);
        assert_eq!(("mountpoint".to_string(), "/z/my fs".to_string()), properties[4]);
    }

    #[test]
    fn test_parse_mounts() {
        let stdout = "z\t/z\tyes\nz/a\t/z/a\tno\nz/b\tlegacy\tyes\nz/c\t/mnt/c\tyes\n";
        let mounts = parse_mounts(stdout).unwrap();
        assert_eq!(2, mounts.len());
        assert_eq!("z/c", mounts[1].0.as_str());
        assert_eq!(Path::new("/mnt/c"), mounts[1].1);
    }

    #[test]
    fn test_parse_user_property() {
        assert_eq!(None, parse_user_property("-\t-\n").unwrap());
        assert_eq!(Some("42".to_string()), parse_user_property("42\tlocal\n").unwrap());
        assert_eq!(
            Some("42".to_string()),
            parse_user_property("42\tinherited from z/parent\n").unwrap()
        );
        assert_eq!(Some(String::new()), parse_user_property("\tlocal\n").unwrap());
        assert!(parse_user_property("garbage").is_err());
    }

    #[test]
    fn test_delegation_args() {
        let mut builder = AclBuilder::new();
        builder.everyone().with(Permission::Create).with(Permission::Mount);
        builder.user("alice").with(Permission::Snapshot);
        let acl = builder.build();

        assert_eq!(
            vec!["allow", "-e", "create,mount"],
            delegation_args("allow", &acl.entries()[0], acl.scope())
        );
        assert_eq!(
            vec!["unallow", "-l", "-d", "-u", "alice", "snapshot"],
            delegation_args("unallow", &acl.entries()[1], AllowScope::all())
        );
    }

    #[test]
    fn test_share_table_lookup() {
        let mut table = tempfile::NamedTempFile::new().unwrap();
        writeln!(table, "\"/z/shared\" *(sec=sys,rw,no_subtree_check)").unwrap();
        writeln!(table, "/z/other\t-\tnfs\trw\t").unwrap();
        table.flush().unwrap();

        assert!(share_table_contains(table.path(), Path::new("/z/shared")).unwrap());
        assert!(share_table_contains(table.path(), Path::new("/z/other")).unwrap());
        assert!(!share_table_contains(table.path(), Path::new("/z/missing")).unwrap());
        assert!(!share_table_contains(Path::new("/nonexistent/sharetab"), Path::new("/z")).unwrap());
    }

    #[test]
    fn test_share_tables_are_configurable() {
        let engine = ZfsOpen3::new().with_share_tables(vec!["/a", "/b"]);
        assert_eq!(2, engine.share_tables().len());
    }

    /// Stand-in `zfs` that appends its arguments to `zfs.log` and prints `stdout`.
    #[cfg(unix)]
    fn fake_zfs(dir: &Path, stdout: &str) -> ZfsOpen3 {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("zfs");
        let log = dir.join("zfs.log");
        let body = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\ncat <<'OUTPUT'\n{}OUTPUT\n",
            log.display(),
            stdout
        );
        std::fs::write(&script, body).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        ZfsOpen3::new().with_cmd(script)
    }

    #[cfg(unix)]
    fn invocations(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("zfs.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_create_leaves_filesystem_unmounted() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_zfs(dir.path(), "");
        let request = CreateDatasetRequest::new(name("tank/x"), DatasetKind::Filesystem);
        engine.create(&request).unwrap();

        let volume = CreateDatasetRequest::builder()
            .name(name("tank/vol"))
            .kind(DatasetKind::Volume)
            .volume_size(1024 * 1024u64)
            .build()
            .unwrap();
        engine.create(&volume).unwrap();

        assert_eq!(
            vec!["create -u tank/x", "create -V 1048576 tank/vol"],
            invocations(dir.path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_kind_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_zfs(dir.path(), "volume\n");
        assert_eq!(DatasetKind::Volume, engine.kind(&name("tank/vol")).unwrap());
        assert_eq!(vec!["list -H -o type -t all tank/vol"], invocations(dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_destroy_snapshots_grouped_per_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_zfs(dir.path(), "");
        let snapshots = [name("tank/a@s1"), name("tank/b@s1"), name("tank/a@s2")];
        engine.destroy_snapshots(&snapshots).unwrap();

        assert_eq!(
            vec!["destroy tank/a@s1,s2", "destroy tank/b@s1"],
            invocations(dir.path())
        );
        assert_eq!(
            ErrorKind::InvalidInput,
            engine.destroy_snapshots(&[name("tank/a")]).unwrap_err().kind()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_list_children_skips_parent() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_zfs(dir.path(), "filesystem\ttank/x\nfilesystem\ttank/x/a\nvolume\ttank/x/v\n");
        let children = engine.list_children(&name("tank/x")).unwrap();

        assert_eq!(
            vec![
                (DatasetKind::Filesystem, name("tank/x/a")),
                (DatasetKind::Volume, name("tank/x/v")),
            ],
            children
        );
        assert_eq!(
            vec!["list -H -o type,name -d 1 -t filesystem,volume tank/x"],
            invocations(dir.path())
        );
    }

    #[test]
    fn test_missing_command() {
        let engine = ZfsOpen3::new().with_cmd("/nonexistent/bin/zfs");
        let name = DatasetName::new("z/usr").unwrap();
        assert_eq!(ErrorKind::CmdNotFound, engine.exists(&name).unwrap_err().kind());
    }
}
