//! `zpool(8)` half of [`ZfsOpen3`](../zfs/struct.ZfsOpen3.html).
use crate::{parsers::{Rule, ZfsParser},
            zfs::{open3::parse_properties, Error, Result, ZfsOpen3},
            zpool::{PoolProperty, ZpoolEngine}};
use pest::Parser;
use std::collections::HashMap;

impl ZpoolEngine for ZfsOpen3 {
    fn list_pools(&self) -> Result<Vec<String>> {
        let mut z = self.zpool();
        z.args(&["list", "-H", "-o", "name"]);
        let stdout = self.run(&mut z)?;
        let pairs = ZfsParser::parse(Rule::datasets, &stdout)
            .map_err(|_| Error::NativeCallFailed(stdout.trim_end().to_string()))?;
        Ok(pairs
            .flat_map(|pair| pair.into_inner())
            .filter(|pair| pair.as_rule() == Rule::dataset_name)
            .map(|pair| pair.as_str().to_string())
            .collect())
    }

    fn read_pool_properties(
        &self,
        name: &str,
        keys: &[PoolProperty],
    ) -> Result<HashMap<PoolProperty, String>> {
        let mut z = self.zpool();
        z.args(&["get", "-Hp", "-o", "property,value", "all", name]);
        let stdout = self.run(&mut z)?;
        let properties = parse_properties(&stdout)?
            .into_iter()
            .filter_map(|(key, value)| key.parse::<PoolProperty>().ok().map(|key| (key, value)))
            .filter(|(key, _)| keys.is_empty() || keys.contains(key))
            .collect();
        Ok(properties)
    }
}
