use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parsers/zfs.pest"] // relative to src
pub struct ZfsParser;

#[cfg(test)]
mod test {
    use super::{Rule, ZfsParser};
    use pest::{consumes_to, parses_to, Parser};

    #[test]
    fn test_parse_filesystem_name_root() {
        let line = "z";

        parses_to! {
            parser: ZfsParser,
            input: line,
            rule: Rule::dataset_name,
            tokens: [
                dataset_name(0,1)
            ]
        }

        let pairs = ZfsParser::parse(Rule::dataset_name, line).unwrap();
        assert_eq!("z", pairs.as_str());
    }

    #[test]
    fn test_parse_filesystem_name_nested_snapshot() {
        let line = "z/foo/bar@backup-20190707";

        parses_to! {
            parser: ZfsParser,
            input: line,
            rule: Rule::dataset_name,
            tokens: [
                dataset_name(0,25)
            ]
        }
    }

    #[test]
    fn test_parse_dataset_not_found() {
        let line = "cannot open 's/asd/asd': dataset does not exist";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let dataset_error_pair = pairs.next().unwrap().into_inner().next().unwrap();
        assert_eq!(Rule::dataset_error, dataset_error_pair.as_rule());

        let mut inner = dataset_error_pair.into_inner();
        let action = inner.next().unwrap();
        assert_eq!(Rule::action, action.as_rule());
        assert_eq!("open", action.as_str());
        let name = inner.next().unwrap();
        assert_eq!("s/asd/asd", name.as_str());
        assert_eq!(Rule::dataset_not_found, inner.next().unwrap().as_rule());
    }

    #[test]
    fn test_parse_multi_word_action() {
        let line = "cannot create snapshot 'tank/x@s1': dataset already exists\nno snapshots were created\n";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let mut inner = pairs.next().unwrap().into_inner().next().unwrap().into_inner();
        assert_eq!("create snapshot", inner.next().unwrap().as_str());
        assert_eq!("tank/x@s1", inner.next().unwrap().as_str());
        assert_eq!(Rule::already_exists, inner.next().unwrap().as_rule());
    }

    #[test]
    fn test_parse_has_children() {
        let line = "cannot destroy 'tank/x': filesystem has children\nuse '-r' to destroy the following datasets:\ntank/x/y\n";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let reason = pairs.next().unwrap().into_inner().next().unwrap().into_inner().nth(2).unwrap();
        assert_eq!(Rule::has_children, reason.as_rule());
    }

    #[test]
    fn test_parse_invalid_name_keeps_detail() {
        let line = "cannot create 'tank/a!b': invalid character '!' in name";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let reason = pairs.next().unwrap().into_inner().next().unwrap().into_inner().nth(2).unwrap();
        assert_eq!(Rule::invalid_name, reason.as_rule());
        assert_eq!("invalid character '!' in name", reason.as_str());
    }

    #[test]
    fn test_parse_unknown_reason() {
        let line = "cannot mount 'tank/x': Insufficient privileges";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let reason = pairs.next().unwrap().into_inner().next().unwrap().into_inner().nth(2).unwrap();
        assert_eq!(Rule::unknown_reason, reason.as_rule());
        assert_eq!("Insufficient privileges", reason.as_str());
    }

    #[test]
    fn test_parse_snapshots_not_found() {
        let line = "could not find any snapshots to destroy; check snapshot names.\n";
        let mut pairs = ZfsParser::parse(Rule::error, line).unwrap();
        let pair = pairs.next().unwrap().into_inner().next().unwrap();
        assert_eq!(Rule::snapshots_not_found, pair.as_rule());
    }

    #[test]
    fn test_parse_garbage_is_not_an_error_line() {
        assert!(ZfsParser::parse(Rule::error, "internal error: Bad file descriptor").is_err());
    }

    #[test]
    fn test_parse_datasets() {
        let lines = "s\ns/s/s/s\ns/d@test\n";
        let expected = ["s", "s/s/s/s", "s/d@test"];

        let mut pairs = ZfsParser::parse(Rule::datasets, lines).unwrap();
        let datasets_pairs: Vec<_> = pairs
            .next()
            .unwrap()
            .into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .collect();
        assert_eq!(3, datasets_pairs.len());

        for (idx, pair) in datasets_pairs.into_iter().enumerate() {
            assert_eq!(Rule::dataset_name, pair.as_rule());
            assert_eq!(expected[idx], pair.as_str());
        }
    }

    #[test]
    fn test_parse_datasets_with_type() {
        let lines = "filesystem\tz/foo\nvolume\tz/foo/disk0\nsnapshot\tz/foo@now\n";
        let mut pairs = ZfsParser::parse(Rule::datasets_with_type, lines).unwrap();
        let rows: Vec<(String, String)> = pairs
            .next()
            .unwrap()
            .into_inner()
            .filter(|pair| pair.as_rule() == Rule::dataset_with_type)
            .map(|pair| {
                let mut inner = pair.into_inner();
                let kind = inner.next().unwrap().as_str().to_string();
                let name = inner.next().unwrap().as_str().to_string();
                (kind, name)
            })
            .collect();
        assert_eq!(
            vec![
                ("filesystem".to_string(), "z/foo".to_string()),
                ("volume".to_string(), "z/foo/disk0".to_string()),
                ("snapshot".to_string(), "z/foo@now".to_string()),
            ],
            rows
        );
    }

    #[test]
    fn test_parse_prop_lines_keeps_empty_values() {
        let lines = "used\t24576\norigin\t-\ncomment\t\n";
        let mut pairs = ZfsParser::parse(Rule::prop_lines, lines).unwrap();
        let values: Vec<_> = pairs
            .next()
            .unwrap()
            .into_inner()
            .filter(|pair| pair.as_rule() == Rule::prop_line)
            .map(|pair| {
                let mut inner = pair.into_inner();
                (inner.next().unwrap().as_str(), inner.next().unwrap().as_str())
            })
            .collect();
        assert_eq!(vec![("used", "24576"), ("origin", "-"), ("comment", "")], values);
    }

    #[test]
    fn test_parse_mount_lines() {
        let lines = "rpool\t/rpool\tyes\nrpool/swap\t-\t-\n";
        let mut pairs = ZfsParser::parse(Rule::mount_lines, lines).unwrap();
        let count = pairs
            .next()
            .unwrap()
            .into_inner()
            .filter(|pair| pair.as_rule() == Rule::mount_line)
            .count();
        assert_eq!(2, count);
    }
}
