use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use builddiff::{
    cache::Cache,
    cli::PatternArgs,
    commands::{diff_builds, find_matching_builds, list_build_failures, Grouping},
    diff::KeyDiff,
    error::ConfigurationError,
    jenkins::{parse_builds, Build, BuildLogProvider, ProviderError},
    present::format_diff,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BUILD_1532: &str = "\
Started by timer
ERROR: test_login (tests.test_auth.AuthTest)
ERROR: test_logout (tests.test_auth.AuthTest)
ERROR: test_search (tests.test_search.SearchTest)
Finished: UNSTABLE
";

const BUILD_1533: &str = "\
Started by timer
ERROR: test_logout (tests.test_auth.AuthTest)
ERROR: test_signup (tests.test_auth.AuthTest)
ERROR: test_feed (tests.test_feed.FeedTest)
Finished: UNSTABLE
";

struct FakeJenkins {
    builds: Vec<Build>,
    logs: HashMap<u64, String>,
    fetches: AtomicUsize,
}

impl FakeJenkins {
    fn new() -> Self {
        let builds = parse_builds(
            "selenium",
            r#"{"builds": [
                {"number": 1531, "result": "SUCCESS"},
                {"number": 1532, "result": "UNSTABLE"},
                {"number": 1533, "result": "UNSTABLE"},
                {"number": 1534, "building": true, "result": null}
            ]}"#,
        )
        .unwrap();
        let logs = HashMap::from([
            (1531, "Started by timer\nFinished: SUCCESS\n".to_string()),
            (1532, BUILD_1532.to_string()),
            (1533, BUILD_1533.to_string()),
            (1534, "Started by timer\n".to_string()),
        ]);
        Self {
            builds,
            logs,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BuildLogProvider for FakeJenkins {
    fn server(&self) -> &str {
        "https://ci.example.com"
    }

    async fn builds(&self, _job: &str) -> Result<Vec<Build>, ProviderError> {
        Ok(self.builds.clone())
    }

    async fn fetch_console_text(&self, job: &str, number: u64) -> Result<String, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.logs
            .get(&number)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                job: job.to_string(),
                number,
            })
    }
}

fn unittest_grouping() -> Grouping {
    let args = PatternArgs {
        pattern: Some(r"^ERROR: (?P<test_case>\w+) \((?P<test_file>[\w.]+)\)$".to_string()),
        flags: Some("m".to_string()),
        key_group: Some("test_file".to_string()),
        value_group: Some("test_case".to_string()),
    };
    Grouping::resolve(&args, None).unwrap()
}

fn set(values: &[&str]) -> Option<BTreeSet<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

#[tokio::test]
async fn test_diff_two_builds() {
    let jenkins = FakeJenkins::new();

    let result = diff_builds(&jenkins, None, "selenium", 1532, 1533, &unittest_grouping())
        .await
        .unwrap();

    let only_in_a = result.only_in_a.as_ref().unwrap();
    assert_eq!(
        only_in_a.iter().collect::<Vec<_>>(),
        vec![(
            "tests.test_search.SearchTest",
            &["test_search".to_string()][..]
        )]
    );
    let only_in_b = result.only_in_b.as_ref().unwrap();
    assert_eq!(
        only_in_b.keys().collect::<Vec<_>>(),
        vec!["tests.test_feed.FeedTest"]
    );
    assert_eq!(
        result.per_key_diff,
        Some(BTreeMap::from([(
            "tests.test_auth.AuthTest".to_string(),
            KeyDiff {
                values_only_in_a: set(&["test_login"]),
                values_only_in_b: set(&["test_signup"]),
                values_common: set(&["test_logout"]),
            }
        )]))
    );
    assert!(result.has_differences());

    let output = format_diff(&result, false);
    assert!(output.contains("+ tests.test_search.SearchTest\n+ \ttest_search\n"));
    assert!(output.contains("- tests.test_feed.FeedTest\n- \ttest_feed\n"));
    assert!(output.contains(
        "tests.test_auth.AuthTest\n+ \ttest_login\n- \ttest_signup\n= \ttest_logout\n"
    ));
}

#[tokio::test]
async fn test_diff_build_with_itself() {
    let jenkins = FakeJenkins::new();

    let result = diff_builds(&jenkins, None, "selenium", 1532, 1532, &unittest_grouping())
        .await
        .unwrap();

    assert_eq!(result.only_in_a, None);
    assert_eq!(result.only_in_b, None);
    assert!(!result.has_differences());
}

#[tokio::test]
async fn test_diff_against_green_build() {
    let jenkins = FakeJenkins::new();

    let result = diff_builds(&jenkins, None, "selenium", 1531, 1532, &unittest_grouping())
        .await
        .unwrap();

    assert_eq!(result.only_in_a, None);
    assert_eq!(result.only_in_b.unwrap().len(), 2);
    assert_eq!(result.per_key_diff, None);
}

#[tokio::test]
async fn test_missing_build_is_not_found() {
    let jenkins = FakeJenkins::new();

    let err = diff_builds(&jenkins, None, "selenium", 1532, 9999, &unittest_grouping())
        .await
        .unwrap_err();

    match err.downcast_ref::<ProviderError>() {
        Some(ProviderError::NotFound { job, number }) => {
            assert_eq!(job, "selenium");
            assert_eq!(*number, 9999);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(jenkins.fetches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_bad_pattern_fails_before_fetching() {
    let args = PatternArgs {
        pattern: Some(r"^(?P<abra>\w+)\.py\s(?P<cadabra>\w+)$".to_string()),
        key_group: Some("test_file".to_string()),
        value_group: Some("test_case".to_string()),
        ..Default::default()
    };

    let err = Grouping::resolve(&args, None).unwrap_err();

    assert!(matches!(err, ConfigurationError::GroupMismatch { .. }));
}

#[tokio::test]
async fn test_list_uses_cache_for_finished_builds() {
    let dir = TempDir::new().unwrap();
    let cache = Cache::at(dir.path());
    let jenkins = FakeJenkins::new();
    let grouping = unittest_grouping();

    for _ in 0..2 {
        let (build, grouped) =
            list_build_failures(&jenkins, Some(&cache), "selenium", 1532, &grouping)
                .await
                .unwrap();
        assert_eq!(build.number, 1532);
        assert_eq!(
            grouped.get("tests.test_auth.AuthTest").unwrap(),
            &["test_login".to_string(), "test_logout".to_string()][..]
        );
    }
    assert_eq!(jenkins.fetches.load(Ordering::SeqCst), 1);

    for _ in 0..2 {
        list_build_failures(&jenkins, Some(&cache), "selenium", 1534, &grouping)
            .await
            .unwrap();
    }
    assert_eq!(jenkins.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_find_matching_builds() {
    let jenkins = FakeJenkins::new();

    let builds = find_matching_builds(&jenkins, "selenium", &["result=UNSTABLE".to_string()])
        .await
        .unwrap();

    assert_eq!(
        builds.iter().map(|b| b.number).collect::<Vec<_>>(),
        vec![1532, 1533]
    );
}

#[tokio::test]
async fn test_find_matching_builds_rejects_unknown_field() {
    let jenkins = FakeJenkins::new();

    let err = find_matching_builds(&jenkins, "selenium", &["colour=red".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::UnknownField(_))
    ));
}
