use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields requested for every build in the job's build list.
pub const BUILD_TREE: &[&str] = &[
    "number",
    "fullDisplayName",
    "timestamp",
    "building",
    "result",
    "duration",
    "url",
];

/// One build of a job, as returned by the build list endpoint. Fields that are not modelled
/// explicitly end up in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(skip)]
    pub job: String,
    pub number: u64,
    #[serde(rename = "fullDisplayName", default)]
    pub full_display_name: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub building: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Build {
    /// String form of a named field, used for matching builds against patterns.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "number" => Some(self.number.to_string()),
            "fullDisplayName" => self.full_display_name.clone(),
            "timestamp" => self.timestamp.map(|t| t.to_rfc3339()),
            "building" => Some(self.building.to_string()),
            _ => match self.extra.get(name)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    pub fn result(&self) -> Option<&str> {
        self.extra.get("result").and_then(Value::as_str)
    }
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job: {} build: {}", self.job, self.number)
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildsResponse {
    #[serde(default)]
    pub builds: Vec<Build>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhoAmI {
    pub name: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub anonymous: bool,
}

/// Parse the body of the build list endpoint and tag each build with its job.
pub fn parse_builds(job: &str, body: &str) -> Result<Vec<Build>, serde_json::Error> {
    let response: BuildsResponse = serde_json::from_str(body)?;
    Ok(response
        .builds
        .into_iter()
        .map(|build| Build {
            job: job.to_string(),
            ..build
        })
        .collect())
}
