//! SARIF (Static Analysis Results Interchange Format) diagnostics.
//!
//! The [`DiagnosticsEmitter`] accumulates one result per forwarded
//! subroutine row and serializes the whole document once at the end of a
//! report invocation.

use crate::error::ReportError;
use crate::models::SubroutineMetric;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// SARIF schema URL
pub const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// SARIF version
pub const SARIF_VERSION: &str = "2.1.0";

/// Identifier of the single rule this tool reports.
pub const COMPLEXITY_RULE_ID: &str = "cyclomatic-complexity";

/// Result message; `{0}` is the complexity and `{1}` the subroutine name.
pub const COMPLEXITY_MESSAGE: &str = "Subroutine '{1}' has a McCabe complexity of {0}";

const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root SARIF document structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

/// A single SARIF run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

/// Tool driver with rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub default_configuration: SarifRuleConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifRuleConfiguration {
    pub level: SarifLevel,
}

/// SARIF result (finding).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub level: SarifLevel,
    pub rule_index: usize,
    pub rule_id: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

/// SARIF severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
}

/// Message template with positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifMessage {
    pub text: String,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: SarifRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

impl SarifReport {
    /// An empty document with the fixed header and rule table.
    fn new() -> Self {
        Self {
            version: SARIF_VERSION.to_string(),
            schema: SARIF_SCHEMA.to_string(),
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: TOOL_NAME.to_string(),
                        version: TOOL_VERSION.to_string(),
                        rules: vec![SarifRule {
                            id: COMPLEXITY_RULE_ID.to_string(),
                            default_configuration: SarifRuleConfiguration {
                                level: SarifLevel::Error,
                            },
                        }],
                    },
                },
                results: Vec::new(),
            }],
        }
    }

    /// Results of the single run.
    pub fn results(&self) -> &[SarifResult] {
        self.runs.first().map(|r| r.results.as_slice()).unwrap_or(&[])
    }
}

/// Accumulates diagnostics for one report invocation.
#[derive(Debug, Default)]
pub struct DiagnosticsEmitter {
    document: Option<SarifReport>,
}

impl DiagnosticsEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh document. Any results already recorded are discarded.
    pub fn begin_document(&mut self) {
        if let Some(previous) = &self.document {
            let discarded = previous.results().len();
            if discarded > 0 {
                warn!(
                    "Diagnostics document restarted, discarding {} recorded results",
                    discarded
                );
            }
        }
        self.document = Some(SarifReport::new());
    }

    /// Append one result for the subroutine.
    ///
    /// The level is always `error`; callers decide which rows to forward.
    pub fn record_violation(&mut self, sub: &SubroutineMetric) -> Result<(), ReportError> {
        let run = self
            .document
            .as_mut()
            .and_then(|doc| doc.runs.first_mut())
            .ok_or(ReportError::DocumentNotStarted)?;

        run.results.push(SarifResult {
            level: SarifLevel::Error,
            rule_index: 0,
            rule_id: COMPLEXITY_RULE_ID.to_string(),
            message: SarifMessage {
                text: COMPLEXITY_MESSAGE.to_string(),
                arguments: vec![json!(sub.cyclomatic_complexity), json!(sub.name)],
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation {
                        uri: format!("file://{}", sub.path),
                    },
                    region: SarifRegion {
                        start_line: sub.start_line,
                    },
                },
            }],
        });

        Ok(())
    }

    /// Number of results recorded so far.
    pub fn result_count(&self) -> usize {
        self.document.as_ref().map(|d| d.results().len()).unwrap_or(0)
    }

    /// The accumulated document, ready to be written as one unit.
    pub fn serialize(&self) -> Result<&SarifReport, ReportError> {
        self.document.as_ref().ok_or(ReportError::DocumentNotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_value(emitter: &DiagnosticsEmitter) -> Value {
        serde_json::to_value(emitter.serialize().unwrap()).unwrap()
    }

    fn create_test_sub(name: &str, complexity: u32) -> SubroutineMetric {
        SubroutineMetric {
            name: name.to_string(),
            path: "lib/Foo.pm".to_string(),
            start_line: 42,
            line_count: 70,
            cyclomatic_complexity: complexity,
        }
    }

    #[test]
    fn test_fresh_document_header() {
        let mut emitter = DiagnosticsEmitter::new();
        emitter.begin_document();

        let doc = document_value(&emitter);
        assert_eq!(doc["version"], "2.1.0");
        assert_eq!(doc["$schema"], SARIF_SCHEMA);

        let driver = &doc["runs"][0]["tool"]["driver"];
        assert_eq!(driver["name"], TOOL_NAME);
        assert_eq!(driver["version"], TOOL_VERSION);
        assert_eq!(driver["rules"][0]["id"], "cyclomatic-complexity");
        assert_eq!(driver["rules"][0]["defaultConfiguration"]["level"], "error");
        assert_eq!(doc["runs"][0]["results"], json!([]));
    }

    #[test]
    fn test_record_violation_shape() {
        let mut emitter = DiagnosticsEmitter::new();
        emitter.begin_document();
        emitter.record_violation(&create_test_sub("parse", 5)).unwrap();

        let doc = document_value(&emitter);
        let result = &doc["runs"][0]["results"][0];

        assert_eq!(result["level"], "error");
        assert_eq!(result["ruleIndex"], 0);
        assert_eq!(result["ruleId"], "cyclomatic-complexity");
        assert_eq!(result["message"]["text"], COMPLEXITY_MESSAGE);
        assert_eq!(result["message"]["arguments"], json!([5, "parse"]));

        let location = &result["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "file://lib/Foo.pm");
        assert_eq!(location["region"]["startLine"], 42);
    }

    #[test]
    fn test_record_before_begin_fails() {
        let mut emitter = DiagnosticsEmitter::new();
        let err = emitter.record_violation(&create_test_sub("x", 1)).unwrap_err();
        assert!(matches!(err, ReportError::DocumentNotStarted));
        assert!(emitter.serialize().is_err());
    }

    #[test]
    fn test_begin_again_discards_results() {
        let mut emitter = DiagnosticsEmitter::new();
        emitter.begin_document();
        emitter.record_violation(&create_test_sub("a", 11)).unwrap();
        emitter.record_violation(&create_test_sub("b", 12)).unwrap();
        assert_eq!(emitter.result_count(), 2);

        emitter.begin_document();
        assert_eq!(emitter.result_count(), 0);
    }

    #[test]
    fn test_results_keep_recording_order() {
        let mut emitter = DiagnosticsEmitter::new();
        emitter.begin_document();
        for (name, complexity) in [("first", 3), ("second", 30), ("third", 1)] {
            emitter.record_violation(&create_test_sub(name, complexity)).unwrap();
        }

        let doc = document_value(&emitter);
        let names: Vec<_> = doc["runs"][0]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["message"]["arguments"][1].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_level_key_order() {
        let mut emitter = DiagnosticsEmitter::new();
        emitter.begin_document();
        let json = serde_json::to_string_pretty(emitter.serialize().unwrap()).unwrap();

        let version = json.find("\"version\"").unwrap();
        let schema = json.find("\"$schema\"").unwrap();
        let runs = json.find("\"runs\"").unwrap();
        assert!(version < schema && schema < runs);
    }
}
