//! The `export` and `check` commands.
//!
//! Both start by importing an authored location source and comparing the
//! tracker JSON it produces with what the source says. `export` then writes
//! that JSON to the output path; `check` only reports the differences.

use std::path::{Path, PathBuf};

use poptracker_locations::{
    Drift, Node, import_locations_from_str, source_drift, to_json_string, to_json_string_pretty,
};
use tracing::{debug, info, warn};

use crate::config::{OutputConfig, PackConfig};
use crate::error::PackError;

/// Counts describing an imported forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Top-level areas and locations.
    pub roots: usize,
    /// Locations anywhere in the tree.
    pub locations: usize,
    /// Sections anywhere in the tree.
    pub sections: usize,
}

impl TreeStats {
    fn of(nodes: &[Node]) -> Self {
        Self {
            roots: nodes.len(),
            locations: nodes.iter().map(Node::location_count).fold(0, usize::saturating_add),
            sections: nodes.iter().map(Node::section_count).fold(0, usize::saturating_add),
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Where the JSON was written.
    pub output: PathBuf,
    /// Shape of the exported tree.
    pub stats: TreeStats,
    /// Bytes written.
    pub bytes: usize,
}

/// Result of a round-trip check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Shape of the checked tree.
    pub stats: TreeStats,
    /// Every place where the export differs from the source.
    pub drift: Vec<Drift>,
}

impl CheckReport {
    /// The error describing this report's differences, if there are any.
    pub fn mismatch(&self, path: &Path) -> Option<PackError> {
        self.drift.first().map(|first| PackError::RoundTripMismatch {
            path: path.to_path_buf(),
            count: self.drift.len(),
            first: first.to_string(),
        })
    }
}

/// Import `input` and write the tracker JSON to `output`.
///
/// Missing parent directories of `output` are created.
///
/// # Errors
///
/// Returns [`PackError::Read`] or [`PackError::Locations`] if the source
/// cannot be read or imported, [`PackError::RoundTripMismatch`] if
/// verification is enabled and the export differs from the source, or
/// [`PackError::Write`] if the output cannot be written.
pub fn export(input: &Path, output: &Path, config: &PackConfig) -> Result<ExportSummary, PackError> {
    let (nodes, report) = inspect(input)?;
    if let Some(err) = report.mismatch(input).filter(|_| config.verify_round_trip) {
        return Err(err);
    }

    let text = render(&nodes, &config.output)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PackError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(output, &text).map_err(|source| PackError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        output = %output.display(),
        locations = report.stats.locations,
        sections = report.stats.sections,
        bytes = text.len(),
        "locations exported"
    );
    Ok(ExportSummary {
        output: output.to_path_buf(),
        stats: report.stats,
        bytes: text.len(),
    })
}

/// Import `input` and report where its export differs from the source.
///
/// # Errors
///
/// Returns [`PackError::Read`] or [`PackError::Locations`] if the source
/// cannot be read or imported.
pub fn check(input: &Path) -> Result<CheckReport, PackError> {
    let (_, report) = inspect(input)?;
    info!(
        input = %input.display(),
        roots = report.stats.roots,
        locations = report.stats.locations,
        sections = report.stats.sections,
        differences = report.drift.len(),
        "round trip checked"
    );
    Ok(report)
}

/// Read and import `input`, then compare its export with the source text.
fn inspect(input: &Path) -> Result<(Vec<Node>, CheckReport), PackError> {
    let source = std::fs::read_to_string(input).map_err(|source| PackError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let nodes = import_locations_from_str(&source)?;
    let drift = source_drift(&source, &nodes)?;
    for difference in &drift {
        warn!(input = %input.display(), %difference, "export differs from source");
    }

    let report = CheckReport {
        stats: TreeStats::of(&nodes),
        drift,
    };
    debug!(input = %input.display(), roots = report.stats.roots, "source imported");
    Ok((nodes, report))
}

/// Serialize `nodes` according to the output settings.
fn render(nodes: &[Node], output: &OutputConfig) -> Result<String, PackError> {
    let mut text = match output.indent {
        Some(width) => to_json_string_pretty(nodes, width)?,
        None => to_json_string(nodes)?,
    };
    if output.trailing_newline {
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"// Dungeon locations
[
  {
    "name": "Cave",
    // entrance is always open
    "children": [
      {"name": "Torch Room", "sections": [{"name": "Chest", "location_id": [1, 2]}]},
      {"name": "Lair", "sections": [{"name": "Boss", "hosted_item": "boss"}],
       "map_locations": [{"map": "cave", "x": 4, "y": 9}]}
    ]
  }
]
"#;

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("locations.jsonc");
        std::fs::write(&path, SOURCE).expect("write source");
        path
    }

    #[test]
    fn export_writes_compact_json_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path());
        let output = dir.path().join("pack").join("locations").join("cave.json");

        let summary = export(&input, &output, &PackConfig::default()).unwrap();
        assert_eq!(
            summary.stats,
            TreeStats {
                roots: 1,
                locations: 2,
                sections: 2
            }
        );

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            concat!(
                r#"[{"name":"Cave","children":["#,
                r#"{"name":"Torch Room","sections":[{"name":"Chest","item_count":2}]},"#,
                r#"{"name":"Lair","sections":[{"name":"Boss","hosted_item":"boss"}],"#,
                r#""map_locations":[{"map":"cave","x":4,"y":9}]}]}]"#,
                "\n"
            )
        );
        assert_eq!(summary.bytes, written.len());
    }

    #[test]
    fn export_honours_indent_setting() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path());
        let output = dir.path().join("cave.json");
        let config = PackConfig {
            output: OutputConfig {
                indent: Some(2),
                trailing_newline: false,
            },
            verify_round_trip: true,
        };

        export(&input, &output, &config).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("[\n  {\n    \"name\": \"Cave\""));
        assert!(written.ends_with(']'));
    }

    #[test]
    fn check_reports_faithful_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path());

        let report = check(&input).unwrap();
        assert!(report.drift.is_empty());
        assert!(report.mismatch(&input).is_none());
        assert_eq!(report.stats.locations, 2);
    }

    #[test]
    fn check_reports_dropped_and_changed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("typo.json");
        std::fs::write(
            &input,
            r#"[{"name": "Gate", "acess_rules": ["$has|key"], "map_locations": [{"map": "m", "x": 4.5, "y": 2}]}]"#,
        )
        .unwrap();

        let report = check(&input).unwrap();
                let paths: Vec<&str> = report.drift.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["[0].acess_rules", "[0].map_locations[0].x"]);
        assert!(matches!(
            report.mismatch(&input),
            Some(PackError::RoundTripMismatch { count: 2, .. })
        ));
    }

    #[test]
    fn export_refuses_unfaithful_source_when_verifying() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("typo.json");
        std::fs::write(&input, r#"[{"name": "Gate", "acess_rules": ["$has|key"]}]"#).unwrap();
        let output = dir.path().join("out.json");

        let result = export(&input, &output, &PackConfig::default());
        match result {
            Err(PackError::RoundTripMismatch { path, count, first }) => {
                assert_eq!(path, input);
                assert_eq!(count, 1);
                assert_eq!(first, "[0].acess_rules: field dropped");
            }
            other => panic!("expected a round-trip mismatch, got {other:?}"),
        }
        assert!(!output.exists());

        let lenient = PackConfig {
            verify_round_trip: false,
            ..PackConfig::default()
        };
        export(&input, &output, &lenient).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[{\"name\":\"Gate\"}]\n");
    }

    #[test]
    fn export_fails_on_malformed_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.json");
        std::fs::write(&input, "[{\"name\": \"A\"} // trailing comment\n]").unwrap();

        let result = export(&input, &dir.path().join("out.json"), &PackConfig::default());
        assert!(matches!(result, Err(PackError::Locations { .. })));
        assert!(!dir.path().join("out.json").exists());
    }
}
