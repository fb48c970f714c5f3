use log::{debug, info, warn};

use chrono::{Duration, Local, NaiveDateTime};
use kiosk_core::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::kiosk::console::ConsolePresenter;
use crate::kiosk::script_reader::*;

pub mod console;
pub mod script_reader;

#[derive(Debug, Snafu)]
pub enum KioskCliError {
    #[snafu(display("Error opening script {path}"))]
    OpeningScript {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing script {path}"))]
    ParsingScript {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Unknown kiosk variant {name:?} (expected full or reduced)"))]
    UnknownVariant { name: String },
    #[snafu(display("Step {step}: unknown action {action:?}"))]
    UnknownAction { step: usize, action: String },
    #[snafu(display("Step {step}: action {action} needs the field {field}"))]
    MissingField {
        step: usize,
        action: String,
        field: &'static str,
    },
    #[snafu(display("Step {step}: unknown language {code:?}"))]
    UnknownLanguage { step: usize, code: String },
    #[snafu(display("Step {step}: category {value} is out of range"))]
    CategoryRange { step: usize, value: i64 },
    #[snafu(display("Error writing report {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No report was downloaded to compare with {path}"))]
    MissingReport { path: String },
    #[snafu(display("Difference detected between the report and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type KioskCliResult<T> = Result<T, KioskCliError>;

/// What happened during a replayed session.
#[derive(Debug)]
pub struct SessionOutcome {
    pub screen: Screen,
    pub total: u64,
    pub reports: Vec<Report>,
    /// Actions the kiosk ignored (throttled votes, wrong PINs, ...).
    pub ignored: usize,
    pub transcript: Vec<String>,
}

/// Where the downloaded reports go.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportSink {
    Discard,
    Stdout,
    Directory(PathBuf),
}

impl ReportSink {
    fn from_arg(out: &str) -> ReportSink {
        match out {
            "" => ReportSink::Discard,
            "stdout" => ReportSink::Stdout,
            dir => ReportSink::Directory(PathBuf::from(dir)),
        }
    }
}

/// Replays the script against a fresh kiosk.
pub fn run_script(
    script: &SessionScript,
    variant_override: Option<&str>,
) -> KioskCliResult<SessionOutcome> {
    let capabilities = match variant_override.or(script.variant.as_deref()) {
        Some(name) => read_variant(name)?,
        None => Capabilities::FULL,
    };
    let started_at: NaiveDateTime = script
        .started_at
        .unwrap_or_else(|| Local::now().naive_local());
    info!(
        "run_script: {} actions from {}, {:?}",
        script.actions.len(),
        started_at,
        capabilities
    );
    let timeline = read_timeline(script, started_at)?;

    let mut kiosk = Kiosk::new(capabilities, ConsolePresenter::default());
    let mut reports: Vec<Report> = Vec::new();
    let mut ignored: usize = 0;
    let mut last = started_at;
    for (now, action) in timeline {
        last = now;
        match kiosk.handle(action, now) {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) => {
                debug!("run_script: ignored at {}: {}", now, e);
                ignored += 1;
            }
        }
    }
    // Let the pending animations and messages finish.
    kiosk.tick(last + Duration::milliseconds(PIN_ERROR_DISPLAY_MS));

    let session = kiosk.session();
    let screen = session.screen();
    let total = session.total();
    info!(
        "run_script: ended on {} with {} votes, {} ignored actions",
        screen, total, ignored
    );
    let transcript = kiosk.presenter().transcript().to_vec();
    Ok(SessionOutcome {
        screen,
        total,
        reports,
        ignored,
        transcript,
    })
}

pub fn write_reports(reports: &[Report], sink: &ReportSink) -> KioskCliResult<()> {
    match sink {
        ReportSink::Discard => {
            debug!("write_reports: {} reports discarded", reports.len());
        }
        ReportSink::Stdout => {
            for r in reports {
                print!("{}", r.content);
            }
        }
        ReportSink::Directory(dir) => {
            let dir_s = dir.display().to_string();
            fs::create_dir_all(dir).context(WritingReportSnafu { path: dir_s })?;
            for r in reports {
                let p = dir.join(&r.filename);
                let p_s = p.display().to_string();
                info!("write_reports: writing {}", p_s);
                fs::write(&p, r.content.as_bytes()).context(WritingReportSnafu { path: p_s })?;
            }
        }
    }
    Ok(())
}

/// Compares the last downloaded report with the reference file.
pub fn check_reference(reports: &[Report], reference_path: &str) -> KioskCliResult<()> {
    let expected =
        fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
            path: reference_path,
        })?;
    let actual = reports
        .last()
        .context(MissingReportSnafu {
            path: reference_path,
        })?;
    if expected != actual.content {
        warn!("Found differences with the reference report");
        print_diff(expected.as_str(), actual.content.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("check_reference: report matches {}", reference_path);
    Ok(())
}

fn resolve_sink(script_path: &str, script: &SessionScript, out: Option<&str>) -> ReportSink {
    if let Some(o) = out {
        return ReportSink::from_arg(o);
    }
    match script.output_directory.as_deref() {
        None | Some("") => ReportSink::Discard,
        Some(dir) => {
            let root = Path::new(script_path)
                .parent()
                .unwrap_or_else(|| Path::new("."));
            ReportSink::Directory(root.join(dir))
        }
    }
}

pub fn run_session(
    script_path: &str,
    variant_override: Option<&str>,
    out: Option<&str>,
    reference: Option<&str>,
) -> KioskCliResult<SessionOutcome> {
    let script = read_script(script_path)?;
    let outcome = run_script(&script, variant_override)?;
    let sink = resolve_sink(script_path, &script, out);
    write_reports(&outcome.reports, &sink)?;
    if let Some(reference_path) = reference {
        check_reference(&outcome.reports, reference_path)?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(json: &str) -> SessionScript {
        parse_script(json, "inline").unwrap()
    }

    const FULL_SESSION: &str = r#"{
        "variant": "full",
        "startedAt": "2026-10-19T14:05:00",
        "actions": [
            { "atMs": 0,    "action": "selectLanguage", "language": "en" },
            { "atMs": 10,   "action": "selectIndustry", "value": "Automotive" },
            { "atMs": 20,   "action": "selectCountry",  "value": "Germany" },
            { "atMs": 30,   "action": "selectProduct",  "value": "custom" },
            { "atMs": 40,   "action": "setCustomProduct", "value": "Widgets" },
            { "atMs": 50,   "action": "start" },
            { "atMs": 1000, "action": "vote", "category": 1 },
            { "atMs": 1200, "action": "vote", "category": 3 },
            { "atMs": 2000, "action": "vote", "category": 1 },
            { "atMs": 3000, "action": "vote", "category": -1 },
            { "atMs": 5000, "action": "reveal" },
            { "atMs": 5100, "action": "submitPin", "value": "111" },
            { "atMs": 5200, "action": "pinDigit", "value": "3" },
            { "atMs": 5300, "action": "pinDigit", "value": "1" },
            { "atMs": 5400, "action": "pinDigit", "value": "3" },
            { "atMs": 5500, "action": "submitPin" },
            { "atMs": 6000, "action": "download" },
            { "atMs": 6100, "action": "print" }
        ]
    }"#;

    #[test]
    fn full_session() {
        let outcome = run_script(&script(FULL_SESSION), None).unwrap();
        assert_eq!(outcome.screen, Screen::Results);
        assert_eq!(outcome.total, 3);
        // The throttled vote and the wrong PIN.
        assert_eq!(outcome.ignored, 2);
        assert_eq!(outcome.reports.len(), 1);
        let r = &outcome.reports[0];
        assert_eq!(r.filename, "Teampower_Results_10-19-2026.txt");
        assert!(r.content.contains("Date: 10/19/2026\nTime: 2:05:06 PM\n"));
        assert!(r.content.contains("Product: Widgets\n"));
        assert!(r.content.contains("Total Votes: 3\n"));
        assert!(r.content.contains("1. Decreased\n   Votes: 1\n   Percentage: 33.3%\n"));
        assert!(r.content.contains("3. Slightly increased\n   Votes: 2\n   Percentage: 66.7%\n"));
        assert!(outcome.transcript.contains(&"Wrong PIN".to_string()));
        assert_eq!(outcome.transcript.last().map(String::as_str), Some("print"));
    }

    #[test]
    fn reveal_without_votes_stays_on_voting() {
        let outcome = run_script(
            &script(
                r#"{
                "startedAt": "2026-10-19T09:00:00",
                "actions": [
                    { "atMs": 0,  "action": "selectLanguage", "language": "de" },
                    { "atMs": 0,  "action": "selectIndustry", "value": "Handel" },
                    { "atMs": 0,  "action": "selectCountry",  "value": "Schweiz" },
                    { "atMs": 10, "action": "start" },
                    { "atMs": 20, "action": "reveal" },
                    { "atMs": 30, "action": "download" }
                ]
            }"#,
            ),
            None,
        )
        .unwrap();
        assert_eq!(outcome.screen, Screen::Voting);
        assert_eq!(outcome.total, 0);
        assert!(outcome.reports.is_empty());
        assert_eq!(outcome.ignored, 2);
    }

    #[test]
    fn variant_override() {
        let json = r#"{
            "variant": "full",
            "startedAt": "2026-10-19T09:00:00",
            "actions": [
                { "atMs": 0,   "action": "selectLanguage", "language": "en" },
                { "atMs": 10,  "action": "start" },
                { "atMs": 20,  "action": "vote", "category": 0 },
                { "atMs": 800, "action": "vote", "category": 2 },
                { "atMs": 900, "action": "reveal" }
            ]
        }"#;
        let full = run_script(&script(json), None).unwrap();
        // Industry and country are missing: the full kiosk never starts.
        assert_eq!(full.screen, Screen::Setup);
        let reduced = run_script(&script(json), Some("reduced")).unwrap();
        assert_eq!(reduced.screen, Screen::Results);
        assert_eq!(reduced.total, 2);
        assert!(run_script(&script(json), Some("huge")).is_err());
    }

    #[test]
    fn reports_and_reference() {
        let outcome = run_script(&script(FULL_SESSION), None).unwrap();
        let dir = std::env::temp_dir().join(format!("teampower-test-{}", std::process::id()));
        write_reports(&outcome.reports, &ReportSink::Directory(dir.clone())).unwrap();
        let written = dir.join("Teampower_Results_10-19-2026.txt");
        let written_s = written.display().to_string();
        assert_eq!(
            fs::read_to_string(&written).unwrap(),
            outcome.reports[0].content
        );
        assert!(check_reference(&outcome.reports, &written_s).is_ok());

        let other = dir.join("other.txt");
        fs::write(&other, "something else\n").unwrap();
        assert!(matches!(
            check_reference(&outcome.reports, &other.display().to_string()),
            Err(KioskCliError::ReferenceMismatch { .. })
        ));
        assert!(matches!(
            check_reference(&[], &written_s),
            Err(KioskCliError::MissingReport { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn sinks() {
        assert_eq!(ReportSink::from_arg("stdout"), ReportSink::Stdout);
        assert_eq!(ReportSink::from_arg(""), ReportSink::Discard);
        let s = script(r#"{"outputDirectory": "out", "actions": []}"#);
        assert_eq!(
            resolve_sink("/tmp/kiosk/session.json", &s, None),
            ReportSink::Directory(PathBuf::from("/tmp/kiosk/out"))
        );
        assert_eq!(
            resolve_sink("/tmp/kiosk/session.json", &s, Some("stdout")),
            ReportSink::Stdout
        );
    }
}
