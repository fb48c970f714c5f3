//! Plain-text summary of a session, for download.

use chrono::NaiveDateTime;
use log::info;

use crate::config::*;
use crate::tally::VoteTally;

const RULE_WIDTH: usize = 60;

/// A generated report: the file name to offer and its UTF-8 content.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub content: String,
}

struct Phrases {
    title: &'static str,
    subtitle: &'static str,
    event_info: &'static str,
    language: &'static str,
    industry: &'static str,
    country: &'static str,
    product: &'static str,
    date: &'static str,
    time: &'static str,
    total_votes: &'static str,
    details: &'static str,
    votes: &'static str,
    percentage: &'static str,
    footer: &'static str,
    file_prefix: &'static str,
    file_results: &'static str,
    date_format: &'static str,
    time_format: &'static str,
    date_separator: char,
}

const DE: Phrases = Phrases {
    title: "Ergebnis Teamkraft",
    subtitle: "Abstimmungsergebnis",
    event_info: "Veranstaltungsinformationen",
    language: "Sprache",
    industry: "Branche",
    country: "Land",
    product: "Produkt",
    date: "Datum",
    time: "Uhrzeit",
    total_votes: "Gesamtstimmen",
    details: "Detaillierte Ergebnisse",
    votes: "Stimmen",
    percentage: "Prozent",
    footer: "Generiert mit Teamkraft Bewertungs-App",
    file_prefix: "Teamkraft",
    file_results: "Ergebnis",
    date_format: "%-d.%-m.%Y",
    time_format: "%H:%M:%S",
    date_separator: '.',
};

const EN: Phrases = Phrases {
    title: "Results Teampower",
    subtitle: "Voting Results",
    event_info: "Event Information",
    language: "Language",
    industry: "Industry",
    country: "Country",
    product: "Product",
    date: "Date",
    time: "Time",
    total_votes: "Total Votes",
    details: "Detailed Results",
    votes: "Votes",
    percentage: "Percentage",
    footer: "Generated with Teampower Voting App",
    file_prefix: "Teampower",
    file_results: "Results",
    date_format: "%-m/%-d/%Y",
    time_format: "%-I:%M:%S %p",
    date_separator: '/',
};

fn phrases(language: Language) -> &'static Phrases {
    match language {
        Language::De => &DE,
        Language::En => &EN,
    }
}

/// The date as the kiosk shows it in this language (e.g. `19.10.2026` or
/// `10/19/2026`).
pub fn format_date(language: Language, timestamp: NaiveDateTime) -> String {
    timestamp.format(phrases(language).date_format).to_string()
}

pub fn format_time(language: Language, timestamp: NaiveDateTime) -> String {
    timestamp.format(phrases(language).time_format).to_string()
}

/// The download name of a report generated at this time.
pub fn report_filename(language: Language, timestamp: NaiveDateTime) -> String {
    let p = phrases(language);
    let date = format_date(language, timestamp).replace(p.date_separator, "-");
    format!("{}_{}_{}.txt", p.file_prefix, p.file_results, date)
}

/// Renders the tally and the event information.
///
/// The output only depends on the arguments. An empty tally has nothing to
/// report and is rejected.
pub fn format_report(
    tally: &VoteTally,
    event: &EventInfo,
    language: Language,
    timestamp: NaiveDateTime,
) -> Result<Report, KioskError> {
    let summary = tally.summary()?;
    let p = phrases(language);
    let double = "=".repeat(RULE_WIDTH);
    let single = "-".repeat(RULE_WIDTH);

    let mut lines: Vec<String> = vec![
        double.clone(),
        p.title.to_uppercase(),
        p.subtitle.to_string(),
        double.clone(),
        String::new(),
        format!("{}: {}", p.date, format_date(language, timestamp)),
        format!("{}: {}", p.time, format_time(language, timestamp)),
        String::new(),
    ];

    if event.has_details() {
        lines.push(single.clone());
        lines.push(format!("{}:", p.event_info));
        lines.push(single.clone());
        if let Some(lang) = event.language {
            lines.push(format!("{}: {}", p.language, lang.display_name()));
        }
        let fields = [
            (p.industry, &event.industry),
            (p.country, &event.country),
            (p.product, &event.product),
        ];
        for (label, value) in fields {
            if let Some(v) = value {
                lines.push(format!("{}: {}", label, v));
            }
        }
        lines.push(String::new());
    }

    lines.push(single.clone());
    lines.push(format!("{}: {}", p.total_votes, summary.total));
    lines.push(single);
    lines.push(String::new());
    lines.push(format!("{}:", p.details));
    lines.push(double.clone());
    lines.push(String::new());

    for (idx, line) in summary.lines.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, line.category.label(language)));
        lines.push(format!("   {}: {}", p.votes, line.count));
        lines.push(format!("   {}: {:.1}%", p.percentage, line.percentage));
        lines.push(String::new());
    }

    lines.push(double.clone());
    lines.push(p.footer.to_string());
    lines.push(double);

    let mut s = lines.join("\n");
    s.push('\n');

    let filename = report_filename(language, timestamp);
    info!(
        "format_report: {} ({} votes, {} bytes)",
        filename,
        summary.total,
        s.len()
    );
    Ok(Report {
        filename,
        content: s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn tally_of(values: &[i8]) -> VoteTally {
        let mut t = VoteTally::new();
        for v in values {
            t.increment_value(*v).unwrap();
        }
        t
    }

    #[test]
    fn dates_and_filenames() {
        assert_eq!(format_date(Language::De, ts(14, 5, 3)), "7.3.2026");
        assert_eq!(format_date(Language::En, ts(14, 5, 3)), "3/7/2026");
        assert_eq!(format_time(Language::De, ts(14, 5, 3)), "14:05:03");
        assert_eq!(format_time(Language::En, ts(14, 5, 3)), "2:05:03 PM");
        assert_eq!(format_time(Language::En, ts(0, 30, 0)), "12:30:00 AM");
        assert_eq!(
            report_filename(Language::De, ts(8, 0, 0)),
            "Teamkraft_Ergebnis_7-3-2026.txt"
        );
        assert_eq!(
            report_filename(Language::En, ts(8, 0, 0)),
            "Teampower_Results_3-7-2026.txt"
        );
    }

    #[test]
    fn empty_tally_has_no_report() {
        let r = format_report(
            &VoteTally::new(),
            &EventInfo::default(),
            Language::En,
            ts(9, 0, 0),
        );
        assert_eq!(r, Err(KioskError::EmptyReveal));
    }

    #[test]
    fn english_report() {
        let event = EventInfo {
            language: Some(Language::En),
            industry: Some("Automotive".to_string()),
            country: Some("Germany".to_string()),
            product: None,
        };
        let r = format_report(&tally_of(&[1, 1, -1]), &event, Language::En, ts(14, 5, 3)).unwrap();
        let expected = "\
============================================================
RESULTS TEAMPOWER
Voting Results
============================================================

Date: 3/7/2026
Time: 2:05:03 PM

------------------------------------------------------------
Event Information:
------------------------------------------------------------
Language: English
Industry: Automotive
Country: Germany

------------------------------------------------------------
Total Votes: 3
------------------------------------------------------------

Detailed Results:
============================================================

1. Decreased
   Votes: 1
   Percentage: 33.3%

2. Stayed the same
   Votes: 0
   Percentage: 0.0%

3. Slightly increased
   Votes: 2
   Percentage: 66.7%

4. Moderately increased
   Votes: 0
   Percentage: 0.0%

5. Strongly increased
   Votes: 0
   Percentage: 0.0%

============================================================
Generated with Teampower Voting App
============================================================
";
        assert_eq!(r.content, expected);
        assert_eq!(r.filename, "Teampower_Results_3-7-2026.txt");
    }

    #[test]
    fn german_report_without_event_details() {
        let event = EventInfo {
            language: Some(Language::De),
            ..EventInfo::default()
        };
        let r = format_report(&tally_of(&[3, 3]), &event, Language::De, ts(9, 15, 0)).unwrap();
        assert!(r.content.starts_with(&format!("{}\nERGEBNIS TEAMKRAFT\n", "=".repeat(60))));
        assert!(r.content.contains("Datum: 7.3.2026\nUhrzeit: 09:15:00\n"));
        assert!(!r.content.contains("Veranstaltungsinformationen"));
        assert!(!r.content.contains("Sprache"));
        assert!(r.content.contains("Gesamtstimmen: 2\n"));
        assert!(r.content.contains("5. Stark gestiegen\n   Stimmen: 2\n   Prozent: 100.0%\n"));
        assert!(r.content.contains("Generiert mit Teamkraft Bewertungs-App\n"));
    }

    #[test]
    fn only_set_fields_are_listed() {
        let event = EventInfo {
            language: Some(Language::De),
            industry: None,
            country: None,
            product: Some("Custom".to_string()),
        };
        let r = format_report(&tally_of(&[0]), &event, Language::De, ts(9, 0, 0)).unwrap();
        assert!(r.content.contains("Sprache: Deutsch\nProdukt: Custom\n\n"));
        assert!(!r.content.contains("Branche"));
        assert!(!r.content.contains("Land:"));
    }

    #[test]
    fn deterministic() {
        let event = EventInfo::default();
        let t = tally_of(&[0, 2]);
        assert_eq!(
            format_report(&t, &event, Language::En, ts(10, 0, 0)),
            format_report(&t, &event, Language::En, ts(10, 0, 0))
        );
    }
}
