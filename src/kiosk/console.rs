// Console rendering of the kiosk.

use log::{debug, trace};

use kiosk_core::{Category, Language, Presenter, Report, Screen, TallySummary};

/// Writes what a kiosk screen would show as lines of text.
///
/// Only the changes a facilitator cares about are kept: screens, totals, PIN
/// dialog, results and downloads. Button animations are logged at trace level.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    language: Language,
    transcript: Vec<String>,
}

impl ConsolePresenter {
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    fn line(&mut self, text: String) {
        debug!("console: {}", text);
        self.transcript.push(text);
    }
}

fn screen_title(screen: Screen, language: Language) -> &'static str {
    match (language, screen) {
        (Language::De, Screen::Setup) => "Einrichtung",
        (Language::De, Screen::LanguagePick) => "Sprachauswahl",
        (Language::De, Screen::Voting) => "Abstimmung",
        (Language::De, Screen::Results) => "Ergebnis",
        (Language::En, Screen::Setup) => "Setup",
        (Language::En, Screen::LanguagePick) => "Language selection",
        (Language::En, Screen::Voting) => "Voting",
        (Language::En, Screen::Results) => "Results",
    }
}

impl Presenter for ConsolePresenter {
    fn activate(&mut self, screen: Screen) {
        self.line(format!("== {} ==", screen_title(screen, self.language)));
    }

    fn apply_language(&mut self, language: Language) {
        if language != self.language {
            self.language = language;
            self.line(format!("language: {}", language.display_name()));
        }
    }

    fn show_total(&mut self, total: u64) {
        let label = match self.language {
            Language::De => "Stimmen",
            Language::En => "Votes",
        };
        self.line(format!("{}: {}", label, total));
    }

    fn highlight_vote(&mut self, category: Category, active: bool) {
        trace!("highlight {:?} {}", category, active);
    }

    fn show_pin_dialog(&mut self, visible: bool) {
        if visible {
            self.line("PIN?".to_string());
        }
    }

    fn show_pin_error(&mut self, visible: bool) {
        if visible {
            let msg = match self.language {
                Language::De => "Falsche PIN",
                Language::En => "Wrong PIN",
            };
            self.line(msg.to_string());
        }
    }

    fn show_results(&mut self, summary: &TallySummary) {
        let lang = self.language;
        for l in summary.lines.iter() {
            self.line(format!(
                "{:>3} {:<22} {:>5} {:>6.1}%",
                l.category.value(),
                l.category.label(lang),
                l.count,
                l.percentage
            ));
        }
        self.line(format!("{:>3} {:<22} {:>5}", "", "", summary.total));
    }

    fn offer_download(&mut self, report: &Report) {
        self.line(format!("download: {}", report.filename));
    }

    fn print(&mut self) {
        self.line("print".to_string());
    }
}
