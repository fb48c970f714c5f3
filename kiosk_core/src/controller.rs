use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::config::*;
use crate::report::Report;
use crate::session::{KioskEvent, Session};
use crate::tally::TallySummary;

/// The presentation layer, as seen from the kiosk.
///
/// Only `activate` and `apply_language` are mandatory: a presenter that does
/// not render some part of the kiosk can ignore the corresponding calls.
pub trait Presenter {
    /// Shows this screen and hides all the others.
    fn activate(&mut self, screen: Screen);
    /// Writes the texts of this language into every translatable element.
    fn apply_language(&mut self, language: Language);

    fn enable_start(&mut self, _enabled: bool) {}
    fn show_custom_product(&mut self, _visible: bool) {}
    fn show_total(&mut self, _total: u64) {}
    fn pulse_total(&mut self, _active: bool) {}
    fn highlight_vote(&mut self, _category: Category, _active: bool) {}
    fn dim_voting(&mut self, _dimmed: bool) {}
    fn enable_reveal(&mut self, _enabled: bool) {}
    fn show_pin_dialog(&mut self, _visible: bool) {}
    fn show_pin_error(&mut self, _visible: bool) {}
    fn show_results(&mut self, _summary: &TallySummary) {}
    fn offer_download(&mut self, _report: &Report) {}
    fn print(&mut self) {}
}

/// Keeps the presenter in sync with the session.
pub struct ScreenController<P: Presenter> {
    presenter: P,
    active: Option<Screen>,
}

impl<P: Presenter> ScreenController<P> {
    pub fn new(presenter: P) -> ScreenController<P> {
        ScreenController {
            presenter,
            active: None,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn active(&self) -> Option<Screen> {
        self.active
    }

    /// Activates the screen then re-applies the language: some texts only
    /// exist on the destination screen.
    pub fn switch_to(&mut self, screen: Screen, language: Language) {
        self.presenter.activate(screen);
        self.active = Some(screen);
        self.presenter.apply_language(language);
    }

    pub fn dispatch(&mut self, event: &KioskEvent, language: Language) {
        if let KioskEvent::ScreenChanged(screen) = event {
            self.switch_to(*screen, language);
            return;
        }
        let p = &mut self.presenter;
        match event {
            KioskEvent::ScreenChanged(_) => {}
            KioskEvent::LanguageChanged(lang) => p.apply_language(*lang),
            KioskEvent::StartEnabled(b) => p.enable_start(*b),
            KioskEvent::CustomProductVisible(b) => p.show_custom_product(*b),
            KioskEvent::VoteAccepted(category) => debug!("dispatch: vote {:?}", category),
            KioskEvent::TotalChanged(total) => p.show_total(*total),
            KioskEvent::TotalPulse(b) => p.pulse_total(*b),
            KioskEvent::VoteHighlight { category, active } => p.highlight_vote(*category, *active),
            KioskEvent::VotingDimmed(b) => p.dim_voting(*b),
            KioskEvent::RevealEnabled(b) => p.enable_reveal(*b),
            KioskEvent::PinDialog(b) => p.show_pin_dialog(*b),
            KioskEvent::PinError(b) => p.show_pin_error(*b),
            KioskEvent::ResultsReady(summary) => p.show_results(summary),
            KioskEvent::ReportReady(report) => p.offer_download(report),
            KioskEvent::PrintRequested => p.print(),
        }
    }
}

/// An input from the kiosk controls.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Action {
    SelectLanguage(Language),
    SelectIndustry(String),
    SelectCountry(String),
    SelectProduct(ProductChoice),
    SetCustomProduct(String),
    Start,
    /// A vote, by button value (-1 to 3).
    Vote(i8),
    RequestReveal,
    EnterPinDigit(char),
    /// Checks the digits entered so far, or this value if given.
    SubmitPin(Option<String>),
    CancelPin,
    Reset,
    Download,
    Print,
}

/// A kiosk session wired to a presenter.
///
/// ```
/// use chrono::NaiveDate;
/// use kiosk_core::*;
///
/// struct Silent;
/// impl Presenter for Silent {
///     fn activate(&mut self, _screen: Screen) {}
///     fn apply_language(&mut self, _language: Language) {}
/// }
///
/// let now = NaiveDate::from_ymd_opt(2026, 10, 19)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// let mut kiosk = Kiosk::new(Capabilities::REDUCED, Silent);
/// kiosk.handle(Action::SelectLanguage(Language::En), now)?;
/// assert_eq!(kiosk.session().screen(), Screen::Voting);
/// kiosk.handle(Action::Vote(2), now)?;
/// kiosk.handle(Action::RequestReveal, now)?;
/// assert_eq!(kiosk.session().screen(), Screen::Results);
///
/// # Ok::<(), KioskError>(())
/// ```
pub struct Kiosk<P: Presenter> {
    session: Session,
    controller: ScreenController<P>,
}

impl<P: Presenter> Kiosk<P> {
    pub fn new(capabilities: Capabilities, presenter: P) -> Kiosk<P> {
        let session = Session::new(capabilities);
        let mut controller = ScreenController::new(presenter);
        controller.switch_to(session.screen(), session.language());
        Kiosk {
            session,
            controller,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        self.controller.presenter()
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        self.controller.presenter_mut()
    }

    /// Applies one input. Returns the report for a download.
    ///
    /// Errors mean that the action was ignored; the kiosk stays usable.
    pub fn handle(
        &mut self,
        action: Action,
        now: NaiveDateTime,
    ) -> Result<Option<Report>, KioskError> {
        debug!("handle: {:?} at {}", action, now);
        let s = &mut self.session;
        let res = match action {
            Action::SelectLanguage(lang) => s.select_language(lang, now).map(|_| None),
            Action::SelectIndustry(v) => s.select_industry(&v, now).map(|_| None),
            Action::SelectCountry(v) => s.select_country(&v, now).map(|_| None),
            Action::SelectProduct(choice) => s.select_product(choice, now).map(|_| None),
            Action::SetCustomProduct(v) => s.set_custom_product(&v, now).map(|_| None),
            Action::Start => s.start(now).map(|_| None),
            Action::Vote(value) => s.cast_vote(value, now).map(|_| None),
            Action::RequestReveal => s.request_reveal(now).map(|_| None),
            Action::EnterPinDigit(c) => s.enter_pin_digit(c, now).map(|_| None),
            Action::SubmitPin(v) => s.submit_pin(v.as_deref(), now).map(|_| None),
            Action::CancelPin => s.cancel_pin(now).map(|_| None),
            Action::Reset => {
                s.reset(now);
                Ok(None)
            }
            Action::Download => s.request_report(now).map(Some),
            Action::Print => s.request_print(now).map(|_| None),
        };
        match &res {
            Err(KioskError::GateClosed) | Err(KioskError::EmptyReveal) => {
                debug!("handle: ignored: {:?}", res)
            }
            Err(KioskError::InvalidCategory(v)) => {
                warn!("handle: the controls sent an invalid category {}", v)
            }
            Err(e) => warn!("handle: {}", e),
            Ok(_) => {}
        }
        self.flush();
        res
    }

    /// Lets time pass without input, running the delayed tasks that are due.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.session.tick(now);
        self.flush();
    }

    fn flush(&mut self) {
        for event in self.session.drain_events() {
            self.controller.dispatch(&event, self.session.language());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn t(ms: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
            + Duration::milliseconds(ms)
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        screen: Option<Screen>,
        total: u64,
        pin_error: bool,
        dimmed: bool,
        results: Option<TallySummary>,
        downloads: Vec<Report>,
    }

    impl Presenter for Recorder {
        fn activate(&mut self, screen: Screen) {
            self.screen = Some(screen);
            self.calls.push(format!("activate {}", screen));
        }
        fn apply_language(&mut self, language: Language) {
            self.calls.push(format!("language {}", language));
        }
        fn show_total(&mut self, total: u64) {
            self.total = total;
        }
        fn dim_voting(&mut self, dimmed: bool) {
            self.dimmed = dimmed;
        }
        fn show_pin_error(&mut self, visible: bool) {
            self.pin_error = visible;
        }
        fn show_results(&mut self, summary: &TallySummary) {
            self.results = Some(summary.clone());
        }
        fn offer_download(&mut self, report: &Report) {
            self.downloads.push(report.clone());
        }
    }

    fn full_kiosk() -> Kiosk<Recorder> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut k = Kiosk::new(Capabilities::FULL, Recorder::default());
        k.handle(Action::SelectLanguage(Language::En), t(0)).unwrap();
        k.handle(Action::SelectIndustry("Logistics".to_string()), t(0))
            .unwrap();
        k.handle(Action::SelectCountry("Italy".to_string()), t(0))
            .unwrap();
        k.handle(Action::Start, t(0)).unwrap();
        k
    }

    #[test]
    fn language_reapplied_on_every_transition() {
        let k = full_kiosk();
        assert_eq!(
            k.presenter().calls,
            vec![
                "activate setup",
                "language de",
                "language en",
                "activate voting",
                "language en"
            ]
        );
        assert_eq!(k.presenter().screen, Some(Screen::Voting));
    }

    #[test]
    fn two_votes_then_pin() {
        let mut k = full_kiosk();
        k.handle(Action::Vote(1), t(1000)).unwrap();
        assert!(k.presenter().dimmed);
        assert_eq!(k.handle(Action::Vote(1), t(1300)), Err(KioskError::GateClosed));
        k.tick(t(1700));
        assert!(!k.presenter().dimmed);
        k.handle(Action::Vote(-1), t(2000)).unwrap();
        assert_eq!(k.presenter().total, 2);

        k.handle(Action::RequestReveal, t(3000)).unwrap();
        for c in "313".chars() {
            k.handle(Action::EnterPinDigit(c), t(3100)).unwrap();
        }
        k.handle(Action::SubmitPin(None), t(3200)).unwrap();
        assert_eq!(k.presenter().screen, Some(Screen::Results));
        let results = k.presenter().results.clone().unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(
            results.lines.iter().filter(|l| l.count > 0).count(),
            2
        );

        let report = k.handle(Action::Download, t(3300)).unwrap().unwrap();
        assert!(report.filename.contains("10-19-2026"));
        assert_eq!(k.presenter().downloads, vec![report]);
    }

    #[test]
    fn wrong_pin_flag_expires() {
        let mut k = full_kiosk();
        k.handle(Action::Vote(3), t(1000)).unwrap();
        k.handle(Action::RequestReveal, t(2000)).unwrap();
        assert_eq!(
            k.handle(Action::SubmitPin(Some("312".to_string())), t(2000)),
            Err(KioskError::PinMismatch)
        );
        assert!(k.presenter().pin_error);
        assert_eq!(k.session().screen(), Screen::Voting);
        k.tick(t(5000));
        assert!(!k.presenter().pin_error);
    }

    #[test]
    fn empty_reveal_changes_nothing() {
        let mut k = full_kiosk();
        let calls_before = k.presenter().calls.len();
        assert_eq!(
            k.handle(Action::RequestReveal, t(100)),
            Err(KioskError::EmptyReveal)
        );
        assert_eq!(k.handle(Action::Download, t(100)).ok(), None);
        assert_eq!(k.session().screen(), Screen::Voting);
        assert_eq!(k.presenter().calls.len(), calls_before);
        assert!(k.presenter().downloads.is_empty());
    }

    #[test]
    fn reset_returns_to_setup_in_german() {
        let mut k = full_kiosk();
        k.handle(Action::Vote(0), t(1000)).unwrap();
        k.handle(Action::Reset, t(1100)).unwrap();
        assert_eq!(k.presenter().screen, Some(Screen::Setup));
        assert_eq!(k.presenter().total, 0);
        assert_eq!(k.presenter().calls.last().map(String::as_str), Some("language de"));
        assert_eq!(k.session().total(), 0);
    }
}
