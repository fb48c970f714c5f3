use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};

use crate::config::*;
use crate::deferred::{Deferred, TaskQueue};
use crate::gate::VotingGate;
use crate::report::{format_report, Report};
use crate::tally::{TallySummary, VoteTally};

/// A change of the kiosk state that the presentation layer has to render.
#[derive(PartialEq, Debug, Clone)]
pub enum KioskEvent {
    ScreenChanged(Screen),
    LanguageChanged(Language),
    StartEnabled(bool),
    CustomProductVisible(bool),
    VoteAccepted(Category),
    TotalChanged(u64),
    TotalPulse(bool),
    VoteHighlight { category: Category, active: bool },
    VotingDimmed(bool),
    RevealEnabled(bool),
    PinDialog(bool),
    PinError(bool),
    ResultsReady(TallySummary),
    ReportReady(Report),
    PrintRequested,
}

/// The selections made on the setup screen, before voting starts.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SetupDraft {
    pub language: Option<Language>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub product: ProductChoice,
    pub custom_product: String,
}

impl SetupDraft {
    /// The first required field that is still missing.
    fn missing_field(&self, capabilities: &Capabilities) -> Option<SetupField> {
        if self.language.is_none() {
            return Some(SetupField::Language);
        }
        if capabilities.setup {
            if self.industry.is_none() {
                return Some(SetupField::Industry);
            }
            if self.country.is_none() {
                return Some(SetupField::Country);
            }
        }
        None
    }

    fn product_label(&self) -> Option<String> {
        match &self.product {
            ProductChoice::None => None,
            ProductChoice::Catalog(label) => Some(label.clone()),
            ProductChoice::Custom => {
                let text = self.custom_product.trim();
                if text.is_empty() {
                    Some(CUSTOM_PRODUCT_LABEL.to_string())
                } else {
                    Some(text.to_string())
                }
            }
        }
    }

    fn to_event_info(&self, capabilities: &Capabilities) -> EventInfo {
        if !capabilities.setup {
            return EventInfo {
                language: self.language,
                ..EventInfo::default()
            };
        }
        EventInfo {
            language: self.language,
            industry: self.industry.clone(),
            country: self.country.clone(),
            product: self.product_label(),
        }
    }
}

/// The PIN entry dialog, created each time the results are requested.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PinChallenge {
    attempt: String,
}

impl PinChallenge {
    pub fn attempt(&self) -> &str {
        &self.attempt
    }

    fn push_digit(&mut self, c: char) -> bool {
        if c.is_ascii_digit() && self.attempt.len() < PIN_LENGTH {
            self.attempt.push(c);
            true
        } else {
            false
        }
    }

    fn set_value(&mut self, value: &str) {
        self.attempt = value.trim().to_string();
    }

    fn matches(&self) -> bool {
        self.attempt == REVEAL_PIN
    }
}

fn non_blank(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

/// The state of one kiosk, from the setup screen to the results.
///
/// A session is driven by one thread: each action receives the time at which
/// it happened and first runs the delayed tasks that became due. Changes for
/// the presentation layer accumulate as events until they are drained.
#[derive(Debug, Clone)]
pub struct Session {
    capabilities: Capabilities,
    screen: Screen,
    language: Language,
    draft: SetupDraft,
    event: EventInfo,
    tally: VoteTally,
    gate: VotingGate,
    pin: Option<PinChallenge>,
    pin_error_until: Option<NaiveDateTime>,
    tasks: TaskQueue,
    events: Vec<KioskEvent>,
}

impl Session {
    pub fn new(capabilities: Capabilities) -> Session {
        Session {
            capabilities,
            screen: capabilities.initial_screen(),
            language: Language::default(),
            draft: SetupDraft::default(),
            event: EventInfo::default(),
            tally: VoteTally::new(),
            gate: VotingGate::default(),
            pin: None,
            pin_error_until: None,
            tasks: TaskQueue::default(),
            events: Vec::new(),
        }
    }

    // ******** Queries ********

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn draft(&self) -> &SetupDraft {
        &self.draft
    }

    pub fn event_info(&self) -> &EventInfo {
        &self.event
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    pub fn total(&self) -> u64 {
        self.tally.total()
    }

    pub fn gate(&self) -> &VotingGate {
        &self.gate
    }

    pub fn pin_challenge(&self) -> Option<&PinChallenge> {
        self.pin.as_ref()
    }

    pub fn pin_error(&self) -> bool {
        self.pin_error_until.is_some()
    }

    /// Whether the start control should be enabled.
    pub fn can_start(&self) -> bool {
        self.draft.missing_field(&self.capabilities).is_none()
    }

    /// Whether the control ending the vote should be enabled.
    pub fn can_reveal(&self) -> bool {
        self.screen == Screen::Voting && !self.tally.is_empty()
    }

    /// The time of the next delayed task, if any.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.tasks.next_fire_at()
    }

    pub fn drain_events(&mut self) -> Vec<KioskEvent> {
        std::mem::take(&mut self.events)
    }

    // ******** Time ********

    /// Runs the delayed tasks that are due at `now`.
    pub fn tick(&mut self, now: NaiveDateTime) {
        for (fire_at, task) in self.tasks.pop_due(now) {
            debug!("tick: running {:?} scheduled for {}", task, fire_at);
            match task {
                Deferred::ReopenGate => {
                    if self.gate.reopen_if_due(fire_at) {
                        self.emit(KioskEvent::VotingDimmed(false));
                    }
                }
                Deferred::ClearPinError => match self.pin_error_until {
                    Some(until) if until <= fire_at => {
                        self.pin_error_until = None;
                        self.emit(KioskEvent::PinError(false));
                    }
                    _ => {}
                },
                Deferred::ReleaseHighlight(category) => self.emit(KioskEvent::VoteHighlight {
                    category,
                    active: false,
                }),
                Deferred::SettlePulse => self.emit(KioskEvent::TotalPulse(false)),
            }
        }
    }

    // ******** Setup ********

    pub fn select_language(
        &mut self,
        language: Language,
        now: NaiveDateTime,
    ) -> Result<(), KioskError> {
        self.tick(now);
        self.require_initial_screen("select language")?;
        info!("select_language: {}", language);
        self.language = language;
        self.draft.language = Some(language);
        self.emit(KioskEvent::LanguageChanged(language));
        if !self.capabilities.setup {
            // Nothing else to choose: the language opens the voting.
            self.open_voting(now);
            return Ok(());
        }
        self.emit_start_enabled();
        Ok(())
    }

    /// An empty or blank value clears the selection.
    pub fn select_industry(&mut self, value: &str, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        self.require_setup("select industry")?;
        self.draft.industry = non_blank(value);
        debug!("select_industry: {:?}", self.draft.industry);
        self.emit_start_enabled();
        Ok(())
    }

    pub fn select_country(&mut self, value: &str, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        self.require_setup("select country")?;
        self.draft.country = non_blank(value);
        debug!("select_country: {:?}", self.draft.country);
        self.emit_start_enabled();
        Ok(())
    }

    pub fn select_product(
        &mut self,
        choice: ProductChoice,
        now: NaiveDateTime,
    ) -> Result<(), KioskError> {
        self.tick(now);
        self.require_setup("select product")?;
        debug!("select_product: {:?}", choice);
        let custom = choice == ProductChoice::Custom;
        self.draft.product = choice;
        self.emit(KioskEvent::CustomProductVisible(custom));
        Ok(())
    }

    pub fn set_custom_product(&mut self, text: &str, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        self.require_setup("set custom product")?;
        self.draft.custom_product = text.to_string();
        Ok(())
    }

    /// Freezes the event information and opens the voting screen.
    pub fn start(&mut self, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        self.require_initial_screen("start")?;
        if let Some(field) = self.draft.missing_field(&self.capabilities) {
            warn!("start: setup incomplete, missing {}", field);
            return Err(KioskError::IncompleteSetup(field));
        }
        self.open_voting(now);
        Ok(())
    }

    fn open_voting(&mut self, now: NaiveDateTime) {
        self.event = self.draft.to_event_info(&self.capabilities);
        info!("open_voting: event {:?}", self.event);
        self.switch_screen(Screen::Voting);
        self.emit(KioskEvent::VotingDimmed(!self.gate.is_open(now)));
        self.emit(KioskEvent::RevealEnabled(self.can_reveal()));
    }

    // ******** Voting ********

    /// Records a vote given by its button value. Returns the new total.
    pub fn cast_vote(&mut self, value: i8, now: NaiveDateTime) -> Result<u64, KioskError> {
        self.tick(now);
        let category = Category::from_value(value)?;
        if self.screen != Screen::Voting || self.pin.is_some() {
            return Err(self.not_available("vote"));
        }
        let reopens_at = self.gate.try_vote(&mut self.tally, category, now)?;
        let total = self.tally.total();

        self.tasks.schedule(reopens_at, Deferred::ReopenGate);
        self.tasks.schedule(
            now + Duration::milliseconds(VOTE_HIGHLIGHT_MS),
            Deferred::ReleaseHighlight(category),
        );
        self.tasks
            .schedule(now + Duration::milliseconds(TOTAL_PULSE_MS), Deferred::SettlePulse);

        self.emit(KioskEvent::VoteAccepted(category));
        self.emit(KioskEvent::TotalChanged(total));
        self.emit(KioskEvent::TotalPulse(true));
        self.emit(KioskEvent::VoteHighlight {
            category,
            active: true,
        });
        self.emit(KioskEvent::VotingDimmed(true));
        if total == 1 {
            self.emit(KioskEvent::RevealEnabled(true));
        }
        Ok(total)
    }

    // ******** Reveal ********

    /// Asks for the results: opens the PIN dialog on a full kiosk, shows the
    /// results directly otherwise.
    pub fn request_reveal(&mut self, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        if self.screen != Screen::Voting {
            return Err(self.not_available("reveal"));
        }
        if self.tally.is_empty() {
            debug!("request_reveal: no votes yet, ignored");
            return Err(KioskError::EmptyReveal);
        }
        if self.capabilities.pin {
            self.pin = Some(PinChallenge::default());
            self.pin_error_until = None;
            self.emit(KioskEvent::PinDialog(true));
            self.emit(KioskEvent::PinError(false));
            Ok(())
        } else {
            self.show_results()
        }
    }

    /// Adds one digit to the PIN. Anything else, or a fourth digit, is
    /// dropped.
    pub fn enter_pin_digit(&mut self, c: char, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        let screen = self.screen;
        let challenge = self.pin.as_mut().ok_or(KioskError::NotAvailable {
            action: "enter PIN",
            screen,
        })?;
        if !challenge.push_digit(c) {
            debug!("enter_pin_digit: dropped {:?}", c);
        }
        Ok(())
    }

    /// Checks the PIN, either the digits entered so far or the given value.
    pub fn submit_pin(&mut self, value: Option<&str>, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        let screen = self.screen;
        let challenge = self.pin.as_mut().ok_or(KioskError::NotAvailable {
            action: "submit PIN",
            screen,
        })?;
        if let Some(v) = value {
            challenge.set_value(v);
        }
        if challenge.matches() {
            info!("submit_pin: accepted");
            self.close_pin_dialog();
            return self.show_results();
        }

        warn!("submit_pin: wrong PIN");
        challenge.attempt.clear();
        let until = now + Duration::milliseconds(PIN_ERROR_DISPLAY_MS);
        self.pin_error_until = Some(until);
        self.tasks.schedule(until, Deferred::ClearPinError);
        self.emit(KioskEvent::PinError(true));
        Err(KioskError::PinMismatch)
    }

    pub fn cancel_pin(&mut self, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        if self.pin.is_none() {
            return Err(self.not_available("cancel PIN"));
        }
        self.close_pin_dialog();
        Ok(())
    }

    // ******** Results ********

    pub fn request_report(&mut self, now: NaiveDateTime) -> Result<Report, KioskError> {
        self.tick(now);
        if !self.capabilities.export || self.screen != Screen::Results {
            return Err(self.not_available("download"));
        }
        let report = format_report(&self.tally, &self.event, self.language, now)?;
        self.emit(KioskEvent::ReportReady(report.clone()));
        Ok(report)
    }

    pub fn request_print(&mut self, now: NaiveDateTime) -> Result<(), KioskError> {
        self.tick(now);
        if self.screen != Screen::Results {
            return Err(self.not_available("print"));
        }
        self.emit(KioskEvent::PrintRequested);
        Ok(())
    }

    /// Clears everything and goes back to the first screen.
    ///
    /// Delayed tasks still pending keep running later; they find the kiosk
    /// already at rest and do nothing.
    pub fn reset(&mut self, now: NaiveDateTime) {
        self.tick(now);
        info!("reset: {} votes discarded", self.tally.total());
        self.tally.reset();
        self.gate.reset();
        self.draft = SetupDraft::default();
        self.event = EventInfo::default();
        self.language = Language::default();
        self.close_pin_dialog();

        self.emit(KioskEvent::TotalChanged(0));
        self.emit(KioskEvent::VotingDimmed(false));
        self.emit(KioskEvent::RevealEnabled(false));
        self.emit(KioskEvent::CustomProductVisible(false));
        self.emit(KioskEvent::StartEnabled(false));
        self.emit(KioskEvent::LanguageChanged(self.language));
        self.switch_screen(self.capabilities.initial_screen());
    }

    // ******** Internals ********

    fn show_results(&mut self) -> Result<(), KioskError> {
        let summary = self.tally.summary()?;
        info!("show_results: {} votes", summary.total);
        self.emit(KioskEvent::ResultsReady(summary));
        self.switch_screen(Screen::Results);
        Ok(())
    }

    fn close_pin_dialog(&mut self) {
        if self.pin.take().is_some() {
            self.emit(KioskEvent::PinDialog(false));
        }
        if self.pin_error_until.take().is_some() {
            self.emit(KioskEvent::PinError(false));
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        debug!("switch_screen: {} -> {}", self.screen, screen);
        self.screen = screen;
        self.emit(KioskEvent::ScreenChanged(screen));
    }

    fn emit_start_enabled(&mut self) {
        let enabled = self.can_start();
        self.emit(KioskEvent::StartEnabled(enabled));
    }

    fn emit(&mut self, event: KioskEvent) {
        self.events.push(event);
    }

    fn require_initial_screen(&self, action: &'static str) -> Result<(), KioskError> {
        if self.screen == self.capabilities.initial_screen() {
            Ok(())
        } else {
            Err(self.not_available(action))
        }
    }

    fn require_setup(&self, action: &'static str) -> Result<(), KioskError> {
        if self.capabilities.setup {
            self.require_initial_screen(action)
        } else {
            Err(self.not_available(action))
        }
    }

    fn not_available(&self, action: &'static str) -> KioskError {
        KioskError::NotAvailable {
            action,
            screen: self.screen,
        }
    }
}
