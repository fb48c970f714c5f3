// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Time after an accepted vote during which further votes are rejected.
pub const VOTE_COOLDOWN_MS: i64 = 700;
/// How long a wrong PIN message stays visible.
pub const PIN_ERROR_DISPLAY_MS: i64 = 3000;
/// How long a vote button stays highlighted after a click.
pub const VOTE_HIGHLIGHT_MS: i64 = 400;
/// How long the total counter stays enlarged after a vote.
pub const TOTAL_PULSE_MS: i64 = 200;

/// The code that unlocks the results screen.
///
/// This is a shared secret compiled into the kiosk. Anybody reading the binary
/// or the presentation layer can recover it: it only keeps participants from
/// revealing the results by accident and is not an access control.
pub const REVEAL_PIN: &str = "313";
pub const PIN_LENGTH: usize = 3;

/// Product label used when "custom" is selected but no text was typed.
pub const CUSTOM_PRODUCT_LABEL: &str = "Custom";

/// The five ordinal answers a participant can give.
///
/// The numeric values are the ones shown on the voting buttons, from -1 (the
/// trend decreased) to 3 (the trend strongly increased).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    Decreased,
    Same,
    SlightlyIncreased,
    ModeratelyIncreased,
    StronglyIncreased,
}

impl Category {
    /// All the categories, in the order used by the results and the report.
    pub const ALL: [Category; 5] = [
        Category::Decreased,
        Category::Same,
        Category::SlightlyIncreased,
        Category::ModeratelyIncreased,
        Category::StronglyIncreased,
    ];

    pub fn value(self) -> i8 {
        match self {
            Category::Decreased => -1,
            Category::Same => 0,
            Category::SlightlyIncreased => 1,
            Category::ModeratelyIncreased => 2,
            Category::StronglyIncreased => 3,
        }
    }

    pub fn from_value(value: i8) -> Result<Category, KioskError> {
        Category::ALL
            .iter()
            .find(|c| c.value() == value)
            .copied()
            .ok_or(KioskError::InvalidCategory(value))
    }

    pub(crate) fn index(self) -> usize {
        (self.value() + 1) as usize
    }

    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::De, Category::Decreased) => "Gesunken",
            (Language::De, Category::Same) => "Gleich geblieben",
            (Language::De, Category::SlightlyIncreased) => "Leicht gestiegen",
            (Language::De, Category::ModeratelyIncreased) => "Mittel gestiegen",
            (Language::De, Category::StronglyIncreased) => "Stark gestiegen",
            (Language::En, Category::Decreased) => "Decreased",
            (Language::En, Category::Same) => "Stayed the same",
            (Language::En, Category::SlightlyIncreased) => "Slightly increased",
            (Language::En, Category::ModeratelyIncreased) => "Moderately increased",
            (Language::En, Category::StronglyIncreased) => "Strongly increased",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "de" => Some(Language::De),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// The name of the language, written in that language.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::De => "Deutsch",
            Language::En => "English",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Screen {
    /// Language and event selection (full kiosk).
    Setup,
    /// Language selection only (reduced kiosk).
    LanguagePick,
    Voting,
    Results,
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Screen::Setup => "setup",
            Screen::LanguagePick => "language",
            Screen::Voting => "voting",
            Screen::Results => "results",
        };
        write!(f, "{}", name)
    }
}

/// The optional behaviours of a kiosk.
///
/// The full kiosk collects event information before voting, protects the
/// results behind a PIN and can export a text report. The reduced kiosk goes
/// from the language choice straight to voting and reveals the results on
/// request.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Capabilities {
    pub setup: bool,
    pub pin: bool,
    pub export: bool,
}

impl Capabilities {
    pub const FULL: Capabilities = Capabilities {
        setup: true,
        pin: true,
        export: true,
    };

    pub const REDUCED: Capabilities = Capabilities {
        setup: false,
        pin: false,
        export: false,
    };

    pub fn initial_screen(&self) -> Screen {
        if self.setup {
            Screen::Setup
        } else {
            Screen::LanguagePick
        }
    }
}

/// The product selected in the setup form.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub enum ProductChoice {
    #[default]
    None,
    /// A product from the list, identified by its display label.
    Catalog(String),
    /// A product typed in by the facilitator.
    Custom,
}

/// Information about the event, fixed once voting starts.
///
/// Fields that were not filled in are `None` and are left out of the report.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct EventInfo {
    pub language: Option<Language>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>,
}

impl EventInfo {
    pub fn has_details(&self) -> bool {
        self.industry.is_some() || self.country.is_some() || self.product.is_some()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SetupField {
    Language,
    Industry,
    Country,
}

impl Display for SetupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SetupField::Language => "language",
            SetupField::Industry => "industry",
            SetupField::Country => "country",
        };
        write!(f, "{}", name)
    }
}

/// Reasons for which an action leaves the kiosk unchanged.
///
/// None of them is fatal: the worst outcome of an error is that the action is
/// ignored.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum KioskError {
    /// The vote does not reference one of the five categories.
    InvalidCategory(i8),
    /// The vote arrived during the cooldown of a previous vote.
    GateClosed,
    /// The PIN entered does not unlock the results.
    PinMismatch,
    /// The results or the report were requested before any vote was cast.
    EmptyReveal,
    /// Voting cannot start before this field is selected.
    IncompleteSetup(SetupField),
    /// A percentage was requested from an empty tally.
    DivisionByZero,
    /// The action does not apply to the current screen or kiosk variant.
    NotAvailable {
        action: &'static str,
        screen: Screen,
    },
}

impl Error for KioskError {}

impl Display for KioskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KioskError::InvalidCategory(v) => write!(f, "invalid vote category {}", v),
            KioskError::GateClosed => write!(f, "voting is paused after the previous vote"),
            KioskError::PinMismatch => write!(f, "wrong PIN"),
            KioskError::EmptyReveal => write!(f, "no votes were cast"),
            KioskError::IncompleteSetup(field) => write!(f, "setup is missing the {}", field),
            KioskError::DivisionByZero => write!(f, "percentage of an empty tally"),
            KioskError::NotAvailable { action, screen } => {
                write!(f, "{} is not available on the {} screen", action, screen)
            }
        }
    }
}
