// Reading session scripts.

use chrono::{Duration, NaiveDateTime};
use kiosk_core::{Action, Capabilities, Language, ProductChoice};
use serde::Deserialize;
use snafu::prelude::*;

use crate::kiosk::*;

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct SessionScript {
    /// `full` (default) or `reduced`.
    pub variant: Option<String>,
    /// Local time of the first action. Defaults to the current time.
    #[serde(rename = "startedAt")]
    pub started_at: Option<NaiveDateTime>,
    /// Where to write the reports, relative to the script.
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub actions: Vec<ScriptStep>,
}

/// One input of the script. Which of the optional fields is needed depends
/// on the action.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct ScriptStep {
    #[serde(rename = "atMs")]
    pub at_ms: i64,
    pub action: String,
    pub language: Option<String>,
    pub value: Option<String>,
    pub category: Option<i64>,
}

pub fn read_script(path: &str) -> KioskCliResult<SessionScript> {
    let contents = fs::read_to_string(path).context(OpeningScriptSnafu { path })?;
    debug!("read_script: {} bytes from {}", contents.len(), path);
    parse_script(&contents, path)
}

pub fn parse_script(contents: &str, path: &str) -> KioskCliResult<SessionScript> {
    serde_json::from_str(contents).context(ParsingScriptSnafu { path })
}

pub fn read_variant(name: &str) -> KioskCliResult<Capabilities> {
    match name {
        "full" => Ok(Capabilities::FULL),
        "reduced" => Ok(Capabilities::REDUCED),
        _ => UnknownVariantSnafu { name }.fail(),
    }
}

fn required<'a>(
    value: &'a Option<String>,
    step: usize,
    step_action: &ScriptStep,
    field: &'static str,
) -> KioskCliResult<&'a str> {
    value.as_deref().context(MissingFieldSnafu {
        step,
        action: step_action.action.clone(),
        field,
    })
}

/// Turns one step into a kiosk input. `step` is the position in the script,
/// starting at 1, used in the error messages.
pub fn read_action(step: usize, s: &ScriptStep) -> KioskCliResult<Action> {
    let action = match s.action.as_str() {
        "selectLanguage" => {
            let code = required(&s.language, step, s, "language")?;
            let lang =
                Language::from_code(code).context(UnknownLanguageSnafu { step, code })?;
            Action::SelectLanguage(lang)
        }
        "selectIndustry" => {
            Action::SelectIndustry(s.value.clone().unwrap_or_default())
        }
        "selectCountry" => Action::SelectCountry(s.value.clone().unwrap_or_default()),
        "selectProduct" => Action::SelectProduct(match s.value.as_deref().map(str::trim) {
            None | Some("") => ProductChoice::None,
            Some("custom") => ProductChoice::Custom,
            Some(label) => ProductChoice::Catalog(label.to_string()),
        }),
        "setCustomProduct" => Action::SetCustomProduct(s.value.clone().unwrap_or_default()),
        "start" => Action::Start,
        "vote" => {
            let value = s.category.context(MissingFieldSnafu {
                step,
                action: s.action.clone(),
                field: "category",
            })?;
            let v = i8::try_from(value)
                .ok()
                .context(CategoryRangeSnafu { step, value })?;
            Action::Vote(v)
        }
        "reveal" => Action::RequestReveal,
        "pinDigit" => {
            let text = required(&s.value, step, s, "value")?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Action::EnterPinDigit(c),
                _ => whatever!(
                    "Step {}: pinDigit expects a single character, got {:?}",
                    step,
                    text
                ),
            }
        }
        "submitPin" => Action::SubmitPin(s.value.clone()),
        "cancelPin" => Action::CancelPin,
        "reset" => Action::Reset,
        "download" => Action::Download,
        "print" => Action::Print,
        x => {
            return UnknownActionSnafu {
                step,
                action: x.to_string(),
            }
            .fail()
        }
    };
    Ok(action)
}

/// All the inputs of the script with their time, in script order.
pub fn read_timeline(
    script: &SessionScript,
    started_at: NaiveDateTime,
) -> KioskCliResult<Vec<(NaiveDateTime, Action)>> {
    let mut res: Vec<(NaiveDateTime, Action)> = Vec::new();
    for (idx, s) in script.actions.iter().enumerate() {
        let step = idx + 1;
        if s.at_ms < 0 {
            whatever!("Step {}: negative time {}", step, s.at_ms)
        }
        if let Some((previous, _)) = res.last() {
            let now = started_at + Duration::milliseconds(s.at_ms);
            if now < *previous {
                whatever!("Step {}: time {} ms goes backwards", step, s.at_ms)
            }
        }
        let action = read_action(step, s)?;
        res.push((started_at + Duration::milliseconds(s.at_ms), action));
    }
    Ok(res)
}
