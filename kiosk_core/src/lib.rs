//! Core of the Teampower voting kiosk.
//!
//! Participants answer one question with one of five ordinal categories
//! ("decreased" to "strongly increased"). The kiosk counts the answers,
//! throttles repeated taps, and reveals the tallies on request, optionally
//! behind a PIN and with a downloadable text report.
//!
//! The crate holds no rendering code: a [`Presenter`] implementation receives
//! the changes to display, and [`Kiosk::handle`] receives the inputs.
//!
//! See the [manual] for the behaviour of each screen.

mod config;
mod controller;
mod deferred;
mod gate;
pub mod manual;
mod report;
mod session;
mod tally;

pub use crate::config::*;
pub use crate::controller::{Action, Kiosk, Presenter, ScreenController};
pub use crate::deferred::{Deferred, TaskQueue};
pub use crate::gate::{GateState, VotingGate};
pub use crate::report::{format_date, format_report, format_time, report_filename, Report};
pub use crate::session::{KioskEvent, PinChallenge, Session, SetupDraft};
pub use crate::tally::{CategoryResult, TallySummary, VoteTally};
