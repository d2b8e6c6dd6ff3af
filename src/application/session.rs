//! Dashboard session state and its transitions.
//!
//! The UI re-renders every frame from a [`Session`]. User intents go through
//! [`Session::request`], which either handles them locally (clear) or hands back
//! a [`Command`] for the background runtime. Once the command finishes, its
//! [`Outcome`] is folded back in with [`Session::apply`]. Nothing here performs
//! I/O, so every transition is testable on its own.

use crate::application::chart_composer::{self, ChartSpec};
use crate::domain::alias::{AliasCatalog, ModelAlias};
use crate::domain::market::OhlcvSeries;
use crate::domain::prediction::{ModelKey, PredictionSeries};
use crate::domain::prediction_store::PredictionStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Clear,
    PredictChampion,
    PredictSelected,
    RefreshHistory,
}

/// Remote work the session needs done.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PredictChampion {
        history_end: Option<DateTime<Utc>>,
    },
    PredictAlias {
        alias: ModelAlias,
        history_end: Option<DateTime<Utc>>,
    },
    RefreshHistory,
}

impl Command {
    /// Text for the busy indicator.
    pub fn busy_message(&self) -> String {
        match self {
            Command::PredictChampion { .. } => {
                "Generating predictions with the Champion model...".to_string()
            }
            Command::PredictAlias { alias, .. } => {
                format!("Generating predictions from model '{}'...", alias)
            }
            Command::RefreshHistory => "Loading price history...".to_string(),
        }
    }
}

/// Result of a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    HistoryRefreshed(OhlcvSeries),
    HistoryFailed(String),
    ChampionPredicted(PredictionSeries),
    ChampionFailed(String),
    AliasPredicted {
        alias: ModelAlias,
        series: PredictionSeries,
    },
    AliasFailed {
        alias: ModelAlias,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything fetched when the dashboard starts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    pub catalog: AliasCatalog,
    pub ohlcv: OhlcvSeries,
}

#[derive(Debug, Clone)]
pub struct Session {
    catalog: AliasCatalog,
    ohlcv: OhlcvSeries,
    history_error: Option<String>,
    store: PredictionStore,
    selected: Option<ModelAlias>,
    pending: Option<Command>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(loaded: LoadedSession) -> Self {
        let selected = loaded.catalog.first().cloned();
        Self {
            catalog: loaded.catalog,
            ohlcv: loaded.ohlcv,
            history_error: None,
            store: PredictionStore::new(),
            selected,
            pending: None,
            notice: None,
        }
    }

    pub fn catalog(&self) -> &AliasCatalog {
        &self.catalog
    }

    pub fn ohlcv(&self) -> &OhlcvSeries {
        &self.ohlcv
    }

    pub fn store(&self) -> &PredictionStore {
        &self.store
    }

    pub fn selected(&self) -> Option<&ModelAlias> {
        self.selected.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn history_error(&self) -> Option<&str> {
        self.history_error.as_deref()
    }

    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_predict_selected(&self) -> bool {
        self.selected.is_some() && !self.is_busy()
    }

    /// Selects an alias by the name shown in the selector. Unknown names are ignored.
    pub fn select_by_display(&mut self, display: &str) -> bool {
        match self.catalog.find_by_display(display) {
            Some(alias) => {
                self.selected = Some(alias.clone());
                true
            }
            None => false,
        }
    }

    /// Handles a user intent. Returns the remote command to run, if any.
    pub fn request(&mut self, action: Action) -> Option<Command> {
        // Local transition, allowed even while a request is in flight
        if action == Action::Clear {
            self.store.clear();
            self.notice = None;
            info!("Cleared all stored predictions");
            return None;
        }

        if let Some(pending) = &self.pending {
            debug!("Ignoring {:?} while {:?} is in flight", action, pending);
            return None;
        }

        let history_end = self.ohlcv.latest_datetime();
        let command = match action {
            Action::Clear => return None,
            Action::PredictChampion => Command::PredictChampion { history_end },
            Action::PredictSelected => {
                let alias = self.selected.clone()?;
                Command::PredictAlias { alias, history_end }
            }
            Action::RefreshHistory => Command::RefreshHistory,
        };

        self.pending = Some(command.clone());
        Some(command)
    }

    /// Folds a finished command back into the session.
    pub fn apply(&mut self, outcome: Outcome) {
        self.pending = None;

        self.notice = Some(match outcome {
            Outcome::HistoryRefreshed(ohlcv) => {
                let bars = ohlcv.len();
                self.ohlcv = ohlcv;
                self.history_error = None;
                Notice::new(NoticeLevel::Info, format!("Loaded {} bars of history", bars))
            }
            Outcome::HistoryFailed(reason) => {
                warn!("Price history unavailable: {}", reason);
                self.history_error = Some(reason.clone());
                Notice::new(
                    NoticeLevel::Error,
                    format!("Failed to load price history: {}", reason),
                )
            }
            Outcome::ChampionPredicted(series) => {
                self.store.put(ModelKey::Champion, series);
                Notice::new(NoticeLevel::Success, "Champion model prediction succeeded")
            }
            Outcome::ChampionFailed(reason) => Notice::new(
                NoticeLevel::Error,
                format!("Champion prediction call failed: {}", reason),
            ),
            Outcome::AliasPredicted { alias, series } => {
                let hours = series.len();
                self.store.put(ModelKey::Alias(alias.clone()), series);
                Notice::new(
                    NoticeLevel::Success,
                    format!(
                        "'{}' model prediction complete ({} hours predicted)",
                        alias, hours
                    ),
                )
            }
            Outcome::AliasFailed { alias, reason } => Notice::new(
                NoticeLevel::Warning,
                format!("API call for '{}' failed ({})", alias, reason),
            ),
        });
    }

    /// Chart for the current state. `None` while the history is unavailable.
    pub fn chart(&self) -> Option<ChartSpec> {
        if self.history_error.is_some() {
            return None;
        }
        Some(chart_composer::compose(&self.ohlcv, &self.store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::OhlcvBar;
    use crate::domain::prediction::PredictionPoint;
    use chrono::TimeZone;

    fn loaded() -> LoadedSession {
        let datetime = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        LoadedSession {
            catalog: AliasCatalog::from_wire_names(
                vec!["backtest_20250531", "backtest_20250615"],
                "backtest_",
            ),
            ohlcv: OhlcvSeries::new(vec![OhlcvBar {
                datetime,
                open: 10.0,
                high: 20.0,
                low: 5.0,
                close: 15.0,
                volume: None,
            }]),
        }
    }

    fn series(value: f64) -> PredictionSeries {
        PredictionSeries::new(vec![PredictionPoint {
            datetime: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            prediction: value,
        }])
    }

    #[test]
    fn test_first_alias_selected_by_default() {
        let session = Session::new(loaded());
        assert_eq!(session.selected().map(|a| a.display()), Some("20250531"));
        assert!(session.can_predict_selected());
    }

    #[test]
    fn test_predict_selected_uses_wire_name_and_history_end() {
        let mut session = Session::new(loaded());
        assert!(session.select_by_display("20250615"));

        let command = session.request(Action::PredictSelected).unwrap();
        match command {
            Command::PredictAlias { alias, history_end } => {
                assert_eq!(alias.wire(), "backtest_20250615");
                assert_eq!(history_end, session.ohlcv().latest_datetime());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(session.is_busy());
    }

    #[test]
    fn test_requests_rejected_while_busy() {
        let mut session = Session::new(loaded());
        assert!(session.request(Action::PredictChampion).is_some());
        assert!(session.request(Action::PredictSelected).is_none());

        session.request(Action::Clear);
        session.apply(Outcome::ChampionPredicted(series(12.0)));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_predict_selected_requires_selection() {
        let mut session = Session::new(LoadedSession {
            catalog: AliasCatalog::default(),
            ohlcv: OhlcvSeries::default(),
        });
        assert!(session.catalog().is_empty());
        assert!(!session.can_predict_selected());
        assert!(session.request(Action::PredictSelected).is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_failures_leave_store_unchanged() {
        let mut session = Session::new(loaded());
        session.request(Action::PredictChampion);
        session.apply(Outcome::ChampionPredicted(series(12.0)));
        let before = session.store().clone();

        let alias = session.selected().cloned().unwrap();
        session.request(Action::PredictSelected);
        session.apply(Outcome::AliasFailed {
            alias,
            reason: "missing field `predictions`".to_string(),
        });

        assert_eq!(session.store(), &before);
        assert_eq!(session.notice().unwrap().level, NoticeLevel::Warning);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_champion_failure_leaves_store_unchanged() {
        let mut session = Session::new(loaded());
        session.request(Action::PredictChampion);
        session.apply(Outcome::ChampionPredicted(series(12.0)));
        let before = session.store().clone();

        assert!(session.request(Action::PredictChampion).is_some());
        session.apply(Outcome::ChampionFailed(
            "/predict-champion timed out after 300s".to_string(),
        ));

        assert_eq!(session.store(), &before);
        let notice = session.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("timed out after 300s"));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_clear_allowed_while_busy() {
        let mut session = Session::new(loaded());
        session.request(Action::PredictChampion);
        session.apply(Outcome::ChampionPredicted(series(12.0)));

        assert!(session.request(Action::PredictChampion).is_some());
        assert!(session.request(Action::Clear).is_none());
        assert!(session.store().is_empty());
        assert!(session.is_busy());

        // The in-flight result still lands after the clear
        session.apply(Outcome::ChampionPredicted(series(13.0)));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_alias_success_reports_hours() {
        let mut session = Session::new(loaded());
        let alias = session.selected().cloned().unwrap();
        session.request(Action::PredictSelected);
        session.apply(Outcome::AliasPredicted {
            alias,
            series: series(11.0),
        });

        let notice = session.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.message.contains("'20250531'"));
        assert!(notice.message.contains("1 hours"));
    }

    #[test]
    fn test_clear_empties_store_without_remote_call() {
        let mut session = Session::new(loaded());
        session.request(Action::PredictChampion);
        session.apply(Outcome::ChampionPredicted(series(12.0)));

        assert!(session.request(Action::Clear).is_none());
        assert!(session.store().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_history_failure_hides_chart_until_refreshed() {
        let mut session = Session::new(loaded());
        session.request(Action::RefreshHistory);
        session.apply(Outcome::HistoryFailed("connection refused".to_string()));
        assert!(session.chart().is_none());
        assert!(session.history_error().is_some());

        session.request(Action::RefreshHistory);
        session.apply(Outcome::HistoryRefreshed(loaded().ohlcv));
        assert!(session.chart().is_some());
        assert!(session.history_error().is_none());
    }
}
