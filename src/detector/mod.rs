//! Opportunity detector - alerting state around the pure analysis functions
//!
//! Implements:
//! - Arbitrage and positive-EV scans with minimum thresholds
//! - Per (event, kind) cooldown so a standing opportunity alerts once
//! - Bounded ring buffer of recent alerts, oldest evicted first
//! - Subscriber callbacks fired for every emitted alert
//!
//! The detector is an ordinary value owned by the caller. Interior state
//! sits behind `RwLock`s so one instance can be shared across threads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{LockResult, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::arbitrage::analyze_arbitrage;
use crate::error::Result;
use crate::types::Outcome;
use crate::value::analyze_ev;

/// Longest accepted quiet period, one week. Larger values are clamped.
pub const MAX_ALERT_COOLDOWN_SECS: i64 = 7 * 24 * 60 * 60;

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum locked-in profit (percent of stake) worth alerting
    pub min_arbitrage_profit_percent: f64,
    /// Minimum EV (percent of stake) worth alerting
    pub min_ev_percent: f64,
    /// Quiet period per (event, kind) after an alert, at most
    /// `MAX_ALERT_COOLDOWN_SECS`
    pub alert_cooldown_secs: i64,
    /// Capacity of the recent-alerts buffer
    pub max_recent_alerts: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_arbitrage_profit_percent: 0.5,
            min_ev_percent: 2.0,
            alert_cooldown_secs: 300,
            max_recent_alerts: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Arbitrage,
    PositiveEv,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Arbitrage => write!(f, "arbitrage"),
            AlertKind::PositiveEv => write!(f, "positive_ev"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub event: String,
    pub detail: String,
    /// Profit percent for arbitrage, EV percent for value bets
    pub value_percent: f64,
    pub created_at: DateTime<Utc>,
}

type AlertCallback = Box<dyn Fn(&Alert) + Send + Sync>;

pub struct OpportunityDetector {
    config: DetectorConfig,
    cooldown: Duration,
    recent: RwLock<VecDeque<Alert>>,
    last_alerted: RwLock<HashMap<(String, AlertKind), DateTime<Utc>>>,
    callbacks: RwLock<Vec<AlertCallback>>,
}

impl OpportunityDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let capacity = config.max_recent_alerts;
        let cooldown = Duration::seconds(
            config
                .alert_cooldown_secs
                .clamp(0, MAX_ALERT_COOLDOWN_SECS),
        );
        Self {
            config,
            cooldown,
            recent: RwLock::new(VecDeque::with_capacity(capacity)),
            last_alerted: RwLock::new(HashMap::new()),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        recover("callbacks", self.callbacks.write()).push(Box::new(callback));
    }

    /// Alert when the outcomes lock in at least the configured profit.
    pub fn scan_arbitrage(
        &self,
        event: &str,
        outcomes: &[Outcome],
        total_stake: f64,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>> {
        let analysis = analyze_arbitrage(outcomes, total_stake)?;
        let profit_pct = analysis.profit.profit_percent;

        if !analysis.is_arbitrage() || profit_pct < self.config.min_arbitrage_profit_percent {
            debug!(event, profit_pct, "no arbitrage above threshold");
            return Ok(None);
        }

        let legs: Vec<String> = analysis
            .stakes
            .iter()
            .map(|s| format!("{} @ {} ${:.2}", s.label, s.source, s.stake))
            .collect();
        let detail = format!(
            "{} arbitrage, {:.2}% locked in: {}",
            analysis.quality,
            profit_pct,
            legs.join(", ")
        );

        Ok(self.emit(AlertKind::Arbitrage, event, detail, profit_pct, now))
    }

    /// Alert when a single price is a bet or strong bet at the caller's
    /// probability estimate.
    pub fn scan_value(
        &self,
        event: &str,
        selection: &str,
        true_probability: f64,
        american_odds: i32,
        stake: f64,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>> {
        let analysis = analyze_ev(true_probability, american_odds, stake, None, None)?;
        let ev_pct = analysis.ev.ev_percent;

        if !analysis.recommendation.is_actionable() || ev_pct < self.config.min_ev_percent {
            debug!(event, selection, ev_pct, "no value above threshold");
            return Ok(None);
        }

        let detail = format!(
            "{} {:+} ({}): EV {:.2}%, edge {:.2}pp, {} confidence",
            selection,
            american_odds,
            analysis.recommendation,
            ev_pct,
            analysis.edge.edge_percent,
            analysis.confidence
        );

        Ok(self.emit(AlertKind::PositiveEv, event, detail, ev_pct, now))
    }

    /// Newest first
    pub fn recent_alerts(&self) -> Vec<Alert> {
        recover("recent", self.recent.read())
            .iter()
            .rev()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        recover("recent", self.recent.write()).clear();
        recover("last_alerted", self.last_alerted.write()).clear();
    }

    fn emit(
        &self,
        kind: AlertKind,
        event: &str,
        detail: String,
        value_percent: f64,
        now: DateTime<Utc>,
    ) -> Option<Alert> {
        let key = (event.to_string(), kind);
        {
            let mut last = recover("last_alerted", self.last_alerted.write());
            if let Some(previous) = last.get(&key) {
                if now - *previous < self.cooldown {
                    info!(event, %kind, "alert suppressed by cooldown");
                    return None;
                }
            }
            last.insert(key, now);
        }

        let alert = Alert {
            id: Uuid::new_v4(),
            kind,
            event: event.to_string(),
            detail,
            value_percent,
            created_at: now,
        };

        {
            let mut recent = recover("recent", self.recent.write());
            while recent.len() >= self.config.max_recent_alerts.max(1) {
                recent.pop_front();
            }
            recent.push_back(alert.clone());
        }

        info!(event, %kind, value_pct = value_percent, "{}", alert.detail);

        for callback in recover("callbacks", self.callbacks.read()).iter() {
            callback(&alert);
        }

        Some(alert)
    }
}

/// A panicking subscriber poisons the lock it held; the guarded state is
/// still consistent, so keep going.
fn recover<G>(lock: &'static str, result: LockResult<G>) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(lock, "detector lock poisoned, recovering");
        poisoned.into_inner()
    })
}

impl Default for OpportunityDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn arb_outcomes() -> Vec<Outcome> {
        vec![
            Outcome::new("Home", "BookA", 120),
            Outcome::new("Away", "BookB", 120),
        ]
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn arbitrage_alert_emitted_and_recorded() {
        let detector = OpportunityDetector::default();
        let alert = detector
            .scan_arbitrage("game-1", &arb_outcomes(), 1_000.0, t0())
            .unwrap()
            .unwrap();

        assert_eq!(alert.kind, AlertKind::Arbitrage);
        assert!((alert.value_percent - 10.0).abs() < 1e-9);
        assert!(alert.detail.contains("excellent"));
        assert_eq!(detector.recent_alerts(), vec![alert]);
    }

    #[test]
    fn no_alert_without_arbitrage() {
        let detector = OpportunityDetector::default();
        let outcomes = vec![
            Outcome::new("Home", "BookA", -110),
            Outcome::new("Away", "BookB", -110),
        ];
        assert!(detector
            .scan_arbitrage("game-1", &outcomes, 1_000.0, t0())
            .unwrap()
            .is_none());
        assert!(detector.recent_alerts().is_empty());
    }

    #[test]
    fn cooldown_suppresses_repeat_alerts() {
        let detector = OpportunityDetector::default();
        let outcomes = arb_outcomes();

        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, t0()).unwrap().is_some());
        let soon = t0() + Duration::seconds(60);
        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, soon).unwrap().is_none());
        // A different event is tracked separately
        assert!(detector.scan_arbitrage("h", &outcomes, 100.0, soon).unwrap().is_some());

        let later = t0() + Duration::seconds(300);
        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, later).unwrap().is_some());
        assert_eq!(detector.recent_alerts().len(), 3);
    }

    #[test]
    fn ring_buffer_evicts_oldest() {
        let detector = OpportunityDetector::new(DetectorConfig {
            max_recent_alerts: 2,
            ..DetectorConfig::default()
        });
        for event in ["a", "b", "c"] {
            detector
                .scan_arbitrage(event, &arb_outcomes(), 100.0, t0())
                .unwrap();
        }
        let events: Vec<String> = detector.recent_alerts().into_iter().map(|a| a.event).collect();
        assert_eq!(events, vec!["c".to_string(), "b".to_string()]);

        detector.clear();
        assert!(detector.recent_alerts().is_empty());
    }

    #[test]
    fn value_alert_respects_recommendation() {
        let detector = OpportunityDetector::default();

        let alert = detector
            .scan_value("game-2", "Over 47.5", 0.60, 100, 100.0, t0())
            .unwrap()
            .unwrap();
        assert_eq!(alert.kind, AlertKind::PositiveEv);
        assert!(alert.detail.contains("strong_bet"));

        // Positive EV but low confidence edge: pass, no alert
        assert!(detector
            .scan_value("game-3", "Under 47.5", 0.535, -110, 100.0, t0())
            .unwrap()
            .is_none());
    }

    #[test]
    fn callbacks_receive_alerts() {
        let detector = OpportunityDetector::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        detector.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        detector.scan_arbitrage("g", &arb_outcomes(), 100.0, t0()).unwrap();
        detector.scan_arbitrage("g", &arb_outcomes(), 100.0, t0()).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn oversized_cooldown_is_clamped() {
        let detector = OpportunityDetector::new(DetectorConfig {
            alert_cooldown_secs: i64::MAX,
            ..DetectorConfig::default()
        });
        let outcomes = arb_outcomes();

        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, t0()).unwrap().is_some());
        let inside = t0() + Duration::seconds(MAX_ALERT_COOLDOWN_SECS - 1);
        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, inside).unwrap().is_none());
        let after = t0() + Duration::seconds(MAX_ALERT_COOLDOWN_SECS);
        assert!(detector.scan_arbitrage("g", &outcomes, 100.0, after).unwrap().is_some());
    }

    #[test]
    fn negative_cooldown_alerts_every_scan() {
        let detector = OpportunityDetector::new(DetectorConfig {
            alert_cooldown_secs: -10,
            ..DetectorConfig::default()
        });
        assert!(detector.scan_arbitrage("g", &arb_outcomes(), 100.0, t0()).unwrap().is_some());
        assert!(detector.scan_arbitrage("g", &arb_outcomes(), 100.0, t0()).unwrap().is_some());
    }

    #[test]
    fn poisoned_locks_are_recovered() {
        let detector = Arc::new(OpportunityDetector::default());
        let shared = Arc::clone(&detector);
        let _ = std::thread::spawn(move || {
            let _last = shared.last_alerted.write().unwrap();
            let _recent = shared.recent.write().unwrap();
            let _callbacks = shared.callbacks.write().unwrap();
            panic!("writer died holding detector state");
        })
        .join();
        assert!(detector.last_alerted.is_poisoned());
        assert!(detector.callbacks.is_poisoned());

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        detector.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let alert = detector
            .scan_arbitrage("g", &arb_outcomes(), 100.0, t0())
            .unwrap();
        assert!(alert.is_some());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(detector.recent_alerts().len(), 1);

        // Cooldown state survived too
        assert!(detector
            .scan_arbitrage("g", &arb_outcomes(), 100.0, t0())
            .unwrap()
            .is_none());
    }

    #[test]
    fn math_errors_propagate() {
        let detector = OpportunityDetector::default();
        assert!(detector.scan_arbitrage("g", &arb_outcomes()[..1], 100.0, t0()).is_err());
        assert!(detector.scan_value("g", "x", 1.5, 100, 100.0, t0()).is_err());
    }
}
