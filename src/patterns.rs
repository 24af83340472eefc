//! Usage pattern detection
//!
//! Produces free-text observations straight from the raw snapshot. Rules run
//! in a fixed order and each one either emits a single message or nothing.

use crate::types::{AppUsage, CategoryTotals, Session, UsageSnapshot};

/// Start hour (inclusive) that marks a session as late night
const LATE_START_HOUR: i32 = 22;

/// End hour (inclusive) that marks a session as late night
const LATE_END_HOUR: i32 = 23;

/// Share of total screen time above which one app is called out
const TOP_APP_SHARE_PCT: f64 = 50.0;

/// Hour span above which a session counts as extended
const EXTENDED_SESSION_HOURS: i64 = 4;

/// Share of total screen time above which one category is called out
const SKEWED_CATEGORY_SHARE: f64 = 0.7;

/// Run every pattern rule against the snapshot
pub fn detect_patterns(snapshot: &UsageSnapshot) -> Vec<String> {
    let total = snapshot.total_screen_time_minutes;

    [
        late_night_sessions(&snapshot.sessions),
        top_app_focus(&snapshot.apps, total),
        extended_sessions(&snapshot.sessions),
        skewed_category(&snapshot.apps, total),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn late_night_sessions(sessions: &[Session]) -> Option<String> {
    let count = sessions
        .iter()
        .filter(|s| s.start_hour >= LATE_START_HOUR || s.end_hour >= LATE_END_HOUR)
        .count();

    (count > 0).then(|| format!("Late night usage detected in {count} session(s)"))
}

fn top_app_focus(apps: &[AppUsage], total: u32) -> Option<String> {
    if total == 0 {
        return None;
    }

    // First app wins a tie
    let top = apps
        .iter()
        .reduce(|best, app| if app.minutes > best.minutes { app } else { best })?;

    let pct = f64::from(top.minutes) / f64::from(total) * 100.0;
    (pct > TOP_APP_SHARE_PCT).then(|| format!("Heavy focus on {} ({pct:.0}% of time)", top.name))
}

fn extended_sessions(sessions: &[Session]) -> Option<String> {
    let count = sessions
        .iter()
        .filter(|s| s.span_hours() > EXTENDED_SESSION_HOURS)
        .count();

    (count > 0).then(|| format!("{count} extended session(s) over 4 hours"))
}

fn skewed_category(apps: &[AppUsage], total: u32) -> Option<String> {
    if total == 0 {
        return None;
    }

    let totals = CategoryTotals::from_apps(apps);
    let (category, minutes) = totals.dominant()?;

    (minutes as f64 / f64::from(total) > SKEWED_CATEGORY_SHARE)
        .then(|| format!("Heavily skewed toward {category} activities"))
}
