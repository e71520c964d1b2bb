use std::time::{Duration, Instant};

/// How urgently a save is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIndicator {
    Green,
    Yellow,
    Red,
}

impl SaveIndicator {
    /// Red at the interval, yellow from 70% of it.
    pub fn for_elapsed(elapsed: Duration, interval: Duration) -> Self {
        if elapsed >= interval {
            SaveIndicator::Red
        } else if elapsed >= interval * 7 / 10 {
            SaveIndicator::Yellow
        } else {
            SaveIndicator::Green
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            SaveIndicator::Green => "Recent save - you're up to date",
            SaveIndicator::Yellow => "Consider saving soon",
            SaveIndicator::Red => "Save recommended - it's been a while",
        }
    }
}

/// Tracks time since the last save against a reminder interval.
#[derive(Debug, Clone)]
pub struct SaveReminder {
    pub interval: Duration,
    last_save: Instant,
}

impl SaveReminder {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_save: now,
        }
    }

    pub fn mark_saved(&mut self, now: Instant) {
        self.last_save = now;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_save)
    }

    pub fn indicator(&self, now: Instant) -> SaveIndicator {
        SaveIndicator::for_elapsed(self.elapsed(now), self.interval)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.indicator(now) == SaveIndicator::Red
    }
}

/// Decides when an automatic backup should run.
#[derive(Debug, Clone)]
pub struct BackupSchedule {
    pub enabled: bool,
    pub interval: Duration,
    last_backup: Instant,
}

impl BackupSchedule {
    pub fn new(enabled: bool, interval: Duration, now: Instant) -> Self {
        Self {
            enabled,
            interval,
            last_backup: now,
        }
    }

    /// Only saved scenes with unsaved changes are backed up.
    pub fn is_due(&self, now: Instant, scene_saved: bool, scene_modified: bool) -> bool {
        self.enabled
            && scene_saved
            && scene_modified
            && now.saturating_duration_since(self.last_backup) >= self.interval
    }

    /// Saves restart the backup clock too.
    pub fn mark_backed_up(&mut self, now: Instant) {
        self.last_backup = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(60);

    #[test]
    fn indicator_thresholds() {
        let interval = MIN * 10;
        assert_eq!(SaveIndicator::for_elapsed(MIN * 2, interval), SaveIndicator::Green);
        assert_eq!(SaveIndicator::for_elapsed(MIN * 8, interval), SaveIndicator::Yellow);
        assert_eq!(SaveIndicator::for_elapsed(MIN * 10, interval), SaveIndicator::Red);
    }

    #[test]
    fn reminder_resets_on_save() {
        let start = Instant::now();
        let mut reminder = SaveReminder::new(MIN * 15, start);
        let later = start + MIN * 16;
        assert!(reminder.is_due(later));

        reminder.mark_saved(later);
        assert!(!reminder.is_due(later + MIN));
        assert_eq!(reminder.indicator(later + MIN), SaveIndicator::Green);
    }

    #[test]
    fn backup_needs_enabled_saved_and_modified() {
        let start = Instant::now();
        let later = start + MIN * 31;
        let schedule = BackupSchedule::new(true, MIN * 30, start);

        assert!(schedule.is_due(later, true, true));
        assert!(!schedule.is_due(later, false, true));
        assert!(!schedule.is_due(later, true, false));
        assert!(!schedule.is_due(start + MIN, true, true));

        let disabled = BackupSchedule::new(false, MIN * 30, start);
        assert!(!disabled.is_due(later, true, true));
    }

    #[test]
    fn backup_clock_restarts() {
        let start = Instant::now();
        let mut schedule = BackupSchedule::new(true, MIN * 30, start);
        let later = start + MIN * 31;
        schedule.mark_backed_up(later);
        assert!(!schedule.is_due(later + MIN, true, true));
    }
}
