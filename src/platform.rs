//! Host services the policy reads time from.
use chrono::{DateTime, Utc};

use crate::Result;

/// Source of the current time.
pub trait Clock {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time.
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: Fn() -> DateTime<Utc>> Clock for T {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Platform metadata reporting when the application was first installed.
///
/// Returning `Ok(None)` or an error are both fine: the client then treats the application as
/// installed at the moment it first observed a launch.
pub trait InstallTimeSource {
    /// When the application was first installed, if the platform knows.
    fn first_install_time(&self) -> Result<Option<DateTime<Utc>>>;
}

/// [`InstallTimeSource`] for platforms that expose no install metadata.
pub struct UnknownInstallTime;
impl InstallTimeSource for UnknownInstallTime {
    fn first_install_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

impl<T: Fn() -> Result<Option<DateTime<Utc>>>> InstallTimeSource for T {
    fn first_install_time(&self) -> Result<Option<DateTime<Utc>>> {
        self()
    }
}

/// Resolve the install time, substituting `now` for anything the platform cannot report.
pub(crate) fn resolve_install_time(
    source: &dyn InstallTimeSource,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match source.first_install_time() {
        Ok(Some(installed_at)) => installed_at,
        Ok(None) => {
            log::debug!(target: "rate_prompt", "no install time reported, using current time");
            now
        }
        Err(err) => {
            log::warn!(target: "rate_prompt",
                       "failed to read first install time, using current time: {:?}", err);
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::{resolve_install_time, Clock, UnknownInstallTime};
    use crate::{Error, Result};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn closure_is_a_clock() {
        let clock = || at(1_000);
        assert_eq!(clock.now(), at(1_000));
    }

    #[test]
    fn reported_install_time_wins() {
        let source = || -> Result<Option<DateTime<Utc>>> { Ok(Some(at(10))) };
        assert_eq!(resolve_install_time(&source, at(99)), at(10));
    }

    #[test]
    fn missing_install_time_falls_back_to_now() {
        assert_eq!(resolve_install_time(&UnknownInstallTime, at(99)), at(99));
    }

    #[test]
    fn failing_install_time_falls_back_to_now() {
        let source = || -> Result<Option<DateTime<Utc>>> { Err(Error::InstallTimeUnavailable) };
        assert_eq!(resolve_install_time(&source, at(99)), at(99));
    }
}
