//! Last-modified timestamp shown next to the table.

use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use std::fmt;

/// Display offset of the roster's home locale (UTC+8).
const DISPLAY_OFFSET_SECS: i32 = 8 * 3600;

/// Epoch seconds at which the upstream roster was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LastModified(pub i64);

impl LastModified {
    pub fn now() -> Self {
        LastModified(Utc::now().timestamp())
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0
    }

    fn utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    /// Machine-readable form, e.g. `2021-03-05T06:03:07.000Z`.
    pub fn iso(&self) -> String {
        self.utc().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `zh-CN` short date with 24h medium time at UTC+8, e.g. `2021/3/5 14:03:07`.
    pub fn display(&self) -> String {
        let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        self.utc()
            .with_timezone(&offset)
            .format("%Y/%-m/%-d %H:%M:%S")
            .to_string()
    }
}

impl fmt::Display for LastModified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_fixed_locale() {
        // 2021-03-05T06:03:07Z
        let lm = LastModified(1614924187);
        assert_eq!(lm.iso(), "2021-03-05T06:03:07.000Z");
        assert_eq!(lm.display(), "2021/3/5 14:03:07");
    }

    #[test]
    fn crosses_midnight_into_next_day() {
        // 2021-12-31T20:00:00Z is already 2022 at UTC+8
        let lm = LastModified(1640980800);
        assert_eq!(lm.display(), "2022/1/1 04:00:00");
    }
}
