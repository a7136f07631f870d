//! MS-DOS timestamp handling.
//!
//! ZIP local headers and central-directory records store modification times as
//! a pair of 16-bit MS-DOS fields:
//!
//! - **time**: bits 15-11 hour, bits 10-5 minute, bits 4-0 seconds / 2
//! - **date**: bits 15-9 years since 1980, bits 8-5 month, bits 4-0 day
//!
//! The precision is two seconds and there is no time zone, which is one of
//! the reasons two builds of the same source rarely agree on these fields.
//! Canonical output pins every entry to [`DosDateTime::EPOCH`] unless the
//! caller configures a different instant.
//!
//! # Example
//!
//! ```rust
//! use canonzip::DosDateTime;
//!
//! let ts = DosDateTime::from_civil(2024, 3, 15, 13, 45, 30).unwrap();
//! assert_eq!(ts.year(), 2024);
//! assert_eq!(ts.second(), 30);
//!
//! let (time, date) = ts.to_raw();
//! assert_eq!(DosDateTime::from_raw(time, date), ts);
//! ```

/// A modification time as stored in ZIP headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime {
    // Field order makes the derived ordering chronological.
    date: u16,
    time: u16,
}

impl DosDateTime {
    /// 1980-01-01 00:00:00, the earliest representable instant.
    pub const EPOCH: DosDateTime = DosDateTime {
        date: (1 << 5) | 1,
        time: 0,
    };

    /// Creates a timestamp from the raw `(time, date)` header fields.
    #[inline]
    pub const fn from_raw(time: u16, date: u16) -> Self {
        Self { date, time }
    }

    /// Returns the raw `(time, date)` header fields.
    #[inline]
    pub const fn to_raw(self) -> (u16, u16) {
        (self.time, self.date)
    }

    /// Creates a timestamp from calendar components.
    ///
    /// Returns `None` when a component is out of range. Odd seconds are
    /// rounded down to the format's two-second precision.
    pub fn from_civil(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        if !(1980..=2107).contains(&year)
            || !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        let date = ((year - 1980) << 9) | (u16::from(month) << 5) | u16::from(day);
        let time = (u16::from(hour) << 11) | (u16::from(minute) << 5) | u16::from(second / 2);
        Some(Self { date, time })
    }

    /// Calendar year.
    pub fn year(self) -> u16 {
        1980 + (self.date >> 9)
    }

    /// Month, 1-12.
    pub fn month(self) -> u8 {
        ((self.date >> 5) & 0x0F) as u8
    }

    /// Day of month, 1-31.
    pub fn day(self) -> u8 {
        (self.date & 0x1F) as u8
    }

    /// Hour, 0-23.
    pub fn hour(self) -> u8 {
        (self.time >> 11) as u8
    }

    /// Minute, 0-59.
    pub fn minute(self) -> u8 {
        ((self.time >> 5) & 0x3F) as u8
    }

    /// Second, always even.
    pub fn second(self) -> u8 {
        ((self.time & 0x1F) * 2) as u8
    }
}

impl Default for DosDateTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl std::fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let epoch = DosDateTime::EPOCH;
        assert_eq!(epoch.year(), 1980);
        assert_eq!(epoch.month(), 1);
        assert_eq!(epoch.day(), 1);
        assert_eq!(epoch.to_raw(), (0x0000, 0x0021));
        assert_eq!(epoch.to_string(), "1980-01-01 00:00:00");
        assert_eq!(DosDateTime::default(), epoch);
    }

    #[test]
    fn test_from_civil_components() {
        let ts = DosDateTime::from_civil(2010, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ts.to_string(), "2010-01-01 00:00:00");

        let ts = DosDateTime::from_civil(2107, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(ts.year(), 2107);
        assert_eq!(ts.second(), 58);
    }

    #[test]
    fn test_from_civil_out_of_range() {
        assert!(DosDateTime::from_civil(1979, 12, 31, 0, 0, 0).is_none());
        assert!(DosDateTime::from_civil(2108, 1, 1, 0, 0, 0).is_none());
        assert!(DosDateTime::from_civil(2000, 13, 1, 0, 0, 0).is_none());
        assert!(DosDateTime::from_civil(2000, 1, 0, 0, 0, 0).is_none());
        assert!(DosDateTime::from_civil(2000, 1, 1, 24, 0, 0).is_none());
    }

    #[test]
    fn test_raw_roundtrip() {
        let ts = DosDateTime::from_raw(0x6B2F, 0x586F);
        assert_eq!(DosDateTime::from_raw(ts.to_raw().0, ts.to_raw().1), ts);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = DosDateTime::from_civil(2020, 6, 1, 23, 0, 0).unwrap();
        let later = DosDateTime::from_civil(2020, 6, 2, 0, 0, 0).unwrap();
        assert!(earlier < later);
    }
}
