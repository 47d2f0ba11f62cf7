/// Width of one grid slot unless configured otherwise.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

pub const DEFAULT_DAY_START_HOUR: u32 = 0;
pub const DEFAULT_DAY_END_HOUR: u32 = 24;

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Seconds before a feed request is abandoned.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Upper bound on occurrences generated for one recurring event in a week.
pub const MAX_WEEKLY_OCCURRENCES: u16 = 500;

pub const DAYS_PER_WEEK: u8 = 7;
