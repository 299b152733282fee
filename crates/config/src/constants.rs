//! Centralized constants for the intake agent
//!
//! Business bounds and defaults live here so validators, messages and tests
//! agree on the same numbers.

/// Form field bounds
pub mod bounds {
    /// Mobile numbers are exactly this many ASCII digits
    pub const PHONE_DIGITS: usize = 10;

    /// Youngest child accepted (years, inclusive)
    pub const MIN_CHILD_AGE: i64 = 2;
    /// Oldest child accepted (years, inclusive)
    pub const MAX_CHILD_AGE: i64 = 12;

    /// Minimum days per week
    pub const MIN_DAYS_PER_WEEK: i64 = 1;
    /// Business-day capacity limit
    pub const MAX_DAYS_PER_WEEK: i64 = 5;

    /// Minimum hours per day
    pub const MIN_HOURS_PER_DAY: i64 = 1;
    /// Staffing rule: no child is scheduled for more than this per day
    pub const MAX_HOURS_PER_DAY: i64 = 4;
}

/// Accepted option values for choice-style slots (already case/accent folded)
pub mod choices {
    /// School levels
    pub const SCHOOL_LEVELS: [&str; 2] = ["preescolar", "primaria"];

    /// Button labels offered for school level, in order
    pub const SCHOOL_LEVEL_LABELS: [&str; 2] = ["Preescolar", "Primaria"];

    /// Shifts. "manana" is the accent-folded form of "mañana".
    pub const SHIFTS: [&str; 2] = ["manana", "tarde"];

    /// Button labels offered for shift, in order
    pub const SHIFT_LABELS: [&str; 2] = ["Mañana", "Tarde"];

    /// Affirmative confirmation answers (folded)
    pub const AFFIRMATIVE: [&str; 2] = ["si", "s"];

    /// Negative confirmation answers (folded)
    pub const NEGATIVE: [&str; 2] = ["no", "n"];
}

/// Dialog defaults
pub mod dialog {
    /// Intent owned by this engine
    pub const INTENT_NAME: &str = "SolicitudServicio";

    /// Reserved restart command (matched against the folded utterance)
    pub const RESTART_COMMAND: &str = "registrar otra";

    /// Host locale for the default message catalogue
    pub const LOCALE: &str = "es_419";
}

/// Service defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

/// ScyllaDB defaults
pub mod persistence {
    pub const DEFAULT_HOST: &str = "127.0.0.1:9042";
    pub const DEFAULT_KEYSPACE: &str = "intake_agent";
}
