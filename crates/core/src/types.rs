/// All relational primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque user/profile identifier minted by the external identity provider.
pub type ProfileId = String;
