/// Project ids are PostgreSQL BIGSERIAL in the database backend and
/// `max + 1` integers in the file backend.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
