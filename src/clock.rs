//! Access to the device clock.

use time::{OffsetDateTime, UtcOffset};

/// The current moment, expressed in the device's local UTC offset.
///
/// Date windows resolve calendar days against the offset carried by this
/// value. When the local offset cannot be determined, for example because
/// the platform refuses to expose it to a multi-threaded process, the
/// moment is reported in UTC instead.
pub fn local_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match UtcOffset::current_local_offset() {
        Ok(offset) => now.to_offset(offset),
        Err(error) => {
            tracing::warn!("could not determine the local UTC offset, using UTC: {error}");

            now
        }
    }
}
