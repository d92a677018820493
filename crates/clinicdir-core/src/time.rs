use time::OffsetDateTime;

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Milliseconds since the Unix epoch, the timestamp unit used in API envelopes.
pub fn epoch_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn epoch_millis_truncates_sub_millisecond_precision() {
        let at = datetime!(2024-01-01 00:00:00.123_456 UTC);
        assert_eq!(epoch_millis(at), 1_704_067_200_123);
    }

    #[test]
    fn epoch_millis_of_epoch_is_zero() {
        assert_eq!(epoch_millis(OffsetDateTime::UNIX_EPOCH), 0);
    }
}
