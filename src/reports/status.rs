//! Receivable status classification

use chrono::NaiveDate;

use crate::types::*;

/// Classify a receivable for display.
///
/// Received wins over everything. Otherwise a due date before `today` is
/// overdue, one at most `due_soon_days` days ahead (today included) is due
/// soon, and anything later is pending.
pub fn classify(
    is_received: bool,
    due_date: NaiveDate,
    today: NaiveDate,
    due_soon_days: i64,
) -> ReceivableStatus {
    if is_received {
        return ReceivableStatus::Received;
    }
    if due_date < today {
        return ReceivableStatus::Overdue;
    }
    if (due_date - today).num_days() <= due_soon_days {
        ReceivableStatus::DueSoon
    } else {
        ReceivableStatus::Pending
    }
}

impl ReceivableAccount {
    /// Display status of this receivable as of `today`
    pub fn status(&self, today: NaiveDate, due_soon_days: i64) -> ReceivableStatus {
        classify(self.is_received, self.due_date, today, due_soon_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_overdue() {
        let due = today() - Duration::days(1);
        assert_eq!(classify(false, due, today(), 7), ReceivableStatus::Overdue);
    }

    #[test]
    fn test_due_soon() {
        let due = today() + Duration::days(3);
        assert_eq!(classify(false, due, today(), 7), ReceivableStatus::DueSoon);
        assert_eq!(classify(false, today(), today(), 7), ReceivableStatus::DueSoon);
        assert_eq!(
            classify(false, today() + Duration::days(7), today(), 7),
            ReceivableStatus::DueSoon
        );
    }

    #[test]
    fn test_pending() {
        let due = today() + Duration::days(30);
        assert_eq!(classify(false, due, today(), 7), ReceivableStatus::Pending);
        assert_eq!(
            classify(false, today() + Duration::days(8), today(), 7),
            ReceivableStatus::Pending
        );
    }

    #[test]
    fn test_received_ignores_due_date() {
        for offset in [-30, -1, 0, 3, 30] {
            let due = today() + Duration::days(offset);
            assert_eq!(classify(true, due, today(), 7), ReceivableStatus::Received);
        }
    }

    #[test]
    fn test_window_is_configurable() {
        let due = today() + Duration::days(3);
        assert_eq!(classify(false, due, today(), 2), ReceivableStatus::Pending);
    }
}
