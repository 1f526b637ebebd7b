use crate::errors::{AppError, Result};
use crate::models::stat::{sort_chronological, StatEvent, StatTag};

/// Sixth personal foul disqualifies the player.
pub const FOUL_LIMIT: usize = 6;

/// Decides whether `candidate` may be appended to a player's match log.
///
/// The log arrives in append order; all checks run over the time-sorted
/// view, with append order breaking ties. The candidate's time and tag
/// are assumed to have passed boundary validation already.
pub fn check(candidate: &StatEvent, log: &[StatEvent]) -> Result<()> {
    let mut events = log.to_vec();
    sort_chronological(&mut events);

    // A fouled-out player can still be moved in or out of the lineup;
    // everything else is off the table.
    if foul_count(&events) >= FOUL_LIMIT && !matches!(candidate.stat, StatTag::In | StatTag::Out) {
        return Err(AppError::FouledOut);
    }

    let last_presence = events
        .iter()
        .rev()
        .find(|e| matches!(e.stat, StatTag::In | StatTag::Out))
        .map(|e| e.stat);

    match candidate.stat {
        StatTag::In => {
            if last_presence == Some(StatTag::In) {
                return Err(AppError::DoubleInOrOut("in"));
            }
        }
        StatTag::Out => {
            if !events.iter().any(|e| e.stat == StatTag::In) {
                return Err(AppError::OutBeforeIn);
            }
            if last_presence == Some(StatTag::Out) {
                return Err(AppError::DoubleInOrOut("out"));
            }
        }
        _ => {
            if last_presence != Some(StatTag::In) {
                return Err(AppError::PlayerOut);
            }
        }
    }

    Ok(())
}

pub fn foul_count(log: &[StatEvent]) -> usize {
    log.iter().filter(|e| e.stat == StatTag::Fouls).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::GameTime;

    fn ev(minute: &str, stat: StatTag) -> StatEvent {
        StatEvent::new(GameTime::parse(minute).unwrap(), stat)
    }

    #[test]
    fn counting_stat_needs_player_on_court() {
        let log = vec![ev("00.00", StatTag::In), ev("10.00", StatTag::Out)];
        let err = check(&ev("11.00", StatTag::Rebounds), &log).unwrap_err();
        assert!(matches!(err, AppError::PlayerOut));

        let empty: Vec<StatEvent> = vec![];
        let err = check(&ev("11.00", StatTag::Assists), &empty).unwrap_err();
        assert!(matches!(err, AppError::PlayerOut));
    }

    #[test]
    fn accepts_stat_while_on_court() {
        let log = vec![ev("00.00", StatTag::In)];
        assert!(check(&ev("05.00", StatTag::Steals), &log).is_ok());
    }

    #[test]
    fn out_without_any_in_is_rejected() {
        let empty: Vec<StatEvent> = vec![];
        let err = check(&ev("05.00", StatTag::Out), &empty).unwrap_err();
        assert!(matches!(err, AppError::OutBeforeIn));
    }

    #[test]
    fn double_in_and_double_out_are_rejected() {
        let log = vec![ev("00.00", StatTag::In)];
        let err = check(&ev("05.00", StatTag::In), &log).unwrap_err();
        assert!(matches!(err, AppError::DoubleInOrOut("in")));

        let log = vec![ev("00.00", StatTag::In), ev("10.00", StatTag::Out)];
        let err = check(&ev("11.00", StatTag::Out), &log).unwrap_err();
        assert!(matches!(err, AppError::DoubleInOrOut("out")));
    }

    #[test]
    fn presence_checks_use_time_order_not_append_order() {
        // Appended out-of-order: the out at 10.00 arrives before the in
        // at 02.00. Sorted by time the player is out at 11.00.
        let log = vec![
            ev("00.00", StatTag::In),
            ev("10.00", StatTag::Out),
            ev("02.00", StatTag::Rebounds),
        ];
        let err = check(&ev("11.00", StatTag::Blocks), &log).unwrap_err();
        assert!(matches!(err, AppError::PlayerOut));
    }

    #[test]
    fn sixth_foul_locks_out_everything_but_lineup_moves() {
        let mut log = vec![ev("00.00", StatTag::In)];
        for m in 1..=6 {
            log.push(ev(&format!("{}.00", m), StatTag::Fouls));
        }
        // Synthetic out appended by the engine after the sixth foul.
        log.push(ev("06.00", StatTag::Out));

        let err = check(&ev("07.00", StatTag::Assists), &log).unwrap_err();
        assert!(matches!(err, AppError::FouledOut));

        // Re-entry is still allowed by the state machine.
        assert!(check(&ev("07.00", StatTag::In), &log).is_ok());
    }

    #[test]
    fn fifth_foul_changes_nothing() {
        let mut log = vec![ev("00.00", StatTag::In)];
        for m in 1..=5 {
            log.push(ev(&format!("{}.00", m), StatTag::Fouls));
        }
        assert!(check(&ev("06.00", StatTag::Fouls), &log).is_ok());
        assert!(check(&ev("06.00", StatTag::TwoPt), &log).is_ok());
    }
}
