use crate::models::stat::{sort_chronological, StatEvent, StatRequest, StatSummary, StatTag, COUNTED_TAGS};
use crate::services::clock::{GameTime, TIP_OFF};

/// Builds a player-scoped summary from one match log.
///
/// `closing` is the reference closing time of the match: the latest game
/// time seen across every player log, used to close an open on-court
/// interval for a live query.
pub fn summarize(events: &[StatEvent], request: &StatRequest, closing: GameTime) -> StatSummary {
    let mut events = events.to_vec();
    sort_chronological(&mut events);

    let mut summary = StatSummary::default();
    fill_counts(&mut summary, &events, request);

    if request.wants(StatTag::Minutes) {
        let (total, on_court) = on_court_time(&events, closing);
        summary.minutes = Some(total.encode());
        summary.on_court = Some(on_court);
    }

    summary
}

/// Team scope: counted stats and points run over the union of the team's
/// player logs; minutes are the sum of each player's own intervals, since
/// five players on court accrue time simultaneously.
pub fn summarize_team(logs: &[Vec<StatEvent>], request: &StatRequest, closing: GameTime) -> StatSummary {
    let mut union: Vec<StatEvent> = logs.iter().flatten().copied().collect();
    sort_chronological(&mut union);

    let mut summary = StatSummary::default();
    fill_counts(&mut summary, &union, request);

    if request.wants(StatTag::Minutes) {
        let mut total_secs = 0u32;
        for log in logs {
            let mut log = log.clone();
            sort_chronological(&mut log);
            let (player_total, _) = on_court_time(&log, closing);
            total_secs += player_total.total_secs();
        }
        summary.minutes = Some(GameTime::from_secs(total_secs).encode());
    }

    summary
}

fn fill_counts(summary: &mut StatSummary, sorted: &[StatEvent], request: &StatRequest) {
    for tag in COUNTED_TAGS {
        if request.wants(tag) {
            let count = sorted.iter().filter(|e| e.stat == tag).count() as u32;
            summary.set_count(tag, count);
        }
    }

    if request.wants(StatTag::Points) {
        let points = sorted.iter().filter_map(|e| e.stat.point_value()).sum();
        summary.points = Some(points);
    }
}

/// Walks the sorted log pairing `in` with the next `out`. An interval
/// still open after the walk is closed against `closing`. Returns the
/// accrued time and whether the player is currently on court.
pub fn on_court_time(sorted: &[StatEvent], closing: GameTime) -> (GameTime, bool) {
    let mut total_secs = 0u32;
    let mut in_time: Option<GameTime> = None;

    for event in sorted {
        match event.stat {
            StatTag::In => in_time = Some(event.minute),
            StatTag::Out => {
                if let Some(entered) = in_time.take() {
                    total_secs += entered.diff(event.minute).total_secs();
                }
            }
            _ => {}
        }
    }

    let on_court = in_time.is_some();
    if let Some(entered) = in_time {
        total_secs += entered.diff(closing).total_secs();
    }

    (GameTime::from_secs(total_secs), on_court)
}

/// The latest game time seen in a match, across every player log.
/// Serves as "now" for live minutes queries.
pub fn reference_closing_time(all_events: &[StatEvent]) -> GameTime {
    all_events.iter().map(|e| e.minute).max().unwrap_or(TIP_OFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(minute: &str, stat: StatTag) -> StatEvent {
        StatEvent::new(GameTime::parse(minute).unwrap(), stat)
    }

    #[test]
    fn counts_requested_tags_only() {
        let log = vec![
            ev("20.00", StatTag::Rebounds),
            ev("21.30", StatTag::Assists),
            ev("22.00", StatTag::Rebounds),
        ];
        let request = StatRequest::of([StatTag::Rebounds, StatTag::Assists, StatTag::Points]);
        let summary = summarize(&log, &request, TIP_OFF);

        assert_eq!(summary.rebounds, Some(2));
        assert_eq!(summary.assists, Some(1));
        assert_eq!(summary.points, Some(0));
        assert_eq!(summary.steals, None);
        assert_eq!(summary.minutes, None);
    }

    #[test]
    fn points_weigh_field_goals() {
        let log = vec![
            ev("05.00", StatTag::ThreePt),
            ev("07.00", StatTag::TwoPt),
            ev("09.00", StatTag::OnePt),
        ];
        let request = StatRequest::of([StatTag::Points]);
        let summary = summarize(&log, &request, TIP_OFF);
        assert_eq!(summary.points, Some(6));
    }

    #[test]
    fn minutes_close_open_interval_against_reference_time() {
        // in@00.00, out@10.00, in@20.00, rebound@25.00; another player's
        // rebound@30.00 pushes the reference closing time to 30.00.
        let log = vec![
            ev("00.00", StatTag::In),
            ev("10.00", StatTag::Out),
            ev("20.00", StatTag::In),
            ev("25.00", StatTag::Rebounds),
        ];
        let closing = GameTime::parse("30.00").unwrap();
        let request = StatRequest::of([StatTag::Minutes]);
        let summary = summarize(&log, &request, closing);

        assert_eq!(summary.minutes.as_deref(), Some("20.00"));
        assert_eq!(summary.on_court, Some(true));
    }

    #[test]
    fn minutes_with_all_intervals_closed() {
        let log = vec![
            ev("00.00", StatTag::In),
            ev("12.30", StatTag::Out),
            ev("24.00", StatTag::In),
            ev("48.00", StatTag::Out),
        ];
        let request = StatRequest::of([StatTag::Minutes]);
        let summary = summarize(&log, &request, GameTime::parse("48.00").unwrap());

        assert_eq!(summary.minutes.as_deref(), Some("36.30"));
        assert_eq!(summary.on_court, Some(false));
    }

    #[test]
    fn permuting_input_order_changes_nothing() {
        let log = vec![
            ev("00.00", StatTag::In),
            ev("05.00", StatTag::TwoPt),
            ev("10.00", StatTag::Out),
            ev("20.00", StatTag::In),
            ev("25.00", StatTag::Fouls),
        ];
        let mut shuffled = vec![log[3], log[0], log[4], log[2], log[1]];
        let closing = GameTime::parse("25.00").unwrap();
        let request = StatRequest::all();

        let a = summarize(&log, &request, closing);
        let b = summarize(&shuffled, &request, closing);
        assert_eq!(a, b);

        shuffled.reverse();
        let c = summarize(&shuffled, &request, closing);
        assert_eq!(a, c);
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let summary = summarize(&[], &StatRequest::all(), TIP_OFF);
        assert_eq!(summary.rebounds, Some(0));
        assert_eq!(summary.points, Some(0));
        assert_eq!(summary.minutes.as_deref(), Some("00.00"));
        assert_eq!(summary.on_court, Some(false));
    }

    #[test]
    fn team_points_union_all_players() {
        let logs = vec![
            vec![ev("05.00", StatTag::ThreePt), ev("07.00", StatTag::TwoPt)],
            vec![ev("09.00", StatTag::OnePt), ev("11.00", StatTag::TwoPt)],
        ];
        let request = StatRequest::of([StatTag::Points]);
        let summary = summarize_team(&logs, &request, TIP_OFF);
        assert_eq!(summary.points, Some(8));
    }

    #[test]
    fn team_minutes_sum_per_player_intervals() {
        let logs = vec![
            vec![ev("00.00", StatTag::In), ev("10.00", StatTag::Out)],
            vec![ev("00.00", StatTag::In), ev("20.00", StatTag::Out)],
        ];
        let request = StatRequest::of([StatTag::Minutes]);
        let summary = summarize_team(&logs, &request, GameTime::parse("20.00").unwrap());
        assert_eq!(summary.minutes.as_deref(), Some("30.00"));
    }

    #[test]
    fn reference_closing_time_is_max_or_tip_off() {
        assert_eq!(reference_closing_time(&[]), TIP_OFF);
        let events = vec![
            ev("10.00", StatTag::Rebounds),
            ev("30.00", StatTag::Rebounds),
            ev("25.00", StatTag::Out),
        ];
        assert_eq!(
            reference_closing_time(&events),
            GameTime::parse("30.00").unwrap()
        );
    }
}
