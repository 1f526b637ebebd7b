use courtside::models::stat::{sort_chronological, StatEvent, StatRequest, StatTag};
use courtside::services::aggregator::{reference_closing_time, summarize, summarize_team};
use courtside::services::clock::GameTime;
use courtside::services::validator::{check, foul_count, FOUL_LIMIT};

fn ev(minute: &str, stat: StatTag) -> StatEvent {
    StatEvent::new(GameTime::parse(minute).unwrap(), stat)
}

/// Replays a stream of candidates through the validator the way the
/// engine does: accepted events land in the log, the sixth foul drags a
/// synthetic out along with it.
fn ingest(log: &mut Vec<StatEvent>, candidate: StatEvent) -> courtside::errors::Result<()> {
    check(&candidate, log)?;
    let fouls_before = foul_count(log);
    log.push(candidate);
    if candidate.stat == StatTag::Fouls && fouls_before + 1 == FOUL_LIMIT {
        log.push(StatEvent::new(candidate.minute, StatTag::Out));
    }
    Ok(())
}

#[test]
fn foul_out_sequence_matches_the_rulebook() {
    let mut log = vec![ev("00.00", StatTag::In)];

    for m in 1..=6 {
        ingest(&mut log, ev(&format!("{}.00", m), StatTag::Fouls)).unwrap();
    }

    // The sixth foul was accepted and a synthetic out followed it at the
    // same game time.
    assert_eq!(foul_count(&log), 6);
    assert_eq!(
        log.last().copied(),
        Some(ev("06.00", StatTag::Out)),
        "sixth foul must force the player off the court"
    );

    // Nothing else counts for this player anymore...
    assert!(ingest(&mut log, ev("07.00", StatTag::Assists)).is_err());
    // ...but the state machine still lets them back on the floor.
    assert!(ingest(&mut log, ev("07.00", StatTag::In)).is_ok());
}

#[test]
fn accepted_streams_keep_in_out_alternation() {
    let mut log = vec![ev("00.00", StatTag::In)];
    let candidates = vec![
        ev("03.00", StatTag::Rebounds),
        ev("10.00", StatTag::Out),
        ev("10.00", StatTag::Out), // duplicate, must be rejected
        ev("15.00", StatTag::In),
        ev("18.00", StatTag::TwoPt),
        ev("20.00", StatTag::Out),
    ];
    for candidate in candidates {
        let _ = ingest(&mut log, candidate);
    }

    let mut sorted = log.clone();
    sort_chronological(&mut sorted);
    let presence: Vec<StatTag> = sorted
        .iter()
        .filter(|e| matches!(e.stat, StatTag::In | StatTag::Out))
        .map(|e| e.stat)
        .collect();

    assert_eq!(
        presence,
        vec![StatTag::In, StatTag::Out, StatTag::In, StatTag::Out]
    );
}

#[test]
fn live_minutes_use_the_latest_event_in_the_match_as_now() {
    // Player one sits back down at 10.00 and returns at 20.00; the most
    // recent thing that happened anywhere in the match is another
    // player's rebound at 30.00.
    let player_one = vec![
        ev("00.00", StatTag::In),
        ev("10.00", StatTag::Out),
        ev("20.00", StatTag::In),
        ev("25.00", StatTag::Rebounds),
    ];
    let player_two = vec![ev("00.00", StatTag::In), ev("30.00", StatTag::Rebounds)];

    let all: Vec<StatEvent> = player_one
        .iter()
        .chain(player_two.iter())
        .copied()
        .collect();
    let closing = reference_closing_time(&all);
    assert_eq!(closing, GameTime::parse("30.00").unwrap());

    let summary = summarize(&player_one, &StatRequest::of([StatTag::Minutes]), closing);
    assert_eq!(summary.minutes.as_deref(), Some("20.00"));
    assert_eq!(summary.on_court, Some(true));
}

#[test]
fn final_score_ignores_terminal_outs() {
    // Two players a side, EndMatch appended out@48.00 everywhere.
    let home = vec![
        vec![
            ev("00.00", StatTag::In),
            ev("05.00", StatTag::ThreePt),
            ev("07.00", StatTag::TwoPt),
            ev("48.00", StatTag::Out),
        ],
        vec![
            ev("00.00", StatTag::In),
            ev("09.00", StatTag::OnePt),
            ev("48.00", StatTag::Out),
        ],
    ];
    let away = vec![
        vec![
            ev("00.00", StatTag::In),
            ev("11.00", StatTag::TwoPt),
            ev("48.00", StatTag::Out),
        ],
        vec![ev("00.00", StatTag::In), ev("48.00", StatTag::Out)],
    ];

    let request = StatRequest::of([StatTag::Points]);
    let home_summary = summarize_team(&home, &request, GameTime::parse("48.00").unwrap());
    let away_summary = summarize_team(&away, &request, GameTime::parse("48.00").unwrap());

    assert_eq!(home_summary.points, Some(6));
    assert_eq!(away_summary.points, Some(2));
}

#[test]
fn aggregation_is_stable_under_ingestion_races() {
    // Two appends raced and landed out of time order; the summary must
    // come out the same as the well-ordered log.
    let ordered = vec![
        ev("00.00", StatTag::In),
        ev("04.00", StatTag::Fouls),
        ev("08.00", StatTag::TwoPt),
        ev("12.00", StatTag::Out),
    ];
    let raced = vec![ordered[0], ordered[2], ordered[1], ordered[3]];

    let request = StatRequest::all();
    let closing = GameTime::parse("12.00").unwrap();
    assert_eq!(
        summarize(&ordered, &request, closing),
        summarize(&raced, &request, closing)
    );
}
