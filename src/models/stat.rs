use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::services::clock::GameTime;

/// Closed set of event tags. The first eleven are accepted on ingestion;
/// `minutes` and `points` only exist on the fetch side, derived by the
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTag {
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Fouls,
    In,
    Out,
    #[serde(rename = "1pt")]
    OnePt,
    #[serde(rename = "2pt")]
    TwoPt,
    #[serde(rename = "3pt")]
    ThreePt,
    Minutes,
    Points,
}

/// Tags countable by plain occurrence.
pub const COUNTED_TAGS: [StatTag; 9] = [
    StatTag::Rebounds,
    StatTag::Assists,
    StatTag::Steals,
    StatTag::Blocks,
    StatTag::Turnovers,
    StatTag::Fouls,
    StatTag::OnePt,
    StatTag::TwoPt,
    StatTag::ThreePt,
];

impl StatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatTag::Rebounds => "rebounds",
            StatTag::Assists => "assists",
            StatTag::Steals => "steals",
            StatTag::Blocks => "blocks",
            StatTag::Turnovers => "turnovers",
            StatTag::Fouls => "fouls",
            StatTag::In => "in",
            StatTag::Out => "out",
            StatTag::OnePt => "1pt",
            StatTag::TwoPt => "2pt",
            StatTag::ThreePt => "3pt",
            StatTag::Minutes => "minutes",
            StatTag::Points => "points",
        }
    }

    /// Whether clients may submit this tag as a live event.
    pub fn is_ingestible(&self) -> bool {
        !matches!(self, StatTag::Minutes | StatTag::Points)
    }

    pub fn point_value(&self) -> Option<u32> {
        match self {
            StatTag::OnePt => Some(1),
            StatTag::TwoPt => Some(2),
            StatTag::ThreePt => Some(3),
            _ => None,
        }
    }
}

impl FromStr for StatTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rebounds" => Ok(StatTag::Rebounds),
            "assists" => Ok(StatTag::Assists),
            "steals" => Ok(StatTag::Steals),
            "blocks" => Ok(StatTag::Blocks),
            "turnovers" => Ok(StatTag::Turnovers),
            "fouls" => Ok(StatTag::Fouls),
            "in" => Ok(StatTag::In),
            "out" => Ok(StatTag::Out),
            "1pt" => Ok(StatTag::OnePt),
            "2pt" => Ok(StatTag::TwoPt),
            "3pt" => Ok(StatTag::ThreePt),
            "minutes" => Ok(StatTag::Minutes),
            "points" => Ok(StatTag::Points),
            other => Err(format!("unknown stat '{}'", other)),
        }
    }
}

impl fmt::Display for StatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a player's live match log, stored in Redis as
/// `{"minute":"12.30","stat":"rebounds"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEvent {
    pub minute: GameTime,
    pub stat: StatTag,
}

impl StatEvent {
    pub fn new(minute: GameTime, stat: StatTag) -> Self {
        StatEvent { minute, stat }
    }
}

/// Stable sort by game time. Entries with equal times keep their append
/// order, which is the tiebreaker everywhere in the engine.
pub fn sort_chronological(events: &mut [StatEvent]) {
    events.sort_by_key(|e| e.minute);
}

/// The set of stats a summary request asks for. Empty means everything.
#[derive(Debug, Clone, Default)]
pub struct StatRequest {
    tags: HashSet<StatTag>,
}

impl StatRequest {
    pub fn all() -> Self {
        StatRequest::default()
    }

    pub fn of(tags: impl IntoIterator<Item = StatTag>) -> Self {
        StatRequest {
            tags: tags.into_iter().collect(),
        }
    }

    /// Parses the raw query string of a summary request, e.g.
    /// `rebounds,assists,points`. Returns the offending token when a
    /// name is not a known stat.
    pub fn from_raw_query(raw: &str) -> Result<Self, String> {
        let mut tags = HashSet::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let tag = part.parse::<StatTag>().map_err(|_| part.to_string())?;
            tags.insert(tag);
        }
        Ok(StatRequest { tags })
    }

    pub fn wants(&self, tag: StatTag) -> bool {
        self.tags.is_empty() || self.tags.contains(&tag)
    }
}

/// Aggregated view over a player's (or a team's) event log. Only the
/// requested fields are populated; everything else stays off the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assists: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnovers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fouls: Option<u32>,
    #[serde(rename = "1pt", skip_serializing_if = "Option::is_none")]
    pub one_pt: Option<u32>,
    #[serde(rename = "2pt", skip_serializing_if = "Option::is_none")]
    pub two_pt: Option<u32>,
    #[serde(rename = "3pt", skip_serializing_if = "Option::is_none")]
    pub three_pt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<String>,
    /// Whether the player is on court at query time. Present only when
    /// minutes were requested for a single player.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub on_court: Option<bool>,
}

impl StatSummary {
    pub fn set_count(&mut self, tag: StatTag, value: u32) {
        match tag {
            StatTag::Rebounds => self.rebounds = Some(value),
            StatTag::Assists => self.assists = Some(value),
            StatTag::Steals => self.steals = Some(value),
            StatTag::Blocks => self.blocks = Some(value),
            StatTag::Turnovers => self.turnovers = Some(value),
            StatTag::Fouls => self.fouls = Some(value),
            StatTag::OnePt => self.one_pt = Some(value),
            StatTag::TwoPt => self.two_pt = Some(value),
            StatTag::ThreePt => self.three_pt = Some(value),
            // minutes, points, in and out never arrive here
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_serialize_to_their_wire_names() {
        assert_eq!(serde_json::to_string(&StatTag::OnePt).unwrap(), "\"1pt\"");
        assert_eq!(
            serde_json::to_string(&StatTag::Rebounds).unwrap(),
            "\"rebounds\""
        );
        let tag: StatTag = serde_json::from_str("\"3pt\"").unwrap();
        assert_eq!(tag, StatTag::ThreePt);
    }

    #[test]
    fn derived_tags_are_not_ingestible() {
        assert!(!StatTag::Minutes.is_ingestible());
        assert!(!StatTag::Points.is_ingestible());
        assert!(StatTag::Fouls.is_ingestible());
        assert!(StatTag::In.is_ingestible());
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = StatEvent::new(GameTime::parse("20.00").unwrap(), StatTag::Rebounds);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"minute":"20.00","stat":"rebounds"}"#);
        let back: StatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn raw_query_parses_comma_separated_tags() {
        let req = StatRequest::from_raw_query("rebounds, assists,points").unwrap();
        assert!(req.wants(StatTag::Rebounds));
        assert!(req.wants(StatTag::Points));
        assert!(!req.wants(StatTag::Steals));
        assert!(StatRequest::from_raw_query("dunks").is_err());
    }

    #[test]
    fn empty_request_wants_everything() {
        let req = StatRequest::from_raw_query("").unwrap();
        assert!(req.wants(StatTag::Minutes));
        assert!(req.wants(StatTag::Blocks));
    }

    #[test]
    fn chronological_sort_is_stable_on_ties() {
        let t = |s: &str| GameTime::parse(s).unwrap();
        let mut events = vec![
            StatEvent::new(t("05.00"), StatTag::Fouls),
            StatEvent::new(t("02.00"), StatTag::In),
            StatEvent::new(t("05.00"), StatTag::Out),
        ];
        sort_chronological(&mut events);
        assert_eq!(events[0].stat, StatTag::In);
        assert_eq!(events[1].stat, StatTag::Fouls);
        assert_eq!(events[2].stat, StatTag::Out);
    }
}
