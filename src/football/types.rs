use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Envelope of every API-Football response.
///
/// The API answers authentication and quota problems with HTTP 200 and a
/// non-empty `errors` member, which is either an array or an object.
#[derive(Deserialize, Debug)]
pub struct FixturesResponse {
    #[serde(default)]
    pub errors: Value,
    #[serde(default)]
    pub response: Vec<FixtureDto>,
}

impl FixturesResponse {
    pub fn error_message(&self) -> Option<String> {
        match &self.errors {
            Value::Array(errors) if !errors.is_empty() => Some(self.errors.to_string()),
            Value::Object(errors) if !errors.is_empty() => Some(
                errors
                    .iter()
                    .map(|(key, value)| match value {
                        Value::String(message) => format!("{key}: {message}"),
                        other => format!("{key}: {other}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct FixtureDto {
    pub fixture: FixtureInfoDto,
    pub league: LeagueDto,
    pub teams: TeamsDto,
    #[serde(default)]
    pub score: Option<ScoreDto>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FixtureInfoDto {
    pub date: DateTime<FixedOffset>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LeagueDto {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TeamsDto {
    pub home: TeamDto,
    pub away: TeamDto,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TeamDto {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScoreDto {
    #[serde(default)]
    pub fulltime: Option<GoalsDto>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GoalsDto {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// A single scheduled or completed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub league: String,
    pub league_logo: Option<String>,
    pub kickoff: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    /// `None` until both full-time goals are known.
    pub fulltime_score: Option<(u32, u32)>,
}

impl Fixture {
    pub fn score_display(&self) -> Option<String> {
        self.fulltime_score
            .map(|(home, away)| format!("{home} - {away}"))
    }
}

impl From<FixtureDto> for Fixture {
    fn from(value: FixtureDto) -> Self {
        let fulltime_score = value
            .score
            .and_then(|score| score.fulltime)
            .and_then(|goals| Some((goals.home?, goals.away?)));

        Self {
            league: value.league.name,
            league_logo: value.league.logo.filter(|logo| !logo.is_empty()),
            kickoff: value.fixture.date.with_timezone(&Utc),
            home_team: value.teams.home.name,
            away_team: value.teams.away.name,
            fulltime_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn fixture_json(fulltime: Value) -> Value {
        json!({
            "fixture": { "id": 1, "date": "2026-10-18T21:00:00+02:00" },
            "league": {
                "name": "La Liga",
                "logo": "https://media.api-sports.io/football/leagues/140.png"
            },
            "teams": {
                "home": { "name": "Real Madrid" },
                "away": { "name": "Barcelona" }
            },
            "score": { "fulltime": fulltime }
        })
    }

    #[test]
    fn played_fixture_keeps_its_score() {
        let dto: FixtureDto =
            serde_json::from_value(fixture_json(json!({ "home": 2, "away": 1 }))).unwrap();
        let fixture = Fixture::from(dto);

        assert_eq!(fixture.league, "La Liga");
        assert_eq!(fixture.home_team, "Real Madrid");
        assert_eq!(
            fixture.kickoff,
            Utc.with_ymd_and_hms(2026, 10, 18, 19, 0, 0).unwrap()
        );
        assert_eq!(fixture.fulltime_score, Some((2, 1)));
        assert_eq!(fixture.score_display().as_deref(), Some("2 - 1"));
    }

    #[test]
    fn missing_or_partial_score_means_not_played() {
        let unplayed: FixtureDto =
            serde_json::from_value(fixture_json(json!({ "home": null, "away": null }))).unwrap();
        let partial: FixtureDto =
            serde_json::from_value(fixture_json(json!({ "home": 1 }))).unwrap();
        let mut no_score = fixture_json(Value::Null);
        no_score.as_object_mut().unwrap().remove("score");
        let no_score: FixtureDto = serde_json::from_value(no_score).unwrap();

        assert_eq!(Fixture::from(unplayed).fulltime_score, None);
        assert_eq!(Fixture::from(partial).fulltime_score, None);
        assert_eq!(Fixture::from(no_score).fulltime_score, None);
    }

    #[test]
    fn error_message_reads_both_error_shapes() {
        let empty: FixturesResponse =
            serde_json::from_value(json!({ "errors": [], "response": [] })).unwrap();
        let object: FixturesResponse = serde_json::from_value(
            json!({ "errors": { "token": "Error/Missing application key." }, "response": [] }),
        )
        .unwrap();
        let array: FixturesResponse =
            serde_json::from_value(json!({ "errors": ["rate limit"], "response": [] })).unwrap();

        assert_eq!(empty.error_message(), None);
        assert_eq!(
            object.error_message().as_deref(),
            Some("token: Error/Missing application key.")
        );
        assert!(array.error_message().unwrap().contains("rate limit"));
    }
}
