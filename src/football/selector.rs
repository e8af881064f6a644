//! Picks the most newsworthy fixtures of a day.

use super::types::Fixture;
use crate::locale::Locale;

/// Competitions worth broadcasting, most prominent first.
pub const BIG_LEAGUES: [&str; 8] = [
    "UEFA Champions League",
    "UEFA Europa League",
    "UEFA Europa Conference League",
    "Premier League",
    "La Liga",
    "Serie A",
    "Bundesliga",
    "Ligue 1",
];

pub const BIG_TEAMS: [&str; 15] = [
    "Manchester United",
    "Manchester City",
    "Arsenal",
    "Chelsea",
    "Liverpool",
    "Tottenham",
    "Real Madrid",
    "Barcelona",
    "Atletico Madrid",
    "Bayern Munich",
    "Borussia Dortmund",
    "Paris Saint Germain",
    "Juventus",
    "Inter",
    "AC Milan",
];

pub const MAX_SELECTED: usize = 5;

const UNKNOWN_LEAGUE_WEIGHT: usize = 999;

/// A selected fixture with its kickoff already printed for each locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMatch {
    pub fixture: Fixture,
    pub kickoff_th: String,
    pub kickoff_lo: String,
}

impl SelectedMatch {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            kickoff_th: Locale::Thai.format_kickoff(fixture.kickoff),
            kickoff_lo: Locale::Lao.format_kickoff(fixture.kickoff),
            fixture,
        }
    }

    pub fn kickoff_for(&self, locale: Locale) -> &str {
        match locale {
            Locale::Thai => &self.kickoff_th,
            Locale::Lao => &self.kickoff_lo,
        }
    }
}

/// 0 when both teams are big, 1 when one is, 2 otherwise.
pub fn team_weight(fixture: &Fixture) -> u8 {
    let home_big = BIG_TEAMS.contains(&fixture.home_team.as_str());
    let away_big = BIG_TEAMS.contains(&fixture.away_team.as_str());

    match (home_big, away_big) {
        (true, true) => 0,
        (true, false) | (false, true) => 1,
        (false, false) => 2,
    }
}

pub fn league_weight(league: &str) -> usize {
    BIG_LEAGUES
        .iter()
        .position(|name| *name == league)
        .unwrap_or(UNKNOWN_LEAGUE_WEIGHT)
}

/// Filters to [`BIG_LEAGUES`], orders by team weight, league weight and
/// kickoff, then keeps the first [`MAX_SELECTED`].
pub fn rank_big_matches(fixtures: Vec<Fixture>) -> Vec<Fixture> {
    let mut ranked: Vec<Fixture> = fixtures
        .into_iter()
        .filter(|fixture| BIG_LEAGUES.contains(&fixture.league.as_str()))
        .collect();

    ranked.sort_by_key(|fixture| {
        (
            team_weight(fixture),
            league_weight(&fixture.league),
            fixture.kickoff,
        )
    });
    ranked.truncate(MAX_SELECTED);
    ranked
}

pub fn select_big_matches(fixtures: Vec<Fixture>) -> Vec<SelectedMatch> {
    rank_big_matches(fixtures)
        .into_iter()
        .map(SelectedMatch::new)
        .collect()
}
