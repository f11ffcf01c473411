use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub abbr: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("team abbreviation {0} not found")]
pub struct UnknownTeam(pub String);

/// NFL franchises, keyed by lowercase abbreviation. Names match the odds
/// provider's `home_team` / `away_team` strings.
pub static TEAMS: &[Team] = &[
    Team { abbr: "ari", name: "Arizona Cardinals" },
    Team { abbr: "atl", name: "Atlanta Falcons" },
    Team { abbr: "bal", name: "Baltimore Ravens" },
    Team { abbr: "buf", name: "Buffalo Bills" },
    Team { abbr: "car", name: "Carolina Panthers" },
    Team { abbr: "chi", name: "Chicago Bears" },
    Team { abbr: "cin", name: "Cincinnati Bengals" },
    Team { abbr: "cle", name: "Cleveland Browns" },
    Team { abbr: "dal", name: "Dallas Cowboys" },
    Team { abbr: "den", name: "Denver Broncos" },
    Team { abbr: "det", name: "Detroit Lions" },
    Team { abbr: "gb", name: "Green Bay Packers" },
    Team { abbr: "hou", name: "Houston Texans" },
    Team { abbr: "ind", name: "Indianapolis Colts" },
    Team { abbr: "jax", name: "Jacksonville Jaguars" },
    Team { abbr: "kc", name: "Kansas City Chiefs" },
    Team { abbr: "lv", name: "Las Vegas Raiders" },
    Team { abbr: "lar", name: "Los Angeles Rams" },
    Team { abbr: "lac", name: "Los Angeles Chargers" },
    Team { abbr: "mia", name: "Miami Dolphins" },
    Team { abbr: "min", name: "Minnesota Vikings" },
    Team { abbr: "ne", name: "New England Patriots" },
    Team { abbr: "no", name: "New Orleans Saints" },
    Team { abbr: "nyg", name: "New York Giants" },
    Team { abbr: "nyj", name: "New York Jets" },
    Team { abbr: "phi", name: "Philadelphia Eagles" },
    Team { abbr: "pit", name: "Pittsburgh Steelers" },
    Team { abbr: "sf", name: "San Francisco 49ers" },
    Team { abbr: "sea", name: "Seattle Seahawks" },
    Team { abbr: "tb", name: "Tampa Bay Buccaneers" },
    Team { abbr: "ten", name: "Tennessee Titans" },
    Team { abbr: "wsh", name: "Washington Commanders" },
];

/// Exact, case-sensitive abbreviation lookup.
pub fn lookup(abbr: &str) -> Result<&'static Team, UnknownTeam> {
    TEAMS
        .iter()
        .find(|t| t.abbr == abbr)
        .ok_or_else(|| UnknownTeam(abbr.to_string()))
}
