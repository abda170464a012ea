//! The league's 30 teams and the file naming their producers use

/// Team names, in the order batches run them
pub const TEAMS: [&str; 30] = [
    "Atlanta Hawks",
    "Boston Celtics",
    "Brooklyn Nets",
    "Charlotte Hornets",
    "Chicago Bulls",
    "Cleveland Cavaliers",
    "Dallas Mavericks",
    "Denver Nuggets",
    "Detroit Pistons",
    "Golden State Warriors",
    "Houston Rockets",
    "Indiana Pacers",
    "LA Clippers",
    "Los Angeles Lakers",
    "Memphis Grizzlies",
    "Miami Heat",
    "Milwaukee Bucks",
    "Minnesota Timberwolves",
    "New Orleans Pelicans",
    "New York Knicks",
    "Oklahoma City Thunder",
    "Orlando Magic",
    "Philadelphia 76ers",
    "Phoenix Suns",
    "Portland Trail Blazers",
    "Sacramento Kings",
    "San Antonio Spurs",
    "Toronto Raptors",
    "Utah Jazz",
    "Washington Wizards",
];

/// Expand a short season (`2025-26`) to the long form used in script names (`2025-2026`)
#[must_use]
pub fn season_long(season: &str) -> Option<String> {
    let (start, end) = season.split_once('-')?;
    let start_year: u32 = start.parse().ok()?;
    if start.len() != 4 || end.len() != 2 {
        return None;
    }
    Some(format!("{start}-{}", start_year + 1))
}

/// Producer script for a team, relative to the working copy
#[must_use]
pub fn team_script(team: &str, season: &str) -> String {
    let long = season_long(season).unwrap_or_else(|| season.to_string());
    format!("python/{team} {long}.py")
}

/// On/off cache file for a team, relative to the working copy
#[must_use]
pub fn team_cache(team: &str, season: &str) -> String {
    format!("onoff_cache/{}_{season}_combo.json", team.replace(' ', "_"))
}
