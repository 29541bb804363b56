//! Best-effort column resolution for external feed tables
//!
//! Feeds publish the same statistic under different headers. Each canonical
//! field has a fixed list of rules tried in order; the first rule that
//! matches any column wins, and within a rule the leftmost column wins.

/// One way a header can identify a canonical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Header equals the name, ignoring case and surrounding whitespace
    Exact(&'static str),
    /// Header contains every fragment, ignoring case
    Contains(&'static [&'static str]),
}

impl ColumnRule {
    fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        match self {
            ColumnRule::Exact(name) => header == *name,
            ColumnRule::Contains(parts) => parts.iter().all(|p| header.contains(p)),
        }
    }
}

/// Index of the column that best matches `rules`
pub fn resolve_column(columns: &[String], rules: &[ColumnRule]) -> Option<usize> {
    rules
        .iter()
        .find_map(|rule| columns.iter().position(|c| rule.matches(c)))
}

pub(crate) const TEAM: &[ColumnRule] = &[
    ColumnRule::Exact("team"),
    ColumnRule::Exact("posteam"),
    ColumnRule::Exact("abbr"),
    ColumnRule::Exact("team_abbr"),
];
pub(crate) const PACE: &[ColumnRule] = &[ColumnRule::Contains(&["pace"]), ColumnRule::Contains(&["plays"])];
pub(crate) const PROE: &[ColumnRule] = &[ColumnRule::Contains(&["proe"])];
pub(crate) const OFF_EPA: &[ColumnRule] = &[ColumnRule::Contains(&["off", "epa"])];
pub(crate) const QB_NAME: &[ColumnRule] = &[ColumnRule::Contains(&["player"]), ColumnRule::Contains(&["name"])];
pub(crate) const QB_EPA: &[ColumnRule] = &[ColumnRule::Contains(&["epa"])];
pub(crate) const PRESSURE: &[ColumnRule] = &[ColumnRule::Contains(&["pressure"])];

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule_priority_beats_column_order() {
        // "posteam" appears first but "team" has the higher priority
        let columns = cols(&["posteam", "season", "Team"]);
        assert_eq!(resolve_column(&columns, TEAM), Some(2));
    }

    #[test]
    fn test_leftmost_column_within_rule() {
        let columns = cols(&["team", "pace_neutral", "pace"]);
        assert_eq!(resolve_column(&columns, PACE), Some(1));
    }

    #[test]
    fn test_fallback_rule() {
        let columns = cols(&["abbr", "plays_per_game"]);
        assert_eq!(resolve_column(&columns, PACE), Some(1));
    }

    #[test]
    fn test_all_fragments_required() {
        let columns = cols(&["team", "def_epa", "OFF_EPA_PER_PLAY"]);
        assert_eq!(resolve_column(&columns, OFF_EPA), Some(2));
    }

    #[test]
    fn test_no_match() {
        let columns = cols(&["club", "speed"]);
        assert_eq!(resolve_column(&columns, TEAM), None);
        assert_eq!(resolve_column(&columns, PACE), None);
    }
}
