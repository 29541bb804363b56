//! Prior lookup

use std::collections::HashMap;

use crate::market::{MarketKind, Prior};

/// Priors indexed by (player, market)
#[derive(Debug, Clone, Default)]
pub struct PriorBook {
    by_player: HashMap<(String, MarketKind), Vec<Prior>>,
}

fn norm(s: &str) -> String {
    s.trim().to_uppercase()
}

impl PriorBook {
    pub fn new(priors: &[Prior]) -> Self {
        let mut by_player: HashMap<(String, MarketKind), Vec<Prior>> = HashMap::new();
        for prior in priors {
            by_player
                .entry((norm(&prior.player), prior.market))
                .or_default()
                .push(prior.clone());
        }
        Self { by_player }
    }

    /// Prior for a quote.
    ///
    /// With a team on the quote, a prior for that team wins, then a prior
    /// with no team. Without a team the first prior in input order wins.
    pub fn lookup(&self, player: &str, team: &str, market: MarketKind) -> Option<&Prior> {
        let candidates = self.by_player.get(&(norm(player), market))?;
        let team = norm(team);
        if team.is_empty() {
            return candidates.first();
        }
        candidates
            .iter()
            .find(|p| norm(&p.team) == team)
            .or_else(|| candidates.iter().find(|p| p.team.trim().is_empty()))
    }

    pub fn len(&self) -> usize {
        self.by_player.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}
