//! Prior adjustment pipeline
//!
//! Steps run in a fixed order, each multiplying the running value:
//! 1. mean × team factors (pace, proe, offensive EPA)
//! 2. mean × usage (snap share, target share)
//! 3. sd × wind widening, then × cold widening
//! 4. sd × pressure widening when the opponent is a top-10 pass rush
//! 5. sd × quarterback widening on passing markets for low-tier passers
//!
//! The sd is floored afterwards so the Normal CDF stays defined.

use crate::config::{SdDefaults, VolatilityConfig};
use crate::context::{ContextSignals, TeamFactors, UsageAdjustment};
use crate::market::{Prior, Quote};
use crate::pricing::PricingError;

/// Smallest sd the pipeline will emit
pub const SD_FLOOR: f64 = 1e-6;

/// Adjusted distribution with the factors that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub mean: f64,
    pub sd: f64,
    pub team: TeamFactors,
    pub usage: UsageAdjustment,
    pub wind: bool,
    pub cold: bool,
    pub pressure: bool,
    pub qb_lowtier: bool,
    /// The sd came from `defaults.sd` rather than the prior
    pub default_sd: bool,
}

/// Applies context to priors
#[derive(Debug, Clone)]
pub struct AdjustmentPipeline<'a> {
    volatility: &'a VolatilityConfig,
    sd_defaults: &'a SdDefaults,
}

impl<'a> AdjustmentPipeline<'a> {
    pub fn new(volatility: &'a VolatilityConfig, sd_defaults: &'a SdDefaults) -> Self {
        Self {
            volatility,
            sd_defaults,
        }
    }

    /// Adjust `prior` for the player and game described by `quote`
    pub fn adjust(
        &self,
        quote: &Quote,
        prior: &Prior,
        ctx: &ContextSignals,
    ) -> Result<Adjustment, PricingError> {
        let insufficient = || PricingError::InsufficientPrior {
            player: quote.player.clone(),
            market: quote.market,
        };

        let mut mean = prior.mean.ok_or_else(insufficient)?;
        let (mut sd, default_sd) = match prior.sd {
            Some(sd) => (sd, false),
            None => (
                self.sd_defaults
                    .for_market(quote.market)
                    .ok_or_else(insufficient)?,
                true,
            ),
        };

        let team = if quote.team.is_empty() {
            prior.team.as_str()
        } else {
            quote.team.as_str()
        };

        // 1. Team factors
        let team_factors = ctx.team_factors(team);
        mean *= team_factors.product();

        // 2. Usage
        let usage = ctx.usage(&quote.player);
        mean *= usage.snap_adj * usage.share_adj;

        // 3. Weather
        let vol = self.volatility;
        let weather = ctx.weather(&quote.game_id);
        let wind = weather
            .wind_mph
            .is_some_and(|w| w >= vol.wind_threshold_mph);
        if wind {
            sd *= 1.0 + vol.wind_sd_widen;
        }
        let cold = weather
            .temp_f
            .is_some_and(|t| t <= vol.cold_threshold_f);
        if cold {
            sd *= 1.0 + vol.cold_sd_widen;
        }

        // 4. Opponent pass rush
        let opponent = quote
            .opponent
            .clone()
            .or_else(|| ctx.opponent(&quote.game_id, team));
        let pressure = opponent.is_some_and(|o| ctx.is_top10_pressure(&o));
        if pressure {
            sd *= 1.0 + vol.widen_sd_if_pressure_top10;
        }

        // 5. Quarterback tier
        let qb_lowtier = quote.market.is_passing() && ctx.is_low_tier_qb(&quote.player);
        if qb_lowtier {
            sd *= 1.0 + vol.widen_sd_if_qb_lowtier;
        }

        let sd = if sd.is_finite() { sd.max(SD_FLOOR) } else { SD_FLOOR };

        Ok(Adjustment {
            mean,
            sd,
            team: team_factors,
            usage,
            wind,
            cold,
            pressure,
            qb_lowtier,
            default_sd,
        })
    }
}
