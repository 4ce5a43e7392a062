//! Weighted transit-to-natal score for one instant.
//!
//! Only same-body pairs are checked: transiting Mercury against natal
//! Mercury, transiting Venus against natal Venus, and so on over the seven
//! classical bodies. Each aspect found contributes
//! `weight(body) × base(kind) × strength / 12`; the total is added to a
//! neutral 50 and clamped to [0, 100].

use muhurta_chart::{
    AspectKind, AspectMatch, AspectMotion, AspectTable, Body, CLASSICAL_BODIES, MovingPoint,
    NatalChart,
};
use serde::Serialize;
use tracing::debug;

use crate::feed::BodyPositions;
use crate::topic::{Topic, TopicProfile};

/// Score with no contributions.
pub const BASELINE_SCORE: f64 = 50.0;
/// Largest base-weight magnitude; impacts are divided by it.
pub const IMPACT_SCALE: f64 = 12.0;
/// Flat contribution when transiting Mercury is retrograde on a sensitive topic.
pub const MERCURY_RETROGRADE_PENALTY: f64 = -12.0;

/// Signed base weight of an aspect kind.
pub const fn aspect_base_weight(kind: AspectKind) -> f64 {
    match kind {
        AspectKind::Conjunction => 10.0,
        AspectKind::Sextile => 8.0,
        AspectKind::Trine => 12.0,
        AspectKind::Square => -10.0,
        AspectKind::Opposition => -12.0,
    }
}

/// `clamp(round(50 + total), 0, 100)`. NaN maps to 50.
pub fn clamp_score(total: f64) -> u8 {
    let raw = BASELINE_SCORE + total;
    if raw.is_nan() {
        return BASELINE_SCORE as u8;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// One line of the score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    pub label: String,
    /// Topic weight of the body (1 for the retrograde factor).
    pub weight: f64,
    /// Impact before weighting.
    pub value: f64,
    pub contribution: f64,
    pub description: String,
}

/// A same-body aspect between a transiting and a natal position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitAspect {
    /// Transiting body.
    pub planet_a: Body,
    /// Natal body.
    pub planet_b: Body,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub orb: f64,
    pub impact: f64,
    pub description: String,
    #[serde(skip)]
    pub strength: f64,
    #[serde(skip)]
    pub motion: AspectMotion,
}

/// Full breakdown for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitScore {
    pub score: u8,
    /// Unclamped sum of contributions.
    pub total: f64,
    pub factors: Vec<Factor>,
    pub aspects: Vec<TransitAspect>,
}

struct Hit {
    body: Body,
    aspect: AspectMatch,
    weight: f64,
    impact: f64,
    contribution: f64,
}

/// Scorer bound to a topic profile and an orb table.
#[derive(Debug, Clone, Copy)]
pub struct TransitScorer<'a> {
    topic: Topic,
    profile: &'a TopicProfile,
    aspects: &'a AspectTable,
}

impl<'a> TransitScorer<'a> {
    pub fn new(topic: Topic, profile: &'a TopicProfile, aspects: &'a AspectTable) -> Self {
        Self {
            topic,
            profile,
            aspects,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    fn for_each_hit(&self, natal: &NatalChart, transits: &BodyPositions, mut f: impl FnMut(Hit)) {
        for body in CLASSICAL_BODIES {
            let natal_reading = match natal.reading(body) {
                Ok(r) => r,
                Err(e) => {
                    debug!(%body, error = %e, "skipping body");
                    continue;
                }
            };
            let Some(transit) = transits.get(&body) else {
                debug!(%body, "no transiting reading, skipping body");
                continue;
            };
            let Some(aspect) = self
                .aspects
                .find(MovingPoint::from(transit), MovingPoint::fixed(natal_reading.longitude))
            else {
                continue;
            };
            let weight = self.profile.weight(body);
            let impact = aspect_base_weight(aspect.kind) * aspect.strength;
            f(Hit {
                body,
                aspect,
                weight,
                impact,
                contribution: weight * impact / IMPACT_SCALE,
            });
        }
    }

    fn mercury_penalty_applies(&self, transits: &BodyPositions) -> bool {
        self.topic.is_mercury_sensitive()
            && transits
                .get(&Body::Mercury)
                .is_some_and(|r| r.is_retrograde())
    }

    /// Scalar score only.
    pub fn score_only(&self, natal: &NatalChart, transits: &BodyPositions) -> u8 {
        let mut total = 0.0;
        self.for_each_hit(natal, transits, |h| total += h.contribution);
        if self.mercury_penalty_applies(transits) {
            total += MERCURY_RETROGRADE_PENALTY;
        }
        clamp_score(total)
    }

    /// Score with factor and aspect detail.
    pub fn score(&self, natal: &NatalChart, transits: &BodyPositions) -> TransitScore {
        let mut total = 0.0;
        let mut factors = Vec::new();
        let mut aspects = Vec::new();

        self.for_each_hit(natal, transits, |h| {
            total += h.contribution;
            let kind = h.aspect.kind;
            let label = format!("Transiting {} {} natal {}", h.body, kind, h.body);
            let motion = match h.aspect.motion {
                AspectMotion::Applying => "applying",
                AspectMotion::Separating => "separating",
            };
            let description = format!(
                "Transiting {} forms a {} to natal {} (orb {:.2}°, {}); {}.",
                h.body,
                kind,
                h.body,
                h.aspect.orb,
                motion,
                tone(h.impact)
            );
            factors.push(Factor {
                label,
                weight: h.weight,
                value: h.impact,
                contribution: h.contribution,
                description: description.clone(),
            });
            aspects.push(TransitAspect {
                planet_a: h.body,
                planet_b: h.body,
                kind,
                orb: h.aspect.orb,
                impact: h.impact,
                description,
                strength: h.aspect.strength,
                motion: h.aspect.motion,
            });
        });

        if self.mercury_penalty_applies(transits) {
            total += MERCURY_RETROGRADE_PENALTY;
            factors.push(Factor {
                label: "Mercury retrograde".to_string(),
                weight: 1.0,
                value: MERCURY_RETROGRADE_PENALTY,
                contribution: MERCURY_RETROGRADE_PENALTY,
                description: format!(
                    "Transiting Mercury is retrograde; expect delays and revisions in {} matters.",
                    self.topic
                ),
            });
        }

        TransitScore {
            score: clamp_score(total),
            total,
            factors,
            aspects,
        }
    }
}

fn tone(impact: f64) -> &'static str {
    if impact > 0.0 {
        "supportive"
    } else if impact < 0.0 {
        "challenging"
    } else {
        "neutral"
    }
}
