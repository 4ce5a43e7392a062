//! Advisory window search.
//!
//! Splits a civil day (UTC) into equal windows, scores each window start
//! with the scalar pass of [`TransitScorer`], ranks them, and builds the
//! full explanation for the best one only.
//!
//! Algorithm:
//! 1. Parse the date and resolve the topic (unknown keys use `custom`).
//! 2. For each window start, fetch positions and compute `score_only`.
//!    A window whose feed call fails is dropped with a warning; the request
//!    fails only when every window fails.
//! 3. Stable sort by score, descending. Ties keep the earliest window.
//! 4. Re-score the best window with full detail, reusing its positions.
//! 5. Derive verdict, color, narrative, recommendations and house relevance.

use std::time::Instant;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use muhurta_chart::{AspectTable, NatalChart};
use muhurta_time::UtcTime;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::advisory_types::{AdviceRequest, AdviceResult, HouseRelevance, ScoredWindow, SearchConfig};
use crate::error::{AdviceError, FeedError};
use crate::feed::{BodyPositions, EphemerisFeed, require_classical};
use crate::scorer::{Factor, TransitScore, TransitScorer};
use crate::topic::{Topic, TopicCatalog, TopicProfile};
use crate::verdict::Verdict;

/// `generatedBy` value of rule-based results.
pub const GENERATED_BY: &str = "muhurta-rules";

/// Factors quoted in the narrative.
pub const NARRATIVE_FACTORS: usize = 5;

/// Short meaning of each house, house 1 first.
pub const HOUSE_THEMES: [&str; 12] = [
    "self, body and first impressions",
    "money, possessions and values",
    "communication, paperwork and short trips",
    "home, family and foundations",
    "romance, pleasure and creativity",
    "health, routines and daily work",
    "partnerships and agreements",
    "shared resources and commitments",
    "travel, learning and the wider world",
    "career and public standing",
    "friends, networks and allies",
    "rest, retreat and hidden matters",
];

/// Everything the search needs besides the request itself.
#[derive(Debug, Clone)]
pub struct AdviceSettings<'a> {
    pub catalog: &'a TopicCatalog,
    pub aspects: AspectTable,
    pub search: SearchConfig,
}

impl Default for AdviceSettings<'static> {
    fn default() -> Self {
        Self {
            catalog: TopicCatalog::builtin(),
            aspects: AspectTable::default(),
            search: SearchConfig::default(),
        }
    }
}

struct WindowSample {
    index: u32,
    start: DateTime<Utc>,
    score: u8,
    positions: BodyPositions,
}

type WindowResult = (u32, DateTime<Utc>, Result<(u8, BodyPositions), FeedError>);

struct Scan {
    samples: Vec<WindowSample>,
    failed: usize,
    partial: bool,
}

/// Advice for a request, stamped with the current time.
pub fn advise<F>(
    feed: &F,
    natal: &NatalChart,
    request: &AdviceRequest,
    settings: &AdviceSettings<'_>,
) -> Result<AdviceResult, AdviceError>
where
    F: EphemerisFeed + ?Sized,
{
    advise_at(feed, natal, request, settings, Utc::now())
}

/// Advice for a request with an explicit `evaluatedAt`.
///
/// Output depends only on the inputs, so two calls with equal arguments
/// serialize to identical JSON.
pub fn advise_at<F>(
    feed: &F,
    natal: &NatalChart,
    request: &AdviceRequest,
    settings: &AdviceSettings<'_>,
    evaluated_at: DateTime<Utc>,
) -> Result<AdviceResult, AdviceError>
where
    F: EphemerisFeed + ?Sized,
{
    settings.search.validate().map_err(|e| AdviceError::InvalidConfig(e.to_string()))?;
    request.validate()?;

    let day = UtcTime::parse_date(&request.date)?;
    let day_start = day.to_datetime()?;
    let topic = Topic::resolve(&request.topic);
    let profile = settings.catalog.profile(topic);
    let scorer = TransitScorer::new(topic, profile, &settings.aspects);

    let Scan {
        mut samples,
        failed,
        partial,
    } = scan_windows(feed, natal, &scorer, day_start, &settings.search)?;

    samples.sort_by(|a, b| b.score.cmp(&a.score));
    let Some(best) = samples.first() else {
        return Err(AdviceError::EphemerisUnavailable {
            windows: failed,
            last: FeedError::Unavailable {
                jd: day.to_jd()?,
                reason: "no window produced a score".into(),
            },
        });
    };

    let window_len = TimeDelta::minutes(i64::from(settings.search.window_minutes));
    let best_windows: Vec<ScoredWindow> = samples
        .iter()
        .take(settings.search.top_n)
        .map(|s| ScoredWindow {
            start_iso: iso_millis(s.start),
            end_iso: iso_millis(s.start + window_len),
            score: s.score,
        })
        .collect();

    let detail = scorer.score(natal, &best.positions);
    let verdict = Verdict::from_score(detail.score);
    let houses = house_relevance(natal, profile);
    let explanation = narrative(
        profile,
        best.start,
        best.start + window_len,
        &detail,
        verdict,
        partial,
    );

    info!(
        date = %day.date_string(),
        %topic,
        score = detail.score,
        %verdict,
        best_window = best.index,
        scanned = samples.len(),
        failed,
        partial,
        "advice computed"
    );

    Ok(AdviceResult {
        verdict,
        color: verdict.color().to_string(),
        score: detail.score,
        factors: detail.factors,
        aspects: detail.aspects,
        houses,
        best_windows,
        explanation,
        recommendations: profile.recommendations.for_verdict(verdict).to_vec(),
        generated_by: GENERATED_BY.to_string(),
        evaluated_at: iso_millis(evaluated_at),
        date: day.date_string(),
        topic,
        timezone: request.timezone.clone(),
        topic_description: profile.description.clone(),
        partial,
    })
}

fn iso_millis(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn evaluate_window<F>(
    feed: &F,
    natal: &NatalChart,
    scorer: &TransitScorer<'_>,
    start: DateTime<Utc>,
) -> Result<(u8, BodyPositions), FeedError>
where
    F: EphemerisFeed + ?Sized,
{
    let jd = UtcTime::from(start)
        .to_jd()
        .map_err(|e| FeedError::Unavailable {
            jd: f64::NAN,
            reason: e.to_string(),
        })?;
    let positions = feed.positions_at(jd)?;
    require_classical(&positions, jd)?;
    Ok((scorer.score_only(natal, &positions), positions))
}

fn scan_windows<F>(
    feed: &F,
    natal: &NatalChart,
    scorer: &TransitScorer<'_>,
    day_start: DateTime<Utc>,
    config: &SearchConfig,
) -> Result<Scan, AdviceError>
where
    F: EphemerisFeed + ?Sized,
{
    let step = i64::from(config.window_minutes);
    let start_of = |i: u32| day_start + TimeDelta::minutes(i64::from(i) * step);

    let mut partial = false;
    let results: Vec<WindowResult> = if config.parallel {
        (0..config.window_count)
            .into_par_iter()
            .map(|i| {
                let start = start_of(i);
                (i, start, evaluate_window(feed, natal, scorer, start))
            })
            .collect()
    } else {
        let started = Instant::now();
        let deadline = config.deadline();
        let mut out: Vec<WindowResult> = Vec::with_capacity(config.window_count as usize);
        let mut any_ok = false;
        for i in 0..config.window_count {
            if any_ok && deadline.is_some_and(|d| started.elapsed() >= d) {
                warn!(
                    scanned = i,
                    total = config.window_count,
                    "deadline reached, returning partial result"
                );
                partial = true;
                break;
            }
            let start = start_of(i);
            let result = evaluate_window(feed, natal, scorer, start);
            any_ok |= result.is_ok();
            out.push((i, start, result));
        }
        out
    };

    let mut samples = Vec::with_capacity(results.len());
    let mut failed = 0;
    let mut last_err = None;
    for (index, start, result) in results {
        match result {
            Ok((score, positions)) => {
                debug!(window = index, score, "window scored");
                samples.push(WindowSample {
                    index,
                    start,
                    score,
                    positions,
                });
            }
            Err(e) => {
                warn!(window = index, error = %e, "ephemeris unavailable, skipping window");
                failed += 1;
                last_err = Some(e);
            }
        }
    }

    if samples.is_empty() {
        if let Some(last) = last_err {
            return Err(AdviceError::EphemerisUnavailable {
                windows: failed,
                last,
            });
        }
    }
    Ok(Scan {
        samples,
        failed,
        partial,
    })
}

fn house_relevance(natal: &NatalChart, profile: &TopicProfile) -> Vec<HouseRelevance> {
    let Some(cusps) = natal.houses.as_ref() else {
        debug!("natal chart has no house cusps, skipping house relevance");
        return Vec::new();
    };
    profile
        .houses
        .iter()
        .filter_map(|&house| {
            let sign = cusps.cusp_sign(house)?;
            let occupants = natal.bodies_in_house(house).ok()?;
            let theme = HOUSE_THEMES[usize::from(house - 1)];
            let relevance = if occupants.is_empty() {
                format!("House {house} ({theme}) begins in {sign}; no natal bodies here.")
            } else {
                let names: Vec<&str> = occupants.iter().map(|b| b.name()).collect();
                format!(
                    "House {house} ({theme}) begins in {sign}; natal {} here.",
                    names.join(", ")
                )
            };
            Some(HouseRelevance {
                house,
                sign,
                relevance,
            })
        })
        .collect()
}

/// Top factors by |contribution|, stable on ties.
pub fn ranked_factors(factors: &[Factor], n: usize) -> Vec<&Factor> {
    let mut ranked: Vec<&Factor> = factors.iter().collect();
    ranked.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    ranked.truncate(n);
    ranked
}

fn narrative(
    profile: &TopicProfile,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    detail: &TransitScore,
    verdict: Verdict,
    partial: bool,
) -> String {
    let mut text = format!(
        "{}: the best window is {} to {} UTC on {}, scoring {}/100 ({}).",
        profile.description,
        start.format("%H:%M"),
        end.format("%H:%M"),
        start.format("%Y-%m-%d"),
        detail.score,
        verdict
    );

    let top = ranked_factors(&detail.factors, NARRATIVE_FACTORS);
    if top.is_empty() {
        text.push_str(" No major transits touch your natal chart in this window.");
    } else {
        text.push_str(" Key influences:");
        for f in top {
            text.push_str(&format!(" {} ({:+.1}).", f.label, f.contribution));
        }
    }

    if partial {
        text.push_str(" The scan stopped early; only part of the day was checked.");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::LinearMotionFeed;
    use muhurta_chart::{Body, BodyReading, HouseCusps, Sign};
    use std::collections::BTreeMap;

    fn factor(label: &str, contribution: f64) -> Factor {
        Factor {
            label: label.into(),
            weight: 1.0,
            value: contribution,
            contribution,
            description: String::new(),
        }
    }

    #[test]
    fn ranking_is_by_magnitude_and_stable() {
        let fs = vec![
            factor("a", 1.0),
            factor("b", -3.0),
            factor("c", 3.0),
            factor("d", 0.5),
        ];
        let top: Vec<_> = ranked_factors(&fs, 3).iter().map(|f| f.label.as_str()).collect();
        assert_eq!(top, ["b", "c", "a"]);
    }

    #[test]
    fn house_relevance_lists_occupants() {
        let mut bodies = BTreeMap::new();
        bodies.insert(Body::Venus, BodyReading::fixed(95.0).unwrap());
        let natal = NatalChart::new(bodies, Some(HouseCusps::equal(0.0).unwrap()));
        let profile = TopicCatalog::builtin().profile(Topic::Date);
        let rel = house_relevance(&natal, profile);
        assert_eq!(rel.len(), 2);
        assert_eq!(rel[0].house, 5);
        assert_eq!(rel[0].sign, Sign::Leo);
        assert!(rel[0].relevance.contains("no natal bodies"));
        // Venus at 95 is in house 4, not in 5 or 7
        assert_eq!(rel[1].house, 7);
        assert_eq!(rel[1].sign, Sign::Libra);
    }

    #[test]
    fn no_houses_no_relevance() {
        let natal = NatalChart::default();
        let profile = TopicCatalog::builtin().profile(Topic::Custom);
        assert!(house_relevance(&natal, profile).is_empty());
    }

    #[test]
    fn windows_cover_the_day() {
        let feed = LinearMotionFeed::uniform(2460390.5, 10.0, 1.0).unwrap();
        let natal = NatalChart::default();
        let req = AdviceRequest::new("2024-03-20", "custom");
        let settings = AdviceSettings {
            search: SearchConfig {
                top_n: 24,
                ..SearchConfig::default()
            },
            ..AdviceSettings::default()
        };
        let out = advise(&feed, &natal, &req, &settings).unwrap();
        assert_eq!(out.best_windows.len(), 24);
        // all windows tie at 50, so order stays chronological
        assert_eq!(out.best_windows[0].start_iso, "2024-03-20T00:00:00.000Z");
        assert_eq!(out.best_windows[0].end_iso, "2024-03-20T01:00:00.000Z");
        assert_eq!(out.best_windows[23].end_iso, "2024-03-21T00:00:00.000Z");
        assert_eq!(out.score, 50);
        assert_eq!(out.verdict, Verdict::Neutral);
    }

    #[test]
    fn narrative_mentions_window_and_partial() {
        let profile = TopicCatalog::builtin().profile(Topic::Travel);
        let detail = TransitScore {
            score: 72,
            total: 22.0,
            factors: vec![factor("Transiting Jupiter trine natal Jupiter", 2.5)],
            aspects: Vec::new(),
        };
        let start = UtcTime::new(2024, 3, 20, 5, 0, 0.0).to_datetime().unwrap();
        let text = narrative(
            profile,
            start,
            start + TimeDelta::hours(1),
            &detail,
            Verdict::Good,
            true,
        );
        assert!(text.contains("05:00 to 06:00 UTC on 2024-03-20"));
        assert!(text.contains("Transiting Jupiter trine natal Jupiter (+2.5)."));
        assert!(text.contains("stopped early"));
    }
}
