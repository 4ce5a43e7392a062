//! Advisory topics and their scoring profiles.
//!
//! Each topic carries a body → weight map over the seven classical bodies,
//! the houses it cares about, and recommendation text per verdict. The
//! built-in catalog is immutable and built once; overrides produce a new
//! catalog rather than mutating it.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::sync::OnceLock;

use muhurta_chart::{Body, CLASSICAL_BODIES};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AdviceError;
use crate::verdict::Verdict;

/// Life topic a request asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Contract,
    Meeting,
    Date,
    Travel,
    Purchase,
    Health,
    Negotiation,
    Custom,
}

pub const ALL_TOPICS: [Topic; 8] = [
    Topic::Contract,
    Topic::Meeting,
    Topic::Date,
    Topic::Travel,
    Topic::Purchase,
    Topic::Health,
    Topic::Negotiation,
    Topic::Custom,
];

impl Topic {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Meeting => "meeting",
            Self::Date => "date",
            Self::Travel => "travel",
            Self::Purchase => "purchase",
            Self::Health => "health",
            Self::Negotiation => "negotiation",
            Self::Custom => "custom",
        }
    }

    /// 0-based index into [`ALL_TOPICS`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exact (case-insensitive) key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_TOPICS
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Key lookup falling back to [`Topic::Custom`].
    pub fn resolve(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            debug!(topic = key, "unknown topic, using custom profile");
            Self::Custom
        })
    }

    /// Topics that take the Mercury-retrograde penalty.
    pub const fn is_mercury_sensitive(self) -> bool {
        matches!(
            self,
            Self::Contract | Self::Purchase | Self::Meeting | Self::Negotiation
        )
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub priority: Priority,
    pub category: String,
}

impl Recommendation {
    pub fn new(text: impl Into<String>, priority: Priority, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority,
            category: category.into(),
        }
    }
}

/// Recommendation text keyed by verdict.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecommendationBank {
    #[serde(default)]
    pub good: Vec<Recommendation>,
    #[serde(default)]
    pub neutral: Vec<Recommendation>,
    #[serde(default)]
    pub challenging: Vec<Recommendation>,
}

impl RecommendationBank {
    pub fn for_verdict(&self, verdict: Verdict) -> &[Recommendation] {
        match verdict {
            Verdict::Good => &self.good,
            Verdict::Neutral => &self.neutral,
            Verdict::Challenging => &self.challenging,
        }
    }
}

/// Scoring profile for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicProfile {
    pub description: String,
    /// Weight per classical body; absent bodies weigh 0.
    pub weights: BTreeMap<Body, f64>,
    /// Relevant houses, 1-based.
    pub houses: Vec<u8>,
    #[serde(default)]
    pub recommendations: RecommendationBank,
}

impl TopicProfile {
    pub fn weight(&self, body: Body) -> f64 {
        self.weights.get(&body).copied().unwrap_or(0.0)
    }

    fn validate(&self, topic: Topic) -> Result<(), AdviceError> {
        for (body, w) in &self.weights {
            if !body.is_classical() {
                return Err(AdviceError::InvalidConfig(format!(
                    "topic {topic}: {body} is not a tracked body"
                )));
            }
            if !w.is_finite() || *w < 0.0 {
                return Err(AdviceError::InvalidConfig(format!(
                    "topic {topic}: weight for {body} must be finite and >= 0, got {w}"
                )));
            }
        }
        let mut seen = [false; 12];
        for &h in &self.houses {
            if !(1..=12).contains(&h) {
                return Err(AdviceError::InvalidConfig(format!(
                    "topic {topic}: house {h} outside 1..=12"
                )));
            }
            if std::mem::replace(&mut seen[usize::from(h - 1)], true) {
                return Err(AdviceError::InvalidConfig(format!(
                    "topic {topic}: house {h} listed twice"
                )));
            }
        }
        Ok(())
    }
}

/// Partial replacement for a built-in profile. Present fields win;
/// `weights` merges per body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicOverride {
    pub description: Option<String>,
    #[serde(default)]
    pub weights: BTreeMap<Body, f64>,
    pub houses: Option<Vec<u8>>,
    pub recommendations: Option<RecommendationBank>,
}

/// One profile per topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCatalog {
    profiles: [TopicProfile; 8],
}

static BUILTIN: OnceLock<TopicCatalog> = OnceLock::new();

impl TopicCatalog {
    /// The built-in catalog, built on first use.
    pub fn builtin() -> &'static TopicCatalog {
        BUILTIN.get_or_init(|| TopicCatalog {
            profiles: ALL_TOPICS.map(builtin_profile),
        })
    }

    pub fn profile(&self, topic: Topic) -> &TopicProfile {
        &self.profiles[topic.index()]
    }

    /// New catalog with overrides applied and validated.
    pub fn with_overrides(
        &self,
        overrides: &BTreeMap<Topic, TopicOverride>,
    ) -> Result<TopicCatalog, AdviceError> {
        let mut out = self.clone();
        for (topic, o) in overrides {
            let p = &mut out.profiles[topic.index()];
            if let Some(d) = &o.description {
                p.description.clone_from(d);
            }
            for (body, w) in &o.weights {
                p.weights.insert(*body, *w);
            }
            if let Some(h) = &o.houses {
                p.houses.clone_from(h);
            }
            if let Some(r) = &o.recommendations {
                p.recommendations = r.clone();
            }
            debug!(%topic, "applied topic override");
        }
        for topic in ALL_TOPICS {
            out.profile(topic).validate(topic)?;
        }
        Ok(out)
    }
}

fn weights(w: [f64; 7]) -> BTreeMap<Body, f64> {
    CLASSICAL_BODIES.into_iter().zip(w).collect()
}

fn bank(
    good: &[(&str, Priority, &str)],
    neutral: &[(&str, Priority, &str)],
    challenging: &[(&str, Priority, &str)],
) -> RecommendationBank {
    fn build(rows: &[(&str, Priority, &str)]) -> Vec<Recommendation> {
        rows.iter()
            .map(|(t, p, c)| Recommendation::new(*t, *p, *c))
            .collect()
    }
    RecommendationBank {
        good: build(good),
        neutral: build(neutral),
        challenging: build(challenging),
    }
}

// Weight order: Sun, Moon, Mercury, Venus, Mars, Jupiter, Saturn.
fn builtin_profile(topic: Topic) -> TopicProfile {
    use Priority::{High, Low, Medium};

    let (description, w, houses, recommendations) = match topic {
        Topic::Contract => (
            "Signing contracts and formal agreements",
            [1.0, 1.0, 3.0, 1.0, 0.5, 2.0, 2.0],
            vec![3, 7, 10],
            bank(
                &[
                    ("Sign during the best window; terms agreed now tend to hold.", High, "timing"),
                    ("Read the fine print once more before signing.", Low, "preparation"),
                ],
                &[
                    ("Proceed if needed, but build in review checkpoints.", Medium, "timing"),
                    ("Confirm every verbal promise in writing.", High, "communication"),
                ],
                &[
                    ("Delay signing if you can; ask for more time to review.", High, "timing"),
                    ("Have a second reader check clauses on deadlines and penalties.", High, "caution"),
                ],
            ),
        ),
        Topic::Meeting => (
            "Meetings, interviews and presentations",
            [1.5, 1.5, 3.0, 1.0, 0.5, 1.5, 1.0],
            vec![3, 10, 11],
            bank(
                &[
                    ("Schedule the key conversation in the best window.", High, "timing"),
                    ("Lead with your main point; the room is receptive.", Medium, "communication"),
                ],
                &[
                    ("Send an agenda ahead so the meeting stays on track.", Medium, "preparation"),
                    ("Keep the meeting short and close with clear next steps.", Low, "communication"),
                ],
                &[
                    ("Expect misunderstandings; summarize decisions in writing.", High, "caution"),
                    ("Move high-stakes discussions to another day if possible.", Medium, "timing"),
                ],
            ),
        ),
        Topic::Date => (
            "Romantic dates and social connection",
            [1.0, 2.0, 1.0, 3.0, 2.0, 1.5, 0.5],
            vec![5, 7],
            bank(
                &[
                    ("Plan something personal; warmth comes easily today.", High, "connection"),
                    ("Say what you feel rather than hinting.", Medium, "communication"),
                ],
                &[
                    ("Keep plans simple and low-pressure.", Medium, "planning"),
                    ("Listen more than you talk.", Low, "communication"),
                ],
                &[
                    ("Avoid loaded topics; tempers may run short.", High, "caution"),
                    ("A relaxed setting works better than a big occasion.", Medium, "planning"),
                ],
            ),
        ),
        Topic::Travel => (
            "Travel and journeys",
            [1.0, 1.5, 2.5, 1.0, 1.5, 2.5, 1.0],
            vec![3, 9],
            bank(
                &[
                    ("Depart in the best window for a smoother trip.", High, "timing"),
                    ("Leave room for spontaneous detours.", Low, "planning"),
                ],
                &[
                    ("Double-check bookings and connection times.", Medium, "preparation"),
                    ("Carry copies of key documents.", Low, "preparation"),
                ],
                &[
                    ("Allow extra time for delays and changes.", High, "caution"),
                    ("Confirm tickets and reservations the day before.", High, "preparation"),
                ],
            ),
        ),
        Topic::Purchase => (
            "Major purchases and investments",
            [0.5, 1.5, 2.0, 2.5, 0.5, 2.5, 1.5],
            vec![2, 8],
            bank(
                &[
                    ("Good moment to commit to a purchase you have researched.", High, "timing"),
                    ("Negotiate the price; sellers are flexible.", Medium, "negotiation"),
                ],
                &[
                    ("Compare at least two offers before deciding.", Medium, "preparation"),
                    ("Check return and warranty terms.", Low, "caution"),
                ],
                &[
                    ("Hold off on large purchases; wait for a better window.", High, "timing"),
                    ("Avoid impulse buys and non-refundable deals.", High, "caution"),
                ],
            ),
        ),
        Topic::Health => (
            "Health appointments and wellbeing routines",
            [2.5, 2.0, 1.0, 1.0, 2.0, 1.5, 1.5],
            vec![1, 6, 12],
            bank(
                &[
                    ("Book appointments or start a new routine in the best window.", High, "timing"),
                    ("Energy is steady; a good day for exercise.", Low, "wellbeing"),
                ],
                &[
                    ("Stick to familiar routines.", Medium, "wellbeing"),
                    ("Write down questions before any appointment.", Low, "preparation"),
                ],
                &[
                    ("Rest more and avoid overexertion.", High, "wellbeing"),
                    ("Get a second opinion before elective procedures.", Medium, "caution"),
                ],
            ),
        ),
        Topic::Negotiation => (
            "Negotiations and difficult conversations",
            [1.5, 1.0, 3.0, 1.5, 2.0, 1.5, 1.0],
            vec![3, 7, 8],
            bank(
                &[
                    ("Make your opening offer in the best window.", High, "timing"),
                    ("Aim for terms that both sides can keep.", Medium, "negotiation"),
                ],
                &[
                    ("Know your walk-away point before you start.", High, "preparation"),
                    ("Trade concessions one at a time.", Medium, "negotiation"),
                ],
                &[
                    ("Postpone if possible; positions may harden quickly.", High, "timing"),
                    ("Keep a written record of what was offered.", Medium, "caution"),
                ],
            ),
        ),
        Topic::Custom => (
            "General timing",
            [1.0; 7],
            (1..=12u8).collect::<Vec<_>>(),
            bank(
                &[("Act on plans during the best window.", High, "timing")],
                &[("Proceed steadily and keep options open.", Medium, "timing")],
                &[("Prefer routine tasks and postpone major starts.", High, "caution")],
            ),
        ),
    };

    TopicProfile {
        description: description.to_string(),
        weights: weights(w),
        houses,
        recommendations,
    }
}
