//! Essential dignity of the classical bodies.
//!
//! Traditional (Ptolemaic) tables: domicile rulership, exaltation sign,
//! detriment (sign opposite a domicile) and fall (sign opposite the
//! exaltation). Outer planets have no essential dignity.

use serde::Serialize;

use crate::body::Body;
use crate::sign::Sign;

/// Essential dignity of a body in a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EssentialDignity {
    Ruler,
    Exaltation,
    Detriment,
    Fall,
    Neutral,
}

impl EssentialDignity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ruler => "ruler",
            Self::Exaltation => "exaltation",
            Self::Detriment => "detriment",
            Self::Fall => "fall",
            Self::Neutral => "neutral",
        }
    }
}

/// Domicile signs of a classical body. Empty for outer planets.
///
/// Sun [Leo], Moon [Cancer], Mercury [Gemini, Virgo], Venus [Taurus, Libra],
/// Mars [Aries, Scorpio], Jupiter [Sagittarius, Pisces],
/// Saturn [Capricorn, Aquarius].
pub fn domicile_signs(body: Body) -> &'static [Sign] {
    match body {
        Body::Sun => &[Sign::Leo],
        Body::Moon => &[Sign::Cancer],
        Body::Mercury => &[Sign::Gemini, Sign::Virgo],
        Body::Venus => &[Sign::Taurus, Sign::Libra],
        Body::Mars => &[Sign::Aries, Sign::Scorpio],
        Body::Jupiter => &[Sign::Sagittarius, Sign::Pisces],
        Body::Saturn => &[Sign::Capricorn, Sign::Aquarius],
        Body::Uranus | Body::Neptune | Body::Pluto => &[],
    }
}

/// Exaltation sign of a classical body.
pub const fn exaltation_sign(body: Body) -> Option<Sign> {
    match body {
        Body::Sun => Some(Sign::Aries),
        Body::Moon => Some(Sign::Taurus),
        Body::Mercury => Some(Sign::Virgo),
        Body::Venus => Some(Sign::Pisces),
        Body::Mars => Some(Sign::Capricorn),
        Body::Jupiter => Some(Sign::Cancer),
        Body::Saturn => Some(Sign::Libra),
        Body::Uranus | Body::Neptune | Body::Pluto => None,
    }
}

/// Classical ruler of a sign.
pub const fn sign_ruler(sign: Sign) -> Body {
    match sign {
        Sign::Aries | Sign::Scorpio => Body::Mars,
        Sign::Taurus | Sign::Libra => Body::Venus,
        Sign::Gemini | Sign::Virgo => Body::Mercury,
        Sign::Cancer => Body::Moon,
        Sign::Leo => Body::Sun,
        Sign::Sagittarius | Sign::Pisces => Body::Jupiter,
        Sign::Capricorn | Sign::Aquarius => Body::Saturn,
    }
}

/// Essential dignity of `body` placed in `sign`.
///
/// Priority: ruler > exaltation > detriment > fall, so Mercury in Virgo is
/// ruler and Mercury in Pisces is detriment.
pub fn essential_dignity(body: Body, sign: Sign) -> EssentialDignity {
    let domiciles = domicile_signs(body);
    if domiciles.contains(&sign) {
        return EssentialDignity::Ruler;
    }
    let exaltation = exaltation_sign(body);
    if exaltation == Some(sign) {
        return EssentialDignity::Exaltation;
    }
    if domiciles.iter().any(|d| d.opposite() == sign) {
        return EssentialDignity::Detriment;
    }
    if exaltation.map(Sign::opposite) == Some(sign) {
        return EssentialDignity::Fall;
    }
    EssentialDignity::Neutral
}
