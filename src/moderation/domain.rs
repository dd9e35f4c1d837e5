use std::convert::TryFrom;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The scoring service's ruling on a single scored item.
///
/// The upstream model is inconsistent about types and emits the verdict as
/// either a JSON boolean or one of the strings `"true"`, `"false"`, and
/// `"doubt"`. Anything else is a decode error rather than a guess.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Approved,
    Rejected,
    Doubtful,
}

impl Verdict {
    /// Only an explicit approval publishes a project. `Doubtful` parks it
    /// exactly like `Rejected` does.
    pub fn is_approval(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Self::Approved => "true",
            Self::Rejected => "false",
            Self::Doubtful => "doubt",
        };

        serializer.serialize_str(value)
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Approved),
            Raw::Flag(false) => Ok(Self::Rejected),
            Raw::Text(text) => match text.as_str() {
                "true" => Ok(Self::Approved),
                "false" => Ok(Self::Rejected),
                "doubt" => Ok(Self::Doubtful),
                other => Err(de::Error::unknown_variant(
                    other,
                    &["true", "false", "doubt"],
                )),
            },
        }
    }
}

pub const ESG_SCORE_MAX: u8 = 5;

/// A single environmental, social, or governance score in `0..=5`.
///
/// The wire value arrives as a JSON integer or as a numeric string ("4" vs 4);
/// both are accepted. Out-of-range values are rejected, not clamped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EsgScore(u8);

impl EsgScore {
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("ESG score {0} is outside 0..=5")]
pub struct EsgScoreOutOfRange(pub i64);

impl TryFrom<i64> for EsgScore {
    type Error = EsgScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(ESG_SCORE_MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(EsgScoreOutOfRange(value))
        }
    }
}

impl From<EsgScore> for i16 {
    fn from(score: EsgScore) -> Self {
        Self::from(score.0)
    }
}

impl Serialize for EsgScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for EsgScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(number) => number,
            Raw::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("non-numeric ESG score {:?}", text)))?,
        };

        Self::try_from(value).map_err(de::Error::custom)
    }
}

/// One scored item from the moderation service, after defensive decoding.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModerationResult {
    id: i64,
    valid: Verdict,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    e: EsgScore,
    #[serde(default)]
    s: EsgScore,
    #[serde(default)]
    g: EsgScore,
}

impl ModerationResult {
    pub fn new(id: i64, valid: Verdict, reason: String, e: EsgScore, s: EsgScore, g: EsgScore) -> Self {
        Self {
            id,
            valid,
            reason,
            e,
            s,
            g,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn verdict(&self) -> Verdict {
        self.valid
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn environmental(&self) -> EsgScore {
        self.e
    }

    pub fn social(&self) -> EsgScore {
        self.s
    }

    pub fn governance(&self) -> EsgScore {
        self.g
    }
}
