// ******** Output data structures *********

use serde::{Deserialize, Serialize};

use crate::model::ElectionId;

/// Election-wide participation figures.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    pub total_voters: u64,
    pub total_ballots_cast: u64,
    /// In percent.
    pub turnout_rate: f64,
    pub null_ballots: u64,
    pub valid_ballots: u64,
    pub centers_completed: u64,
    pub total_centers: u64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    pub id: String,
    pub name: String,
    pub party: String,
    pub votes: u64,
    /// In percent of the valid ballots.
    pub percentage: f64,
    pub is_our_candidate: bool,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCandidateResult {
    /// Short display name (first word of the candidate name).
    pub candidate: String,
    pub votes: u64,
    pub percentage: f64,
}

/// Results for one zone of the geographic breakdown.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResult {
    pub region: String,
    /// Share of the registered voters assigned to this zone, in [0, 1].
    pub weight: f64,
    pub registered: u64,
    pub ballots_cast: u64,
    pub turnout_rate: f64,
    pub candidate_results: Vec<ZoneCandidateResult>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureSummary {
    pub centers: u64,
    pub bureaux: u64,
    pub average_per_center: f64,
}

/// Progress of the results entry across bureaux.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsProgress {
    pub entry_rate: f64,
    pub bureaux_entered: u64,
    pub total_bureaux: u64,
    pub pending_reports: u64,
}

/// How the organization's own candidate is doing.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub candidate_id: String,
    pub name: String,
    pub votes: u64,
    /// Votes ahead of the best-placed rival (negative when behind).
    pub gap_to_rival: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_goal: Option<u64>,
    /// Percent of the vote goal reached.
    pub goal_progress: f64,
}

/// All the derived views of one election.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consolidation {
    pub election_id: ElectionId,
    pub title: String,
    pub global: GlobalSummary,
    pub candidates: Vec<CandidateResult>,
    pub zones: Vec<ZoneResult>,
    pub infrastructure: InfrastructureSummary,
    pub progress: ResultsProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<CampaignSummary>,
}

// ********* Configuration **********

/// A ratio in hundredths of a percent.
///
/// Ratios are applied with integer arithmetic, so the results are exact floors.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(pub u32);

impl BasisPoints {
    pub fn percent(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn fraction(self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// floor(total * ratio)
    pub fn apply(self, total: u64) -> u64 {
        (total as u128 * self.0 as u128 / 10_000) as u64
    }

    /// floor(total * ratio / parts), zero when there are no parts.
    pub fn apply_split(self, total: u64, parts: u64) -> u64 {
        if parts == 0 {
            0
        } else {
            (total as u128 * self.0 as u128 / (10_000 * parts as u128)) as u64
        }
    }

    /// floor(total * self * other)
    pub fn apply_compound(self, other: BasisPoints, total: u64) -> u64 {
        (total as u128 * self.0 as u128 * other.0 as u128 / 100_000_000) as u64
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZoneRatio {
    pub weight: BasisPoints,
    pub turnout: BasisPoints,
}

/// The fixed ratios behind the consolidated views.
///
/// These are placeholders standing in for a tabulation feed: the console
/// does not receive submitted tallies, so every figure is derived from the
/// registered voters and infrastructure counts through these ratios.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsolidationRatios {
    pub turnout: BasisPoints,
    pub null_ballots: BasisPoints,
    pub valid_ballots: BasisPoints,
    pub centers_completed: BasisPoints,
    /// Share of the valid ballots given to the first listed candidate.
    pub first_place_share: BasisPoints,
    pub second_place_share: BasisPoints,
    /// Split evenly between the candidates listed third and beyond.
    pub remaining_share: BasisPoints,
    pub zones: [ZoneRatio; 3],
    pub entry_rate: BasisPoints,
    pub pending_reports: BasisPoints,
}

impl ConsolidationRatios {
    pub const DEFAULT_RATIOS: ConsolidationRatios = ConsolidationRatios {
        turnout: BasisPoints(6770),
        null_ballots: BasisPoints(250),
        valid_ballots: BasisPoints(6520),
        centers_completed: BasisPoints(9300),
        first_place_share: BasisPoints(4280),
        second_place_share: BasisPoints(3570),
        remaining_share: BasisPoints(2150),
        zones: [
            ZoneRatio {
                weight: BasisPoints(4000),
                turnout: BasisPoints(6910),
            },
            ZoneRatio {
                weight: BasisPoints(3500),
                turnout: BasisPoints(6680),
            },
            ZoneRatio {
                weight: BasisPoints(2500),
                turnout: BasisPoints(6760),
            },
        ],
        entry_rate: BasisPoints(8500),
        pending_reports: BasisPoints(1500),
    };
}

impl Default for ConsolidationRatios {
    fn default() -> Self {
        ConsolidationRatios::DEFAULT_RATIOS
    }
}
