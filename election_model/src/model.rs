// ********* Domain records ***********

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Elections are numbered, organizations and candidates use string ids.
pub type ElectionId = u64;

/// The two flavours of organization.
///
/// The flavour decides which scope fields an election collects and which
/// labels the wizard presents.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    /// Geographic elections (national, regional, municipal).
    Territorial,
    /// Workplace elections (staff representatives, works councils).
    Professional,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Territorial => "territorial",
            OrganizationType::Professional => "professional",
        }
    }
}

impl Display for OrganizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "territorial" => Ok(OrganizationType::Territorial),
            "professional" => Ok(OrganizationType::Professional),
            x => Err(format!(
                "unknown organization type {:?} (expected territorial or professional)",
                x
            )),
        }
    }
}

/// A tenant-like container for elections.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub organization_type: OrganizationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
    /// At most one candidate per election carries this flag.
    #[serde(default)]
    pub is_our_candidate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A polling station inside a voting location.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingBureau {
    pub id: String,
    pub name: String,
    pub capacity: u64,
    pub location: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LocationHierarchy {
    pub level1: String,
    pub level2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level3: Option<String>,
}

/// A voting site (center) holding one or more bureaux.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingLocation {
    pub id: String,
    pub name: String,
    pub hierarchy: LocationHierarchy,
    #[serde(default)]
    pub bureaux: Vec<VotingBureau>,
}

/// Lifecycle of an election relative to its date.
///
/// The labels written by earlier versions of the console are accepted when reading.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ElectionStatus {
    #[serde(rename = "upcoming", alias = "À venir")]
    Upcoming,
    #[serde(rename = "ongoing", alias = "En cours")]
    Ongoing,
    #[serde(rename = "finished", alias = "Terminée")]
    Finished,
}

impl ElectionStatus {
    pub fn color(&self) -> StatusColor {
        match self {
            ElectionStatus::Upcoming => StatusColor::Blue,
            ElectionStatus::Ongoing => StatusColor::Green,
            ElectionStatus::Finished => StatusColor::Gray,
        }
    }
}

impl Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ElectionStatus::Upcoming => "upcoming",
            ElectionStatus::Ongoing => "ongoing",
            ElectionStatus::Finished => "finished",
        };
        write!(f, "{}", s)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Blue,
    Green,
    Gray,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritorialScope {
    pub province: String,
    pub department: String,
    pub commune: String,
    pub arrondissement: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalScope {
    pub company: String,
    pub direction: String,
    pub service: String,
}

/// Where an election takes place.
///
/// Stored flat next to the other election fields, discriminated by `organizationType`.
/// Records without the discriminator are professional when `company` or
/// `direction` is filled, territorial otherwise.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "organizationType", rename_all = "lowercase")]
pub enum ElectionScope {
    Territorial(TerritorialScope),
    Professional(ProfessionalScope),
}

// All the scope fields a stored election may carry.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredScope {
    organization_type: Option<OrganizationType>,
    province: String,
    department: String,
    commune: String,
    arrondissement: String,
    company: String,
    direction: String,
    service: String,
}

impl From<StoredScope> for ElectionScope {
    fn from(s: StoredScope) -> ElectionScope {
        let organization_type = s.organization_type.unwrap_or(
            if s.company.trim().is_empty() && s.direction.trim().is_empty() {
                OrganizationType::Territorial
            } else {
                OrganizationType::Professional
            },
        );
        match organization_type {
            OrganizationType::Territorial => ElectionScope::Territorial(TerritorialScope {
                province: s.province,
                department: s.department,
                commune: s.commune,
                arrondissement: s.arrondissement,
            }),
            OrganizationType::Professional => ElectionScope::Professional(ProfessionalScope {
                company: s.company,
                direction: s.direction,
                service: s.service,
            }),
        }
    }
}

impl<'de> Deserialize<'de> for ElectionScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StoredScope::deserialize(deserializer).map(ElectionScope::from)
    }
}

impl ElectionScope {
    pub fn organization_type(&self) -> OrganizationType {
        match self {
            ElectionScope::Territorial(_) => OrganizationType::Territorial,
            ElectionScope::Professional(_) => OrganizationType::Professional,
        }
    }

    /// The second-level unit that gets split into zones by the geographic breakdown.
    pub fn subdivision(&self) -> &str {
        match self {
            ElectionScope::Territorial(t) => t.commune.as_str(),
            ElectionScope::Professional(p) => p.direction.as_str(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            ElectionScope::Territorial(t) => {
                format!("District of {}, {}", t.commune, t.arrondissement)
            }
            ElectionScope::Professional(p) => format!("{} - {}", p.company, p.direction),
        }
    }

    pub fn location(&self) -> String {
        match self {
            ElectionScope::Territorial(t) => format!("{}, {}", t.commune, t.arrondissement),
            ElectionScope::Professional(p) => p.company.clone(),
        }
    }
}

/// One electoral event.
///
/// Infrastructure is described either by the flat `centers` / `bureaux` estimates
/// or, when present, by the granular `voting_locations` list.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: ElectionId,
    pub title: String,
    pub date: String,
    pub status: ElectionStatus,
    pub status_color: StatusColor,
    pub description: String,
    pub voters: u64,
    pub candidates: u64,
    pub centers: u64,
    pub bureaux: u64,
    pub location: String,
    #[serde(rename = "type")]
    pub election_type: String,
    pub seats_available: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_goal: Option<u64>,
    /// Empty for records that were never attached to an organization.
    #[serde(default)]
    pub organization_id: String,
    #[serde(flatten)]
    pub scope: ElectionScope,
    #[serde(default)]
    pub candidates_list: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_locations: Option<Vec<VotingLocation>>,
    #[serde(default)]
    pub is_active: bool,
}

impl Election {
    pub fn organization_type(&self) -> OrganizationType {
        self.scope.organization_type()
    }

    pub fn our_candidate(&self) -> Option<&Candidate> {
        self.candidates_list.iter().find(|c| c.is_our_candidate)
    }
}

/// Returns a millisecond timestamp id that is strictly greater than all the existing ones.
///
/// Two records created within the same millisecond still get distinct ids.
pub fn next_timestamp_id<I>(now: DateTime<Utc>, existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let now_ms = now.timestamp_millis();
    match existing.into_iter().max() {
        Some(m) if m >= now_ms => m.saturating_add(1),
        _ => now_ms,
    }
}

/// Election flavour of `next_timestamp_id`, on unsigned ids.
pub fn next_election_id<I>(now: DateTime<Utc>, existing: I) -> ElectionId
where
    I: IntoIterator<Item = ElectionId>,
{
    let now_ms = now.timestamp_millis().max(0) as ElectionId;
    match existing.into_iter().max() {
        Some(m) if m >= now_ms => m.saturating_add(1),
        _ => now_ms,
    }
}

// ********* Static configuration descriptors **********

/// Default labels of the three-level hierarchy of an organization type.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct OrganizationHierarchy {
    pub level1: &'static str,
    pub level2: &'static str,
    pub level3: &'static str,
}

/// Describes how elections of one organization type are configured.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ElectionModel {
    pub id: &'static str,
    pub name: &'static str,
    pub organization_type: OrganizationType,
    pub description: &'static str,
    pub default_hierarchy: OrganizationHierarchy,
    /// The scope fields collected at step 2 of the wizard.
    pub config_fields: &'static [&'static str],
    /// Titles of the five wizard steps, in order.
    pub step_titles: [&'static str; 5],
}

pub const ELECTION_MODELS: [ElectionModel; 2] = [
    ElectionModel {
        id: "territorial",
        name: "Territorial elections",
        organization_type: OrganizationType::Territorial,
        description: "For national, regional and municipal elections",
        default_hierarchy: OrganizationHierarchy {
            level1: "Province",
            level2: "City/Commune",
            level3: "Arrondissement",
        },
        config_fields: &["province", "department", "commune", "arrondissement"],
        step_titles: [
            "General information",
            "Electoral district",
            "Candidates",
            "Centers and bureaux",
            "Review",
        ],
    },
    ElectionModel {
        id: "professional",
        name: "Professional elections",
        organization_type: OrganizationType::Professional,
        description: "For works councils and staff representative elections",
        default_hierarchy: OrganizationHierarchy {
            level1: "Direction",
            level2: "Department",
            level3: "Service",
        },
        config_fields: &["company", "direction", "service"],
        step_titles: [
            "General information",
            "Professional scope",
            "Candidates",
            "Voting locations",
            "Review",
        ],
    },
];

pub fn model_by_id(id: &str) -> Option<&'static ElectionModel> {
    ELECTION_MODELS.iter().find(|m| m.id == id)
}

pub fn model_for(organization_type: OrganizationType) -> &'static ElectionModel {
    match organization_type {
        OrganizationType::Territorial => &ELECTION_MODELS[0],
        OrganizationType::Professional => &ELECTION_MODELS[1],
    }
}
