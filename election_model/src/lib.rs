mod config;
mod model;

pub mod builder;
pub mod manual;
pub mod registry;
pub mod schedule;
pub mod store;

use log::debug;

pub use crate::config::*;
pub use crate::model::*;

/// Counts the centers and bureaux of an election.
///
/// When the election lists its voting locations, the counts are derived from
/// them. Otherwise the flat estimates entered in the wizard are used.
pub fn compute_infrastructure_summary(election: &Election) -> InfrastructureSummary {
    let (centers, bureaux) = match &election.voting_locations {
        Some(locations) => (
            locations.len() as u64,
            locations.iter().map(|l| l.bureaux.len() as u64).sum(),
        ),
        None => (election.centers, election.bureaux),
    };
    let average_per_center = if centers == 0 {
        0.0
    } else {
        bureaux as f64 / centers as f64
    };
    InfrastructureSummary {
        centers,
        bureaux,
        average_per_center,
    }
}

pub fn compute_global_summary(election: &Election, ratios: &ConsolidationRatios) -> GlobalSummary {
    let voters = election.voters;
    let total_centers = compute_infrastructure_summary(election).centers;
    let res = GlobalSummary {
        total_voters: voters,
        total_ballots_cast: ratios.turnout.apply(voters),
        turnout_rate: ratios.turnout.percent(),
        null_ballots: ratios.null_ballots.apply(voters),
        valid_ballots: ratios.valid_ballots.apply(voters),
        centers_completed: ratios.centers_completed.apply(total_centers),
        total_centers,
    };
    debug!("compute_global_summary: election {}: {:?}", election.id, res);
    res
}

/// Assigns a share of the valid ballots to each candidate, by rank in the list.
///
/// The first two candidates get the first and second place shares. The
/// remaining share is split evenly between the candidates listed third and
/// beyond; with two candidates or fewer nobody receives it.
pub fn compute_candidate_results(
    election: &Election,
    ratios: &ConsolidationRatios,
) -> Vec<CandidateResult> {
    let valid = ratios.valid_ballots.apply(election.voters);
    let remaining = election.candidates_list.len().saturating_sub(2) as u64;
    election
        .candidates_list
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let (percentage, votes) = match idx {
                0 => (
                    ratios.first_place_share.percent(),
                    ratios.first_place_share.apply(valid),
                ),
                1 => (
                    ratios.second_place_share.percent(),
                    ratios.second_place_share.apply(valid),
                ),
                // idx >= 2 implies remaining >= 1
                _ => (
                    ratios.remaining_share.percent() / remaining as f64,
                    ratios.remaining_share.apply_split(valid, remaining),
                ),
            };
            CandidateResult {
                id: c.id.clone(),
                name: c.name.clone(),
                party: c.party.clone(),
                votes,
                percentage,
                is_our_candidate: c.is_our_candidate,
            }
        })
        .collect()
}

/// Splits the election's subdivision into weighted zones.
///
/// Each zone receives its weight of the registered voters and of the votes of
/// the top three candidates, and its own turnout ratio. This is a top-down
/// disaggregation: nothing is summed from per-bureau tallies.
pub fn compute_geographic_breakdown(
    election: &Election,
    ratios: &ConsolidationRatios,
) -> Vec<ZoneResult> {
    let candidates = compute_candidate_results(election, ratios);
    let subdivision = election.scope.subdivision();
    ratios
        .zones
        .iter()
        .enumerate()
        .map(|(idx, zone)| ZoneResult {
            region: format!("{} - Zone {}", subdivision, idx + 1),
            weight: zone.weight.fraction(),
            registered: zone.weight.apply(election.voters),
            ballots_cast: zone.weight.apply_compound(zone.turnout, election.voters),
            turnout_rate: zone.turnout.percent(),
            candidate_results: candidates
                .iter()
                .take(3)
                .map(|c| ZoneCandidateResult {
                    candidate: short_name(&c.name),
                    votes: zone.weight.apply(c.votes),
                    percentage: c.percentage,
                })
                .collect(),
        })
        .collect()
}

pub fn compute_results_progress(
    election: &Election,
    ratios: &ConsolidationRatios,
) -> ResultsProgress {
    let total_bureaux = compute_infrastructure_summary(election).bureaux;
    ResultsProgress {
        entry_rate: ratios.entry_rate.percent(),
        bureaux_entered: ratios.entry_rate.apply(total_bureaux),
        total_bureaux,
        pending_reports: ratios.pending_reports.apply(total_bureaux),
    }
}

/// The standing of the flagged candidate, if the election has one.
pub fn compute_campaign_summary(
    election: &Election,
    ratios: &ConsolidationRatios,
) -> Option<CampaignSummary> {
    let results = compute_candidate_results(election, ratios);
    let ours = results.iter().find(|c| c.is_our_candidate)?;
    let best_rival = results
        .iter()
        .filter(|c| !c.is_our_candidate)
        .map(|c| c.votes)
        .max();
    let gap_to_rival = match best_rival {
        Some(rival) => ours.votes as i64 - rival as i64,
        None => 0,
    };
    let goal_progress = match election.vote_goal {
        Some(goal) if goal > 0 => ours.votes as f64 * 100.0 / goal as f64,
        _ => 0.0,
    };
    Some(CampaignSummary {
        candidate_id: ours.id.clone(),
        name: ours.name.clone(),
        votes: ours.votes,
        gap_to_rival,
        vote_goal: election.vote_goal,
        goal_progress,
    })
}

/// Computes all the derived views of an election at once.
pub fn consolidate(election: &Election, ratios: &ConsolidationRatios) -> Consolidation {
    debug!(
        "consolidate: election {} ({} candidates, {} voters)",
        election.id,
        election.candidates_list.len(),
        election.voters
    );
    Consolidation {
        election_id: election.id,
        title: election.title.clone(),
        global: compute_global_summary(election, ratios),
        candidates: compute_candidate_results(election, ratios),
        zones: compute_geographic_breakdown(election, ratios),
        infrastructure: compute_infrastructure_summary(election),
        progress: compute_results_progress(election, ratios),
        campaign: compute_campaign_summary(election, ratios),
    }
}

fn short_name(name: &str) -> String {
    name.split(' ').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATIOS: ConsolidationRatios = ConsolidationRatios::DEFAULT_RATIOS;

    fn candidate(id: &str, name: &str, ours: bool) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            party: format!("Party {}", id),
            is_our_candidate: ours,
            photo: None,
        }
    }

    fn election(voters: u64, candidates: Vec<Candidate>) -> Election {
        Election {
            id: 1,
            title: "Municipales".to_string(),
            date: "2024-08-26".to_string(),
            status: ElectionStatus::Upcoming,
            status_color: StatusColor::Blue,
            description: "".to_string(),
            voters,
            candidates: candidates.len() as u64,
            centers: 12,
            bureaux: 48,
            location: "Moanda".to_string(),
            election_type: "municipal".to_string(),
            seats_available: 1,
            budget: None,
            vote_goal: None,
            organization_id: "org".to_string(),
            scope: ElectionScope::Territorial(TerritorialScope {
                province: "Haut-Ogooue".to_string(),
                department: "".to_string(),
                commune: "Moanda".to_string(),
                arrondissement: "1er".to_string(),
            }),
            candidates_list: candidates,
            voting_locations: None,
            is_active: true,
        }
    }

    fn location(id: &str, bureaux: usize) -> VotingLocation {
        VotingLocation {
            id: id.to_string(),
            name: format!("Ecole {}", id),
            hierarchy: LocationHierarchy {
                level1: "Haut-Ogooue".to_string(),
                level2: "Moanda".to_string(),
                level3: None,
            },
            bureaux: (0..bureaux)
                .map(|i| VotingBureau {
                    id: format!("{}-{}", id, i),
                    name: format!("Bureau {}", i + 1),
                    capacity: 500,
                    location: id.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn global_summary_for_ten_thousand_voters() {
        let s = compute_global_summary(&election(10_000, vec![]), &RATIOS);
        assert_eq!(s.total_voters, 10_000);
        assert_eq!(s.total_ballots_cast, 6770);
        assert_eq!(s.null_ballots, 250);
        assert_eq!(s.valid_ballots, 6520);
        assert_eq!(s.total_centers, 12);
        assert_eq!(s.centers_completed, 11);
        assert!((s.turnout_rate - 67.7).abs() < 1e-9);
    }

    #[test]
    fn candidate_percentages_sum_to_hundred() {
        for n in 3..12 {
            let cands = (0..n)
                .map(|i| candidate(&i.to_string(), "X", false))
                .collect();
            let res = compute_candidate_results(&election(15_240, cands), &RATIOS);
            let total: f64 = res.iter().map(|c| c.percentage).sum();
            assert!((total - 100.0).abs() < 1e-9, "n={} total={}", n, total);
        }
    }

    #[test]
    fn candidate_votes_follow_rank() {
        let cands = vec![
            candidate("a", "Jean Ndong", true),
            candidate("b", "Marie Obame", false),
            candidate("c", "Paul Mba", false),
            candidate("d", "Luc Nze", false),
        ];
        let res = compute_candidate_results(&election(10_000, cands), &RATIOS);
        let votes: Vec<u64> = res.iter().map(|c| c.votes).collect();
        // 6520 valid ballots
        assert_eq!(votes, vec![2790, 2327, 700, 700]);
        assert!((res[2].percentage - 10.75).abs() < 1e-9);
        assert!(res[0].is_our_candidate);
    }

    #[test]
    fn two_candidates_leave_residual_unassigned() {
        let cands = vec![candidate("a", "A", false), candidate("b", "B", false)];
        let res = compute_candidate_results(&election(10_000, cands), &RATIOS);
        assert_eq!(res.len(), 2);
        let total: f64 = res.iter().map(|c| c.percentage).sum();
        assert!((total - 78.5).abs() < 1e-9);
        assert!(res.iter().all(|c| c.percentage.is_finite()));
    }

    #[test]
    fn single_and_no_candidate() {
        let res = compute_candidate_results(&election(10_000, vec![candidate("a", "A", false)]), &RATIOS);
        assert_eq!(res.len(), 1);
        assert!((res[0].percentage - 42.8).abs() < 1e-9);
        assert!(compute_candidate_results(&election(10_000, vec![]), &RATIOS).is_empty());
    }

    #[test]
    fn zone_weights_cover_the_electorate() {
        let cands = vec![
            candidate("a", "Jean Ndong", false),
            candidate("b", "Marie Obame", false),
            candidate("c", "Paul Mba", false),
            candidate("d", "Luc Nze", false),
        ];
        let zones = compute_geographic_breakdown(&election(10_000, cands), &RATIOS);
        assert_eq!(zones.len(), 3);
        let weight: f64 = zones.iter().map(|z| z.weight).sum();
        assert!((weight - 1.0).abs() < 1e-9);
        let registered: u64 = zones.iter().map(|z| z.registered).sum();
        assert_eq!(registered, 10_000);
        assert_eq!(zones[0].region, "Moanda - Zone 1");
        assert_eq!(zones[0].ballots_cast, 2764);
        assert_eq!(zones[2].ballots_cast, 1690);
        assert_eq!(zones[0].candidate_results.len(), 3);
        assert_eq!(zones[0].candidate_results[0].candidate, "Jean");
        assert_eq!(zones[0].candidate_results[0].votes, 1116);
    }

    #[test]
    fn infrastructure_from_locations() {
        let mut e = election(1_000, vec![]);
        e.voting_locations = Some(vec![location("a", 3), location("b", 2)]);
        let s = compute_infrastructure_summary(&e);
        assert_eq!(s.centers, 2);
        assert_eq!(s.bureaux, 5);
        assert!((s.average_per_center - 2.5).abs() < 1e-9);
    }

    #[test]
    fn infrastructure_without_anything() {
        let mut e = election(0, vec![]);
        e.centers = 0;
        e.bureaux = 0;
        e.voting_locations = Some(vec![]);
        let s = compute_infrastructure_summary(&e);
        assert_eq!(
            s,
            InfrastructureSummary {
                centers: 0,
                bureaux: 0,
                average_per_center: 0.0
            }
        );
        e.voting_locations = None;
        assert_eq!(compute_infrastructure_summary(&e).average_per_center, 0.0);
    }

    #[test]
    fn campaign_summary() {
        let mut e = election(
            10_000,
            vec![candidate("a", "A", false), candidate("b", "B", true)],
        );
        e.vote_goal = Some(4_654);
        let c = compute_campaign_summary(&e, &RATIOS).unwrap();
        assert_eq!(c.votes, 2327);
        assert_eq!(c.gap_to_rival, 2327 - 2790);
        assert!((c.goal_progress - 50.0).abs() < 1e-9);

        e.vote_goal = None;
        assert_eq!(compute_campaign_summary(&e, &RATIOS).unwrap().goal_progress, 0.0);

        e.candidates_list[1].is_our_candidate = false;
        assert!(compute_campaign_summary(&e, &RATIOS).is_none());
    }

    #[test]
    fn consolidation_of_empty_election() {
        let mut e = election(0, vec![]);
        e.centers = 0;
        e.bureaux = 0;
        let c = consolidate(&e, &RATIOS);
        assert_eq!(c.global.total_ballots_cast, 0);
        assert!(c.candidates.is_empty());
        assert!(c.zones.iter().all(|z| z.candidate_results.is_empty()));
        assert_eq!(c.progress.bureaux_entered, 0);
        assert!(c.campaign.is_none());
    }

    #[test]
    fn results_progress() {
        let p = compute_results_progress(&election(10_000, vec![]), &RATIOS);
        assert_eq!(p.total_bureaux, 48);
        assert_eq!(p.bureaux_entered, 40);
        assert_eq!(p.pending_reports, 7);
    }
}
