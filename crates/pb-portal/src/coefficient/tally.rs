use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{adjust, CoefficientSettings, CoefficientTier};
use crate::domain::ApplicationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoteChannel {
    #[default]
    Digital,
    InPerson,
}

/// One resident's vote for one funded project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVote {
    pub application_id: ApplicationId,
    pub voter_id: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub channel: VoteChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub application_id: ApplicationId,
    pub digital_votes: u64,
    pub in_person_votes: u64,
    /// `None` when the organisation has not submitted reach data.
    pub tier: Option<CoefficientTier>,
    pub factor: f64,
    pub adjusted_votes: f64,
}

impl VoteTally {
    pub fn raw_votes(&self) -> u64 {
        self.digital_votes + self.in_person_votes
    }
}

/// Count votes per application and apply the reach coefficient.
///
/// A voter counts once per application; later duplicates are dropped. Digital
/// votes always take the tier factor, in-person votes only when
/// `apply_to_in_person` is set. Applications missing from `reach` keep a factor
/// of 1. Results are ordered by adjusted votes, highest first.
pub fn tally_votes(
    votes: &[PublicVote],
    reach: &BTreeMap<ApplicationId, u64>,
    settings: &CoefficientSettings,
) -> Vec<VoteTally> {
    let mut seen: HashSet<(&ApplicationId, &str)> = HashSet::new();
    let mut counts: BTreeMap<&ApplicationId, (u64, u64)> = BTreeMap::new();

    for vote in votes {
        if !seen.insert((&vote.application_id, vote.voter_id.as_str())) {
            continue;
        }
        let entry = counts.entry(&vote.application_id).or_insert((0, 0));
        match vote.channel {
            VoteChannel::Digital => entry.0 += 1,
            VoteChannel::InPerson => entry.1 += 1,
        }
    }

    let mut tallies: Vec<VoteTally> = counts
        .into_iter()
        .map(|(application_id, (digital, in_person))| {
            let tier = reach
                .get(application_id)
                .map(|figure| settings.tier_for(*figure));
            let factor = tier.map(|tier| settings.factor(tier)).unwrap_or(1.0);
            let in_person_factor = if settings.apply_to_in_person {
                factor
            } else {
                1.0
            };
            let weighted = digital as f64 * factor + in_person as f64 * in_person_factor;

            VoteTally {
                application_id: application_id.clone(),
                digital_votes: digital,
                in_person_votes: in_person,
                tier,
                factor,
                adjusted_votes: adjust(weighted, 1.0),
            }
        })
        .collect();

    tallies.sort_by(|a, b| {
        b.adjusted_votes
            .partial_cmp(&a.adjusted_votes)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.application_id.cmp(&b.application_id))
    });
    tallies
}
