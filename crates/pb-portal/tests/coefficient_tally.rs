use std::collections::BTreeMap;

use pb_portal::coefficient::{
    tally_votes, CoefficientSettings, CoefficientTier, PublicVote, VoteChannel,
};
use pb_portal::domain::ApplicationId;

fn votes_for(app: &str, digital: usize, in_person: usize) -> Vec<PublicVote> {
    let digital_votes = (0..digital).map(|i| PublicVote {
        application_id: ApplicationId(app.to_string()),
        voter_id: format!("{app}-d{i}"),
        area: Some("Blaenavon".to_string()),
        channel: VoteChannel::Digital,
    });
    let in_person_votes = (0..in_person).map(|i| PublicVote {
        application_id: ApplicationId(app.to_string()),
        voter_id: format!("{app}-p{i}"),
        area: Some("Blaenavon".to_string()),
        channel: VoteChannel::InPerson,
    });
    digital_votes.chain(in_person_votes).collect()
}

#[test]
fn reach_tiers_rebalance_a_voting_round() {
    let settings = CoefficientSettings::default();
    let mut votes = Vec::new();
    votes.extend(votes_for("library_club", 40, 10));
    votes.extend(votes_for("sports_trust", 55, 0));
    votes.extend(votes_for("food_bank", 30, 5));
    // Double-submitted ballots are ignored.
    votes.extend(votes_for("food_bank", 3, 0));

    let reach = BTreeMap::from([
        (ApplicationId("library_club".to_string()), 120),
        (ApplicationId("sports_trust".to_string()), 900),
        (ApplicationId("food_bank".to_string()), 35),
    ]);

    let tallies = tally_votes(&votes, &reach, &settings);
    let order: Vec<&str> = tallies.iter().map(|t| t.application_id.0.as_str()).collect();

    assert_eq!(order, vec!["library_club", "sports_trust", "food_bank"]);
    assert_eq!(tallies[0].tier, Some(CoefficientTier::Medium));
    assert_eq!(tallies[0].adjusted_votes, 58.0);
    assert_eq!(tallies[1].tier, Some(CoefficientTier::Large));
    assert_eq!(tallies[1].adjusted_votes, 55.0);
    assert_eq!(tallies[2].digital_votes, 30);
    assert_eq!(tallies[2].adjusted_votes, 50.0);
}

#[test]
fn tally_is_stable_across_runs() {
    let settings = CoefficientSettings::default();
    let votes = votes_for("a", 7, 3);
    let reach = BTreeMap::from([(ApplicationId("a".to_string()), 10)]);

    assert_eq!(
        tally_votes(&votes, &reach, &settings),
        tally_votes(&votes, &reach, &settings)
    );
}
