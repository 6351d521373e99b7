use serde::{Deserialize, Serialize};

/// One line of the committee scoring rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCriterion {
    pub id: String,
    pub name: String,
    /// Relative importance; the standard rubric sums to 100.
    pub weight: u32,
    pub guidance: String,
    /// Descriptor for each raw score level, lowest first.
    pub details: String,
}

impl ScoreCriterion {
    fn new(id: &str, name: &str, weight: u32, guidance: &str, details: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            weight,
            guidance: guidance.to_string(),
            details: details.to_string(),
        }
    }
}

/// The ten-criterion rubric used for Stage 2 applications.
pub fn standard_criteria() -> Vec<ScoreCriterion> {
    vec![
        ScoreCriterion::new(
            "overview_objectives",
            "Project Overview & SMART Objectives",
            15,
            "Clarity and quality of the project's overview and objectives.",
            "0: no clear overview or objectives. 1: basic overview, vague objectives. \
             2: clear overview, mostly SMART objectives. 3: compelling overview, fully SMART objectives.",
        ),
        ScoreCriterion::new(
            "local_priorities",
            "Alignment with Local Priorities",
            15,
            "Connection to the identified needs and priorities of the local area.",
            "0: no link to local priorities. 1: weak or generic link. \
             2: good linkage with examples. 3: direct alignment to the top local priorities.",
        ),
        ScoreCriterion::new(
            "community_benefit",
            "Community Benefit & Outcomes",
            10,
            "Potential benefits and clarity of short and long-term outcomes.",
            "0: benefits unclear. 1: outcomes vague. \
             2: plausible outcomes with indicators. 3: specific short and long-term outcomes.",
        ),
        ScoreCriterion::new(
            "activities_milestones",
            "Activities, Milestones & Delivery Responsibilities",
            5,
            "Coherence and feasibility of the activity plan, milestones and roles.",
            "0: activities absent. 1: partly defined. \
             2: coherent plan with named roles. 3: comprehensive plan with owners and milestones.",
        ),
        ScoreCriterion::new(
            "timeline_realism",
            "Timeline & Scheduling Realism",
            10,
            "Realism and structure of the project timeline.",
            "0: no timeline. 1: basic dates. \
             2: realistic start, end and duration. 3: robust sequencing with review points.",
        ),
        ScoreCriterion::new(
            "collaborations_partnerships",
            "Collaborations & Partnerships",
            10,
            "Strength and clarity of partnerships that extend reach and delivery.",
            "0: no partners. 1: partners named, roles vague. \
             2: defined roles and mutual benefits. 3: strong partnership model.",
        ),
        ScoreCriterion::new(
            "risk_management",
            "Risk Management & Feasibility",
            5,
            "Identification of key risks and credibility of mitigations.",
            "0: no risks identified. 1: generic mitigations. \
             2: credible mitigations for key risks. 3: proportionate risk register with owners.",
        ),
        ScoreCriterion::new(
            "budget_value",
            "Budget Transparency & Value for Money",
            10,
            "Transparency, justification and proportionality of the budget.",
            "0: unclear costs. 1: headline costs only. \
             2: transparent line-by-line costs. 3: fully justified, lean budget.",
        ),
        ScoreCriterion::new(
            "cross_area_specificity",
            "Cross-Area Specificity & Venues (if applicable)",
            10,
            "For cross-area projects, clarity of the per-area budget and venues.",
            "0: no area split. 1: partial split. \
             2: clear split with local costs. 3: complete split reconciling to the main budget.",
        ),
        ScoreCriterion::new(
            "marmot_wfg",
            "Alignment with Marmot Principles & WFG Goals",
            10,
            "Practical alignment with the Marmot principles and Well-being of Future Generations goals.",
            "0: ticks only. 1: generic statements. \
             2: credible examples. 3: practical examples tied to activities and outcomes.",
        ),
    ]
}
