//! Risk register: independently authored risk items and their rankings.

use serde::Serialize;

use crate::fields::RiskLevel;
use crate::project::Project;

/// A risk recorded against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskItem {
    pub project: String,
    pub risk: String,
    pub owner: String,
    pub impact: RiskLevel,
    pub probability: RiskLevel,
    pub mitigation: String,
}

impl RiskItem {
    /// Impact score multiplied by probability score.
    pub fn severity(&self) -> u32 {
        self.impact.score() * self.probability.score()
    }
}

/// Count of risks per impact level for one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The built-in risk register shipped with the sample data.
pub fn fixture_risks() -> Vec<RiskItem> {
    vec![
        RiskItem {
            project: "Collection System v3".into(),
            risk: "Resource availability constraints".into(),
            owner: "Karen Borsal".into(),
            impact: RiskLevel::High,
            probability: RiskLevel::High,
            mitigation: "Engage external contractors".into(),
        },
        RiskItem {
            project: "Marketing Information System v2".into(),
            risk: "Third-party API dependencies".into(),
            owner: "Jelly Jane Tejano".into(),
            impact: RiskLevel::High,
            probability: RiskLevel::Medium,
            mitigation: "Develop fallback mechanisms".into(),
        },
    ]
}

/// Risks ordered by severity, highest first; ties keep register order.
pub fn rank_risks(risks: &[RiskItem]) -> Vec<&RiskItem> {
    let mut ranked: Vec<&RiskItem> = risks.iter().collect();
    ranked.sort_by(|a, b| b.severity().cmp(&a.severity()));
    ranked
}

/// Impact counts per risk owner, in order of each owner's first risk.
pub fn risk_heatmap(risks: &[RiskItem]) -> Vec<(String, ImpactCounts)> {
    let mut rows: Vec<(String, ImpactCounts)> = Vec::new();
    for risk in risks {
        let idx = match rows.iter().position(|(owner, _)| *owner == risk.owner) {
            Some(idx) => idx,
            None => {
                rows.push((risk.owner.clone(), ImpactCounts::default()));
                rows.len() - 1
            }
        };
        let counts = &mut rows[idx].1;
        match risk.impact {
            RiskLevel::High => counts.high += 1,
            RiskLevel::Medium => counts.medium += 1,
            RiskLevel::Low => counts.low += 1,
        }
    }
    rows
}

/// Open tasks summed across all projects.
pub fn total_risk_exposure(projects: &[Project]) -> usize {
    projects.iter().map(|p| p.risk_exposure).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(owner: &str, impact: RiskLevel, probability: RiskLevel) -> RiskItem {
        RiskItem {
            project: "Core Banking".into(),
            risk: format!("{owner} risk"),
            owner: owner.into(),
            impact,
            probability,
            mitigation: "Monitor".into(),
        }
    }

    #[test]
    fn test_rank_by_severity_is_stable() {
        let risks = vec![
            risk("A", RiskLevel::Low, RiskLevel::High),
            risk("B", RiskLevel::High, RiskLevel::High),
            risk("C", RiskLevel::High, RiskLevel::Low),
            risk("D", RiskLevel::Medium, RiskLevel::Medium),
        ];
        let owners: Vec<&str> = rank_risks(&risks).iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_heatmap_counts_impact_per_owner() {
        let risks = vec![
            risk("Karen", RiskLevel::High, RiskLevel::Low),
            risk("Jelly", RiskLevel::Low, RiskLevel::Low),
            risk("Karen", RiskLevel::Medium, RiskLevel::Low),
            risk("Karen", RiskLevel::High, RiskLevel::High),
        ];
        let map = risk_heatmap(&risks);
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].0, "Karen");
        assert_eq!(map[0].1, ImpactCounts { high: 2, medium: 1, low: 0 });
        assert_eq!(map[1].1, ImpactCounts { high: 0, medium: 0, low: 1 });
    }

    #[test]
    fn test_fixture_register() {
        let risks = fixture_risks();
        assert_eq!(risks.len(), 2);
        assert_eq!(rank_risks(&risks)[0].severity(), 9);
    }
}
