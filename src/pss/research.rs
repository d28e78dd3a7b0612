//! Research designs and their cost/time rendering.
use super::errors::PssResult;
use super::resolver::NameResolver;
use super::xml::{number, number_or_default, text, text_or_default, Attributes, FromAttributes};

const SECONDS_PER_DAY: u64 = 24 * 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct ResearchDesign {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub gas_cost: u64,
    pub starbux_cost: u64,
    pub research_time: u64,
    pub required_lab_level: u32,
}

impl FromAttributes for ResearchDesign {
    const ELEMENT: &'static str = "ResearchDesign";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            id: number(a, Self::ELEMENT, "ResearchDesignId")?,
            name: text(a, Self::ELEMENT, "ResearchName")?,
            description: text_or_default(a, "ResearchDescription"),
            gas_cost: number_or_default(a, "GasCost")?,
            starbux_cost: number_or_default(a, "StarbuxCost")?,
            research_time: number_or_default(a, "ResearchTime")?,
            required_lab_level: number_or_default(a, "RequiredLabLevel")?,
        })
    }
}

/// `N days` for whole days, otherwise `H:MM:SS` with a leading day count
/// when over a day, e.g. `1 day, 2:03:04`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    if seconds % SECONDS_PER_DAY == 0 {
        return format!("{} days", days);
    }
    let rest = seconds % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// `12k gas, 50 bux`; `free` when both are zero.
pub fn format_cost(gas: u64, starbux: u64) -> String {
    let mut parts = Vec::new();
    if gas > 0 {
        parts.push(format!("{}k gas", gas / 1000));
    }
    if starbux > 0 {
        parts.push(format!("{} bux", starbux));
    }
    if parts.is_empty() {
        "free".to_string()
    } else {
        parts.join(", ")
    }
}

/// Research matching `query`: the single exact match if there is one,
/// otherwise every design whose name contains the query.
pub fn filter<'a>(designs: &'a [ResearchDesign], query: &str) -> Vec<&'a ResearchDesign> {
    NameResolver::plain().select(query, designs, |d| d.name.as_str())
}

/// Full card for one match, one summary line each for several.
pub fn format_research(selected: &[&ResearchDesign]) -> Option<Vec<String>> {
    match selected {
        [] => None,
        [one] => Some(vec![
            one.name.clone(),
            one.description.clone(),
            format!("Cost: {}", format_cost(one.gas_cost, one.starbux_cost)),
            format!("Time: {}", format_duration(one.research_time)),
            format!("Reqd Lab Lvl: {}", one.required_lab_level),
        ]),
        many => Some(
            many.iter()
                .map(|d| {
                    format!(
                        "{}: t={}, cost={}",
                        d.name,
                        format_duration(d.research_time),
                        format_cost(d.gas_cost, d.starbux_cost)
                    )
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn research(name: &str, gas: u64, time: u64) -> ResearchDesign {
        ResearchDesign {
            id: 1,
            name: name.into(),
            description: format!("{} description", name),
            gas_cost: gas,
            starbux_cost: 0,
            research_time: time,
            required_lab_level: 3,
        }
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(3 * 86400), "3 days");
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_duration(86400 + 60), "1 day, 0:01:00");
        assert_eq!(format_duration(2 * 86400 + 1), "2 days, 0:00:01");
    }

    #[test]
    fn costs() {
        assert_eq!(format_cost(25_500, 0), "25k gas");
        assert_eq!(format_cost(1000, 15), "1k gas, 15 bux");
        assert_eq!(format_cost(0, 0), "free");
    }

    #[test]
    fn exact_single_match_wins() {
        let all = vec![research("Shield", 0, 60), research("Shield Boost", 0, 60)];
        let hits = filter(&all, "shield");
        assert_eq!(hits.len(), 1);
        let hits = filter(&all, "shi");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn single_vs_multi_verbosity() {
        let all = vec![research("Shield", 2000, 86400), research("Shield Boost", 0, 60)];
        let one = format_research(&filter(&all, "shield")).unwrap();
        assert_eq!(
            one,
            vec![
                "Shield",
                "Shield description",
                "Cost: 2k gas",
                "Time: 1 days",
                "Reqd Lab Lvl: 3"
            ]
        );
        let many = format_research(&filter(&all, "shi")).unwrap();
        assert_eq!(many[1], "Shield Boost: t=0:01:00, cost=free");
        assert!(format_research(&filter(&all, "engine")).is_none());
    }
}
