use crate::graph::link::LinkId;

#[derive(Clone, Debug, PartialEq)]
pub struct CongestedLink {
    link: LinkId,
    label: String,
    flow: f64,
    ratio: f64,
}

impl CongestedLink {
    pub fn new(link: LinkId, label: String, flow: f64, ratio: f64) -> Self {
        Self {
            link,
            label,
            flow,
            ratio,
        }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn flow(&self) -> f64 {
        self.flow
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// Aggregate indicators of one assignment method.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodSummary {
    name: String,
    total_travel_time: f64,
    average_travel_time: f64,
    max_vc_ratio: f64,
    average_vc_ratio: f64,
    congested_links: usize,
    total_demand: f64,
}

impl MethodSummary {
    pub fn new(
        name: String,
        total_travel_time: f64,
        average_travel_time: f64,
        max_vc_ratio: f64,
        average_vc_ratio: f64,
        congested_links: usize,
        total_demand: f64,
    ) -> Self {
        Self {
            name,
            total_travel_time,
            average_travel_time,
            max_vc_ratio,
            average_vc_ratio,
            congested_links,
            total_demand,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// veh·h
    pub fn total_travel_time(&self) -> f64 {
        self.total_travel_time
    }

    /// h per vehicle
    pub fn average_travel_time(&self) -> f64 {
        self.average_travel_time
    }

    pub fn max_vc_ratio(&self) -> f64 {
        self.max_vc_ratio
    }

    pub fn average_vc_ratio(&self) -> f64 {
        self.average_vc_ratio
    }

    pub fn congested_links(&self) -> usize {
        self.congested_links
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }
}
