use crate::graph::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub usize);

impl LinkId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Request to insert a road between two existing nodes.
#[derive(Clone, Debug)]
pub struct Road {
    pub from: NodeId,
    pub to: NodeId,
    /// km
    pub length: f64,
    /// veh/h per direction, 0 means uncongestible
    pub capacity: f64,
    /// km/h
    pub max_speed: f64,
    pub bidirectional: bool,
}

impl Road {
    pub fn free_flow_time(&self) -> f64 {
        if self.max_speed > 0.0 {
            self.length / self.max_speed
        } else {
            0.0
        }
    }
}

/// A directed arc. Static attributes never change after insertion.
#[derive(Clone, Debug)]
pub struct Link {
    id: LinkId,
    from: NodeId,
    to: NodeId,
    length: f64,
    /// hours
    free_flow_time: f64,
    capacity: f64,
    max_speed: f64,
    reverse: Option<LinkId>,
}

impl Link {
    pub(crate) fn forward(id: LinkId, road: &Road) -> Self {
        Self {
            id,
            from: road.from,
            to: road.to,
            length: road.length,
            free_flow_time: road.free_flow_time(),
            capacity: road.capacity,
            max_speed: road.max_speed,
            reverse: None,
        }
    }

    pub(crate) fn reversed(&self, id: LinkId) -> Self {
        Self {
            id,
            from: self.to,
            to: self.from,
            reverse: Some(self.id),
            ..self.clone()
        }
    }

    pub(crate) fn pair_with(&mut self, reverse: LinkId) {
        self.reverse = Some(reverse);
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn free_flow_time(&self) -> f64 {
        self.free_flow_time
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// The opposite arc of the same physical road, if any.
    pub fn reverse(&self) -> Option<LinkId> {
        self.reverse
    }

    /// `t0 * (1 + q/c)^2`, constant `t0` when the capacity is zero.
    pub fn travel_time(&self, flow: f64) -> f64 {
        if self.capacity > 0.0 {
            let ratio = 1.0 + flow / self.capacity;
            self.free_flow_time * ratio * ratio
        } else {
            self.free_flow_time
        }
    }

    /// Integral of [`Link::travel_time`] from 0 to `flow`.
    pub fn travel_time_integral(&self, flow: f64) -> f64 {
        if self.capacity > 0.0 {
            let ratio = 1.0 + flow / self.capacity;
            self.free_flow_time * self.capacity / 3.0 * (ratio * ratio * ratio - 1.0)
        } else {
            self.free_flow_time * flow
        }
    }
}
