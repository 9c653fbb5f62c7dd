pub mod demand;
pub mod iteration_log;
pub mod link_flows;
