pub mod aon;
pub mod frank_wolfe;
pub mod incremental;
pub mod line_search;
pub mod params;
pub mod path_flows;
