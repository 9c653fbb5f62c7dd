use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use log::{LevelFilter, debug, info, warn};

use crate::analysis::metrics::{CONGESTION_THRESHOLD, compare_methods, congested_links};
use crate::assignment::aon::all_or_nothing;
use crate::assignment::frank_wolfe::{FrankWolfe, user_equilibrium};
use crate::assignment::incremental::incremental;
use crate::assignment::params::AssignmentParams;
use crate::assignment::path_flows::path_flows;
use crate::graph::graph::Graph;
use crate::io::json::read_json;
use crate::io::results::{save_iteration_log, save_link_results};
use crate::logging::initialize_logging;
use crate::report::{write_comparison, write_congested, write_path_analysis, write_route};
use crate::scenario::file::FileScenario;
use crate::scenario::random::RandomGridScenario;
use crate::scenario::sample::SampleScenario;
use crate::scenario::scenario::Scenario;
use crate::state::demand::DemandTable;
use crate::state::iteration_log::Convergence;
use crate::state::link_flows::LinkFlows;
use crate::tui::app::App;
use crate::tui::draw::draw_app;

mod analysis;
mod assignment;
mod graph;
mod io;
mod logging;
mod report;
mod scenario;
mod state;
mod tui;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScenarioKind {
    Sample,
    Random,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    All,
    Aon,
    Inc,
    Ue,
}

/// Static traffic assignment on a road network.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value = "sample")]
    scenario: ScenarioKind,
    /// Network JSON file, for the file scenario
    #[arg(long)]
    network: Option<PathBuf>,
    /// Demand JSON file, for the file scenario
    #[arg(long)]
    demand: Option<PathBuf>,
    /// Seed of the random grid scenario
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 5)]
    grid_size: usize,
    #[arg(long, default_value_t = 12)]
    random_pairs: usize,
    #[arg(long, value_enum, default_value = "all")]
    method: Method,
    /// Prefix of the CSV result files
    #[arg(long)]
    output: Option<PathBuf>,
    /// Assignment parameters JSON file, overridden by the flags below
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    increments: Option<usize>,
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    tolerance: Option<f64>,
    /// Logit dispersion of the path analysis
    #[arg(long)]
    theta: Option<f64>,
    /// Print the fastest route between two nodes at free flow and at equilibrium
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    route: Option<Vec<String>>,
    /// Step the equilibrium solver interactively
    #[arg(long)]
    tui: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn scenario(&self) -> Result<Box<dyn Scenario>> {
        Ok(match self.scenario {
            ScenarioKind::Sample => Box::new(SampleScenario),
            ScenarioKind::Random => Box::new(RandomGridScenario::new(
                self.seed,
                self.grid_size,
                self.grid_size,
                self.random_pairs,
            )),
            ScenarioKind::File => match (&self.network, &self.demand) {
                (Some(network), Some(demand)) => {
                    Box::new(FileScenario::new(network.clone(), demand.clone()))
                }
                _ => bail!("The file scenario needs both --network and --demand"),
            },
        })
    }

    fn assignment_params(&self) -> Result<AssignmentParams> {
        let mut params = match &self.params {
            Some(path) => read_json(path)?,
            None => AssignmentParams::default(),
        };
        if let Some(increments) = self.increments {
            params.increments = increments;
        }
        if let Some(max_iterations) = self.max_iterations {
            params.max_iterations = max_iterations;
        }
        if let Some(tolerance) = self.tolerance {
            params.tolerance = tolerance;
        }
        if let Some(theta) = self.theta {
            params.dispersion = theta;
        }
        Ok(params)
    }

    fn runs(&self, method: Method) -> bool {
        self.method == Method::All || self.method == method
    }

    /// Path breakdowns are only meaningful for equilibrium flows.
    fn path_analysis(&self) -> bool {
        self.runs(Method::Ue)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    initialize_logging(level, args.log_file.as_deref(), !args.tui)?;

    let scenario = args.scenario()?;
    let (mut graph, demand) = scenario
        .build()
        .with_context(|| format!("Failed to build the {} scenario", scenario.name()))?;
    let params = args.assignment_params()?;
    info!(
        "Scenario {}: {} nodes, {} links, {} OD pairs",
        scenario.name(),
        graph.node_count(),
        graph.link_count(),
        demand.len()
    );

    if demand.is_empty() {
        warn!("Scenario {} has no OD demand, every flow will be zero", scenario.name());
    }
    for pair in demand.pairs() {
        debug!("OD {} -> {}: {} veh/h", pair.origin(), pair.destination(), pair.demand());
    }

    if args.tui {
        return run_tui(&graph, &demand, &params, scenario.name());
    }
    run_batch(&args, &mut graph, &demand, &params)
}

fn run_batch(args: &Args, graph: &mut Graph, demand: &DemandTable, params: &AssignmentParams) -> Result<()> {
    let mut results: Vec<(&str, LinkFlows)> = Vec::new();
    let mut equilibrium_flows = None;

    if args.runs(Method::Aon) {
        results.push(("aon", all_or_nothing(graph, demand)));
    }
    if args.runs(Method::Inc) {
        results.push(("incremental", incremental(graph, demand, params.increments)));
    }
    if args.runs(Method::Ue) || args.route.is_some() {
        let equilibrium = user_equilibrium(graph, demand, params);
        if equilibrium.status != Convergence::Converged {
            warn!(
                "Equilibrium not reached ({:?}), final relative gap {:.3e}",
                equilibrium.status,
                equilibrium.log.final_gap().unwrap_or(f64::NAN)
            );
        }
        if args.runs(Method::Ue) {
            if let Some(output) = &args.output {
                save_iteration_log(&output_file(output, "ue_iterations"), &equilibrium.log)?;
            }
            results.push(("equilibrium", equilibrium.flows.clone()));
        }
        equilibrium_flows = Some(equilibrium.flows);
    }

    if let Some(output) = &args.output {
        for (name, flows) in &results {
            save_link_results(&output_file(output, name), graph, flows)?;
        }
    }

    let mut out = std::io::stdout().lock();
    if !results.is_empty() {
        let named = results
            .iter()
            .map(|(name, flows)| (*name, flows))
            .collect::<Vec<(&str, &LinkFlows)>>();
        write_comparison(&mut out, &compare_methods(graph, demand, &named))?;
        writeln!(out)?;
        for (name, flows) in &results {
            write_congested(&mut out, name, &congested_links(graph, flows, CONGESTION_THRESHOLD))?;
        }
    }

    if let Some(flows) = &equilibrium_flows {
        if args.path_analysis() {
            writeln!(out)?;
            let breakdown = path_flows(graph, demand, flows, params.dispersion, params.max_paths);
            write_path_analysis(&mut out, &breakdown)?;
        }
        if let Some([from, to]) = args.route.as_deref() {
            writeln!(out)?;
            writeln!(out, "Route {} -> {}", from, to)?;
            write_route(&mut out, "free flow", graph, &graph.shortest_path_by_names(from, to, None))?;
            write_route(
                &mut out,
                "equilibrium",
                graph,
                &graph.shortest_path_by_names(from, to, Some(flows)),
            )?;
        }
    }
    Ok(())
}

fn output_file(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("_{suffix}.csv"));
    PathBuf::from(name)
}

fn run_tui(graph: &Graph, demand: &DemandTable, params: &AssignmentParams, name: &str) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(FrankWolfe::new(graph, demand, params), name);

    loop {
        terminal.draw(|frame| draw_app(frame, &app))?;

        if crossterm::event::poll(Duration::from_millis(16))? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char(' ') => {
                        app.step();
                    }
                    KeyCode::Char('r') => app.toggle_running(),
                    _ => continue,
                },
                _ => continue,
            }
        } else if app.running {
            app.step();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("trafficflow").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_path_analysis_follows_equilibrium_method() {
        assert!(parse(&[]).path_analysis());
        assert!(parse(&["--method", "ue"]).path_analysis());
        assert!(!parse(&["--method", "aon"]).path_analysis());
        assert!(!parse(&["--method", "inc"]).path_analysis());
    }

    #[test]
    fn test_route_takes_two_node_names() {
        let args = parse(&["--route", "A", "F", "--method", "aon"]);
        assert_eq!(Some(vec!["A".to_string(), "F".to_string()]), args.route);
        assert!(Args::try_parse_from(["trafficflow", "--route", "A"]).is_err());
    }

    #[test]
    fn test_flags_override_parameters() {
        let params = parse(&["--tolerance", "1e-6", "--theta", "2.0"])
            .assignment_params()
            .unwrap();
        assert_relative_eq!(1e-6, params.tolerance);
        assert_relative_eq!(2.0, params.dispersion);
        assert_eq!(AssignmentParams::default().increments, params.increments);
    }
}
