use ply::graph::{GroupStats, SortMetric, modularity};
use ply::{
    GroupIndex, LayoutMode, LayoutOptions, OrderOptimizer, PartitionOptions, Session, Snapshot,
    assign_partition, sort_groups,
};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Ply(ply::Error),
    Json(serde_json::Error),
    NoStates,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Ply(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoStates => write!(f, "Input contains no states"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ply::Error> for CliError {
    fn from(value: ply::Error) -> Self {
        Self::Ply(value)
    }
}

impl From<ply::graph::Error> for CliError {
    fn from(value: ply::graph::Error) -> Self {
        Self::Ply(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Partition,
    Groups,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    partition: bool,
    all_states: bool,
    state: usize,
    ticks: usize,
    mode: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    seed: Option<u64>,
    zoom: Option<f64>,
    exact_limit: Option<usize>,
    sort: SortMetric,
    ascending: bool,
}

#[derive(Serialize)]
struct PartitionOut<'a> {
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    move_label: Option<&'a str>,
    components: usize,
    modularity: f64,
    entities: Vec<EntityGroupsOut<'a>>,
}

#[derive(Serialize)]
struct EntityGroupsOut<'a> {
    id: &'a str,
    component: i64,
    community: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupOut {
    id: i64,
    size: usize,
    mean_in_degree: f64,
    mean_out_degree: f64,
    density: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    communities: Vec<GroupOut>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ring_order: Vec<i64>,
}

impl GroupOut {
    fn new(id: i64, stats: GroupStats) -> Self {
        Self {
            id,
            size: stats.size,
            mean_in_degree: stats.mean_in_degree,
            mean_out_degree: stats.mean_out_degree,
            density: stats.density,
            communities: Vec::new(),
            ring_order: Vec::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupsOut<'a> {
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    move_label: Option<&'a str>,
    sort: &'static str,
    ring_order: Vec<i64>,
    components: Vec<GroupOut>,
}

fn usage() -> &'static str {
    "ply-cli\n\
\n\
USAGE:\n\
  ply-cli [layout] [--mode force|radial|bubble+force|bubble+radial] [--ticks <n>] [--state <n>|--all] [--width <w>] [--height <h>] [--seed <n>] [--zoom <z>] [--exact-limit <n>] [--config <path>] [--partition] [--pretty] [<path>|-]\n\
  ply-cli partition [--state <n>|--all] [--pretty] [<path>|-]\n\
  ply-cli groups [--sort size|in-centrality|out-centrality|density|id] [--ascending] [--exact-limit <n>] [--state <n>] [--partition] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a game ({\"states\": [...]}), an array of states, or a single state.\n\
  - --config reads layout options from a JSON file; flags override it.\n\
  - Set PLY_LOG (e.g. PLY_LOG=debug) for diagnostics and PLY_LAYOUT_TIMING=1 for timings.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_value<T: std::str::FromStr>(value: &str) -> Result<T, CliError> {
    value.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        ticks: 300,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "partition" => args.command = Command::Partition,
            "groups" => args.command = Command::Groups,
            "--pretty" => args.pretty = true,
            "--partition" => args.partition = true,
            "--all" => args.all_states = true,
            "--ascending" => args.ascending = true,
            "--mode" => args.mode = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--state" => args.state = parse_value(next_value(&mut it)?)?,
            "--ticks" => args.ticks = parse_value(next_value(&mut it)?)?,
            "--seed" => args.seed = Some(parse_value(next_value(&mut it)?)?),
            "--exact-limit" => args.exact_limit = Some(parse_value(next_value(&mut it)?)?),
            "--sort" => args.sort = parse_value(next_value(&mut it)?)?,
            "--width" => {
                let w: f64 = parse_value(next_value(&mut it)?)?;
                if !(w.is_finite() && w > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.width = Some(w);
            }
            "--zoom" => {
                let z: f64 = parse_value(next_value(&mut it)?)?;
                if !(z.is_finite() && z > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.zoom = Some(z);
            }
            "--height" => {
                let h: f64 = parse_value(next_value(&mut it)?)?;
                if !(h.is_finite() && h > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.height = Some(h);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => serde_json::from_str::<LayoutOptions>(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(mode) = &args.mode {
        options.mode = LayoutMode::parse_or_default(mode);
    }
    if let Some(w) = args.width {
        options.width = w;
    }
    if let Some(h) = args.height {
        options.height = h;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    Ok(options)
}

/// The states selected by `--state`/`--all`.
fn select_states(mut states: Vec<Snapshot>, args: &Args) -> Result<Vec<Snapshot>, CliError> {
    if states.is_empty() {
        return Err(CliError::NoStates);
    }
    if args.all_states {
        return Ok(states);
    }
    let len = states.len();
    if args.state >= len {
        return Err(ply::Error::StateOutOfRange {
            index: args.state,
            len,
        }
        .into());
    }
    Ok(vec![states.swap_remove(args.state)])
}

fn run_layout(states: Vec<Snapshot>, args: &Args) -> Result<(), CliError> {
    let options = layout_options(args)?;
    let mut session = Session::new(options)?;
    if let Some(limit) = args.exact_limit {
        session = session.with_exact_limit(limit)?;
    }
    if args.partition {
        session = session.with_partition(PartitionOptions::default());
    }
    if let Some(zoom) = args.zoom {
        session.set_zoom(zoom);
    }

    let mut reports = Vec::with_capacity(states.len());
    for snapshot in states {
        session.load_state(snapshot);
        session.run(args.ticks);
        reports.push(session.report());
    }

    if args.all_states {
        write_json(&reports, args.pretty)
    } else {
        write_json(&reports[0], args.pretty)
    }
}

fn partition_out(snapshot: &mut Snapshot) -> PartitionOut<'_> {
    assign_partition(
        &mut snapshot.entities,
        &snapshot.relations,
        &PartitionOptions::default(),
    );
    let community = snapshot
        .entities
        .iter()
        .map(|e| e.outer_group * 1_000_000 + e.inner_group)
        .collect::<Vec<_>>();
    let score = modularity(&snapshot.entities, &snapshot.relations, &community);
    let index = GroupIndex::build(&snapshot.entities);

    PartitionOut {
        move_label: snapshot.move_label.as_deref(),
        components: index.outer_len(),
        modularity: score,
        entities: snapshot
            .entities
            .iter()
            .map(|e| EntityGroupsOut {
                id: &e.id,
                component: e.outer_group,
                community: e.inner_group,
            })
            .collect(),
    }
}

fn run_partition(mut states: Vec<Snapshot>, args: &Args) -> Result<(), CliError> {
    let outs = states.iter_mut().map(partition_out).collect::<Vec<_>>();
    if args.all_states {
        write_json(&outs, args.pretty)
    } else {
        write_json(&outs[0], args.pretty)
    }
}

fn run_groups(mut snapshot: Snapshot, args: &Args) -> Result<(), CliError> {
    if args.partition {
        assign_partition(
            &mut snapshot.entities,
            &snapshot.relations,
            &PartitionOptions::default(),
        );
    }
    let optimizer = match args.exact_limit {
        Some(limit) => OrderOptimizer::new(limit)?,
        None => OrderOptimizer::default(),
    };
    let (entities, relations) = (&snapshot.entities, &snapshot.relations);
    let index = GroupIndex::build_filtered(entities, |e| e.is_active());

    let outer = index.outer_groups().collect::<Vec<_>>();
    let outer_stats = index.outer_stats(entities, relations);
    let sorted = sort_groups(&outer, args.sort, !args.ascending, &outer_stats);

    let components = sorted
        .iter()
        .map(|component| {
            let inner = index.inner_groups(component.id).collect::<Vec<_>>();
            let inner_stats = index.inner_stats(component.id, entities, relations);
            let mut out = GroupOut::new(
                component.id,
                outer_stats.get(&component.id).copied().unwrap_or_default(),
            );
            out.communities = sort_groups(&inner, args.sort, !args.ascending, &inner_stats)
                .into_iter()
                .map(|g| GroupOut::new(g.id, inner_stats.get(&g.id).copied().unwrap_or_default()))
                .collect();
            out.ring_order = optimizer.optimize_order(&inner, entities, relations);
            out
        })
        .collect();

    let out = GroupsOut {
        move_label: snapshot.move_label.as_deref(),
        sort: args.sort.as_str(),
        ring_order: optimizer.optimize_order(&outer, entities, relations),
        components,
    };
    write_json(&out, args.pretty)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let states = select_states(ply::parse_states(&text)?, &args)?;

    match args.command {
        Command::Layout => run_layout(states, &args),
        Command::Partition => run_partition(states, &args),
        Command::Groups => {
            let Some(snapshot) = states.into_iter().next() else {
                return Err(CliError::NoStates);
            };
            run_groups(snapshot, &args)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoStates) => {
            eprintln!("{}", CliError::NoStates);
            std::process::exit(3);
        }
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
