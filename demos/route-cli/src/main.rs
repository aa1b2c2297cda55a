//! route-cli — command-line demo for the offline route planner.
//!
//! Loads a GeoJSONL map, snaps a start/destination coordinate onto the
//! nearest graph vertex, runs the requested search algorithm, and prints
//! the resulting route and run diagnostics. Mirrors the flag surface of
//! `original_source/include/cli.h`'s `Options`/`parse`.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use route_core::{Point, Sizable};
use route_graph::{
    create, load_roads, AStar, Bfs, Coefficients, Dfs, Dijkstra, GraphBackendKind, GraphBuilder, GraphError,
    Heuristic, JunctionPolicy, RouteOpt, Search,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgoArg {
    Astar,
    Dijkstra,
    Bfs,
    Dfs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StructArg {
    List,
    Matrix,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RouteArg {
    Shortest,
    Fastest,
    Custom,
}

/// Offline route planner over an OSM GeoJSONL map.
#[derive(Parser, Debug)]
#[command(name = "route-cli", about = "Plan a route across a GeoJSONL road map", long_about = None)]
struct Cli {
    /// Starting point: `lat,lon` decimal or DMS (`47°27'18.9"N 19°07'33.1"E`).
    #[arg(short = 's', long, visible_alias = "start")]
    source: String,

    /// Destination point, same formats as `--source`.
    #[arg(short = 'd', long = "destination", visible_aliases = ["dest", "target"], visible_short_alias = 't')]
    destination: String,

    /// Path to the GeoJSONL map file.
    #[arg(short = 'm', long, default_value = "data/budapest.roads.geojsonl")]
    map: PathBuf,

    /// Skip the `<map>.cache.bin` binary cache and always reparse the source file.
    #[arg(long)]
    no_cache: bool,

    /// Graph traversal algorithm.
    #[arg(short = 'a', long = "algo", value_enum, default_value = "astar")]
    algo: AlgoArg,

    /// Adjacency representation.
    #[arg(long = "struct", visible_alias = "driver", value_enum, default_value = "list")]
    graph_struct: StructArg,

    /// How edge weights are computed.
    #[arg(short = 'r', long = "route", visible_alias = "routing", value_enum, default_value = "fastest")]
    route: RouteArg,

    /// Custom weight coefficients: 7 floats (slow,time,distance,turn,nonroad,rating,tolls)
    /// separated by ',' or '|'. Only used with `--route custom`.
    #[arg(long = "config", visible_alias = "cfg")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = Point::parse(&cli.source, false).context("could not parse --source")?;
    let destination = Point::parse(&cli.destination, false).context("could not parse --destination")?;

    println!("Loading map from {}...", cli.map.display());
    let load_start = Instant::now();
    let roads = load_roads(&cli.map, !cli.no_cache).context("failed to load map")?;
    println!(
        "Loaded {} roads in {:.2}s",
        roads.len(),
        load_start.elapsed().as_secs_f64()
    );

    let backend_kind = match cli.graph_struct {
        StructArg::List => GraphBackendKind::List,
        StructArg::Matrix => GraphBackendKind::Matrix,
    };

    // Only the matrix backend can trigger ResourceWarning, so only it needs a
    // spare copy of the roads to retry with the list backend.
    let roads_backup = (backend_kind == GraphBackendKind::Matrix).then(|| roads.clone());

    println!("Building graph ({:?} backend)...", cli.graph_struct);
    let build_start = Instant::now();
    let graph = match GraphBuilder::new(roads)
        .backend(backend_kind)
        .junction_policy(JunctionPolicy::Always)
        .build()
    {
        Ok(graph) => graph,
        Err(GraphError::ResourceWarning { vertices, bytes }) => {
            eprintln!(
                "warning: an adjacency matrix for {vertices} vertices would allocate {:.1} GiB.",
                bytes as f64 / (1 << 30) as f64
            );
            eprint!("Proceed anyway with the list backend instead? [y/N] ");
            std::io::stderr().flush().ok();

            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer)?;
            if !answer.trim().eq_ignore_ascii_case("y") {
                bail!("aborted: rerun with --struct list to use the adjacency-list backend");
            }

            let roads = roads_backup.expect("resource warning only fires for the matrix backend");
            println!("Rebuilding with the list backend...");
            GraphBuilder::new(roads)
                .backend(GraphBackendKind::List)
                .junction_policy(JunctionPolicy::Always)
                .build()?
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "Graph built: {} vertices in {:.2}s",
        graph.size(),
        build_start.elapsed().as_secs_f64()
    );

    let source_vertex = graph.nearest_vertex(source).context("empty graph: no vertex to snap to")?;
    let dest_vertex = graph
        .nearest_vertex(destination)
        .context("empty graph: no vertex to snap to")?;

    let route_opt = match cli.route {
        RouteArg::Shortest => RouteOpt::Shortest,
        RouteArg::Fastest => RouteOpt::Fastest,
        RouteArg::Custom => RouteOpt::Custom,
    };
    let coeffs = cli
        .config
        .as_deref()
        .map(Coefficients::parse)
        .transpose()
        .context("invalid --config coefficients")?;
    let weight = create(route_opt, coeffs);
    let heuristic = Heuristic;

    println!("Routing with {:?} via {:?}...", cli.algo, cli.route);
    let run_start = Instant::now();

    let (path, found, counter, search_bytes) = match cli.algo {
        AlgoArg::Astar => {
            let mut search = AStar::new(&graph, weight.as_ref(), &heuristic);
            search.run(source_vertex, dest_vertex, true);
            let (path, found) = search.reconstruct(source_vertex, dest_vertex);
            (path, found, search.counter().clone(), search.size_of())
        }
        AlgoArg::Dijkstra => {
            let mut search = Dijkstra::new(&graph, weight.as_ref());
            search.run(source_vertex, dest_vertex, true);
            let (path, found) = search.reconstruct(source_vertex, dest_vertex);
            (path, found, search.counter().clone(), search.size_of())
        }
        AlgoArg::Bfs => {
            let mut search = Bfs::new(&graph);
            search.run(source_vertex, dest_vertex, true);
            let (path, found) = search.reconstruct(source_vertex, dest_vertex);
            (path, found, search.counter().clone(), search.size_of())
        }
        AlgoArg::Dfs => {
            let mut search = Dfs::new(&graph);
            search.run(source_vertex, dest_vertex, true);
            let (path, found) = search.reconstruct(source_vertex, dest_vertex);
            (path, found, search.counter().clone(), search.size_of())
        }
    };

    let elapsed = run_start.elapsed();

    if !found {
        eprintln!("No route found from source to destination.");
        // still report what little path was recoverable for debugging
        eprintln!("Partial path length: {} vertices", path.len());
        std::process::exit(1);
    }

    let mut total_distance = 0.0;
    for pair in path.windows(2) {
        total_distance += Point::haversine(graph.point_of(pair[0]), graph.point_of(pair[1]));
    }

    println!();
    println!("=== Route found ===");
    println!("Vertices in path : {}", path.len());
    println!("Distance         : {:.0} m ({:.2} km)", total_distance, total_distance / 1000.0);
    println!("Search time      : {:.3} s", elapsed.as_secs_f64());
    println!(
        "Diagnostics      : {} steps, {} mem-ops, {} comparisons",
        counter.steps, counter.memops, counter.comparisons
    );
    println!(
        "Memory estimate  : {:.1} KiB search + {:.1} MiB graph",
        search_bytes as f64 / 1024.0,
        graph.size_of() as f64 / (1 << 20) as f64
    );

    println!();
    println!("{:<6} {:<12} {:<12} {:<24}", "Hop", "Lon", "Lat", "Road");
    println!("{}", "-".repeat(56));
    for (i, &v) in path.iter().enumerate() {
        let p = graph.point_of(v);
        let road = graph.road_of(v);
        println!("{:<6} {:<12.6} {:<12.6} {:<24}", i, p.lon, p.lat, road.display_name());
    }

    Ok(())
}
