use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flipbot::board::{Board, BoardSize};
use flipbot::count;
use flipbot::problem;
use flipbot::search::tt::TableSizes;
use flipbot::search::{SearchParams, SearchResult, Searcher, ROW_HEADER, ROW_SEPARATOR};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about = "Othello solver and analysis tool", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Maximum midgame depth in plies
    #[arg(long, default_value_t = 60, global = true)]
    depth: u32,

    /// Selectivity level, 0 = exact, 1..=5 prune harder
    #[arg(long, default_value_t = 0, global = true,
          value_parser = clap::value_parser!(u8).range(0..=5))]
    selectivity: u8,

    /// Empties at which the exact endgame solver takes over
    #[arg(long, default_value_t = 12, global = true,
          value_parser = clap::value_parser!(u32).range(0..=24))]
    endgame_threshold: u32,

    /// Worker threads for the root split (0 = all cores)
    #[arg(long, default_value_t = 1, global = true)]
    threads: usize,

    /// Total hash memory in MB
    #[arg(long, global = true)]
    hash_mb: Option<usize>,

    /// Stop after this many nodes
    #[arg(long, global = true)]
    nodes: Option<u64>,

    /// Stop after this many milliseconds
    #[arg(long, global = true)]
    movetime_ms: Option<u64>,

    /// Print hash-table store/probe/hit counters
    #[arg(long, global = true)]
    table_stats: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve every problem in a file and check stored scores
    Solve {
        file: PathBuf,
    },
    /// Analyze a single position given as 64 squares plus color
    Analyze {
        /// Board text: X/O/- per square, a1 first
        board: String,
        /// Side to move, X or O
        #[arg(default_value = "X")]
        color: String,
    },
    /// Fixed-settings benchmark over a problem file
    Bench {
        file: PathBuf,
    },
    /// Count reachable games, positions or shapes
    Count {
        #[arg(value_parser = ["games", "positions", "shapes"])]
        kind: String,
        #[arg(long, default_value_t = 6)]
        ply: u32,
        /// Play on the centered 6x6 board
        #[arg(long)]
        small: bool,
    },
}

fn build_params(args: &Args) -> SearchParams {
    let mut params = SearchParams {
        depth: args.depth,
        selectivity: args.selectivity,
        endgame_threshold: args.endgame_threshold,
        threads: args.threads,
        max_nodes: args.nodes,
        movetime: args.movetime_ms.map(Duration::from_millis),
        count_table_stats: args.table_stats,
        ..SearchParams::default()
    };
    if let Some(mb) = args.hash_mb {
        params.table_sizes = TableSizes::from_mb(mb);
    }
    params
}

fn print_result(result: &SearchResult) {
    println!("{ROW_HEADER}");
    println!("{ROW_SEPARATOR}");
    for row in &result.rows {
        println!("{row}");
    }
    let best = match result.best_move {
        Some(sq) => flipbot::board::square_name(sq),
        None => "pass".to_string(),
    };
    println!("best {best} score {:+} nodes {}", result.score, result.nodes);
}

fn print_table_stats(searcher: &Searcher) {
    let tables = searcher.tables();
    for (name, table) in [
        ("main", &tables.main),
        ("pv", &tables.pv),
        ("shallow", &tables.shallow),
    ] {
        if let Some((stores, probes, hits)) = table.stats() {
            println!("{name:>8}: {stores} stores, {probes} probes, {hits} hits");
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let params = build_params(&args);

    match &args.command {
        Command::Solve { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let problems = problem::load_problems(&text)
                .map_err(|(line, e)| anyhow::anyhow!("{}:{line}: {e}", file.display()))?;
            let mut searcher = Searcher::new(params)?;
            let mut failed = 0;
            for (i, v) in problem::verify(&mut searcher, &problems).iter().enumerate() {
                let mark = if v.passed() { "ok" } else { "FAIL" };
                let want = v
                    .expected
                    .map(|s| format!("{s:+}"))
                    .unwrap_or_else(|| "?".to_string());
                println!(
                    "#{:<4} score {:+} (expected {want}) nodes {:>12}  {mark}",
                    i + 1,
                    v.result.score,
                    v.result.nodes
                );
                if !v.passed() {
                    failed += 1;
                }
            }
            if args.table_stats {
                print_table_stats(&searcher);
            }
            if failed > 0 {
                anyhow::bail!("{failed}/{} problems failed", problems.len());
            }
        }
        Command::Analyze { board, color } => {
            let color = color.chars().next().unwrap_or('X');
            let board = Board::parse(board, color).context("parsing position")?;
            println!("{board}");
            let mut searcher = Searcher::new(params)?;
            let result = searcher.search(&board);
            print_result(&result);
            if args.table_stats {
                print_table_stats(&searcher);
            }
        }
        Command::Bench { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let problems = problem::load_problems(&text)
                .map_err(|(line, e)| anyhow::anyhow!("{}:{line}: {e}", file.display()))?;
            let mut searcher = Searcher::new(params)?;
            let (nodes, secs) = problem::benchmark(&mut searcher, &problems);
            let nps = if secs > 0.0 { (nodes as f64 / secs) as u64 } else { 0 };
            println!("{} problems, {nodes} nodes in {secs:.3}s ({nps} N/s)", problems.len());
            if args.table_stats {
                print_table_stats(&searcher);
            }
        }
        Command::Count { kind, ply, small } => {
            let size = if *small { BoardSize::Small } else { BoardSize::Standard };
            let board = Board::new(size);
            let start = Instant::now();
            let n = match kind.as_str() {
                "games" => count::count_games(&board, *ply),
                "positions" => count::count_positions(&board, *ply),
                _ => count::count_shapes(&board, *ply),
            };
            println!("{n} {kind} at ply {ply} ({:.3}s)", start.elapsed().as_secs_f64());
        }
    }
    Ok(())
}
