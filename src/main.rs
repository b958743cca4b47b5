use colored::Colorize;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use webcam_ppg::config::{load_config, Config};
use webcam_ppg::error::Result;
use webcam_ppg::processing::analysis::analyze_recording;
use webcam_ppg::processing::pipeline::PpgPipeline;
use webcam_ppg::processing::scheduler::Scheduler;
use webcam_ppg::sources::SimulatedFrameSource;
use webcam_ppg::utils::recorder::read_samples_from_csv;
use webcam_ppg::visualization::chart_feed::ChartFeed;
use webcam_ppg::visualization::console::ConsoleSink;
use webcam_ppg::visualization::ChartPoint;

const CONFIG_FILE: &str = "ppg.yaml";
const DEFAULT_SIMULATION_SECS: u64 = 10;

fn load_or_default() -> Result<Config> {
    if Path::new(CONFIG_FILE).exists() {
        println!("Using configuration from {}", CONFIG_FILE);
        load_config(CONFIG_FILE)
    } else {
        Ok(Config::default())
    }
}

/// Waits for the scheduler thread, reporting a panic instead of propagating it.
fn join_scheduler<T>(join: JoinHandle<T>) -> Option<T> {
    match join.join() {
        Ok(scheduler) => Some(scheduler),
        Err(_) => {
            eprintln!("{}", "Scheduler thread panicked".red());
            None
        }
    }
}

fn simulate(config: Config, seconds: u64) -> Result<()> {
    let source = SimulatedFrameSource::new(config.simulation.clone());
    let pipeline = PpgPipeline::new(config)?;
    let scheduler = Scheduler::new(pipeline, source, ConsoleSink::default());

    let (handle, join) = scheduler.spawn();
    thread::sleep(Duration::from_secs(seconds));
    handle.cancel();

    if let Some(scheduler) = join_scheduler(join) {
        let stats = scheduler.pipeline().stats();
        println!(
            "{} frames: {}, windows: {}, dropped: {}, FPS: {:.3}",
            "Finished".green(),
            stats.frames_processed,
            stats.windows_completed,
            stats.dropped_frames,
            stats.fps()
        );
    }
    Ok(())
}

fn replay(config: Config, path: &str) -> Result<()> {
    let samples = read_samples_from_csv(path)?;
    println!("Replaying {} samples from {}", samples.len(), path);

    let redraw_secs = config.chart.redraw_interval_ms as f64 / 1000.0;
    let mut chart = ChartFeed::new(config.chart.max_points);
    let mut sink = ConsoleSink::default();
    let mut pipeline = PpgPipeline::new(config)?;
    let mut next_redraw = redraw_secs;

    for sample in samples {
        let state = pipeline.push_sample(sample);
        if sample.timestamp >= next_redraw {
            chart.append(ChartPoint {
                time: sample.timestamp,
                value: state.current_value,
                signal_present: state.is_signal_present,
            });
            chart.render(&mut sink);
            next_redraw += redraw_secs;
        }
    }

    let stats = pipeline.stats();
    println!(
        "{} samples: {}, windows: {}, skipped windows: {}",
        "Finished".green(),
        stats.frames_processed,
        stats.windows_completed,
        stats.detrend_failures
    );
    Ok(())
}

fn analyze(config: Config, path: &str) -> Result<()> {
    let samples = read_samples_from_csv(path)?;
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let summaries = analyze_recording(&values, config.window.capacity)?;

    println!("{:>6} {:>10} {:>10} {:>12}", "window", "DC", "AC", "slope");
    for summary in &summaries {
        let ac = format!("{:>10.5}", summary.ac);
        let ac = if summary.ac > 0.0 { ac.green() } else { ac.yellow() };
        println!(
            "{:>6} {:>10.5} {} {:>12.3e}",
            summary.index, summary.dc, ac, summary.slope
        );
    }
    println!("{} complete windows", summaries.len());
    Ok(())
}

#[cfg(feature = "visualization")]
fn view(config: Config) -> Result<()> {
    use webcam_ppg::visualization::window::VisualizationWindow;
    use webcam_ppg::visualization::{create_shared_chart, SharedChartSink};

    let chart = create_shared_chart();
    let visualization = config.visualization.clone();
    let source = SimulatedFrameSource::new(config.simulation.clone());
    let pipeline = PpgPipeline::new(config)?;
    let scheduler = Scheduler::new(pipeline, source, SharedChartSink::new(chart.clone()));

    let (handle, join) = scheduler.spawn();
    if let Err(e) = VisualizationWindow::run(chart, visualization) {
        eprintln!("Visualization window error: {}", e);
    }
    handle.cancel();
    join_scheduler(join);
    Ok(())
}

#[cfg(not(feature = "visualization"))]
fn view(_config: Config) -> Result<()> {
    println!("Rebuild with --features visualization to open the chart window");
    Ok(())
}

fn usage() {
    println!("Usage: ppg <simulate [seconds] | replay <samples.csv> | analyze <samples.csv> | view>");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
        return;
    }

    let config = match load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red(), e);
            std::process::exit(1);
        }
    };

    let result = match (args[1].as_str(), args.get(2)) {
        ("simulate", seconds) => {
            let seconds = seconds
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SIMULATION_SECS);
            simulate(config, seconds)
        }
        ("replay", Some(path)) => replay(config, path),
        ("analyze", Some(path)) => analyze(config, path),
        ("view", _) => view(config),
        _ => {
            usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}
