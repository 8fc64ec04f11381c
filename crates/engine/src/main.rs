use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use engine::error::EngineError;
use engine::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| EngineError::Config("usage: engine <gc-log-file>".to_string()))?;
    let reader = BufReader::new(File::open(&path).map_err(EngineError::Io)?);
    let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;

    let (events, summary) = run::run(&config, lines)?;

    if config.emit_json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for event in &events {
            serde_json::to_writer(&mut out, event)?;
            writeln!(out)?;
        }
        serde_json::to_writer(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        for event in &events {
            println!("{}", event.line);
        }
        println!(
            "events={} unidentified={} (+{} dropped) total_pause={}s throughput={}",
            summary.events,
            summary.unidentified,
            summary.unidentified_dropped,
            engine::units::time::micros_to_seconds_display(summary.total_pause_micros),
            summary
                .throughput_percent
                .map_or_else(|| "n/a".to_string(), |p| format!("{p}%")),
        );
    }
    Ok(())
}
