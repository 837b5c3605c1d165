//! `scroll` subcommand: drive the choreographer through an evenly sampled
//! scroll from the top of the gallery to the bottom.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::cell::RefCell;
use std::rc::Rc;

use choreo::{ChapterChange, Choreographer, Pacing, ScrollState};
use serde::Serialize;

use crate::{CliError, ScrollArgs};

/// One scroll sample and everything derived from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub step: u32,
    pub offset: f64,
    #[serde(flatten)]
    pub state: ScrollState,
    pub scan_percent: u8,
    pub track_translate_vw: f64,
    pub ticker_secs: f64,
}

/// Feed `steps + 1` evenly spaced offsets over `height` into `choreo`.
pub fn simulate(choreo: &mut Choreographer, steps: u32, height: f64) -> Vec<Sample> {
    (0..=steps)
        .map(|step| {
            let offset = height * f64::from(step) / f64::from(steps);
            choreo.update(offset, height);
            Sample {
                step,
                offset,
                state: *choreo.state(),
                scan_percent: choreo.scan_percent(),
                track_translate_vw: choreo.track_translate_vw(),
                ticker_secs: choreo.ticker_duration_secs(),
            }
        })
        .collect()
}

pub fn run(args: ScrollArgs) -> Result<(), CliError> {
    if args.steps == 0 {
        return Err(CliError::NoSteps);
    }
    let pacing = Pacing::new(args.segments, args.hold)?;
    let mut choreo = Choreographer::new(pacing);

    let changes: Rc<RefCell<Vec<ChapterChange>>> = Rc::default();
    let sink = Rc::clone(&changes);
    choreo.on_chapter_change(move |change| sink.borrow_mut().push(change));

    let samples = simulate(&mut choreo, args.steps, args.height);
    if args.json {
        for sample in &samples {
            println!("{}", serde_json::to_string(sample)?);
        }
        return Ok(());
    }

    println!("{:>4} {:>9} {:>8} {:>7} {:>7} {:>5} {:>8} {:>7}", "step", "offset", "progress", "chapter", "panel", "scan", "track", "ticker");
    for sample in &samples {
        println!(
            "{:>4} {:>9.1} {:>8.3} {:>7} {:>7.3} {:>4}% {:>7.1}vw {:>6.2}s",
            sample.step,
            sample.offset,
            sample.state.progress,
            sample.state.segment_index,
            sample.state.panel_offset,
            sample.scan_percent,
            sample.track_translate_vw,
            sample.ticker_secs,
        );
    }
    for change in changes.borrow().iter() {
        println!("chapter {} -> {}", change.from, change.to);
    }
    Ok(())
}
