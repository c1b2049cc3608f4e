use std::path::Path;

use console::Style;
use scenepair_core::pipeline::config::OutputConfig;
use scenepair_core::pipeline::{OutputPaths, PairReport};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_output_summary(first: &Path, second: &Path, config: &OutputConfig, paths: &OutputPaths) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Scene Pair Composite"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("First"), s.path.apply_to(first.display()));
    println!("  {:<14}{}", s.label.apply_to("Second"), s.path.apply_to(second.display()));

    if config.write_composite {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Composite"),
            s.path.apply_to(paths.composite.display())
        );
    } else {
        println!("  {:<14}{}", s.label.apply_to("Composite"), s.disabled.apply_to("disabled"));
    }

    if config.write_animation {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Animation"),
            s.path.apply_to(paths.animation.display())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Frames"),
            s.value.apply_to(format!("{}, {} ms", config.frame_mode, config.frame_delay_ms))
        );
    } else {
        println!("  {:<14}{}", s.label.apply_to("Animation"), s.disabled.apply_to("disabled"));
    }
    println!();
}

pub fn print_pair_report(report: &PairReport) {
    let s = Styles::new();
    let total = report.overlap.cols * report.overlap.rows;
    let coverage = if total > 0 {
        report.valid_pixels as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    println!(
        "  {:<14}{}",
        s.label.apply_to("Overlap"),
        s.value.apply_to(format!("{}x{}", report.overlap.cols, report.overlap.rows))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Valid"),
        s.value.apply_to(format!("{} px ({coverage:.1}%)", report.valid_pixels))
    );
    for path in report.composite.iter().chain(report.animation.iter()) {
        println!("  {:<14}{}", s.label.apply_to("Saved"), s.path.apply_to(path.display()));
    }
    println!();
}
