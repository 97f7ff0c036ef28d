//! Text rendering of core results

use std::fmt::Write;

use colored::*;

use quantlens_core::prelude::*;

const BAR_WIDTH: usize = 40;

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

pub fn quantization(view: &QuantizationView, with_staircase: bool) -> String {
    let mut out = String::new();
    let cfg = &view.config;
    let p = &view.params;
    let s = &view.sample;

    let _ = writeln!(out, "{}", "Quantization (INT8)".bold());
    let _ = writeln!(out, "  mode        {}", cfg.mode.to_string().cyan());
    let _ = writeln!(out, "  range       [{:.4}, {:.4}]", cfg.real_min, cfg.real_max);
    let _ = writeln!(out, "  scale S     {:.6}", p.scale);
    let _ = writeln!(out, "  zero pt Z   {}", p.zero_point);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  q = round({:.2} / {:.4} + {}) = {}",
        s.real,
        p.scale,
        p.zero_point,
        s.quantized.to_string().green().bold()
    );
    let _ = writeln!(out, "  r' = S * (q - Z) = {:.6}", s.dequantized);

    let err = format!("{:+.6}", s.error);
    let err = if view.significant_error { err.yellow() } else { err.normal() };
    let _ = writeln!(out, "  error       {}", err);
    if view.clipped {
        let _ = writeln!(out, "  {}", "input clipped to the representable range".red());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Neighborhood".bold());
    for b in &view.neighborhood.buckets {
        let marker = if b.code == view.neighborhood.snapped_code { "◀" } else { " " };
        let _ = writeln!(
            out,
            "  q={:>4}  [{:>9.5}, {:>9.5})  level {:>9.5} {}",
            b.code, b.lower, b.upper, b.level, marker
        );
    }

    if with_staircase {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} window [{:.3}, {:.3}], {} steps",
            "Staircase".bold(),
            view.staircase.window_min,
            view.staircase.window_max,
            view.staircase.len()
        );
        for b in &view.staircase.buckets {
            let _ = writeln!(out, "  {:>4}  {:>9.5} .. {:>9.5}  -> {:>9.5}", b.code, b.lower, b.upper, b.level);
        }
    }
    out
}

pub fn distribution(scores: &[ClassScore], dist: &TemperatureDistribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} T = {:.1}", "Softmax".bold(), dist.temperature);
    let top = dist.argmax();
    for (i, (score, p)) in scores.iter().zip(&dist.percentages).enumerate() {
        let label = if Some(i) == top {
            score.label.yellow().bold()
        } else {
            score.label.normal()
        };
        let _ = writeln!(out, "  {:>18}  {:>7.2}  {:>7.3}%  {}", label, score.logit, p, bar(*p));
    }
    let _ = writeln!(out, "  entropy {:.3} bits", dist.entropy_bits());
    out
}

pub fn distill(report: &crate::DistillReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} T = {:.1}, alpha = {:.2}",
        "Distillation".bold(),
        report.temperature,
        report.alpha
    );
    let _ = writeln!(out, "  {:>18}  {:>9}  {:>9}", "class", "teacher%", "student%");
    for ((score, t), s) in default_scores().iter().zip(&report.teacher).zip(&report.student) {
        let _ = writeln!(out, "  {:>18}  {:>9.3}  {:>9.3}", score.label, t, s);
    }
    let _ = writeln!(out, "  soft (KL)   {:.6}", report.soft);
    let _ = writeln!(out, "  hard (CE)   {:.6}", report.hard);
    let _ = writeln!(out, "  total       {}", format!("{:.6}", report.total).green().bold());
    out
}

pub fn prune(weights: &WeightSet, matrix: &MatrixView, network: &NetworkView) -> String {
    let mut out = String::new();
    let cols = (weights.len() as f64).sqrt().ceil().max(1.0) as usize;

    let _ = writeln!(
        out,
        "{} seed {} | T: {:.3} | Active: {:.0}%",
        "Weight Matrix".bold(),
        weights.seed(),
        matrix.threshold,
        100.0 - matrix.achieved_sparsity
    );
    for (r, row) in weights.rows(cols).enumerate() {
        let _ = write!(out, "  ");
        for (c, w) in row.iter().enumerate() {
            let cell = if matrix.keep_mask[r * cols + c] {
                if *w > 0.0 { "■".green() } else { "■".magenta() }
            } else {
                "·".dimmed()
            };
            let _ = write!(out, "{} ", cell);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} ({}) units {}/{} edges {}/{}",
        "Network".bold(),
        network.mode,
        network.active_units(),
        network.unit_active.len(),
        network.active_edges(),
        network.edge_active.len()
    );
    out
}

pub fn tradeoff(view: &TradeoffView, rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {:?} on {:?}",
        "Trade-off".bold(),
        view.mode,
        view.hardware
    );
    let _ = writeln!(
        out,
        "  current  sparsity {:>5.1}%  accuracy {:>6.2}%  speedup {:>5.2}x",
        view.current.sparsity * 100.0,
        view.current.accuracy,
        view.current.speedup
    );

    let stride = (view.curve.len() / rows.max(1)).max(1);
    for point in view.curve.iter().step_by(stride) {
        let _ = writeln!(
            out,
            "  {:>5.1}%  acc {:>6.2}  {}  speed {:>5.2}x",
            point.sparsity * 100.0,
            point.accuracy,
            bar(point.accuracy),
            point.speedup
        );
    }
    out
}

pub fn info() {
    println!("{}", "QuantLens - Neural Network Compression Explained".bold());
    println!();
    println!("{}", "Techniques:".bold());
    println!("  • {} Quantization: FP32 → INT8 with scale S and zero point Z", "✓".green());
    println!("  • {} Pruning: magnitude thresholds, structured vs unstructured", "✓".green());
    println!("  • {} Distillation: temperature softmax and dark knowledge", "✓".green());
    println!();
    println!("{}", "Commands:".bold());
    println!("  quantlens quantize --preset relu          # ReLU6 activations, asymmetric");
    println!("  quantlens quantize --min -2 --max 2 -i 1  # Custom range");
    println!("  quantlens softmax -t 5                    # Melt the distribution");
    println!("  quantlens distill -s 4,3,1,0 -t 4         # Student vs teacher loss");
    println!("  quantlens prune -s 60 -m structured       # Prune matrix and network");
    println!("  quantlens tradeoff --hardware npu         # Accuracy vs speedup");
    println!();
    println!("  Add --json to any command for machine-readable output.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(100.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(250.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_prune_renders_every_weight() {
        let session = VisualizationSession::new(LensConfig::default()).unwrap();
        let matrix = session.matrix_view(50.0).unwrap();
        let network = session.network_view(PruningMode::Structured, 50.0).unwrap();
        colored::control::set_override(false);
        let text = prune(session.weights(), &matrix, &network);
        assert!(text.contains("seed 42"));
        let cells = text.chars().filter(|c| *c == '■' || *c == '·').count();
        assert_eq!(cells, 100);
    }

    #[test]
    fn test_tradeoff_rows() {
        let session = VisualizationSession::new(LensConfig::default()).unwrap();
        let view = session
            .tradeoff_view(PruningMode::Unstructured, HardwareProfile::Standard, 20.0)
            .unwrap();
        colored::control::set_override(false);
        let text = tradeoff(&view, 10);
        // header, current, 11 sampled rows (0, 10, ..., 100)
        assert_eq!(text.lines().count(), 13);
    }
}
